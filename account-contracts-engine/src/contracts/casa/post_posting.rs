use chrono::{DateTime, Utc};

use account_contracts_api::{ContractResult, HookDirectives, PostingInstructionBatch, Vault};
use account_contracts_config::models::product::CasaParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::CasaContract;
use crate::components::side_effects::{autosave, charge_excess_withdrawals};
use crate::context::HookContext;

pub const POST_POSTING: &str = "POST_POSTING";

impl CasaContract {
    /// Excess withdrawal fees and autosave transfers go out together in one batch
    pub(super) fn post_posting_impl(
        vault: &dyn Vault,
        batch: &PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        let parameters = CasaParameters::load(vault, effective_date)?;
        let hook = format!("{POST_POSTING}_{}", batch.client_batch_id);
        let mut ctx = HookContext::new(vault, Self::TSIDE, &hook, effective_date)?;

        let mut instructions = charge_excess_withdrawals(&mut ctx, &parameters, batch)?;
        let savings = autosave(&mut ctx, &parameters, batch, &instructions)?;
        instructions.extend(savings);
        ctx.instruct_posting_batch(instructions, effective_date);
        Ok(ctx.into_directives())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::side_effects::TRANSACTION_LIMIT_WARNING_WORKFLOW;
    use crate::contracts::casa::test_utils::create_test_casa_vault;
    use crate::test_helper::{dec, ts, TEST_ACCOUNT_ID};
    use account_contracts_api::{PostingInstruction, SmartContract};

    #[test]
    fn test_fee_and_autosave_share_one_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_casa_vault(&[
            ("monthly_withdrawal_limit", "1"),
            ("reject_excess_withdrawals", "false"),
            ("excess_withdrawal_fee", "2"),
            ("autosave_rounding_amount", "1"),
            ("autosave_savings_account", "SAVINGS"),
        ]);
        vault.deposit(dec("100"), "GBP", ts(2020, 1, 10, 11, 0, 0));
        let at = ts(2020, 1, 12, 10, 0, 0);
        let purchase = PostingInstructionBatch::new(
            "purchase",
            at,
            vec![
                PostingInstruction::outbound_hard_settlement(dec("9.25"), "GBP", TEST_ACCOUNT_ID, "p1", at),
                PostingInstruction::outbound_hard_settlement(dec("4.5"), "GBP", TEST_ACCOUNT_ID, "p2", at),
            ],
        );
        vault.commit(&purchase);

        let directives = CasaContract::new().post_posting_code(&vault, &purchase, at)?;
        assert_eq!(directives.posting_batches.len(), 1);
        assert_eq!(directives.posting_batches[0].posting_instructions.len(), 2);
        assert_eq!(directives.workflows[0].workflow, TRANSACTION_LIMIT_WARNING_WORKFLOW);

        vault.commit_directives(&directives);
        // one withdrawal over the limit, round-ups of 0.75 and 0.50
        assert_eq!(vault.default_balance("GBP"), dec("83"));
        Ok(())
    }

    #[test]
    fn test_autosave_skipped_when_fee_uses_up_balance() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_casa_vault(&[
            ("monthly_withdrawal_limit", "0"),
            ("reject_excess_withdrawals", "false"),
            ("excess_withdrawal_fee", "2.2"),
            ("autosave_rounding_amount", "1"),
            ("autosave_savings_account", "SAVINGS"),
        ]);
        vault.deposit(dec("10"), "GBP", ts(2020, 1, 10, 11, 0, 0));
        let at = ts(2020, 1, 12, 10, 0, 0);
        let purchase = PostingInstructionBatch::new(
            "purchase",
            at,
            vec![PostingInstruction::outbound_hard_settlement(dec("7.5"), "GBP", TEST_ACCOUNT_ID, "p1", at)],
        );
        vault.commit(&purchase);

        let directives = CasaContract::new().post_posting_code(&vault, &purchase, at)?;
        assert_eq!(directives.posting_batches.len(), 1);
        assert_eq!(directives.posting_batches[0].posting_instructions.len(), 1);

        vault.commit_directives(&directives);
        // 2.5 left, the fee takes 2.2 and a 0.5 round-up would overdraw
        assert_eq!(vault.default_balance("GBP"), dec("0.3"));
        Ok(())
    }

    #[test]
    fn test_deposit_triggers_nothing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_casa_vault(&[
            ("monthly_withdrawal_limit", "1"),
            ("autosave_rounding_amount", "1"),
            ("autosave_savings_account", "SAVINGS"),
        ]);
        let deposit = vault.deposit(dec("10.5"), "GBP", ts(2020, 1, 11, 10, 0, 0));

        let directives = CasaContract::new().post_posting_code(&vault, &deposit, ts(2020, 1, 11, 10, 0, 0))?;
        assert!(directives.is_empty());
        Ok(())
    }
}
