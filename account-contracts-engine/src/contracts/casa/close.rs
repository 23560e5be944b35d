use chrono::{DateTime, Utc};
use tracing::info;

use account_contracts_api::{ContractResult, HookDirectives, Vault};
use account_contracts_config::models::product::CasaParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::CasaContract;
use super::scheduled::apply_overdraft_interest;
use crate::components::interest::{deposit_interest_holdings, reverse_accrued};
use crate::context::HookContext;

pub const CLOSE_ACCOUNT: &str = "CLOSE_ACCOUNT";
pub const REVERSE_DEPOSIT_INTEREST: &str = "REVERSE_DEPOSIT_INTEREST";
pub const REVERSE_NEGATIVE_DEPOSIT_INTEREST: &str = "REVERSE_NEGATIVE_DEPOSIT_INTEREST";

impl CasaContract {
    /// Unapplied deposit interest is forfeited; overdraft interest and fees are collected
    pub(super) fn close_impl(vault: &dyn Vault, effective_date: DateTime<Utc>) -> ContractResult<HookDirectives> {
        let parameters = CasaParameters::load(vault, effective_date)?;
        let mut ctx = HookContext::new(vault, Self::TSIDE, CLOSE_ACCOUNT, effective_date)?;
        info!("Closing account {}", vault.account_id());

        let [payable, receivable] = deposit_interest_holdings(&parameters.interest_accounts);
        let mut instructions = reverse_accrued(&mut ctx, &payable, &parameters.denomination, REVERSE_DEPOSIT_INTEREST)?;
        instructions.extend(reverse_accrued(
            &mut ctx,
            &receivable,
            &parameters.denomination,
            REVERSE_NEGATIVE_DEPOSIT_INTEREST,
        )?);
        instructions.extend(apply_overdraft_interest(&mut ctx, &parameters)?);
        ctx.instruct_posting_batch(instructions, effective_date);
        Ok(ctx.into_directives())
    }
}
