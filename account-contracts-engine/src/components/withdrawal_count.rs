use chrono::{DateTime, Datelike, Months, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::debug;

use account_contracts_api::{
    ClientTransactionEffects, ContractError, ContractResult, PostingInstructionBatch, Tside, Vault,
};

use crate::components::transactions::{customer_transactions, transactions_with_batch};
use crate::utils::{clamped_date, first_of_month, midnight};

/// Withdrawals made in the current monthly window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithdrawalCount {
    /// Counted before the batch under evaluation
    pub previous: u32,
    /// Made by the batch under evaluation
    pub current: u32,
}

impl WithdrawalCount {
    pub fn total(&self) -> u32 {
        self.previous + self.current
    }

    /// Withdrawals of this batch beyond `limit`
    pub fn excess(&self, limit: u32) -> u32 {
        if self.previous >= limit {
            self.current
        } else {
            self.total().saturating_sub(limit)
        }
    }

    /// True only for the batch that takes the count from below `limit` to at or above it
    pub fn reaches_limit(&self, limit: u32) -> bool {
        self.previous < limit && self.total() >= limit
    }
}

/// Which movements make a client transaction count as a withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalStage {
    /// A committed net debit; used once the batch has posted
    Settled,
    /// A committed or authorised net debit; used while the batch can still be rejected
    Authorised,
}

impl WithdrawalStage {
    fn is_withdrawal(&self, effects: &ClientTransactionEffects) -> bool {
        match self {
            WithdrawalStage::Settled => effects.settled < Decimal::ZERO,
            WithdrawalStage::Authorised => effects.settled < Decimal::ZERO || effects.unsettled < Decimal::ZERO,
        }
    }
}

/// Midnight on the account-creation day of month, at or before `at`
pub fn monthly_window_start(creation_date: DateTime<Utc>, at: DateTime<Utc>) -> ContractResult<DateTime<Utc>> {
    let anchor_day = creation_date.day();
    let this_month = midnight(clamped_date(at.year(), at.month(), anchor_day)?);
    if this_month <= at {
        return Ok(this_month);
    }
    let previous = first_of_month(at.date_naive())
        .checked_sub_months(Months::new(1))
        .ok_or_else(|| ContractError::InvalidConfiguration(format!("No monthly window before {at}")))?;
    Ok(midnight(clamped_date(previous.year(), previous.month(), anchor_day)?))
}

/// Counts withdrawals in the monthly window, separating this batch from earlier history.
///
/// A client transaction is a previous withdrawal when, without the batch's instructions, it
/// started in the window and is a withdrawal at `stage`. It is a current withdrawal when it holds
/// batch instructions, is a withdrawal with them, and was not already counted. A batch
/// settling an earlier authorisation therefore never counts the same withdrawal twice.
pub fn count_monthly_withdrawals(
    vault: &dyn Vault,
    tside: Tside,
    denomination: &str,
    batch: &PostingInstructionBatch,
    stage: WithdrawalStage,
    at: DateTime<Utc>,
) -> ContractResult<WithdrawalCount> {
    let window_start = monthly_window_start(vault.account_creation_date(), at)?;
    let account_id = vault.account_id();
    let batch_ids = batch.instruction_ids();
    let transactions = transactions_with_batch(vault, batch);

    let mut previous_keys = BTreeSet::new();
    for transaction in customer_transactions(&transactions) {
        let prior = transaction.excluding(&batch_ids);
        if prior.is_empty() || prior.start_time().map_or(true, |start| start < window_start) {
            continue;
        }
        if stage.is_withdrawal(&prior.effects(account_id, tside, denomination, None)) {
            previous_keys.insert(transaction.key());
        }
    }

    let current = customer_transactions(&transactions)
        .filter(|transaction| transaction.posting_instructions.iter().any(|pi| batch_ids.contains(&pi.id)))
        .filter(|transaction| !previous_keys.contains(&transaction.key()))
        .filter(|transaction| stage.is_withdrawal(&transaction.effects(account_id, tside, denomination, None)))
        .count();

    let count = WithdrawalCount {
        previous: u32::try_from(previous_keys.len()).unwrap_or(u32::MAX),
        current: u32::try_from(current).unwrap_or(u32::MAX),
    };
    debug!(
        "Withdrawals since {}: {} previous, {} in batch {}",
        window_start, count.previous, count.current, batch.client_batch_id
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{create_test_vault, dec, ts, TestVault, TEST_ACCOUNT_ID};
    use account_contracts_api::PostingInstruction;

    fn withdrawals(vault: &TestVault, ids: &[&str], at: DateTime<Utc>) -> PostingInstructionBatch {
        let instructions = ids
            .iter()
            .map(|id| PostingInstruction::outbound_hard_settlement(dec("10"), "GBP", vault.account_id(), id, at))
            .collect();
        PostingInstructionBatch::new(format!("batch_{}", ids.join("_")), at, instructions)
    }

    #[test]
    fn test_window_is_anchored_to_creation_day() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let creation = ts(2020, 1, 10, 10, 0, 0);
        assert_eq!(monthly_window_start(creation, ts(2020, 2, 15, 9, 0, 0))?, ts(2020, 2, 10, 0, 0, 0));
        assert_eq!(monthly_window_start(creation, ts(2020, 2, 9, 23, 0, 0))?, ts(2020, 1, 10, 0, 0, 0));
        assert_eq!(monthly_window_start(creation, ts(2020, 2, 10, 0, 0, 0))?, ts(2020, 2, 10, 0, 0, 0));

        let end_of_month = ts(2020, 1, 31, 10, 0, 0);
        assert_eq!(monthly_window_start(end_of_month, ts(2020, 3, 5, 0, 0, 0))?, ts(2020, 2, 29, 0, 0, 0));
        Ok(())
    }

    #[test]
    fn test_split_batches_count_previous_and_current() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        vault.deposit(dec("1000"), "GBP", ts(2020, 1, 10, 10, 0, 0));

        let first = withdrawals(&vault, &["w1"], ts(2020, 1, 15, 10, 0, 0));
        vault.commit(&first);

        let second = withdrawals(&vault, &["w2", "w3"], ts(2020, 1, 20, 10, 0, 0));
        vault.propose(&second);
        let count = count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &second, WithdrawalStage::Settled, ts(2020, 1, 20, 10, 0, 0))?;

        assert_eq!(count, WithdrawalCount { previous: 1, current: 2 });
        assert_eq!(count.total(), 3);
        assert_eq!(count.excess(2), 1);
        assert!(count.reaches_limit(2));
        Ok(())
    }

    #[test]
    fn test_count_after_commit_matches_count_before() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        vault.commit(&withdrawals(&vault, &["w1"], ts(2020, 1, 15, 10, 0, 0)));
        let second = withdrawals(&vault, &["w2", "w3"], ts(2020, 1, 20, 10, 0, 0));

        let before = count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &second, WithdrawalStage::Settled, ts(2020, 1, 20, 10, 0, 0))?;
        vault.commit(&second);
        let after = count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &second, WithdrawalStage::Settled, ts(2020, 1, 20, 10, 0, 0))?;
        assert_eq!(before, after);
        Ok(())
    }

    #[test]
    fn test_already_over_limit_charges_every_current_withdrawal() {
        let count = WithdrawalCount { previous: 2, current: 2 };
        assert_eq!(count.excess(2), 2);
        assert!(!count.reaches_limit(2));

        let below = WithdrawalCount { previous: 0, current: 1 };
        assert_eq!(below.excess(2), 0);
        assert!(!below.reaches_limit(2));
    }

    #[test]
    fn test_settlement_of_earlier_authorisation_is_not_double_counted() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        let auth_at = ts(2020, 1, 15, 10, 0, 0);
        vault.commit(&PostingInstructionBatch::new(
            "auth".to_string(),
            auth_at,
            vec![PostingInstruction::outbound_authorisation(dec("50"), "GBP", TEST_ACCOUNT_ID, "card1", auth_at)],
        ));

        let settle_at = ts(2020, 1, 16, 10, 0, 0);
        let settlement = PostingInstructionBatch::new(
            "settle".to_string(),
            settle_at,
            vec![PostingInstruction::outbound_settlement(dec("50"), "GBP", TEST_ACCOUNT_ID, "card1", settle_at)],
        );
        let count = count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &settlement, WithdrawalStage::Settled, settle_at)?;
        assert_eq!(count, WithdrawalCount { previous: 0, current: 1 });

        vault.commit(&settlement);
        let partial_at = ts(2020, 1, 17, 10, 0, 0);
        let next = withdrawals(&vault, &["w1"], partial_at);
        let count = count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &next, WithdrawalStage::Settled, partial_at)?;
        assert_eq!(count, WithdrawalCount { previous: 1, current: 1 });
        Ok(())
    }

    #[test]
    fn test_withdrawals_before_window_and_deposits_are_ignored() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        vault.commit(&withdrawals(&vault, &["old"], ts(2020, 1, 12, 10, 0, 0)));
        vault.deposit(dec("100"), "GBP", ts(2020, 2, 11, 10, 0, 0));

        let at = ts(2020, 2, 12, 10, 0, 0);
        let batch = withdrawals(&vault, &["new"], at);
        let count = count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &batch, WithdrawalStage::Settled, at)?;
        assert_eq!(count, WithdrawalCount { previous: 0, current: 1 });
        Ok(())
    }

    #[test]
    fn test_authorisations_count_only_at_authorised_stage() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        let auth_at = ts(2020, 1, 15, 10, 0, 0);
        let auth = PostingInstructionBatch::new(
            "auth".to_string(),
            auth_at,
            vec![PostingInstruction::outbound_authorisation(dec("50"), "GBP", TEST_ACCOUNT_ID, "card1", auth_at)],
        );
        let settled = count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &auth, WithdrawalStage::Settled, auth_at)?;
        assert_eq!(settled, WithdrawalCount { previous: 0, current: 0 });
        let authorised =
            count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &auth, WithdrawalStage::Authorised, auth_at)?;
        assert_eq!(authorised, WithdrawalCount { previous: 0, current: 1 });

        vault.commit(&auth);
        let settle_at = ts(2020, 1, 16, 10, 0, 0);
        let settlement = PostingInstructionBatch::new(
            "settle".to_string(),
            settle_at,
            vec![PostingInstruction::outbound_settlement(dec("50"), "GBP", TEST_ACCOUNT_ID, "card1", settle_at)],
        );
        let count =
            count_monthly_withdrawals(&vault, Tside::Liability, "GBP", &settlement, WithdrawalStage::Authorised, settle_at)?;
        assert_eq!(count, WithdrawalCount { previous: 1, current: 0 });
        Ok(())
    }
}
