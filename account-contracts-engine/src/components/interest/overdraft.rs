use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use account_contracts_api::{BalanceKey, ContractError, ContractResult, PostingInstruction, Vault};
use account_contracts_config::models::product::{CasaParameters, FeeAccountsModel, OverdraftFeature};
use account_contracts_config::models::tier::TierName;

use super::holding::{AccrualSide, HoldingAccount};
use super::ACCRUED_OVERDRAFT_FEE_RECEIVABLE;
use crate::components::tier::{resolve_tiered_decimal, resolve_tiered_value};
use crate::context::HookContext;
use crate::utils::midnight;

pub const ACCRUE_UNARRANGED_OVERDRAFT_FEE: &str = "ACCRUE_UNARRANGED_OVERDRAFT_FEE";

/// Buffer days value meaning the buffer never expires
pub const BUFFER_NEVER_EXPIRES: i64 = -1;

/// Whether the account has stayed overdrawn through the whole buffer window.
///
/// Samples the DEFAULT balance at midnight of the day of `at` and of each of the `buffer_days`
/// days before it. A single non-negative sample keeps the buffer.
pub fn is_buffer_expired(vault: &dyn Vault, denomination: &str, at: DateTime<Utc>, buffer_days: i64) -> bool {
    if buffer_days < 0 {
        return false;
    }
    let key = BalanceKey::default_committed(denomination);
    let today = at.date_naive();
    (0..=buffer_days).all(|days_back| {
        let sample_date = today - Duration::days(days_back);
        vault.get_balance(&key, midnight(sample_date)).net < Decimal::ZERO
    })
}

/// Overdraft amount free of interest for `tier`, zero once the buffer has expired
pub fn interest_free_buffer(
    ctx: &HookContext<'_>,
    overdraft: &OverdraftFeature,
    tier: &TierName,
    denomination: &str,
) -> ContractResult<Decimal> {
    let Some(buffers) = &overdraft.interest_free_buffer else {
        return Ok(Decimal::ZERO);
    };
    let amount = resolve_tiered_decimal(buffers, tier)?;

    let buffer_days = match &overdraft.overdraft_interest_free_buffer_days {
        Some(days) => resolve_tiered_value(days, tier, |value| {
            value.trunc().to_i64().ok_or_else(|| {
                ContractError::invalid_parameter("overdraft_interest_free_buffer_days", "not a whole number of days")
            })
        })?,
        None => BUFFER_NEVER_EXPIRES,
    };

    if is_buffer_expired(ctx.vault(), denomination, ctx.effective_date(), buffer_days) {
        debug!("Interest free buffer expired after {} days", buffer_days);
        return Ok(Decimal::ZERO);
    }
    Ok(amount)
}

/// Part of a negative balance beyond the buffer
pub fn overdraft_accrual_base(balance: Decimal, buffer: Decimal) -> Decimal {
    (-balance - buffer).max(Decimal::ZERO)
}

pub fn overdraft_fee_holding(accounts: &FeeAccountsModel) -> HoldingAccount {
    HoldingAccount::new(
        ACCRUED_OVERDRAFT_FEE_RECEIVABLE,
        AccrualSide::Receivable,
        &accounts.overdraft_fee_receivable_account,
        &accounts.overdraft_fee_income_account,
    )
}

/// Flat daily fee while the balance is beyond the arranged limit, accrued up to the cap
pub fn accrue_unarranged_overdraft_fee(
    ctx: &mut HookContext<'_>,
    parameters: &CasaParameters,
    balance: Decimal,
) -> ContractResult<Vec<PostingInstruction>> {
    let Some(overdraft) = &parameters.overdraft else {
        return Ok(Vec::new());
    };
    let Some(fee) = &overdraft.unarranged_fee else {
        return Ok(Vec::new());
    };
    if balance >= -overdraft.arranged_overdraft_limit {
        return Ok(Vec::new());
    }

    let holding = overdraft_fee_holding(&parameters.fee_accounts);
    let accrued = holding.accrued(ctx.vault(), &parameters.denomination, ctx.effective_date());
    let amount = fee
        .unarranged_overdraft_fee
        .min(fee.unarranged_overdraft_fee_cap - accrued)
        .max(Decimal::ZERO);
    if amount.is_zero() {
        debug!("Unarranged overdraft fee cap of {} reached", fee.unarranged_overdraft_fee_cap);
        return Ok(Vec::new());
    }

    let transfer = holding
        .accrual_transfer(ctx.account_id(), amount, &parameters.denomination, ACCRUE_UNARRANGED_OVERDRAFT_FEE)
        .with_detail("description", "Unarranged overdraft fee accrued")
        .with_detail("event", ACCRUE_UNARRANGED_OVERDRAFT_FEE);
    ctx.make_internal_transfer_instructions(transfer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{create_test_vault, dec, ts};
    use account_contracts_api::{Balance, Tside};

    fn record_midnight_balances(vault: &mut crate::test_helper::TestVault, day_balances: &[(u32, &str)]) {
        for (day, amount) in day_balances {
            let net = dec(amount);
            let balance = if net < Decimal::ZERO {
                Balance::new(-net, Decimal::ZERO, Tside::Liability)
            } else {
                Balance::new(Decimal::ZERO, net, Tside::Liability)
            };
            vault.record_balance(BalanceKey::default_committed("GBP"), ts(2020, 2, *day, 0, 0, 0), balance);
        }
    }

    #[test]
    fn test_buffer_expires_after_unbroken_negative_streak() {
        let mut vault = create_test_vault();
        record_midnight_balances(&mut vault, &[(1, "-10"), (2, "-10"), (3, "-10"), (4, "-10")]);

        // buffer of 3 days needs 4 negative samples: 1st to 4th
        assert!(is_buffer_expired(&vault, "GBP", ts(2020, 2, 4, 0, 0, 0), 3));
    }

    #[test]
    fn test_single_non_negative_sample_keeps_buffer() {
        let mut vault = create_test_vault();
        record_midnight_balances(&mut vault, &[(1, "5"), (2, "-10"), (3, "-10"), (4, "-10")]);

        assert!(!is_buffer_expired(&vault, "GBP", ts(2020, 2, 4, 0, 0, 0), 3));
        assert!(is_buffer_expired(&vault, "GBP", ts(2020, 2, 4, 0, 0, 0), 2));
    }

    #[test]
    fn test_perpetual_buffer_never_expires() {
        let mut vault = create_test_vault();
        record_midnight_balances(&mut vault, &[(1, "-10"), (2, "-10"), (3, "-10"), (4, "-10")]);

        assert!(!is_buffer_expired(&vault, "GBP", ts(2020, 2, 4, 0, 0, 0), BUFFER_NEVER_EXPIRES));
    }

    #[test]
    fn test_samples_never_look_ahead() {
        let mut vault = create_test_vault();
        record_midnight_balances(&mut vault, &[(1, "-10"), (2, "-10")]);
        record_midnight_balances(&mut vault, &[(3, "4")]);

        assert!(!is_buffer_expired(&vault, "GBP", ts(2020, 2, 3, 0, 0, 0), 1));
        assert!(is_buffer_expired(&vault, "GBP", ts(2020, 2, 2, 0, 0, 0), 1));
    }

    #[test]
    fn test_accrual_base_beyond_buffer() {
        assert_eq!(overdraft_accrual_base(dec("-300"), dec("100")), dec("200"));
        assert_eq!(overdraft_accrual_base(dec("-50"), dec("100")), Decimal::ZERO);
        assert_eq!(overdraft_accrual_base(dec("-50"), Decimal::ZERO), dec("50"));
    }
}
