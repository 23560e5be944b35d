use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use account_contracts_api::{BalanceKey, ContractError, ContractResult, PostingInstruction, Vault, DEFAULT_ADDRESS};
use account_contracts_config::models::product::{CasaParameters, ScheduleTime};
use account_contracts_config::models::tier::TierName;

use crate::components::dormancy::is_dormant;
use crate::components::tier::resolve_optional_tiered_decimal;
use crate::context::{HookContext, InternalTransfer, TransferLeg};

pub const MAINTENANCE_FEE: &str = "MAINTENANCE_FEE";
pub const ANNUAL_MAINTENANCE_FEE: &str = "ANNUAL_MAINTENANCE_FEE";
pub const INACTIVITY_FEE: &str = "INACTIVITY_FEE";
pub const MINIMUM_BALANCE_FEE: &str = "MINIMUM_BALANCE_FEE";

/// Charges `amount` from the customer DEFAULT address into `income_account`
pub fn charge_fee(
    ctx: &mut HookContext<'_>,
    amount: Decimal,
    denomination: &str,
    income_account: &str,
    purpose: &str,
    description: &str,
) -> ContractResult<Vec<PostingInstruction>> {
    if amount <= Decimal::ZERO {
        return Ok(Vec::new());
    }
    let transfer = InternalTransfer::new(
        amount,
        denomination,
        TransferLeg::new(ctx.account_id(), DEFAULT_ADDRESS),
        TransferLeg::gl(income_account),
        purpose,
    )
    .with_detail("description", description)
    .with_detail("event", purpose);
    ctx.make_internal_transfer_instructions(transfer)
}

/// Mean DEFAULT balance over the month before `at`, sampled once a day at `time` up to yesterday.
///
/// The window starts one month before `at`, moved on one day when that precedes the account's
/// creation. `None` when there is no day to sample.
pub fn mean_daily_balance(
    vault: &dyn Vault,
    denomination: &str,
    at: DateTime<Utc>,
    time: ScheduleTime,
) -> ContractResult<Option<Decimal>> {
    let today = at.date_naive();
    let mut start = today
        .checked_sub_months(Months::new(1))
        .ok_or_else(|| ContractError::InvalidConfiguration(format!("No fee window before {at}")))?;
    if time.on(start)? < vault.account_creation_date() {
        start += Duration::days(1);
    }

    let key = BalanceKey::default_committed(denomination);
    let mut total = Decimal::ZERO;
    let mut samples = 0u32;
    let mut day = start;
    while day < today {
        total += vault.get_balance(&key, time.on(day)?).net;
        samples += 1;
        day += Duration::days(1);
    }
    if samples == 0 {
        return Ok(None);
    }
    Ok(Some(total / Decimal::from(samples)))
}

/// Monthly maintenance and minimum balance fees, or the inactivity fee alone while dormant
pub fn apply_monthly_fees(
    ctx: &mut HookContext<'_>,
    parameters: &CasaParameters,
    tier: &TierName,
) -> ContractResult<Vec<PostingInstruction>> {
    let fees = &parameters.fees;
    let accounts = &parameters.fee_accounts;
    let denomination = &parameters.denomination;

    if is_dormant(ctx.vault(), ctx.effective_date()) {
        debug!("Account {} is dormant, charging inactivity fee only", ctx.account_id());
        return charge_fee(
            ctx,
            fees.account_inactivity_fee,
            denomination,
            &accounts.inactivity_fee_income_account,
            INACTIVITY_FEE,
            "Account inactivity fee",
        );
    }

    let maintenance_fee = resolve_optional_tiered_decimal(fees.maintenance_fee_monthly.as_ref(), tier)?;
    let mut instructions = charge_fee(
        ctx,
        maintenance_fee,
        denomination,
        &accounts.maintenance_fee_income_account,
        MAINTENANCE_FEE,
        "Monthly maintenance fee",
    )?;

    if fees.minimum_balance_fee > Decimal::ZERO {
        let threshold = resolve_optional_tiered_decimal(fees.minimum_balance_threshold.as_ref(), tier)?;
        let mean = mean_daily_balance(
            ctx.vault(),
            denomination,
            ctx.effective_date(),
            parameters.fees_application_time,
        )?;
        if let Some(mean) = mean.filter(|mean| *mean < threshold) {
            debug!("Mean balance {} is below the minimum of {}", mean, threshold);
            instructions.extend(charge_fee(
                ctx,
                fees.minimum_balance_fee,
                denomination,
                &accounts.minimum_balance_fee_income_account,
                MINIMUM_BALANCE_FEE,
                &format!("Minimum balance fee, mean balance {} below {}", mean.round_dp(2), threshold),
            )?);
        }
    }
    Ok(instructions)
}

pub fn apply_annual_fees(ctx: &mut HookContext<'_>, parameters: &CasaParameters) -> ContractResult<Vec<PostingInstruction>> {
    if is_dormant(ctx.vault(), ctx.effective_date()) {
        return Ok(Vec::new());
    }
    charge_fee(
        ctx,
        parameters.fees.maintenance_fee_annual,
        &parameters.denomination,
        &parameters.fee_accounts.annual_maintenance_fee_income_account,
        ANNUAL_MAINTENANCE_FEE,
        "Annual maintenance fee",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::dormancy::DORMANCY_FLAG;
    use crate::contracts::casa::test_utils::create_test_casa_parameters;
    use crate::test_helper::{create_test_vault, dec, ts, TestVault};
    use account_contracts_api::Tside;
    use account_contracts_config::models::tier::tier_name;

    fn charged(instructions: &[PostingInstruction]) -> Vec<(String, Decimal)> {
        instructions
            .iter()
            .flat_map(|pi| pi.postings.iter().filter(|p| p.credit))
            .map(|p| (p.account_id.clone(), p.amount))
            .collect()
    }

    fn monthly(vault: &TestVault, parameters: &CasaParameters, at: DateTime<Utc>) -> Result<Vec<(String, Decimal)>, Box<dyn std::error::Error + Send + Sync>> {
        let mut ctx = HookContext::new(vault, Tside::Liability, "APPLY_MONTHLY_FEES", at)?;
        let instructions = apply_monthly_fees(&mut ctx, parameters, &tier_name("CASA_TIER_LOWER")?)?;
        Ok(charged(&instructions))
    }

    #[test]
    fn test_mean_balance_window_starts_after_creation() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        vault.deposit(dec("100"), "GBP", ts(2020, 1, 10, 10, 0, 0));
        vault.deposit(dec("200"), "GBP", ts(2020, 1, 25, 0, 0, 0));

        // 10 Jan 00:01 precedes creation at 10:00, so sampling runs 11 Jan to 9 Feb
        let mean = mean_daily_balance(&vault, "GBP", ts(2020, 2, 10, 0, 1, 0), ScheduleTime::new(0, 1, 0))?;
        let expected = (dec("100") * Decimal::from(14) + dec("300") * Decimal::from(16)) / Decimal::from(30);
        assert_eq!(mean, Some(expected));
        Ok(())
    }

    #[test]
    fn test_maintenance_and_minimum_balance_fees() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        vault.deposit(dec("100"), "GBP", ts(2020, 1, 10, 10, 0, 0));
        let parameters = create_test_casa_parameters(&[
            ("maintenance_fee_monthly", r#"{"CASA_TIER_UPPER": "0", "CASA_TIER_MIDDLE": "5", "CASA_TIER_LOWER": "10"}"#),
            ("minimum_balance_fee", "20"),
            ("minimum_balance_threshold", r#"{"CASA_TIER_UPPER": "25", "CASA_TIER_MIDDLE": "75", "CASA_TIER_LOWER": "150"}"#),
            ("account_inactivity_fee", "3"),
        ])?;

        let fees = monthly(&vault, &parameters, ts(2020, 2, 1, 0, 1, 0))?;
        assert_eq!(
            fees,
            vec![
                ("MAINTENANCE_FEE_INCOME".to_string(), dec("10")),
                ("MINIMUM_BALANCE_FEE_INCOME".to_string(), dec("20")),
            ]
        );

        vault.deposit(dec("200"), "GBP", ts(2020, 1, 10, 12, 0, 0));
        let fees = monthly(&vault, &parameters, ts(2020, 2, 1, 0, 1, 0))?;
        assert_eq!(fees, vec![("MAINTENANCE_FEE_INCOME".to_string(), dec("10"))]);
        Ok(())
    }

    #[test]
    fn test_dormant_account_pays_inactivity_fee_only() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_vault();
        vault.set_flag(DORMANCY_FLAG, ts(2020, 1, 20, 0, 0, 0));
        let parameters = create_test_casa_parameters(&[
            ("maintenance_fee_monthly", r#"{"CASA_TIER_UPPER": "10", "CASA_TIER_MIDDLE": "10", "CASA_TIER_LOWER": "10"}"#),
            ("maintenance_fee_annual", "50"),
            ("minimum_balance_fee", "20"),
            ("account_inactivity_fee", "3"),
        ])?;

        let fees = monthly(&vault, &parameters, ts(2020, 2, 1, 0, 1, 0))?;
        assert_eq!(fees, vec![("INACTIVITY_FEE_INCOME".to_string(), dec("3"))]);

        let mut ctx = HookContext::new(&vault, Tside::Liability, "APPLY_ANNUAL_FEES", ts(2021, 1, 1, 0, 1, 0))?;
        assert!(apply_annual_fees(&mut ctx, &parameters)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_annual_fee() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let vault = create_test_vault();
        let parameters = create_test_casa_parameters(&[("maintenance_fee_annual", "50")])?;
        let mut ctx = HookContext::new(&vault, Tside::Liability, "APPLY_ANNUAL_FEES", ts(2021, 1, 1, 0, 1, 0))?;
        assert_eq!(
            charged(&apply_annual_fees(&mut ctx, &parameters)?),
            vec![("ANNUAL_MAINTENANCE_FEE_INCOME".to_string(), dec("50"))]
        );
        Ok(())
    }
}
