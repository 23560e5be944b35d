use chrono::{DateTime, Utc};
use std::str::FromStr;
use tracing::info;

use account_contracts_api::{ContractResult, HookDirectives, PostingInstruction, Vault};
use account_contracts_config::models::product::CasaParameters;

use super::contract_impl::CasaContract;
use super::events::CasaEvent;
use super::execution_schedules::next_schedule;
use crate::components::fees::{apply_annual_fees, apply_monthly_fees};
use crate::components::interest::{
    accrue_interest, apply_accrued, deposit_interest_holdings, overdraft_fee_holding, overdraft_interest_holding,
};
use crate::context::HookContext;

pub const APPLY_DEPOSIT_INTEREST: &str = "APPLY_DEPOSIT_INTEREST";
pub const APPLY_NEGATIVE_DEPOSIT_INTEREST: &str = "APPLY_NEGATIVE_DEPOSIT_INTEREST";
pub const APPLY_OVERDRAFT_INTEREST: &str = "APPLY_OVERDRAFT_INTEREST";
pub const APPLY_UNARRANGED_OVERDRAFT_FEE: &str = "APPLY_UNARRANGED_OVERDRAFT_FEE";

impl CasaContract {
    pub(super) fn scheduled_impl(
        vault: &dyn Vault,
        event_type: &str,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        let event = CasaEvent::from_str(event_type)?;
        let (parameters, tier) = Self::load(vault, effective_date)?;
        let mut ctx = HookContext::new(vault, Self::TSIDE, event.as_str(), effective_date)?;
        info!("Running {} for account {} at {}", event, vault.account_id(), effective_date);

        let instructions = match event {
            CasaEvent::AccrueInterestAndDailyFees => accrue_interest(&mut ctx, &parameters, &tier)?,
            CasaEvent::ApplyAccruedDepositInterest => apply_deposit_interest(&mut ctx, &parameters)?,
            CasaEvent::ApplyAccruedOverdraftInterest => apply_overdraft_interest(&mut ctx, &parameters)?,
            CasaEvent::ApplyMonthlyFees => apply_monthly_fees(&mut ctx, &parameters, &tier)?,
            CasaEvent::ApplyAnnualFees => apply_annual_fees(&mut ctx, &parameters)?,
        };
        ctx.instruct_posting_batch(instructions, effective_date);

        if event != CasaEvent::AccrueInterestAndDailyFees {
            ctx.update_event_type(event.as_str(), next_schedule(event, &parameters, effective_date)?);
        }
        Ok(ctx.into_directives())
    }
}

/// Applies positive deposit interest to the customer and collects negative deposit interest
pub(super) fn apply_deposit_interest(
    ctx: &mut HookContext<'_>,
    parameters: &CasaParameters,
) -> ContractResult<Vec<PostingInstruction>> {
    let [payable, receivable] = deposit_interest_holdings(&parameters.interest_accounts);
    let mut instructions = apply_accrued(
        ctx,
        &payable,
        &parameters.denomination,
        parameters.fulfillment_precision,
        APPLY_DEPOSIT_INTEREST,
    )?;
    instructions.extend(apply_accrued(
        ctx,
        &receivable,
        &parameters.denomination,
        parameters.fulfillment_precision,
        APPLY_NEGATIVE_DEPOSIT_INTEREST,
    )?);
    Ok(instructions)
}

/// Collects accrued overdraft interest and the accrued unarranged overdraft fee
pub(super) fn apply_overdraft_interest(
    ctx: &mut HookContext<'_>,
    parameters: &CasaParameters,
) -> ContractResult<Vec<PostingInstruction>> {
    let mut instructions = apply_accrued(
        ctx,
        &overdraft_interest_holding(&parameters.interest_accounts),
        &parameters.denomination,
        parameters.fulfillment_precision,
        APPLY_OVERDRAFT_INTEREST,
    )?;
    instructions.extend(apply_accrued(
        ctx,
        &overdraft_fee_holding(&parameters.fee_accounts),
        &parameters.denomination,
        parameters.fulfillment_precision,
        APPLY_UNARRANGED_OVERDRAFT_FEE,
    )?);
    Ok(instructions)
}
