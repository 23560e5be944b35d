use rust_decimal::Decimal;
use tracing::debug;

use account_contracts_api::{ContractResult, PostingInstruction};

use super::holding::HoldingAccount;
use crate::context::HookContext;
use crate::utils::round_half_up;

/// Moves everything accrued in `holding` to its outcome, leaving the holding address at zero.
///
/// The applied amount is the accrued amount rounded half-up to `precision`. Three transfers are
/// made: the applied amount between DEFAULT and the outcome account, the applied amount out of
/// the holding address, and the rounding remainder (either sign) out of the holding address.
pub fn apply_accrued(
    ctx: &mut HookContext<'_>,
    holding: &HoldingAccount,
    denomination: &str,
    precision: u32,
    purpose: &str,
) -> ContractResult<Vec<PostingInstruction>> {
    let accrued = holding.accrued(ctx.vault(), denomination, ctx.effective_date());
    if accrued.is_zero() {
        return Ok(Vec::new());
    }
    let applied = round_half_up(accrued, precision);
    let remainder = accrued - applied;
    debug!(
        "Applying {} of {} accrued in {} (remainder {})",
        applied, accrued, holding.address, remainder
    );

    let account_id = ctx.account_id();
    let mut instructions = ctx.make_internal_transfer_instructions(
        holding
            .application_transfer(account_id, applied, denomination, &format!("{purpose}_APPLY"))
            .with_detail("description", format!("Accrued amount of {accrued} applied as {applied}"))
            .with_detail("event", purpose),
    )?;
    instructions.extend(ctx.make_internal_transfer_instructions(
        holding
            .accrual_transfer(account_id, -applied, denomination, &format!("{purpose}_REVERSE"))
            .with_detail("description", format!("Applied amount of {applied} cleared from {}", holding.address))
            .with_detail("event", purpose),
    )?);
    instructions.extend(ctx.make_internal_transfer_instructions(
        holding
            .accrual_transfer(account_id, -remainder, denomination, &format!("{purpose}_REMAINDER"))
            .with_detail("description", format!("Rounding remainder of {remainder} cleared from {}", holding.address))
            .with_detail("event", purpose),
    )?);
    Ok(instructions)
}

/// Returns everything accrued in `holding` to the accrual GL account without applying it
pub fn reverse_accrued(
    ctx: &mut HookContext<'_>,
    holding: &HoldingAccount,
    denomination: &str,
    purpose: &str,
) -> ContractResult<Vec<PostingInstruction>> {
    let accrued = holding.accrued(ctx.vault(), denomination, ctx.effective_date());
    if accrued == Decimal::ZERO {
        return Ok(Vec::new());
    }
    let account_id = ctx.account_id();
    ctx.make_internal_transfer_instructions(
        holding
            .accrual_transfer(account_id, -accrued, denomination, purpose)
            .with_detail("description", format!("Accrued amount of {accrued} reversed"))
            .with_detail("event", purpose),
    )
}
