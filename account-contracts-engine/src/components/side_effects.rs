use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};

use account_contracts_api::{BalanceKey, ContractResult, PostingInstruction, PostingInstructionBatch, DEFAULT_ADDRESS};
use account_contracts_config::models::product::transaction_type::PURCHASE;
use account_contracts_config::models::product::CasaParameters;

use crate::components::withdrawal_count::{count_monthly_withdrawals, WithdrawalStage};
use crate::context::{HookContext, InternalTransfer, TransferLeg};

pub const EXCESS_WITHDRAWAL_FEE: &str = "EXCESS_WITHDRAWAL_FEE";
pub const AUTOSAVE: &str = "AUTOSAVE";
pub const TRANSACTION_LIMIT_WARNING_WORKFLOW: &str = "CASA_TRANSACTION_LIMIT_WARNING";

/// Warns once when the monthly withdrawal limit is reached and charges withdrawals beyond it.
///
/// The fee is only charged when excess withdrawals are not rejected outright.
pub fn charge_excess_withdrawals(
    ctx: &mut HookContext<'_>,
    parameters: &CasaParameters,
    batch: &PostingInstructionBatch,
) -> ContractResult<Vec<PostingInstruction>> {
    let Some(feature) = &parameters.excess_withdrawals else {
        return Ok(Vec::new());
    };
    let limit = feature.monthly_withdrawal_limit;
    let count = count_monthly_withdrawals(
        ctx.vault(),
        ctx.tside(),
        &parameters.denomination,
        batch,
        WithdrawalStage::Settled,
        ctx.effective_date(),
    )?;
    if count.current == 0 {
        return Ok(Vec::new());
    }

    if count.reaches_limit(limit) {
        info!("Account {} reached its monthly withdrawal limit of {}", ctx.account_id(), limit);
        ctx.start_workflow(
            TRANSACTION_LIMIT_WARNING_WORKFLOW,
            BTreeMap::from([
                ("account_id".to_string(), ctx.account_id().to_string()),
                ("limit_type".to_string(), "Monthly Withdrawal Limit".to_string()),
                ("limit".to_string(), limit.to_string()),
                ("value".to_string(), count.total().to_string()),
                (
                    "message".to_string(),
                    "Warning: Reached monthly withdrawal transaction limit, charges will be applied for the next withdrawal."
                        .to_string(),
                ),
            ]),
        );
    }

    if feature.reject_excess_withdrawals || feature.excess_withdrawal_fee.is_zero() {
        return Ok(Vec::new());
    }
    let excess = count.excess(limit);
    if excess == 0 {
        return Ok(Vec::new());
    }

    let amount = feature.excess_withdrawal_fee * Decimal::from(excess);
    debug!("Charging {} for {} excess withdrawals", amount, excess);
    let transfer = InternalTransfer::new(
        amount,
        &parameters.denomination,
        TransferLeg::new(ctx.account_id(), DEFAULT_ADDRESS),
        TransferLeg::gl(&parameters.fee_accounts.excess_withdrawal_fee_income_account),
        EXCESS_WITHDRAWAL_FEE,
    )
    .with_detail(
        "description",
        format!("Excess withdrawal fee on exceeding monthly withdrawal limit of {limit}"),
    )
    .with_detail("event", EXCESS_WITHDRAWAL_FEE);
    ctx.make_internal_transfer_instructions(transfer)
}

/// Amount needed to round `spend` up to the next multiple of `unit`
pub fn round_up_amount(spend: Decimal, unit: Decimal) -> Decimal {
    if unit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let remainder = spend.abs() % unit;
    if remainder.is_zero() {
        Decimal::ZERO
    } else {
        unit - remainder
    }
}

/// Saves the round-up of every settled purchase in the batch to the linked savings account.
///
/// Skipped while a minimum balance fee applies, or when the transfer would not leave the
/// available balance above zero. `preceding` are instructions already built for the same
/// outgoing batch; their effect counts against the available balance.
pub fn autosave(
    ctx: &mut HookContext<'_>,
    parameters: &CasaParameters,
    batch: &PostingInstructionBatch,
    preceding: &[PostingInstruction],
) -> ContractResult<Vec<PostingInstruction>> {
    let Some(feature) = &parameters.autosave else {
        return Ok(Vec::new());
    };
    if !parameters.fees.minimum_balance_fee.is_zero() {
        debug!("Autosave suppressed while a minimum balance fee applies");
        return Ok(Vec::new());
    }

    let account_id = ctx.account_id();
    let denomination = &parameters.denomination;
    let total: Decimal = batch
        .posting_instructions
        .iter()
        .filter(|pi| !pi.override_all_restrictions)
        .filter(|pi| parameters.transaction_code_to_type_map.transaction_type(pi, PURCHASE) == PURCHASE)
        .map(|pi| pi.settled_effect(account_id, ctx.tside(), denomination))
        .filter(|effect| *effect < Decimal::ZERO)
        .map(|spend| round_up_amount(spend, feature.autosave_rounding_amount))
        .sum();
    if total.is_zero() {
        return Ok(Vec::new());
    }

    let vault = ctx.vault();
    let at = ctx.effective_date();
    let available = vault.get_balance(&BalanceKey::default_committed(denomination), at).net
        + vault.get_balance(&BalanceKey::default_pending_out(denomination), at).net
        + preceding
            .iter()
            .map(|pi| pi.default_effect(account_id, ctx.tside(), denomination))
            .sum::<Decimal>();
    if available - total <= Decimal::ZERO {
        debug!("Autosave of {} skipped, available balance is {}", total, available);
        return Ok(Vec::new());
    }

    let transfer = InternalTransfer::new(
        total,
        denomination,
        TransferLeg::new(account_id, DEFAULT_ADDRESS),
        TransferLeg::new(&feature.autosave_savings_account, DEFAULT_ADDRESS),
        AUTOSAVE,
    )
    .with_detail("description", format!("Autosave {denomination} {total}"))
    .with_detail("event", AUTOSAVE);
    ctx.make_internal_transfer_instructions(transfer)
}
