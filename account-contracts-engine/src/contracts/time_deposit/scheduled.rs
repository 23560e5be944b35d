use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info};

use account_contracts_api::{ContractResult, HookDirectives, PostingInstruction, Vault};
use account_contracts_config::models::product::TimeDepositParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::TimeDepositContract;
use super::events::TimeDepositEvent;
use super::execution_schedules::next_schedule;
use crate::components::interest::{accrue_flat_interest, apply_accrued, deposit_interest_holdings};
use crate::context::HookContext;

pub const APPLY_INTEREST: &str = "APPLY_INTEREST";
pub const APPLY_NEGATIVE_INTEREST: &str = "APPLY_NEGATIVE_INTEREST";
pub const MATURITY_WORKFLOW: &str = "TIME_DEPOSIT_MATURITY";

impl TimeDepositContract {
    pub(super) fn scheduled_impl(
        vault: &dyn Vault,
        event_type: &str,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        let event = TimeDepositEvent::from_str(event_type)?;
        let parameters = TimeDepositParameters::load(vault, effective_date)?;
        let maturity = Self::maturity(vault, &parameters)?;
        let mut ctx = HookContext::new(vault, Self::TSIDE, event.as_str(), effective_date)?;
        info!("Running {} for time deposit {} at {}", event, vault.account_id(), effective_date);

        match event {
            TimeDepositEvent::AccrueInterest => {
                if effective_date < maturity {
                    let instructions = accrue_flat_interest(
                        &mut ctx,
                        &parameters.interest_accounts,
                        &parameters.denomination,
                        parameters.gross_interest_rate,
                        parameters.interest_accrual_days_in_year,
                        parameters.accrual_precision,
                    )?;
                    ctx.instruct_posting_batch(instructions, effective_date);
                } else {
                    debug!("No accrual after maturity on {}", maturity);
                }
            }
            TimeDepositEvent::ApplyAccruedInterest => {
                let instructions = apply_interest(&mut ctx, &parameters)?;
                ctx.instruct_posting_batch(instructions, effective_date);
                let next = next_schedule(event, &parameters, effective_date)?;
                if next.as_datetime().is_some_and(|at| at < maturity) {
                    ctx.update_event_type(event.as_str(), next);
                }
            }
            TimeDepositEvent::AccountMaturity => {
                let instructions = apply_interest(&mut ctx, &parameters)?;
                ctx.instruct_posting_batch(instructions, effective_date);
                let context = BTreeMap::from([
                    ("account_id".to_string(), vault.account_id().to_string()),
                    ("maturity_date".to_string(), maturity.date_naive().to_string()),
                ]);
                ctx.start_workflow(MATURITY_WORKFLOW, context);
            }
        }
        Ok(ctx.into_directives())
    }
}

fn apply_interest(
    ctx: &mut HookContext<'_>,
    parameters: &TimeDepositParameters,
) -> ContractResult<Vec<PostingInstruction>> {
    let [payable, receivable] = deposit_interest_holdings(&parameters.interest_accounts);
    let mut instructions = apply_accrued(
        ctx,
        &payable,
        &parameters.denomination,
        parameters.fulfillment_precision,
        APPLY_INTEREST,
    )?;
    instructions.extend(apply_accrued(
        ctx,
        &receivable,
        &parameters.denomination,
        parameters.fulfillment_precision,
        APPLY_NEGATIVE_INTEREST,
    )?);
    Ok(instructions)
}
