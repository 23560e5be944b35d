use chrono::{DateTime, Utc};
use tracing::info;

use account_contracts_api::{ContractResult, HookDirectives, Vault};
use account_contracts_config::models::product::TimeDepositParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::TimeDepositContract;
use crate::components::interest::{deposit_interest_holdings, reverse_accrued};
use crate::context::HookContext;

pub const CLOSE_ACCOUNT: &str = "CLOSE_ACCOUNT";
pub const REVERSE_INTEREST: &str = "REVERSE_INTEREST";

impl TimeDepositContract {
    /// Interest accrued but not yet applied is forfeited
    pub(super) fn close_impl(vault: &dyn Vault, effective_date: DateTime<Utc>) -> ContractResult<HookDirectives> {
        let parameters = TimeDepositParameters::load(vault, effective_date)?;
        let mut ctx = HookContext::new(vault, Self::TSIDE, CLOSE_ACCOUNT, effective_date)?;
        info!("Closing time deposit {}", vault.account_id());

        let mut instructions = Vec::new();
        for holding in deposit_interest_holdings(&parameters.interest_accounts) {
            instructions.extend(reverse_accrued(&mut ctx, &holding, &parameters.denomination, REVERSE_INTEREST)?);
        }
        ctx.instruct_posting_batch(instructions, effective_date);
        Ok(ctx.into_directives())
    }
}
