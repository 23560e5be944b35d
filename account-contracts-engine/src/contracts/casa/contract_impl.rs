use chrono::{DateTime, Utc};

use account_contracts_api::{
    ContractResult, HookDirectives, ParameterDefinition, ParameterValues, PostingInstructionBatch, ScheduleUpdate,
    SmartContract, Tside, Vault,
};
use account_contracts_config::models::product::CasaParameters;
use account_contracts_config::models::tier::TierName;
use account_contracts_config::repository::LoadParameters;

use crate::components::tier::resolve_tier;

pub const CASA_CONTRACT_NAME: &str = "casa";
pub const CASA_CONTRACT_VERSION: &str = "1.0.0";

/// Current and savings account
///
/// Accrues tiered deposit interest and overdraft interest daily, applies them on the
/// interest application day, enforces transaction limits before posting and charges
/// excess withdrawal, maintenance, minimum balance and inactivity fees.
#[derive(Debug, Clone, Copy, Default)]
pub struct CasaContract;

impl CasaContract {
    /// Customer balances are bank liabilities
    pub const TSIDE: Tside = Tside::Liability;

    pub fn new() -> Self {
        Self
    }

    /// Parameters in force at `at` together with the account tier
    pub(super) fn load(vault: &dyn Vault, at: DateTime<Utc>) -> ContractResult<(CasaParameters, TierName)> {
        let parameters = CasaParameters::load(vault, at)?;
        let tier = resolve_tier(vault, &parameters.account_tier_names, at)?;
        Ok((parameters, tier))
    }
}

impl SmartContract for CasaContract {
    fn name(&self) -> &'static str {
        CASA_CONTRACT_NAME
    }

    fn version(&self) -> &'static str {
        CASA_CONTRACT_VERSION
    }

    fn tside(&self) -> Tside {
        Self::TSIDE
    }

    fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        Self::parameter_definitions_impl()
    }

    fn execution_schedules(
        &self,
        vault: &dyn Vault,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<Vec<ScheduleUpdate>> {
        Self::execution_schedules_impl(vault, effective_date)
    }

    fn pre_posting_code(
        &self,
        vault: &dyn Vault,
        batch: &PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<()> {
        Self::pre_posting_impl(vault, batch, effective_date)
    }

    fn post_posting_code(
        &self,
        vault: &dyn Vault,
        batch: &PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        Self::post_posting_impl(vault, batch, effective_date)
    }

    fn scheduled_code(
        &self,
        vault: &dyn Vault,
        event_type: &str,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        Self::scheduled_impl(vault, event_type, effective_date)
    }

    fn post_parameter_change_code(
        &self,
        vault: &dyn Vault,
        old_parameters: &ParameterValues,
        new_parameters: &ParameterValues,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        Self::parameter_change_impl(vault, old_parameters, new_parameters, effective_date)
    }

    fn close_code(&self, vault: &dyn Vault, effective_date: DateTime<Utc>) -> ContractResult<HookDirectives> {
        Self::close_impl(vault, effective_date)
    }
}
