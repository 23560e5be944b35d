use chrono::{DateTime, Utc};

use account_contracts_api::{
    ContractResult, HookDirectives, ParameterDefinition, ParameterValues, PostingInstructionBatch, ScheduleUpdate,
    SmartContract, Tside, Vault,
};
use account_contracts_config::models::product::TimeDepositParameters;

use crate::components::schedule::maturity_date;

pub const TIME_DEPOSIT_CONTRACT_NAME: &str = "time_deposit";
pub const TIME_DEPOSIT_CONTRACT_VERSION: &str = "1.0.0";

/// Fixed-term deposit paying a flat rate until maturity
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeDepositContract;

impl TimeDepositContract {
    /// Customer balances are bank liabilities
    pub const TSIDE: Tside = Tside::Liability;

    pub fn new() -> Self {
        Self
    }

    /// Maturity instant: the holiday-shifted end of the term at the application time of day
    pub(super) fn maturity(vault: &dyn Vault, parameters: &TimeDepositParameters) -> ContractResult<DateTime<Utc>> {
        let date = maturity_date(
            vault.account_creation_date().date_naive(),
            parameters.term,
            parameters.term_unit,
            &parameters.holiday_calendar,
        )?;
        parameters.interest_application_time.on(date)
    }
}

impl SmartContract for TimeDepositContract {
    fn name(&self) -> &'static str {
        TIME_DEPOSIT_CONTRACT_NAME
    }

    fn version(&self) -> &'static str {
        TIME_DEPOSIT_CONTRACT_VERSION
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
        _vault: &dyn Vault,
        _batch: &PostingInstructionBatch,
        _effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        Ok(HookDirectives::default())
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
