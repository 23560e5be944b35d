use chrono::{DateTime, Utc};
use tracing::info;

use account_contracts_api::{ContractResult, HookDirectives, ParameterValues, Vault};
use account_contracts_config::models::product::casa_parameters::names;
use account_contracts_config::models::product::CasaParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::CasaContract;
use super::events::CasaEvent;
use super::execution_schedules::schedule_updates;
use crate::context::HookContext;

pub const PARAMETER_CHANGE: &str = "POST_PARAMETER_CHANGE";

const INTEREST_APPLICATION_EVENTS: [CasaEvent; 2] = [
    CasaEvent::ApplyAccruedDepositInterest,
    CasaEvent::ApplyAccruedOverdraftInterest,
];
const FEE_EVENTS: [CasaEvent; 2] = [CasaEvent::ApplyMonthlyFees, CasaEvent::ApplyAnnualFees];

fn changed(old_parameters: &ParameterValues, new_parameters: &ParameterValues, name: &str) -> bool {
    new_parameters.contains_key(name) && old_parameters.get(name) != new_parameters.get(name)
}

impl CasaContract {
    /// Moves application and fee events when the day they run on changes
    pub(super) fn parameter_change_impl(
        vault: &dyn Vault,
        old_parameters: &ParameterValues,
        new_parameters: &ParameterValues,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        let mut ctx = HookContext::new(vault, Self::TSIDE, PARAMETER_CHANGE, effective_date)?;
        let mut events = Vec::new();
        if changed(old_parameters, new_parameters, names::INTEREST_APPLICATION_DAY)
            || changed(old_parameters, new_parameters, names::DEPOSIT_INTEREST_APPLICATION_FREQUENCY)
        {
            events.extend(INTEREST_APPLICATION_EVENTS);
        }
        if changed(old_parameters, new_parameters, names::FEES_APPLICATION_DAY) {
            events.extend(FEE_EVENTS);
        }
        if events.is_empty() {
            return Ok(ctx.into_directives());
        }

        let parameters = CasaParameters::load(vault, effective_date)?;
        for update in schedule_updates(&events, &parameters, effective_date)? {
            info!("Rescheduling {} for account {}", update.event_type, vault.account_id());
            ctx.update_event_type(&update.event_type, update.schedule);
        }
        Ok(ctx.into_directives())
    }
}
