use chrono::{DateTime, Utc};

use account_contracts_api::{ContractResult, ScheduleExpression, ScheduleUpdate, Vault};
use account_contracts_config::models::calendar::Frequency;
use account_contracts_config::models::product::CasaParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::CasaContract;
use super::events::CasaEvent;
use crate::components::schedule::next_event_schedule;

impl CasaContract {
    pub(super) fn execution_schedules_impl(
        vault: &dyn Vault,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<Vec<ScheduleUpdate>> {
        let parameters = CasaParameters::load(vault, effective_date)?;
        schedule_updates(&CasaEvent::ALL, &parameters, vault.account_creation_date())
    }
}

/// Next run of `event` after `after`
pub(super) fn next_schedule(
    event: CasaEvent,
    parameters: &CasaParameters,
    after: DateTime<Utc>,
) -> ContractResult<ScheduleExpression> {
    match event {
        CasaEvent::AccrueInterestAndDailyFees => Ok(parameters.interest_accrual_time.daily()),
        CasaEvent::ApplyAccruedDepositInterest => next_event_schedule(
            after,
            parameters.deposit_application_frequency(),
            parameters.interest_application_day,
            parameters.interest_application_time,
        ),
        CasaEvent::ApplyAccruedOverdraftInterest => next_event_schedule(
            after,
            Frequency::Monthly,
            parameters.interest_application_day,
            parameters.interest_application_time,
        ),
        CasaEvent::ApplyMonthlyFees => next_event_schedule(
            after,
            Frequency::Monthly,
            parameters.fees_application_day,
            parameters.fees_application_time,
        ),
        CasaEvent::ApplyAnnualFees => next_event_schedule(
            after,
            Frequency::Annually,
            parameters.fees_application_day,
            parameters.fees_application_time,
        ),
    }
}

pub(super) fn schedule_updates(
    events: &[CasaEvent],
    parameters: &CasaParameters,
    after: DateTime<Utc>,
) -> ContractResult<Vec<ScheduleUpdate>> {
    events
        .iter()
        .map(|event| {
            Ok(ScheduleUpdate {
                event_type: event.as_str().to_string(),
                schedule: next_schedule(*event, parameters, after)?,
            })
        })
        .collect()
}
