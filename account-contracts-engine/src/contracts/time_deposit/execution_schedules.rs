use chrono::{DateTime, Utc};

use account_contracts_api::{ContractResult, ScheduleExpression, ScheduleUpdate, Vault};
use account_contracts_config::models::product::TimeDepositParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::TimeDepositContract;
use super::events::TimeDepositEvent;
use crate::components::schedule::next_event_schedule;

impl TimeDepositContract {
    pub(super) fn execution_schedules_impl(
        vault: &dyn Vault,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<Vec<ScheduleUpdate>> {
        let parameters = TimeDepositParameters::load(vault, effective_date)?;
        TimeDepositEvent::ALL
            .iter()
            .map(|event| {
                let schedule = match event {
                    TimeDepositEvent::AccountMaturity => {
                        ScheduleExpression::at_datetime(Self::maturity(vault, &parameters)?)
                    }
                    _ => next_schedule(*event, &parameters, vault.account_creation_date())?,
                };
                Ok(ScheduleUpdate {
                    event_type: event.as_str().to_string(),
                    schedule,
                })
            })
            .collect()
    }
}

/// Next run of a recurring event after `after`; maturity happens once and is not covered
pub(super) fn next_schedule(
    event: TimeDepositEvent,
    parameters: &TimeDepositParameters,
    after: DateTime<Utc>,
) -> ContractResult<ScheduleExpression> {
    match event {
        TimeDepositEvent::AccrueInterest => Ok(parameters.interest_accrual_time.daily()),
        TimeDepositEvent::ApplyAccruedInterest | TimeDepositEvent::AccountMaturity => next_event_schedule(
            after,
            parameters.interest_application_frequency,
            parameters.interest_application_day,
            parameters.interest_application_time,
        ),
    }
}
