use chrono::{DateTime, Utc};
use tracing::info;

use account_contracts_api::{ContractResult, HookDirectives, ParameterValues, ScheduleExpression, Vault};
use account_contracts_config::models::product::time_deposit_parameters::names;
use account_contracts_config::models::product::TimeDepositParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::TimeDepositContract;
use super::events::TimeDepositEvent;
use super::execution_schedules::next_schedule;
use crate::context::HookContext;

pub const PARAMETER_CHANGE: &str = "POST_PARAMETER_CHANGE";

fn changed(old_parameters: &ParameterValues, new_parameters: &ParameterValues, name: &str) -> bool {
    new_parameters.contains_key(name) && old_parameters.get(name) != new_parameters.get(name)
}

impl TimeDepositContract {
    /// Moves interest application when its day or frequency changes, and maturity when the term does
    pub(super) fn parameter_change_impl(
        vault: &dyn Vault,
        old_parameters: &ParameterValues,
        new_parameters: &ParameterValues,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives> {
        let mut ctx = HookContext::new(vault, Self::TSIDE, PARAMETER_CHANGE, effective_date)?;
        let application_changed = changed(old_parameters, new_parameters, names::INTEREST_APPLICATION_DAY)
            || changed(old_parameters, new_parameters, names::INTEREST_APPLICATION_FREQUENCY);
        let term_changed = [names::TERM, names::TERM_UNIT, names::HOLIDAY_CALENDAR]
            .iter()
            .any(|name| changed(old_parameters, new_parameters, name));
        if !application_changed && !term_changed {
            return Ok(ctx.into_directives());
        }

        let parameters = TimeDepositParameters::load(vault, effective_date)?;
        if application_changed {
            let event = TimeDepositEvent::ApplyAccruedInterest;
            info!("Rescheduling {} for time deposit {}", event, vault.account_id());
            ctx.update_event_type(event.as_str(), next_schedule(event, &parameters, effective_date)?);
        }
        if term_changed {
            let event = TimeDepositEvent::AccountMaturity;
            let maturity = Self::maturity(vault, &parameters)?;
            info!("Maturity of time deposit {} moved to {}", vault.account_id(), maturity);
            ctx.update_event_type(event.as_str(), ScheduleExpression::at_datetime(maturity));
        }
        Ok(ctx.into_directives())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::time_deposit::test_utils::create_test_time_deposit_vault;
    use crate::test_helper::ts;
    use account_contracts_api::{ParameterValue, SmartContract};
    use rust_decimal::Decimal;

    fn values(name: &str, value: ParameterValue) -> ParameterValues {
        ParameterValues::from([(name.to_string(), value)])
    }

    #[test]
    fn test_term_change_moves_maturity() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_time_deposit_vault(&[]);
        let at = ts(2020, 2, 3, 12, 0, 0);
        vault.set_parameter_from(names::TERM, Decimal::new(12, 0), at);

        let directives = TimeDepositContract::new().post_parameter_change_code(
            &vault,
            &values(names::TERM, Decimal::new(6, 0).into()),
            &values(names::TERM, Decimal::new(12, 0).into()),
            at,
        )?;
        assert_eq!(directives.schedule_updates.len(), 1);
        assert_eq!(
            directives.schedule_for(TimeDepositEvent::AccountMaturity.as_str()),
            Some(&ScheduleExpression::at_datetime(ts(2021, 1, 10, 0, 1, 0)))
        );
        Ok(())
    }

    #[test]
    fn test_application_day_change() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut vault = create_test_time_deposit_vault(&[]);
        let at = ts(2020, 2, 3, 12, 0, 0);
        vault.set_parameter_from(names::INTEREST_APPLICATION_DAY, Decimal::new(15, 0), at);

        let directives = TimeDepositContract::new().post_parameter_change_code(
            &vault,
            &values(names::INTEREST_APPLICATION_DAY, Decimal::ONE.into()),
            &values(names::INTEREST_APPLICATION_DAY, Decimal::new(15, 0).into()),
            at,
        )?;
        assert_eq!(
            directives.schedule_for(TimeDepositEvent::ApplyAccruedInterest.as_str()),
            Some(&ScheduleExpression::at_datetime(ts(2020, 2, 15, 0, 1, 0)))
        );
        assert!(directives.schedule_for(TimeDepositEvent::AccountMaturity.as_str()).is_none());
        Ok(())
    }
}
