use rust_decimal::Decimal;

use account_contracts_api::{ParameterDefinition, ParameterLevel, ParameterShape};
use account_contracts_config::models::calendar::{DayCountConvention, Frequency};
use account_contracts_config::models::product::casa_parameters::{
    DEFAULT_ACCRUAL_PRECISION, DEFAULT_ACCRUAL_TIME, DEFAULT_APPLICATION_TIME, DEFAULT_FULFILLMENT_PRECISION,
};
use account_contracts_config::models::product::internal_accounts::names as account_names;
use account_contracts_config::models::product::time_deposit_parameters::names;
use account_contracts_config::models::product::TermUnit;

use super::contract_impl::TimeDepositContract;
use crate::contracts::casa::parameter_definitions::{internal_account, number, time_of_day, union};

impl TimeDepositContract {
    pub(super) fn parameter_definitions_impl() -> Vec<ParameterDefinition> {
        use ParameterLevel::{Global, Instance, Template};

        let mut definitions = vec![
            ParameterDefinition::new(
                names::DENOMINATION,
                Template,
                ParameterShape::Denomination,
                "Denomination of the deposit",
            ),
            ParameterDefinition::new(
                names::GROSS_INTEREST_RATE,
                Instance,
                number(None, None, None),
                "Annual interest rate paid until maturity",
            ),
            ParameterDefinition::new(
                names::TERM,
                Instance,
                number(Some(1), None, Some(Decimal::ONE)),
                "Length of the term in term units",
            ),
            ParameterDefinition::new(
                names::TERM_UNIT,
                Template,
                union(&["days", "months"]),
                "Unit the term is counted in",
            )
            .with_default(TermUnit::Months.to_string().as_str()),
            ParameterDefinition::new(
                names::DEPOSIT_PERIOD,
                Template,
                number(Some(0), None, Some(Decimal::ONE)),
                "Days after opening during which deposits are accepted",
            )
            .with_default(Decimal::ZERO),
            ParameterDefinition::new(
                names::HOLIDAY_CALENDAR,
                Global,
                ParameterShape::Json,
                "JSON list of dates maturity may not fall on",
            )
            .optional(),
            ParameterDefinition::new(
                names::INTEREST_ACCRUAL_DAYS_IN_YEAR,
                Template,
                union(&[
                    DayCountConvention::Actual.as_str(),
                    DayCountConvention::Days365.as_str(),
                    DayCountConvention::Days360.as_str(),
                ]),
                "Days in a year used to turn the annual rate into a daily one",
            )
            .with_default(DayCountConvention::Actual.as_str()),
            ParameterDefinition::new(
                names::INTEREST_APPLICATION_FREQUENCY,
                Instance,
                union(&[
                    Frequency::Monthly.as_str(),
                    Frequency::Quarterly.as_str(),
                    Frequency::SemiAnnually.as_str(),
                    Frequency::Annually.as_str(),
                ]),
                "How often accrued interest is paid out before maturity",
            )
            .with_default(Frequency::Monthly.as_str()),
            ParameterDefinition::new(
                names::INTEREST_APPLICATION_DAY,
                Instance,
                number(Some(1), Some(31), Some(Decimal::ONE)),
                "Day of the month interest is applied on",
            ),
            ParameterDefinition::new(
                names::ACCRUAL_PRECISION,
                Template,
                number(Some(0), Some(15), Some(Decimal::ONE)),
                "Decimal places accrued amounts are rounded to",
            )
            .with_default(Decimal::from(DEFAULT_ACCRUAL_PRECISION)),
            ParameterDefinition::new(
                names::FULFILLMENT_PRECISION,
                Template,
                number(Some(0), Some(4), Some(Decimal::ONE)),
                "Decimal places applied amounts are rounded to",
            )
            .with_default(Decimal::from(DEFAULT_FULFILLMENT_PRECISION)),
        ];
        definitions.extend(time_of_day(names::INTEREST_ACCRUAL, DEFAULT_ACCRUAL_TIME, "interest is accrued"));
        definitions.extend(time_of_day(
            names::INTEREST_APPLICATION,
            DEFAULT_APPLICATION_TIME,
            "interest is applied and the deposit matures",
        ));
        definitions.extend([
            internal_account(
                account_names::ACCRUED_INTEREST_PAYABLE_ACCOUNT,
                "Internal account for interest accrued to customers",
            ),
            internal_account(
                account_names::ACCRUED_INTEREST_RECEIVABLE_ACCOUNT,
                "Internal account for negative interest accrued from customers",
            ),
            internal_account(account_names::INTEREST_PAID_ACCOUNT, "Internal account interest is paid from"),
            internal_account(account_names::INTEREST_RECEIVED_ACCOUNT, "Internal account interest is received into"),
        ]);
        definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_contracts_api::SmartContract;

    #[test]
    fn test_term_unit_keys_parse() {
        let definitions = TimeDepositContract::new().parameter_definitions();
        let term_unit = definitions
            .iter()
            .find(|definition| definition.name == names::TERM_UNIT)
            .map(|definition| definition.shape.clone());
        assert_eq!(
            term_unit,
            Some(ParameterShape::Union(vec!["days".to_string(), "months".to_string()]))
        );

        let calendar = definitions
            .iter()
            .find(|definition| definition.name == names::HOLIDAY_CALENDAR)
            .ok_or("holiday calendar not declared");
        assert!(matches!(calendar, Ok(definition) if definition.optional && definition.level == ParameterLevel::Global));
    }
}
