use rust_decimal::Decimal;

use account_contracts_api::{ParameterDefinition, ParameterLevel, ParameterShape};
use account_contracts_config::models::calendar::{DayCountConvention, Frequency};
use account_contracts_config::models::product::casa_parameters::{
    names, DEFAULT_ACCRUAL_PRECISION, DEFAULT_ACCRUAL_TIME, DEFAULT_APPLICATION_TIME, DEFAULT_FULFILLMENT_PRECISION,
};
use account_contracts_config::models::product::internal_accounts::names as account_names;
use account_contracts_config::models::product::ScheduleTime;

use super::contract_impl::CasaContract;

pub(crate) fn number(min: Option<i64>, max: Option<i64>, step: Option<Decimal>) -> ParameterShape {
    ParameterShape::Number {
        min: min.map(Decimal::from),
        max: max.map(Decimal::from),
        step,
    }
}

pub(crate) fn money() -> ParameterShape {
    number(Some(0), None, Some(Decimal::new(1, 2)))
}

pub(crate) fn union(keys: &[&str]) -> ParameterShape {
    ParameterShape::Union(keys.iter().map(|key| key.to_string()).collect())
}

/// Hour, minute and second parameters of an event time
pub(crate) fn time_of_day(prefix: &str, default: ScheduleTime, event: &str) -> Vec<ParameterDefinition> {
    [
        ("hour", 23, default.hour),
        ("minute", 59, default.minute),
        ("second", 59, default.second),
    ]
    .into_iter()
    .map(|(unit, max, value)| {
        ParameterDefinition::new(
            &format!("{prefix}_{unit}"),
            ParameterLevel::Template,
            number(Some(0), Some(max), Some(Decimal::ONE)),
            &format!("The {unit} of the day at which {event}"),
        )
        .with_default(Decimal::from(value))
    })
    .collect()
}

pub(crate) fn internal_account(name: &str, description: &str) -> ParameterDefinition {
    ParameterDefinition::new(name, ParameterLevel::Template, ParameterShape::AccountId, description)
}

fn day_count_conventions() -> Vec<&'static str> {
    [DayCountConvention::Actual, DayCountConvention::Days365, DayCountConvention::Days360]
        .iter()
        .map(|convention| convention.as_str())
        .collect()
}

fn frequencies() -> Vec<&'static str> {
    [
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::SemiAnnually,
        Frequency::Annually,
        Frequency::Weekly,
        Frequency::Fortnightly,
        Frequency::FourWeekly,
    ]
    .iter()
    .map(|frequency| frequency.as_str())
    .collect()
}

impl CasaContract {
    pub(super) fn parameter_definitions_impl() -> Vec<ParameterDefinition> {
        use ParameterLevel::{Instance, Template};

        let mut definitions = vec![
            ParameterDefinition::new(
                names::DENOMINATION,
                Template,
                ParameterShape::Denomination,
                "Main denomination of the account",
            ),
            ParameterDefinition::new(
                names::ADDITIONAL_DENOMINATIONS,
                Template,
                ParameterShape::Json,
                "JSON list of other denominations the account may hold",
            )
            .optional()
            .with_default("[]"),
            ParameterDefinition::new(
                names::ACCOUNT_TIER_NAMES,
                Template,
                ParameterShape::Json,
                "JSON list of account tier flags, highest priority first",
            ),
            ParameterDefinition::new(
                names::INTEREST_ACCRUAL_DAYS_IN_YEAR,
                Template,
                union(&day_count_conventions()),
                "Days in a year used to turn annual rates into daily ones",
            )
            .with_default(DayCountConvention::Actual.as_str()),
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
            ParameterDefinition::new(
                names::INTEREST_APPLICATION_DAY,
                Instance,
                number(Some(1), Some(31), Some(Decimal::ONE)),
                "Day of the month interest is applied on, moved to the last day of shorter months",
            ),
            ParameterDefinition::new(
                names::FEES_APPLICATION_DAY,
                Instance,
                number(Some(1), Some(31), Some(Decimal::ONE)),
                "Day of the month monthly and annual fees are charged on",
            )
            .with_default(Decimal::ONE),
            ParameterDefinition::new(
                names::DEPOSIT_TIER_RANGES,
                Template,
                ParameterShape::Json,
                r#"Balance bands deposit interest is tiered by, e.g. {"tier1": {"min": "0"}}"#,
            )
            .optional(),
            ParameterDefinition::new(
                names::DEPOSIT_INTEREST_RATE_TIERS,
                Template,
                ParameterShape::Json,
                "Annual deposit interest rate for each balance band",
            )
            .optional(),
            ParameterDefinition::new(
                names::DEPOSIT_INTEREST_APPLICATION_FREQUENCY,
                Instance,
                union(&frequencies()),
                "How often accrued deposit interest is applied",
            )
            .with_default(Frequency::Monthly.as_str()),
            ParameterDefinition::new(
                names::ARRANGED_OVERDRAFT_LIMIT,
                Instance,
                money(),
                "Overdraft agreed with the customer",
            )
            .optional(),
            ParameterDefinition::new(
                names::UNARRANGED_OVERDRAFT_LIMIT,
                Instance,
                money(),
                "Maximum overdraft, including any unarranged part",
            )
            .optional(),
            ParameterDefinition::new(
                names::OVERDRAFT_INTEREST_RATE,
                Template,
                number(None, None, None),
                "Annual interest rate charged on the overdrawn balance",
            )
            .optional(),
            ParameterDefinition::new(
                names::INTEREST_FREE_BUFFER,
                Template,
                ParameterShape::Json,
                "Overdraft amount free of interest for each account tier",
            )
            .optional(),
            ParameterDefinition::new(
                names::OVERDRAFT_INTEREST_FREE_BUFFER_DAYS,
                Template,
                ParameterShape::Json,
                "Days of continuous overdraft the buffer lasts for each account tier, -1 for no limit",
            )
            .optional(),
            ParameterDefinition::new(
                names::UNARRANGED_OVERDRAFT_FEE,
                Template,
                money(),
                "Fee accrued for each day the balance is beyond the arranged overdraft",
            )
            .optional(),
            ParameterDefinition::new(
                names::UNARRANGED_OVERDRAFT_FEE_CAP,
                Template,
                money(),
                "Maximum unarranged overdraft fee accrued between applications",
            )
            .optional(),
            ParameterDefinition::new(names::MINIMUM_DEPOSIT, Template, money(), "Smallest single deposit accepted")
                .optional(),
            ParameterDefinition::new(
                names::MINIMUM_WITHDRAWAL,
                Template,
                money(),
                "Smallest single withdrawal accepted",
            )
            .optional(),
            ParameterDefinition::new(names::MAXIMUM_BALANCE, Template, money(), "Largest balance the account may hold")
                .optional(),
            ParameterDefinition::new(
                names::MAXIMUM_DAILY_DEPOSIT,
                Template,
                money(),
                "Largest total of deposits in one day",
            )
            .optional(),
            ParameterDefinition::new(
                names::MAXIMUM_DAILY_WITHDRAWAL,
                Template,
                money(),
                "Largest total of withdrawals in one day",
            )
            .optional(),
            ParameterDefinition::new(
                names::MAXIMUM_DAILY_ATM_WITHDRAWAL_LIMIT,
                Template,
                ParameterShape::Json,
                "Largest total of ATM withdrawals in one day for each account tier",
            )
            .optional(),
            ParameterDefinition::new(
                names::TRANSACTION_CODE_TO_TYPE_MAP,
                Template,
                ParameterShape::Json,
                "JSON map of transaction codes to transaction types such as ATM or PURCHASE",
            )
            .optional()
            .with_default("{}"),
            ParameterDefinition::new(
                names::MONTHLY_WITHDRAWAL_LIMIT,
                Template,
                number(Some(0), None, Some(Decimal::ONE)),
                "Withdrawals allowed in each monthly period from account opening",
            )
            .optional(),
            ParameterDefinition::new(
                names::REJECT_EXCESS_WITHDRAWALS,
                Template,
                union(&["true", "false"]),
                "Reject withdrawals over the monthly limit instead of charging for them",
            )
            .with_default("true"),
            ParameterDefinition::new(
                names::EXCESS_WITHDRAWAL_FEE,
                Template,
                money(),
                "Fee for each withdrawal over the monthly limit",
            )
            .with_default(Decimal::ZERO),
            ParameterDefinition::new(
                names::AUTOSAVE_ROUNDING_AMOUNT,
                Template,
                money(),
                "Purchases are rounded up to a multiple of this amount",
            )
            .optional(),
            ParameterDefinition::new(
                names::AUTOSAVE_SAVINGS_ACCOUNT,
                Instance,
                ParameterShape::AccountId,
                "Account receiving autosave round-ups",
            )
            .optional(),
            ParameterDefinition::new(
                names::MAINTENANCE_FEE_MONTHLY,
                Template,
                ParameterShape::Json,
                "Monthly maintenance fee for each account tier",
            )
            .optional(),
            ParameterDefinition::new(
                names::MAINTENANCE_FEE_ANNUAL,
                Template,
                money(),
                "Annual maintenance fee",
            )
            .with_default(Decimal::ZERO),
            ParameterDefinition::new(
                names::ACCOUNT_INACTIVITY_FEE,
                Template,
                money(),
                "Monthly fee charged instead of other fees while the account is dormant",
            )
            .with_default(Decimal::ZERO),
            ParameterDefinition::new(
                names::MINIMUM_BALANCE_FEE,
                Template,
                money(),
                "Fee charged when the mean daily balance falls below the threshold",
            )
            .with_default(Decimal::ZERO),
            ParameterDefinition::new(
                names::MINIMUM_BALANCE_THRESHOLD,
                Template,
                ParameterShape::Json,
                "Minimum mean daily balance for each account tier",
            )
            .optional(),
        ];

        definitions.extend(time_of_day(names::INTEREST_ACCRUAL, DEFAULT_ACCRUAL_TIME, "interest is accrued"));
        definitions.extend(time_of_day(
            names::INTEREST_APPLICATION,
            DEFAULT_APPLICATION_TIME,
            "interest is applied",
        ));
        definitions.extend(time_of_day(names::FEES_APPLICATION, DEFAULT_APPLICATION_TIME, "fees are charged"));

        definitions.extend([
            internal_account(
                account_names::ACCRUED_INTEREST_PAYABLE_ACCOUNT,
                "Internal account for interest accrued to customers",
            ),
            internal_account(
                account_names::ACCRUED_INTEREST_RECEIVABLE_ACCOUNT,
                "Internal account for interest accrued from customers",
            ),
            internal_account(account_names::INTEREST_PAID_ACCOUNT, "Internal account interest is paid from"),
            internal_account(account_names::INTEREST_RECEIVED_ACCOUNT, "Internal account interest is received into"),
            internal_account(
                account_names::OVERDRAFT_FEE_RECEIVABLE_ACCOUNT,
                "Internal account for accrued unarranged overdraft fees",
            ),
            internal_account(
                account_names::OVERDRAFT_FEE_INCOME_ACCOUNT,
                "Internal account unarranged overdraft fees are received into",
            ),
            internal_account(
                account_names::MAINTENANCE_FEE_INCOME_ACCOUNT,
                "Internal account for monthly maintenance fees",
            ),
            internal_account(
                account_names::ANNUAL_MAINTENANCE_FEE_INCOME_ACCOUNT,
                "Internal account for annual maintenance fees",
            ),
            internal_account(account_names::INACTIVITY_FEE_INCOME_ACCOUNT, "Internal account for inactivity fees"),
            internal_account(
                account_names::MINIMUM_BALANCE_FEE_INCOME_ACCOUNT,
                "Internal account for minimum balance fees",
            ),
            internal_account(
                account_names::EXCESS_WITHDRAWAL_FEE_INCOME_ACCOUNT,
                "Internal account for excess withdrawal fees",
            ),
        ]);
        definitions
    }
}
