use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use account_contracts_api::{ContractResult, Vault};

use crate::models::calendar::{DayCountConvention, Frequency, HolidayCalendarModel};
use crate::models::product::casa_parameters::{
    DEFAULT_ACCRUAL_PRECISION, DEFAULT_ACCRUAL_TIME, DEFAULT_APPLICATION_TIME, DEFAULT_FULFILLMENT_PRECISION,
};
use crate::models::product::internal_accounts::InterestAccountsModel;
use crate::models::product::schedule_time::ScheduleTime;
use crate::repository::{validated, LoadParameters, ParameterReader};

pub mod names {
    pub const DENOMINATION: &str = "denomination";
    pub const GROSS_INTEREST_RATE: &str = "gross_interest_rate";
    pub const TERM: &str = "term";
    pub const TERM_UNIT: &str = "term_unit";
    pub const DEPOSIT_PERIOD: &str = "deposit_period";
    pub const HOLIDAY_CALENDAR: &str = "holiday_calendar";
    pub const INTEREST_ACCRUAL_DAYS_IN_YEAR: &str = "interest_accrual_days_in_year";
    pub const INTEREST_APPLICATION_FREQUENCY: &str = "interest_application_frequency";
    pub const INTEREST_APPLICATION_DAY: &str = "interest_application_day";
    pub const ACCRUAL_PRECISION: &str = "accrual_precision";
    pub const FULFILLMENT_PRECISION: &str = "fulfillment_precision";
    pub const INTEREST_ACCRUAL: &str = "interest_accrual";
    pub const INTEREST_APPLICATION: &str = "interest_application";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermUnit {
    Days,
    Months,
}

impl fmt::Display for TermUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermUnit::Days => write!(f, "days"),
            TermUnit::Months => write!(f, "months"),
        }
    }
}

impl FromStr for TermUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "days" => Ok(TermUnit::Days),
            "months" => Ok(TermUnit::Months),
            _ => Err(()),
        }
    }
}

/// Configuration of a fixed-term deposit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TimeDepositParameters {
    pub denomination: String,
    pub gross_interest_rate: Decimal,
    #[validate(range(min = 1))]
    pub term: u32,
    pub term_unit: TermUnit,
    /// Days after opening during which deposits are accepted
    pub deposit_period: u32,
    pub holiday_calendar: HolidayCalendarModel,
    pub interest_accrual_days_in_year: DayCountConvention,
    pub interest_application_frequency: Frequency,
    #[validate(range(min = 1, max = 31))]
    pub interest_application_day: u32,
    #[validate(range(max = 28))]
    pub accrual_precision: u32,
    #[validate(range(max = 28))]
    pub fulfillment_precision: u32,
    #[validate(nested)]
    pub interest_accrual_time: ScheduleTime,
    #[validate(nested)]
    pub interest_application_time: ScheduleTime,
    pub interest_accounts: InterestAccountsModel,
}

impl LoadParameters for TimeDepositParameters {
    fn load(vault: &dyn Vault, at: DateTime<Utc>) -> ContractResult<Self> {
        let reader = ParameterReader::new(vault, at);
        let parameters = TimeDepositParameters {
            denomination: reader.text(names::DENOMINATION)?,
            gross_interest_rate: reader.decimal(names::GROSS_INTEREST_RATE)?,
            term: reader.u32(names::TERM)?,
            term_unit: reader.parse_or(names::TERM_UNIT, TermUnit::Months)?,
            deposit_period: reader.u32_or(names::DEPOSIT_PERIOD, 0)?,
            holiday_calendar: reader.optional_json(names::HOLIDAY_CALENDAR)?.unwrap_or_default(),
            interest_accrual_days_in_year: reader
                .parse_or(names::INTEREST_ACCRUAL_DAYS_IN_YEAR, DayCountConvention::Actual)?,
            interest_application_frequency: reader
                .parse_or(names::INTEREST_APPLICATION_FREQUENCY, Frequency::Monthly)?,
            interest_application_day: reader.u32(names::INTEREST_APPLICATION_DAY)?,
            accrual_precision: reader.u32_or(names::ACCRUAL_PRECISION, DEFAULT_ACCRUAL_PRECISION)?,
            fulfillment_precision: reader.u32_or(names::FULFILLMENT_PRECISION, DEFAULT_FULFILLMENT_PRECISION)?,
            interest_accrual_time: ScheduleTime::read(&reader, names::INTEREST_ACCRUAL, DEFAULT_ACCRUAL_TIME)?,
            interest_application_time: ScheduleTime::read(
                &reader,
                names::INTEREST_APPLICATION,
                DEFAULT_APPLICATION_TIME,
            )?,
            interest_accounts: InterestAccountsModel::read(&reader)?,
        };
        validated(parameters)
    }
}
