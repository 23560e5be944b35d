use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use account_contracts_api::{ContractError, ContractResult};

/// Non-business days a maturity date must not fall on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayCalendarModel {
    pub holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendarModel {
    /// Parses a JSON list of `YYYY-MM-DD` dates
    pub fn from_json(json: &str) -> ContractResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ContractError::InvalidConfiguration(format!("Holiday calendar is not a list of dates: {e}"))
        })
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}
