use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use account_contracts_api::{ContractError, ContractResult, ScheduleExpression};

use crate::repository::ParameterReader;

/// Time of day an event runs at, read from `<prefix>_hour`, `<prefix>_minute`, `<prefix>_second`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ScheduleTime {
    #[validate(range(max = 23))]
    pub hour: u32,
    #[validate(range(max = 59))]
    pub minute: u32,
    #[validate(range(max = 59))]
    pub second: u32,
}

impl ScheduleTime {
    pub const fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self { hour, minute, second }
    }

    pub fn read(reader: &ParameterReader<'_>, prefix: &str, default: ScheduleTime) -> ContractResult<Self> {
        Ok(Self {
            hour: reader.u32_or(&format!("{prefix}_hour"), default.hour)?,
            minute: reader.u32_or(&format!("{prefix}_minute"), default.minute)?,
            second: reader.u32_or(&format!("{prefix}_second"), default.second)?,
        })
    }

    /// This time of day on `date`
    pub fn on(&self, date: NaiveDate) -> ContractResult<DateTime<Utc>> {
        date.and_hms_opt(self.hour, self.minute, self.second)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| {
                ContractError::InvalidConfiguration(format!(
                    "Invalid time of day {:02}:{:02}:{:02}",
                    self.hour, self.minute, self.second
                ))
            })
    }

    pub fn daily(&self) -> ScheduleExpression {
        ScheduleExpression::daily_at(self.hour, self.minute, self.second)
    }
}
