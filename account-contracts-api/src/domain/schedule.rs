use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Sparse calendar pattern understood by the host scheduler.
///
/// Unset fields are wildcards; they are left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExpression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
}

impl ScheduleExpression {
    /// Fires every day at the given time
    pub fn daily_at(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour: Some(hour.to_string()),
            minute: Some(minute.to_string()),
            second: Some(second.to_string()),
            ..Default::default()
        }
    }

    /// Fires once, at exactly `at`
    pub fn at_datetime(at: DateTime<Utc>) -> Self {
        Self {
            year: Some(at.year().to_string()),
            month: Some(at.month().to_string()),
            day: Some(at.day().to_string()),
            day_of_week: None,
            hour: Some(at.hour().to_string()),
            minute: Some(at.minute().to_string()),
            second: Some(at.second().to_string()),
        }
    }

    /// The single instant this expression denotes, when every calendar field is set
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        let field = |value: &Option<String>| value.as_ref().and_then(|v| v.parse::<u32>().ok());
        let year = self.year.as_ref().and_then(|v| v.parse::<i32>().ok())?;
        Utc.with_ymd_and_hms(
            year,
            field(&self.month)?,
            field(&self.day)?,
            field(&self.hour)?,
            field(&self.minute)?,
            field(&self.second)?,
        )
        .single()
    }
}
