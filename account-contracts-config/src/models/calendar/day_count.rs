use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Denominator used to turn an annual rate into a daily one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// 365 or 366 depending on the year
    Actual,
    Days365,
    Days360,
}

impl DayCountConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayCountConvention::Actual => "actual",
            DayCountConvention::Days365 => "365",
            DayCountConvention::Days360 => "360",
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayCountConvention {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actual" => Ok(DayCountConvention::Actual),
            "365" => Ok(DayCountConvention::Days365),
            "360" => Ok(DayCountConvention::Days360),
            _ => Err(()),
        }
    }
}
