use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recurrence of an application or fee schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
    Weekly,
    Fortnightly,
    FourWeekly,
}

/// Length of one period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyPeriod {
    Months(u32),
    Days(i64),
}

impl Frequency {
    pub fn period(&self) -> FrequencyPeriod {
        match self {
            Frequency::Monthly => FrequencyPeriod::Months(1),
            Frequency::Quarterly => FrequencyPeriod::Months(3),
            Frequency::SemiAnnually => FrequencyPeriod::Months(6),
            Frequency::Annually => FrequencyPeriod::Months(12),
            Frequency::Weekly => FrequencyPeriod::Days(7),
            Frequency::Fortnightly => FrequencyPeriod::Days(14),
            Frequency::FourWeekly => FrequencyPeriod::Days(28),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::SemiAnnually => "semi_annually",
            Frequency::Annually => "annually",
            Frequency::Weekly => "weekly",
            Frequency::Fortnightly => "fortnightly",
            Frequency::FourWeekly => "four_weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "semi_annually" => Ok(Frequency::SemiAnnually),
            "annually" => Ok(Frequency::Annually),
            "weekly" => Ok(Frequency::Weekly),
            "fortnightly" => Ok(Frequency::Fortnightly),
            "four_weekly" => Ok(Frequency::FourWeekly),
            _ => Err(()),
        }
    }
}
