use std::fmt;
use std::str::FromStr;

use account_contracts_api::ContractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeDepositEvent {
    AccrueInterest,
    ApplyAccruedInterest,
    AccountMaturity,
}

impl TimeDepositEvent {
    pub const ALL: [TimeDepositEvent; 3] = [
        TimeDepositEvent::AccrueInterest,
        TimeDepositEvent::ApplyAccruedInterest,
        TimeDepositEvent::AccountMaturity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeDepositEvent::AccrueInterest => "ACCRUE_INTEREST",
            TimeDepositEvent::ApplyAccruedInterest => "APPLY_ACCRUED_INTEREST",
            TimeDepositEvent::AccountMaturity => "ACCOUNT_MATURITY",
        }
    }
}

impl fmt::Display for TimeDepositEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeDepositEvent {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeDepositEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| ContractError::UnknownEvent(s.to_string()))
    }
}
