use std::fmt;
use std::str::FromStr;

use account_contracts_api::ContractError;

/// Scheduled events of the current account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CasaEvent {
    AccrueInterestAndDailyFees,
    ApplyAccruedDepositInterest,
    ApplyAccruedOverdraftInterest,
    ApplyMonthlyFees,
    ApplyAnnualFees,
}

impl CasaEvent {
    pub const ALL: [CasaEvent; 5] = [
        CasaEvent::AccrueInterestAndDailyFees,
        CasaEvent::ApplyAccruedDepositInterest,
        CasaEvent::ApplyAccruedOverdraftInterest,
        CasaEvent::ApplyMonthlyFees,
        CasaEvent::ApplyAnnualFees,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CasaEvent::AccrueInterestAndDailyFees => "ACCRUE_INTEREST_AND_DAILY_FEES",
            CasaEvent::ApplyAccruedDepositInterest => "APPLY_ACCRUED_DEPOSIT_INTEREST",
            CasaEvent::ApplyAccruedOverdraftInterest => "APPLY_ACCRUED_OVERDRAFT_INTEREST",
            CasaEvent::ApplyMonthlyFees => "APPLY_MONTHLY_FEES",
            CasaEvent::ApplyAnnualFees => "APPLY_ANNUAL_FEES",
        }
    }
}

impl fmt::Display for CasaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CasaEvent {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CasaEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| ContractError::UnknownEvent(s.to_string()))
    }
}
