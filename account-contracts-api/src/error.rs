use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reason codes a contract attaches to a rejected posting batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    /// The batch breaks the account terms and conditions (limits, dormancy, ...)
    AgainstTnc,
    /// The batch would take the account below its permitted balance
    InsufficientFunds,
    /// The batch uses a denomination the account does not hold
    WrongDenomination,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::AgainstTnc => "AGAINST_TNC",
            RejectionReason::InsufficientFunds => "INSUFFICIENT_FUNDS",
            RejectionReason::WrongDenomination => "WRONG_DENOMINATION",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RejectionReason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AGAINST_TNC" => Ok(RejectionReason::AgainstTnc),
            "INSUFFICIENT_FUNDS" => Ok(RejectionReason::InsufficientFunds),
            "WRONG_DENOMINATION" => Ok(RejectionReason::WrongDenomination),
            _ => Err(()),
        }
    }
}

/// A user-facing rejection of a posting batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub message: String,
    pub reason_code: RejectionReason,
}

impl Rejection {
    pub fn new(message: impl Into<String>, reason_code: RejectionReason) -> Self {
        Self {
            message: message.into(),
            reason_code,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.reason_code)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("Rejected: {0}")]
    Rejected(Rejection),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown event type: {0}")]
    UnknownEvent(String),
}

impl ContractError {
    pub fn rejected(message: impl Into<String>, reason_code: RejectionReason) -> Self {
        ContractError::Rejected(Rejection::new(message, reason_code))
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ContractError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the rejection when this error is a posting rejection
    pub fn as_rejection(&self) -> Option<&Rejection> {
        match self {
            ContractError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl From<Rejection> for ContractError {
    fn from(rejection: Rejection) -> Self {
        ContractError::Rejected(rejection)
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
