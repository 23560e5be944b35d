use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use account_contracts_api::PostingInstruction;

pub const ATM: &str = "ATM";
pub const PURCHASE: &str = "PURCHASE";

/// Maps instruction `transaction_code` details to transaction types,
/// e.g. `{"6011": "ATM", "3123": "PURCHASE"}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionCodeMapping(pub BTreeMap<String, String>);

impl TransactionCodeMapping {
    /// Type of the instruction; `default_type` when it carries no mapped code
    pub fn transaction_type<'a>(&'a self, instruction: &PostingInstruction, default_type: &'a str) -> &'a str {
        instruction
            .transaction_code()
            .and_then(|code| self.0.get(code))
            .map(|t| t.as_str())
            .unwrap_or(default_type)
    }

    /// True only for instructions whose code maps to `transaction_type`
    pub fn is_type(&self, instruction: &PostingInstruction, transaction_type: &str) -> bool {
        instruction
            .transaction_code()
            .and_then(|code| self.0.get(code))
            .is_some_and(|t| t == transaction_type)
    }
}
