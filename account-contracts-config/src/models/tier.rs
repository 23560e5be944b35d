use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use account_contracts_api::{ContractError, ContractResult};

/// Name of a customer segment; also the name of the flag that selects it
pub type TierName = HeaplessString<50>;

pub fn tier_name(name: &str) -> ContractResult<TierName> {
    TierName::from_str(name).map_err(|_| {
        ContractError::InvalidConfiguration(format!("Tier name '{name}' is too long (max 50 chars)"))
    })
}

/// Parses the ordered `account_tier_names` JSON list
pub fn parse_tier_names(json: &str) -> ContractResult<Vec<TierName>> {
    serde_json::from_str(json).map_err(|e| {
        ContractError::InvalidConfiguration(format!("account_tier_names is not a list of tier names: {e}"))
    })
}

/// Parameter holding one value per tier, e.g. `{"UPPER": "0.02", "LOWER": "0.01"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TieredParameter<T>(BTreeMap<TierName, T>);

impl<T> TieredParameter<T> {
    pub fn new(values: BTreeMap<TierName, T>) -> Self {
        Self(values)
    }

    pub fn get(&self, tier: &TierName) -> Option<&T> {
        self.0.get(tier)
    }

    pub fn tiers(&self) -> impl Iterator<Item = &TierName> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(TierName, T)> for TieredParameter<T> {
    fn from_iter<I: IntoIterator<Item = (TierName, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
