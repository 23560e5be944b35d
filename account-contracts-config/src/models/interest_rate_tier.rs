use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use account_contracts_api::{ContractError, ContractResult};

use super::tier::{TierName, TieredParameter};

/// Lower bound of one balance band, e.g. `{"min": "3000"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRange {
    pub min: Decimal,
}

/// Balance bands keyed by tier name, as held in `deposit_tier_ranges`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceTierRanges(pub BTreeMap<TierName, TierRange>);

/// One band of a tiered interest rate.
///
/// The band covers `[minimum_balance, maximum_balance)`; `None` means unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRateTierModel {
    pub name: TierName,
    pub minimum_balance: Decimal,
    pub maximum_balance: Option<Decimal>,
    pub interest_rate: Decimal,
}

impl InterestRateTierModel {
    /// Single band covering every positive balance
    pub fn flat(name: TierName, interest_rate: Decimal) -> Self {
        Self {
            name,
            minimum_balance: Decimal::ZERO,
            maximum_balance: None,
            interest_rate,
        }
    }

    /// Portion of `balance` falling inside this band
    pub fn portion_of(&self, balance: Decimal) -> Decimal {
        let upper = match self.maximum_balance {
            Some(max) => balance.min(max),
            None => balance,
        };
        (upper - self.minimum_balance).max(Decimal::ZERO)
    }
}

/// Joins balance bands with their rates.
///
/// Bands are ordered by ascending `min`; each band ends where the next one starts and
/// the last band is unbounded. Every band must have a rate.
pub fn build_interest_rate_tiers(
    ranges: &BalanceTierRanges,
    rates: &TieredParameter<Decimal>,
) -> ContractResult<Vec<InterestRateTierModel>> {
    let mut bands: Vec<(&TierName, &TierRange)> = ranges.0.iter().collect();
    bands.sort_by(|a, b| a.1.min.cmp(&b.1.min));

    let mut tiers = Vec::with_capacity(bands.len());
    for (idx, (name, range)) in bands.iter().enumerate() {
        let interest_rate = rates.get(name).copied().ok_or_else(|| {
            ContractError::InvalidConfiguration(format!("No interest rate configured for tier {name}"))
        })?;
        tiers.push(InterestRateTierModel {
            name: (*name).clone(),
            minimum_balance: range.min,
            maximum_balance: bands.get(idx + 1).map(|(_, next)| next.min),
            interest_rate,
        });
    }
    Ok(tiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tier::tier_name;

    #[test]
    fn test_bands_are_bounded_by_next_minimum() {
        let ranges: BalanceTierRanges = serde_json::from_str(
            r#"{"tier2": {"min": "3000"}, "tier1": {"min": "0"}, "tier3": {"min": "10000"}}"#,
        )
        .unwrap();
        let rates: TieredParameter<Decimal> =
            serde_json::from_str(r#"{"tier1": "0.01", "tier2": "0.008", "tier3": "0.005"}"#).unwrap();

        let tiers = build_interest_rate_tiers(&ranges, &rates).unwrap();
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0].name.as_str(), "tier1");
        assert_eq!(tiers[0].maximum_balance, Some(Decimal::new(3000, 0)));
        assert_eq!(tiers[1].maximum_balance, Some(Decimal::new(10000, 0)));
        assert_eq!(tiers[2].maximum_balance, None);
    }

    #[test]
    fn test_missing_rate_is_configuration_error() {
        let ranges: BalanceTierRanges =
            serde_json::from_str(r#"{"tier1": {"min": "0"}, "tier2": {"min": "100"}}"#).unwrap();
        let rates: TieredParameter<Decimal> = serde_json::from_str(r#"{"tier1": "0.01"}"#).unwrap();

        let err = build_interest_rate_tiers(&ranges, &rates).unwrap_err();
        assert!(matches!(err, ContractError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_portion_of_balance() {
        let tier = InterestRateTierModel {
            name: tier_name("tier2").unwrap(),
            minimum_balance: Decimal::new(3000, 0),
            maximum_balance: Some(Decimal::new(10000, 0)),
            interest_rate: Decimal::new(8, 3),
        };
        assert_eq!(tier.portion_of(Decimal::new(5000, 0)), Decimal::new(2000, 0));
        assert_eq!(tier.portion_of(Decimal::new(2000, 0)), Decimal::ZERO);
        assert_eq!(tier.portion_of(Decimal::new(20000, 0)), Decimal::new(7000, 0));
    }
}
