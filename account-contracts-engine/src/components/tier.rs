use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use account_contracts_api::{ContractError, ContractResult, Vault};
use account_contracts_config::models::tier::{TierName, TieredParameter};

/// Tier of the account: the first tier whose flag is set, otherwise the last tier listed
pub fn resolve_tier(vault: &dyn Vault, tier_names: &[TierName], at: DateTime<Utc>) -> ContractResult<TierName> {
    let fallback = tier_names
        .last()
        .ok_or_else(|| ContractError::InvalidConfiguration("account_tier_names is empty".to_string()))?;

    let tier = tier_names
        .iter()
        .find(|name| vault.get_flag(name.as_str(), Some(at)))
        .unwrap_or(fallback);
    debug!("Account {} resolved to tier {}", vault.account_id(), tier);
    Ok(tier.clone())
}

/// Value of a tiered parameter for `tier`, passed through `convert`.
///
/// A tier missing from the map is a configuration error, never defaulted.
pub fn resolve_tiered_value<T, U, F>(tiered: &TieredParameter<T>, tier: &TierName, convert: F) -> ContractResult<U>
where
    F: FnOnce(&T) -> ContractResult<U>,
{
    let value = tiered.get(tier).ok_or_else(|| {
        ContractError::InvalidConfiguration(format!("No value configured for tier {tier}"))
    })?;
    convert(value)
}

pub fn resolve_tiered_decimal(tiered: &TieredParameter<Decimal>, tier: &TierName) -> ContractResult<Decimal> {
    resolve_tiered_value(tiered, tier, |value| Ok(*value))
}

/// Tiered value, or zero when the parameter is not configured at all
pub fn resolve_optional_tiered_decimal(
    tiered: Option<&TieredParameter<Decimal>>,
    tier: &TierName,
) -> ContractResult<Decimal> {
    match tiered {
        Some(tiered) => resolve_tiered_decimal(tiered, tier),
        None => Ok(Decimal::ZERO),
    }
}
