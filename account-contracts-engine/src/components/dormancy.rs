use chrono::{DateTime, Utc};

use account_contracts_api::Vault;

pub const DORMANCY_FLAG: &str = "ACCOUNT_DORMANT";

pub fn is_dormant(vault: &dyn Vault, at: DateTime<Utc>) -> bool {
    vault.get_flag(DORMANCY_FLAG, Some(at))
}
