use chrono::{DateTime, Utc};

use crate::domain::{Balance, BalanceKey, BalanceTimeseries, ClientTransactions, ParameterValue};

/// Read-only view of one account supplied by the host ledger
///
/// This trait is the only way a contract observes ledger state. Every accessor is evaluated
/// "as of" a timestamp so a hook never sees postings whose value timestamp is after the
/// instant it was invoked for.
///
/// Implementations are owned by the host. A contract never writes through this trait;
/// it returns directives instead.
///
/// # Example
/// ```ignore
/// impl Vault for LedgerAccountView {
///     fn get_parameter(&self, name: &str, at: Option<DateTime<Utc>>) -> Option<ParameterValue> {
///         // Look up the parameter value in force at `at`
///     }
/// }
/// ```
pub trait Vault {
    /// Identifier of the account the hook runs for
    fn account_id(&self) -> &str;

    fn account_creation_date(&self) -> DateTime<Utc>;

    /// Balance snapshots of the account
    fn get_balance_timeseries(&self) -> &BalanceTimeseries;

    /// Value of a parameter in force at `at` (latest value when `None`)
    ///
    /// # Returns
    /// * `Some(value)` - The parameter is set
    /// * `None` - The parameter is unset; optional features treat this as disabled
    fn get_parameter(&self, name: &str, at: Option<DateTime<Utc>>) -> Option<ParameterValue>;

    /// Whether the named flag is active on the account at `at`
    fn get_flag(&self, name: &str, at: Option<DateTime<Utc>>) -> bool;

    /// Client transactions touching the account
    ///
    /// # Arguments
    /// * `include_proposed` - Whether instructions of the batch under evaluation are included
    fn get_client_transactions(&self, include_proposed: bool) -> ClientTransactions;

    /// Balance of `key` at or before `at`
    fn get_balance(&self, key: &BalanceKey, at: DateTime<Utc>) -> Balance {
        self.get_balance_timeseries().at(key, at)
    }

    /// Most recent balance of `key`
    fn get_latest_balance(&self, key: &BalanceKey) -> Balance {
        self.get_balance_timeseries().latest(key)
    }
}
