use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Add;
use std::str::FromStr;

/// Address every customer-visible balance lives on
pub const DEFAULT_ADDRESS: &str = "DEFAULT";

/// Asset used for all fiat balances
pub const DEFAULT_ASSET: &str = "COMMERCIAL_BANK_MONEY";

/// Ledger side of an account.
///
/// Decides how `net` is derived from the debit and credit totals:
/// LIABILITY accounts (deposits) grow with credits, ASSET accounts (loans) grow with debits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tside {
    Asset,
    Liability,
}

impl Tside {
    pub fn net(&self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Tside::Asset => debit - credit,
            Tside::Liability => credit - debit,
        }
    }
}

/// Balance phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Committed,
    PendingIn,
    PendingOut,
}

impl FromStr for Phase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMMITTED" => Ok(Phase::Committed),
            "PENDING_IN" => Ok(Phase::PendingIn),
            "PENDING_OUT" => Ok(Phase::PendingOut),
            _ => Err(()),
        }
    }
}

/// Dimensions a balance is keyed by within one account
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BalanceKey {
    pub address: String,
    pub asset: String,
    pub denomination: String,
    pub phase: Phase,
}

impl BalanceKey {
    pub fn new(address: &str, asset: &str, denomination: &str, phase: Phase) -> Self {
        Self {
            address: address.to_string(),
            asset: asset.to_string(),
            denomination: denomination.to_string(),
            phase,
        }
    }

    /// Committed balance of `address` in the default asset
    pub fn committed(address: &str, denomination: &str) -> Self {
        Self::new(address, DEFAULT_ASSET, denomination, Phase::Committed)
    }

    pub fn default_committed(denomination: &str) -> Self {
        Self::committed(DEFAULT_ADDRESS, denomination)
    }

    pub fn default_pending_out(denomination: &str) -> Self {
        Self::new(DEFAULT_ADDRESS, DEFAULT_ASSET, denomination, Phase::PendingOut)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub debit: Decimal,
    pub credit: Decimal,
    pub net: Decimal,
}

impl Balance {
    pub fn new(debit: Decimal, credit: Decimal, tside: Tside) -> Self {
        Self {
            debit,
            credit,
            net: tside.net(debit, credit),
        }
    }

    /// Credit side minus debit side, independent of the account tside.
    ///
    /// Holding addresses that are only ever credited by accruals (payables) are read this way.
    pub fn credit_minus_debit(&self) -> Decimal {
        self.credit - self.debit
    }

    /// Debit side minus credit side, independent of the account tside.
    pub fn debit_minus_credit(&self) -> Decimal {
        self.debit - self.credit
    }
}

impl Add for Balance {
    type Output = Balance;

    fn add(self, other: Balance) -> Balance {
        Balance {
            debit: self.debit + other.debit,
            credit: self.credit + other.credit,
            net: self.net + other.net,
        }
    }
}

/// Balances of one account, absent keys read as zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances(BTreeMap<BalanceKey, Balance>);

impl Balances {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &BalanceKey) -> Balance {
        self.0.get(key).copied().unwrap_or_default()
    }

    pub fn add(&mut self, key: BalanceKey, balance: Balance) {
        let entry = self.0.entry(key).or_default();
        *entry = *entry + balance;
    }

    pub fn merge(&mut self, other: &Balances) {
        for (key, balance) in other.iter() {
            self.add(key.clone(), *balance);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BalanceKey, &Balance)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of `net` over the given phases of the DEFAULT address in `denomination`
    pub fn default_net(&self, denomination: &str, phases: &[Phase]) -> Decimal {
        phases
            .iter()
            .map(|phase| {
                self.get(&BalanceKey::new(DEFAULT_ADDRESS, DEFAULT_ASSET, denomination, *phase))
                    .net
            })
            .sum()
    }

    /// Denominations touched on any address
    pub fn denominations(&self) -> Vec<String> {
        let mut denominations: Vec<String> =
            self.0.keys().map(|key| key.denomination.clone()).collect();
        denominations.sort();
        denominations.dedup();
        denominations
    }
}

/// Ordered balance snapshots per key.
///
/// Each snapshot holds the cumulative balance from its timestamp until the next one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceTimeseries {
    entries: BTreeMap<BalanceKey, Vec<(DateTime<Utc>, Balance)>>,
}

impl BalanceTimeseries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance at or before `at`. Snapshots after `at` are never visible.
    pub fn at(&self, key: &BalanceKey, at: DateTime<Utc>) -> Balance {
        self.entries
            .get(key)
            .and_then(|series| {
                let idx = series.partition_point(|(ts, _)| *ts <= at);
                if idx == 0 {
                    None
                } else {
                    Some(series[idx - 1].1)
                }
            })
            .unwrap_or_default()
    }

    pub fn latest(&self, key: &BalanceKey) -> Balance {
        self.entries
            .get(key)
            .and_then(|series| series.last().map(|(_, balance)| *balance))
            .unwrap_or_default()
    }

    /// All balances at or before `at`
    pub fn balances_at(&self, at: DateTime<Utc>) -> Balances {
        let mut balances = Balances::new();
        for key in self.entries.keys() {
            balances.add(key.clone(), self.at(key, at));
        }
        balances
    }

    /// Records a cumulative snapshot, replacing any snapshot at the same timestamp
    pub fn record(&mut self, key: BalanceKey, at: DateTime<Utc>, balance: Balance) {
        let series = self.entries.entry(key).or_default();
        let idx = series.partition_point(|(ts, _)| *ts < at);
        if idx < series.len() && series[idx].0 == at {
            series[idx].1 = balance;
        } else {
            series.insert(idx, (at, balance));
        }
    }

    /// Applies a delta at `at` to the snapshot in force and to every later snapshot
    pub fn apply_delta(&mut self, key: BalanceKey, at: DateTime<Utc>, delta: Balance) {
        let current = self.at(&key, at);
        self.record(key.clone(), at, current + delta);
        if let Some(series) = self.entries.get_mut(&key) {
            for (ts, balance) in series.iter_mut() {
                if *ts > at {
                    *balance = *balance + delta;
                }
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &BalanceKey> {
        self.entries.keys()
    }
}
