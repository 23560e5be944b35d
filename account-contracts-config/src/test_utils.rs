use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

use account_contracts_api::{BalanceTimeseries, ClientTransactions, ParameterValue, Vault};

/// Vault exposing only parameters, for loading models in tests
pub struct ParameterVault {
    pub parameters: BTreeMap<String, ParameterValue>,
    balances: BalanceTimeseries,
}

impl ParameterVault {
    pub fn new() -> Self {
        Self {
            parameters: BTreeMap::new(),
            balances: BalanceTimeseries::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<ParameterValue>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.parameters.remove(name);
        self
    }
}

impl Vault for ParameterVault {
    fn account_id(&self) -> &str {
        "test_account"
    }

    fn account_creation_date(&self) -> DateTime<Utc> {
        test_date()
    }

    fn get_balance_timeseries(&self) -> &BalanceTimeseries {
        &self.balances
    }

    fn get_parameter(&self, name: &str, _at: Option<DateTime<Utc>>) -> Option<ParameterValue> {
        self.parameters.get(name).cloned()
    }

    fn get_flag(&self, _name: &str, _at: Option<DateTime<Utc>>) -> bool {
        false
    }

    fn get_client_transactions(&self, _include_proposed: bool) -> ClientTransactions {
        ClientTransactions::new()
    }
}

pub fn test_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 10, 10, 0, 0).unwrap()
}

/// Minimal CASA configuration: GBP, three tiers, internal accounts and no optional features
pub fn create_test_casa_vault() -> ParameterVault {
    ParameterVault::new()
        .with("denomination", "GBP")
        .with("account_tier_names", r#"["CASA_TIER_UPPER", "CASA_TIER_MIDDLE", "CASA_TIER_LOWER"]"#)
        .with("interest_application_day", rust_decimal::Decimal::new(16, 0))
        .with("accrued_interest_payable_account", "ACCRUED_INTEREST_PAYABLE")
        .with("accrued_interest_receivable_account", "ACCRUED_INTEREST_RECEIVABLE")
        .with("interest_paid_account", "INTEREST_PAID")
        .with("interest_received_account", "INTEREST_RECEIVED")
        .with("overdraft_fee_receivable_account", "OVERDRAFT_FEE_RECEIVABLE")
        .with("overdraft_fee_income_account", "OVERDRAFT_FEE_INCOME")
        .with("maintenance_fee_income_account", "MAINTENANCE_FEE_INCOME")
        .with("annual_maintenance_fee_income_account", "ANNUAL_MAINTENANCE_FEE_INCOME")
        .with("inactivity_fee_income_account", "INACTIVITY_FEE_INCOME")
        .with("minimum_balance_fee_income_account", "MINIMUM_BALANCE_FEE_INCOME")
        .with("excess_withdrawal_fee_income_account", "EXCESS_WITHDRAWAL_FEE_INCOME")
}
