use rust_decimal::Decimal;

use account_contracts_api::ContractResult;
use account_contracts_config::models::product::CasaParameters;
use account_contracts_config::repository::LoadParameters;

use crate::test_helper::{create_test_vault, test_start, TestVault};

/// Current account in GBP with three tiers and every internal account, no optional features
pub fn create_test_casa_vault(overrides: &[(&str, &str)]) -> TestVault {
    let mut vault = create_test_vault();
    vault.set_parameter("denomination", "GBP");
    vault.set_parameter(
        "account_tier_names",
        r#"["CASA_TIER_UPPER", "CASA_TIER_MIDDLE", "CASA_TIER_LOWER"]"#,
    );
    vault.set_parameter("interest_application_day", Decimal::new(16, 0));
    for (name, account) in [
        ("accrued_interest_payable_account", "ACCRUED_INTEREST_PAYABLE"),
        ("accrued_interest_receivable_account", "ACCRUED_INTEREST_RECEIVABLE"),
        ("interest_paid_account", "INTEREST_PAID"),
        ("interest_received_account", "INTEREST_RECEIVED"),
        ("overdraft_fee_receivable_account", "OVERDRAFT_FEE_RECEIVABLE"),
        ("overdraft_fee_income_account", "OVERDRAFT_FEE_INCOME"),
        ("maintenance_fee_income_account", "MAINTENANCE_FEE_INCOME"),
        ("annual_maintenance_fee_income_account", "ANNUAL_MAINTENANCE_FEE_INCOME"),
        ("inactivity_fee_income_account", "INACTIVITY_FEE_INCOME"),
        ("minimum_balance_fee_income_account", "MINIMUM_BALANCE_FEE_INCOME"),
        ("excess_withdrawal_fee_income_account", "EXCESS_WITHDRAWAL_FEE_INCOME"),
    ] {
        vault.set_parameter(name, account);
    }
    for (name, value) in overrides {
        vault.set_parameter(name, *value);
    }
    vault
}

pub fn create_test_casa_parameters(overrides: &[(&str, &str)]) -> ContractResult<CasaParameters> {
    CasaParameters::load(&create_test_casa_vault(overrides), test_start())
}
