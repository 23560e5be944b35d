use rust_decimal::Decimal;

use account_contracts_config::models::interest_rate_tier::{build_interest_rate_tiers, InterestRateTierModel};
use account_contracts_config::models::product::InterestAccountsModel;
use account_contracts_config::models::tier::TieredParameter;

pub fn create_test_interest_accounts() -> InterestAccountsModel {
    serde_json::from_str(
        r#"{
            "accrued_interest_payable_account": "ACCRUED_INTEREST_PAYABLE",
            "accrued_interest_receivable_account": "ACCRUED_INTEREST_RECEIVABLE",
            "interest_paid_account": "INTEREST_PAID",
            "interest_received_account": "INTEREST_RECEIVED"
        }"#,
    )
    .unwrap()
}

/// 1% up to 3000, 0.8% above
pub fn create_test_rate_tiers() -> Vec<InterestRateTierModel> {
    let ranges = serde_json::from_str(r#"{"tier1": {"min": "0"}, "tier2": {"min": "3000"}}"#).unwrap();
    let rates: TieredParameter<Decimal> = serde_json::from_str(r#"{"tier1": "0.01", "tier2": "0.008"}"#).unwrap();
    build_interest_rate_tiers(&ranges, &rates).unwrap()
}
