use crate::test_helper::{create_test_vault, TestVault};

/// Six month GBP deposit at 3.65% on a 365 day year, deposits accepted for five days
pub fn create_test_time_deposit_vault(overrides: &[(&str, &str)]) -> TestVault {
    let mut vault = create_test_vault();
    for (name, value) in [
        ("denomination", "GBP"),
        ("gross_interest_rate", "0.0365"),
        ("term", "6"),
        ("term_unit", "months"),
        ("deposit_period", "5"),
        ("interest_accrual_days_in_year", "365"),
        ("interest_application_frequency", "monthly"),
        ("interest_application_day", "1"),
        ("accrued_interest_payable_account", "ACCRUED_INTEREST_PAYABLE"),
        ("accrued_interest_receivable_account", "ACCRUED_INTEREST_RECEIVABLE"),
        ("interest_paid_account", "INTEREST_PAID"),
        ("interest_received_account", "INTEREST_RECEIVED"),
    ] {
        vault.set_parameter(name, value);
    }
    for (name, value) in overrides {
        vault.set_parameter(name, *value);
    }
    vault
}
