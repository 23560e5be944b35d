//! Account lifecycles chaining several hooks through the in-memory vault

use chrono::{DateTime, Utc};

use account_contracts_api::{
    ContractError, HookDirectives, PostingInstruction, PostingInstructionBatch, RejectionReason, ScheduleExpression,
    SmartContract,
};

use super::{CasaContract, CasaEvent};
use crate::components::dormancy::DORMANCY_FLAG;
use crate::components::interest::{ACCRUED_DEPOSIT_PAYABLE, ACCRUED_OVERDRAFT_RECEIVABLE};
use crate::components::side_effects::TRANSACTION_LIMIT_WARNING_WORKFLOW;
use crate::contracts::casa::test_utils::create_test_casa_vault;
use crate::test_helper::{dec, ts, TestVault, TEST_ACCOUNT_ID};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn run_event(
    vault: &mut TestVault,
    event: CasaEvent,
    at: DateTime<Utc>,
) -> Result<HookDirectives, Box<dyn std::error::Error + Send + Sync>> {
    let directives = CasaContract::new().scheduled_code(&*vault, event.as_str(), at)?;
    vault.commit_directives(&directives);
    Ok(directives)
}

fn withdrawals(id: &str, amounts: &[(&str, &str)], at: DateTime<Utc>) -> PostingInstructionBatch {
    PostingInstructionBatch::new(
        id,
        at,
        amounts
            .iter()
            .map(|(amount, denomination)| {
                PostingInstruction::outbound_hard_settlement(
                    dec(amount),
                    denomination,
                    TEST_ACCOUNT_ID,
                    &format!("{id}_{amount}_{denomination}"),
                    at,
                )
            })
            .collect(),
    )
}

/// Pre-posting, commit and post-posting, as the host runs them for a customer batch
fn post(vault: &mut TestVault, batch: &PostingInstructionBatch) -> Result<HookDirectives, ContractError> {
    let contract = CasaContract::new();
    vault.propose(batch);
    contract.pre_posting_code(&*vault, batch, batch.value_timestamp)?;
    vault.commit(batch);
    let directives = contract.post_posting_code(&*vault, batch, batch.value_timestamp)?;
    vault.commit_directives(&directives);
    Ok(directives)
}

fn rejection_reason(result: Result<HookDirectives, ContractError>) -> Option<RejectionReason> {
    match result {
        Err(err) => err.as_rejection().map(|rejection| rejection.reason_code),
        Ok(_) => None,
    }
}

#[test]
fn test_deposit_interest_lifecycle() -> TestResult {
    let mut vault = create_test_casa_vault(&[
        ("deposit_tier_ranges", r#"{"tier1": {"min": "0"}}"#),
        ("deposit_interest_rate_tiers", r#"{"tier1": "0.05"}"#),
        ("interest_accrual_days_in_year", "365"),
        ("arranged_overdraft_limit", "1000"),
        ("unarranged_overdraft_limit", "2000"),
        ("overdraft_interest_rate", "0.1"),
    ]);
    let schedules = CasaContract::new().execution_schedules(&vault, ts(2020, 1, 10, 10, 0, 0))?;
    assert_eq!(schedules.len(), 5);
    vault.deposit(dec("1000"), "GBP", ts(2020, 1, 10, 10, 0, 0));

    run_event(&mut vault, CasaEvent::AccrueInterestAndDailyFees, ts(2020, 1, 11, 0, 0, 0))?;
    // 1000 * 0.05 / 365 = 0.136986..
    assert_eq!(vault.balance(ACCRUED_DEPOSIT_PAYABLE, "GBP"), dec("0.13699"));

    let directives = run_event(&mut vault, CasaEvent::ApplyAccruedDepositInterest, ts(2020, 1, 16, 0, 1, 0))?;
    assert_eq!(vault.default_balance("GBP"), dec("1000.14"));
    assert_eq!(vault.balance(ACCRUED_DEPOSIT_PAYABLE, "GBP"), dec("0"));
    assert_eq!(
        directives.schedule_for(CasaEvent::ApplyAccruedDepositInterest.as_str()),
        Some(&ScheduleExpression::at_datetime(ts(2020, 2, 16, 0, 1, 0)))
    );

    let directives = run_event(&mut vault, CasaEvent::ApplyAccruedDepositInterest, ts(2020, 2, 16, 0, 1, 0))?;
    assert!(directives.posting_batches.is_empty());
    assert_eq!(vault.default_balance("GBP"), dec("1000.14"));
    Ok(())
}

#[test]
fn test_interest_free_buffer_expires_after_continuous_overdraft() -> TestResult {
    let mut vault = create_test_casa_vault(&[
        ("arranged_overdraft_limit", "500"),
        ("unarranged_overdraft_limit", "500"),
        ("overdraft_interest_rate", "0.365"),
        ("interest_accrual_days_in_year", "365"),
        (
            "interest_free_buffer",
            r#"{"CASA_TIER_UPPER": "100", "CASA_TIER_MIDDLE": "100", "CASA_TIER_LOWER": "100"}"#,
        ),
        (
            "overdraft_interest_free_buffer_days",
            r#"{"CASA_TIER_UPPER": "1", "CASA_TIER_MIDDLE": "1", "CASA_TIER_LOWER": "1"}"#,
        ),
    ]);
    post(&mut vault, &withdrawals("w1", &[("200", "GBP")], ts(2020, 1, 10, 11, 0, 0)))?;

    // overdrawn at the 11th's midnight only, so the buffer still covers 100
    run_event(&mut vault, CasaEvent::AccrueInterestAndDailyFees, ts(2020, 1, 11, 0, 0, 0))?;
    assert_eq!(vault.balance(ACCRUED_OVERDRAFT_RECEIVABLE, "GBP"), dec("-0.1"));

    // overdrawn at both sampled midnights, the whole balance accrues
    run_event(&mut vault, CasaEvent::AccrueInterestAndDailyFees, ts(2020, 1, 12, 0, 0, 0))?;
    assert_eq!(vault.balance(ACCRUED_OVERDRAFT_RECEIVABLE, "GBP"), dec("-0.3"));
    Ok(())
}

#[test]
fn test_overdraft_only_extends_the_main_denomination() -> TestResult {
    let mut vault = create_test_casa_vault(&[
        ("additional_denominations", r#"["EUR"]"#),
        ("arranged_overdraft_limit", "100"),
        ("unarranged_overdraft_limit", "500"),
        ("overdraft_interest_rate", "0.1"),
    ]);
    vault.deposit(dec("50"), "EUR", ts(2020, 1, 10, 11, 0, 0));
    let at = ts(2020, 1, 11, 9, 0, 0);

    let rejected = post(&mut vault, &withdrawals("eur_over", &[("60", "EUR")], at));
    assert_eq!(rejection_reason(rejected), Some(RejectionReason::InsufficientFunds));

    post(&mut vault, &withdrawals("gbp_overdraft", &[("400", "GBP")], at))?;
    post(&mut vault, &withdrawals("eur_ok", &[("50", "EUR")], at))?;
    assert_eq!(vault.default_balance("GBP"), dec("-400"));
    assert_eq!(vault.default_balance("EUR"), dec("0"));

    let rejected = post(&mut vault, &withdrawals("usd", &[("1", "USD")], at));
    assert_eq!(rejection_reason(rejected), Some(RejectionReason::WrongDenomination));
    Ok(())
}

#[test]
fn test_excess_withdrawals_across_batches_are_charged_once() -> TestResult {
    let mut vault = create_test_casa_vault(&[
        ("monthly_withdrawal_limit", "2"),
        ("reject_excess_withdrawals", "false"),
        ("excess_withdrawal_fee", "1.5"),
    ]);
    vault.deposit(dec("100"), "GBP", ts(2020, 1, 10, 11, 0, 0));

    let directives = post(&mut vault, &withdrawals("first", &[("10", "GBP")], ts(2020, 1, 12, 9, 0, 0)))?;
    assert!(directives.is_empty());

    let directives = post(
        &mut vault,
        &withdrawals("second", &[("5", "GBP"), ("6", "GBP")], ts(2020, 1, 13, 9, 0, 0)),
    )?;
    assert_eq!(directives.workflows.len(), 1);
    assert_eq!(directives.workflows[0].workflow, TRANSACTION_LIMIT_WARNING_WORKFLOW);
    assert_eq!(vault.default_balance("GBP"), dec("77.5"));

    // already over the limit: one more fee, no second warning
    let directives = post(&mut vault, &withdrawals("third", &[("1", "GBP")], ts(2020, 1, 14, 9, 0, 0)))?;
    assert!(directives.workflows.is_empty());
    assert_eq!(vault.default_balance("GBP"), dec("75"));
    Ok(())
}

#[test]
fn test_excess_withdrawal_is_rejected_when_configured() -> TestResult {
    let mut vault = create_test_casa_vault(&[("monthly_withdrawal_limit", "1")]);
    vault.deposit(dec("100"), "GBP", ts(2020, 1, 10, 11, 0, 0));

    post(&mut vault, &withdrawals("first", &[("10", "GBP")], ts(2020, 1, 12, 9, 0, 0)))?;
    let rejected = post(&mut vault, &withdrawals("second", &[("10", "GBP")], ts(2020, 1, 13, 9, 0, 0)));
    assert_eq!(rejection_reason(rejected), Some(RejectionReason::AgainstTnc));

    // the monthly window restarts on the 10th
    post(&mut vault, &withdrawals("next_month", &[("10", "GBP")], ts(2020, 2, 10, 9, 0, 0)))?;
    assert_eq!(vault.default_balance("GBP"), dec("80"));
    Ok(())
}

#[test]
fn test_application_day_is_clamped_to_month_end() -> TestResult {
    let mut vault = create_test_casa_vault(&[("interest_application_day", "31")]);
    let schedules = CasaContract::new().execution_schedules(&vault, ts(2020, 1, 10, 10, 0, 0))?;
    let first = schedules
        .iter()
        .find(|update| update.event_type == CasaEvent::ApplyAccruedDepositInterest.as_str())
        .ok_or("deposit interest application not scheduled")?;
    assert_eq!(first.schedule, ScheduleExpression::at_datetime(ts(2020, 1, 31, 0, 1, 0)));

    let expected = [ts(2020, 2, 29, 0, 1, 0), ts(2020, 3, 31, 0, 1, 0), ts(2020, 4, 30, 0, 1, 0)];
    let mut at = ts(2020, 1, 31, 0, 1, 0);
    for next in expected {
        let directives = run_event(&mut vault, CasaEvent::ApplyAccruedDepositInterest, at)?;
        assert_eq!(
            directives.schedule_for(CasaEvent::ApplyAccruedDepositInterest.as_str()),
            Some(&ScheduleExpression::at_datetime(next))
        );
        at = next;
    }
    Ok(())
}

#[test]
fn test_dormant_account_rejects_customer_postings() -> TestResult {
    let mut vault = create_test_casa_vault(&[]);
    vault.deposit(dec("100"), "GBP", ts(2020, 1, 10, 11, 0, 0));
    vault.set_flag(DORMANCY_FLAG, ts(2020, 1, 11, 0, 0, 0));

    let rejected = post(&mut vault, &withdrawals("w1", &[("10", "GBP")], ts(2020, 1, 12, 9, 0, 0)));
    assert_eq!(rejection_reason(rejected), Some(RejectionReason::AgainstTnc));

    vault.clear_flag(DORMANCY_FLAG, ts(2020, 1, 13, 0, 0, 0));
    post(&mut vault, &withdrawals("w2", &[("10", "GBP")], ts(2020, 1, 14, 9, 0, 0)))?;
    assert_eq!(vault.default_balance("GBP"), dec("90"));
    Ok(())
}
