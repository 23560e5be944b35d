use rust_decimal::Decimal;
use tracing::debug;

use account_contracts_api::{BalanceKey, ContractResult, PostingInstruction};
use account_contracts_config::models::calendar::DayCountConvention;
use account_contracts_config::models::interest_rate_tier::{build_interest_rate_tiers, InterestRateTierModel};
use account_contracts_config::models::product::{CasaParameters, InterestAccountsModel};
use account_contracts_config::models::tier::{tier_name, TierName};

use super::holding::{AccrualSide, HoldingAccount};
use super::overdraft::{accrue_unarranged_overdraft_fee, interest_free_buffer, overdraft_accrual_base};
use super::{
    ACCRUED_DEPOSIT_PAYABLE, ACCRUED_DEPOSIT_RECEIVABLE, ACCRUED_OVERDRAFT_PAYABLE, ACCRUED_OVERDRAFT_RECEIVABLE,
};
use crate::components::schedule::days_in_year;
use crate::context::HookContext;
use crate::utils::round_half_up;

pub const ACCRUE_DEPOSIT_INTEREST: &str = "ACCRUE_DEPOSIT_INTEREST";
pub const ACCRUE_OVERDRAFT_INTEREST: &str = "ACCRUE_OVERDRAFT_INTEREST";

/// Inputs of one accrual, built fresh for every accrual event
#[derive(Debug, Clone, PartialEq)]
pub struct AccrualDetail {
    pub payable_address: String,
    pub receivable_address: String,
    pub payable_account: String,
    pub receivable_account: String,
    pub paid_account: String,
    pub received_account: String,
    pub denomination: String,
    /// Amount interest is computed on, always non-negative
    pub balance: Decimal,
    pub rate_tiers: Vec<InterestRateTierModel>,
    pub days_in_year: Decimal,
}

impl AccrualDetail {
    fn new(
        accounts: &InterestAccountsModel,
        payable_address: &str,
        receivable_address: &str,
        denomination: &str,
        balance: Decimal,
        rate_tiers: Vec<InterestRateTierModel>,
        days_in_year: Decimal,
    ) -> Self {
        Self {
            payable_address: payable_address.to_string(),
            receivable_address: receivable_address.to_string(),
            payable_account: accounts.accrued_interest_payable_account.to_string(),
            receivable_account: accounts.accrued_interest_receivable_account.to_string(),
            paid_account: accounts.interest_paid_account.to_string(),
            received_account: accounts.interest_received_account.to_string(),
            denomination: denomination.to_string(),
            balance,
            rate_tiers,
            days_in_year,
        }
    }

    pub fn deposit(
        accounts: &InterestAccountsModel,
        denomination: &str,
        balance: Decimal,
        rate_tiers: Vec<InterestRateTierModel>,
        days_in_year: Decimal,
    ) -> Self {
        Self::new(
            accounts,
            ACCRUED_DEPOSIT_PAYABLE,
            ACCRUED_DEPOSIT_RECEIVABLE,
            denomination,
            balance,
            rate_tiers,
            days_in_year,
        )
    }

    pub fn overdraft(
        accounts: &InterestAccountsModel,
        denomination: &str,
        balance: Decimal,
        rate: Decimal,
        days_in_year: Decimal,
    ) -> ContractResult<Self> {
        Ok(Self::new(
            accounts,
            ACCRUED_OVERDRAFT_PAYABLE,
            ACCRUED_OVERDRAFT_RECEIVABLE,
            denomination,
            balance,
            vec![InterestRateTierModel::flat(tier_name("overdraft")?, rate)],
            days_in_year,
        ))
    }

    /// One day of interest summed across the balance bands, unrounded
    pub fn daily_amount(&self) -> Decimal {
        self.rate_tiers
            .iter()
            .map(|tier| tier.portion_of(self.balance) * tier.interest_rate / self.days_in_year)
            .sum()
    }

    pub fn holding(&self, side: AccrualSide) -> HoldingAccount {
        match side {
            AccrualSide::Payable => HoldingAccount::new(
                &self.payable_address,
                AccrualSide::Payable,
                &self.payable_account,
                &self.paid_account,
            ),
            AccrualSide::Receivable => HoldingAccount::new(
                &self.receivable_address,
                AccrualSide::Receivable,
                &self.receivable_account,
                &self.received_account,
            ),
        }
    }
}

/// What the daily accrual does for the current balance
#[derive(Debug, Clone, PartialEq)]
pub enum AccrualOutcome {
    NotApplicable,
    /// Signed amount: positive is owed to the customer, negative (negative rates) to the bank
    AccrueDeposit { detail: AccrualDetail, amount: Decimal },
    /// Amount owed by the customer
    AccrueOverdraft { detail: AccrualDetail, amount: Decimal },
}

/// Picks deposit or overdraft accrual by the sign of `balance`
pub fn evaluate_accrual(
    ctx: &HookContext<'_>,
    parameters: &CasaParameters,
    tier: &TierName,
    balance: Decimal,
) -> ContractResult<AccrualOutcome> {
    let days = days_in_year(
        parameters.interest_accrual_days_in_year,
        ctx.effective_date().date_naive(),
    );

    if balance > Decimal::ZERO {
        let Some(feature) = &parameters.deposit_interest else {
            return Ok(AccrualOutcome::NotApplicable);
        };
        let rate_tiers = build_interest_rate_tiers(&feature.deposit_tier_ranges, &feature.deposit_interest_rate_tiers)?;
        let detail = AccrualDetail::deposit(
            &parameters.interest_accounts,
            &parameters.denomination,
            balance,
            rate_tiers,
            days,
        );
        let amount = round_half_up(detail.daily_amount(), parameters.accrual_precision);
        if amount.is_zero() {
            return Ok(AccrualOutcome::NotApplicable);
        }
        return Ok(AccrualOutcome::AccrueDeposit { detail, amount });
    }

    if balance < Decimal::ZERO {
        let Some(overdraft) = &parameters.overdraft else {
            return Ok(AccrualOutcome::NotApplicable);
        };
        let buffer = interest_free_buffer(ctx, overdraft, tier, &parameters.denomination)?;
        let base = overdraft_accrual_base(balance, buffer);
        let detail = AccrualDetail::overdraft(
            &parameters.interest_accounts,
            &parameters.denomination,
            base,
            overdraft.overdraft_interest_rate,
            days,
        )?;
        let amount = round_half_up(detail.daily_amount(), parameters.accrual_precision);
        if amount <= Decimal::ZERO {
            debug!("Overdraft of {} is within the interest free buffer of {}", balance, buffer);
            return Ok(AccrualOutcome::NotApplicable);
        }
        return Ok(AccrualOutcome::AccrueOverdraft { detail, amount });
    }

    Ok(AccrualOutcome::NotApplicable)
}

/// Instructions recording an outcome in its holding address
pub fn accrual_instructions(ctx: &mut HookContext<'_>, outcome: &AccrualOutcome) -> ContractResult<Vec<PostingInstruction>> {
    let (detail, side, amount, purpose) = match outcome {
        AccrualOutcome::NotApplicable => return Ok(Vec::new()),
        AccrualOutcome::AccrueDeposit { detail, amount } if *amount >= Decimal::ZERO => {
            (detail, AccrualSide::Payable, *amount, ACCRUE_DEPOSIT_INTEREST)
        }
        AccrualOutcome::AccrueDeposit { detail, amount } => {
            (detail, AccrualSide::Receivable, amount.abs(), ACCRUE_DEPOSIT_INTEREST)
        }
        AccrualOutcome::AccrueOverdraft { detail, amount } => {
            (detail, AccrualSide::Receivable, *amount, ACCRUE_OVERDRAFT_INTEREST)
        }
    };
    let account_id = ctx.account_id();
    let transfer = detail
        .holding(side)
        .accrual_transfer(account_id, amount, &detail.denomination, purpose)
        .with_detail("description", format!("Daily interest accrued on balance of {}", detail.balance))
        .with_detail("event", purpose);
    ctx.make_internal_transfer_instructions(transfer)
}

/// Daily accrual of a current account: tiered deposit or overdraft interest plus the
/// unarranged overdraft fee
pub fn accrue_interest(
    ctx: &mut HookContext<'_>,
    parameters: &CasaParameters,
    tier: &TierName,
) -> ContractResult<Vec<PostingInstruction>> {
    let balance = ctx
        .vault()
        .get_balance(&BalanceKey::default_committed(&parameters.denomination), ctx.effective_date())
        .net;

    let outcome = evaluate_accrual(ctx, parameters, tier, balance)?;
    debug!("Accrual outcome for balance {}: {:?}", balance, outcome_name(&outcome));
    let mut instructions = accrual_instructions(ctx, &outcome)?;
    instructions.extend(accrue_unarranged_overdraft_fee(ctx, parameters, balance)?);
    Ok(instructions)
}

/// Flat-rate accrual on a positive balance, as used by fixed-term products
pub fn accrue_flat_interest(
    ctx: &mut HookContext<'_>,
    accounts: &InterestAccountsModel,
    denomination: &str,
    rate: Decimal,
    convention: DayCountConvention,
    precision: u32,
) -> ContractResult<Vec<PostingInstruction>> {
    let balance = ctx
        .vault()
        .get_balance(&BalanceKey::default_committed(denomination), ctx.effective_date())
        .net;
    if balance <= Decimal::ZERO {
        return Ok(Vec::new());
    }
    let detail = AccrualDetail::deposit(
        accounts,
        denomination,
        balance,
        vec![InterestRateTierModel::flat(tier_name("flat")?, rate)],
        days_in_year(convention, ctx.effective_date().date_naive()),
    );
    let amount = round_half_up(detail.daily_amount(), precision);
    let outcome = if amount.is_zero() {
        AccrualOutcome::NotApplicable
    } else {
        AccrualOutcome::AccrueDeposit { detail, amount }
    };
    accrual_instructions(ctx, &outcome)
}

fn outcome_name(outcome: &AccrualOutcome) -> &'static str {
    match outcome {
        AccrualOutcome::NotApplicable => "NOT_APPLICABLE",
        AccrualOutcome::AccrueDeposit { .. } => "ACCRUE_DEPOSIT",
        AccrualOutcome::AccrueOverdraft { .. } => "ACCRUE_OVERDRAFT",
    }
}
