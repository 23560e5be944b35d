use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use account_contracts_api::{
    BalanceKey, ContractError, ContractResult, Phase, PostingInstruction, PostingInstructionBatch, RejectionReason,
    Tside, Vault, DEFAULT_ADDRESS, DEFAULT_ASSET,
};
use account_contracts_config::models::product::transaction_type::ATM;
use account_contracts_config::models::product::CasaParameters;
use account_contracts_config::models::tier::TierName;

use crate::components::dormancy::is_dormant;
use crate::components::tier::resolve_tiered_decimal;
use crate::components::transactions::{customer_transactions_since, transactions_with_batch};
use crate::components::withdrawal_count::{count_monthly_withdrawals, WithdrawalStage};
use crate::utils::start_of_day;

/// Batch under pre-posting evaluation, reduced to the instructions subject to checks
pub struct BatchUnderReview<'a> {
    pub vault: &'a dyn Vault,
    pub tside: Tside,
    pub batch: &'a PostingInstructionBatch,
    pub instructions: Vec<&'a PostingInstruction>,
    pub effective_date: DateTime<Utc>,
}

impl<'a> BatchUnderReview<'a> {
    /// `None` when nothing in the batch is subject to checks
    pub fn new(
        vault: &'a dyn Vault,
        tside: Tside,
        batch: &'a PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> Option<Self> {
        if batch.is_withdrawal_override() {
            debug!("Batch {} bypasses limit checks", batch.client_batch_id);
            return None;
        }
        let instructions: Vec<&PostingInstruction> = batch
            .posting_instructions
            .iter()
            .filter(|pi| !pi.override_all_restrictions)
            .collect();
        if instructions.is_empty() {
            return None;
        }
        Some(Self {
            vault,
            tside,
            batch,
            instructions,
            effective_date,
        })
    }

    pub fn denominations(&self) -> BTreeSet<String> {
        let account_id = self.vault.account_id();
        self.instructions
            .iter()
            .flat_map(|pi| pi.denominations(account_id))
            .collect()
    }

    /// Effect of every checked instruction on DEFAULT in `denomination`
    pub fn effect(&self, denomination: &str) -> Decimal {
        self.effects(denomination).sum()
    }

    /// Per-instruction effects on DEFAULT in `denomination`, zero effects skipped
    pub fn effects<'b>(&'b self, denomination: &'b str) -> impl Iterator<Item = Decimal> + 'b {
        let account_id = self.vault.account_id();
        self.instructions
            .iter()
            .map(move |pi| pi.default_effect(account_id, self.tside, denomination))
            .filter(|effect| !effect.is_zero())
    }

    pub fn has_withdrawals(&self, denomination: &str) -> bool {
        self.effects(denomination).any(|effect| effect < Decimal::ZERO)
    }

    pub fn has_deposits(&self, denomination: &str) -> bool {
        self.effects(denomination).any(|effect| effect > Decimal::ZERO)
    }

    fn balance(&self, key: &BalanceKey) -> Decimal {
        self.vault.get_balance(key, self.effective_date).net
    }

    /// DEFAULT committed balance less outstanding authorisations
    pub fn available_balance(&self, denomination: &str) -> Decimal {
        self.balance(&BalanceKey::default_committed(denomination))
            + self.balance(&BalanceKey::default_pending_out(denomination))
    }
}

pub fn reject(message: String, reason_code: RejectionReason) -> ContractError {
    warn!("Posting rejected ({}): {}", reason_code, message);
    ContractError::rejected(message, reason_code)
}

/// Runs every pre-posting check in order, stopping at the first rejection.
///
/// Cheap checks come first; those reading client transaction history run last.
pub fn validate_casa_batch(
    review: &BatchUnderReview<'_>,
    parameters: &CasaParameters,
    tier: &TierName,
) -> ContractResult<()> {
    check_dormancy(review)?;
    check_denominations(review, parameters)?;
    check_minimum_amounts(review, parameters)?;
    check_maximum_balance(review, parameters)?;
    check_available_balance(review, parameters)?;
    check_daily_limits(review, parameters, tier)?;
    check_monthly_withdrawals(review, parameters)
}

pub fn check_dormancy(review: &BatchUnderReview<'_>) -> ContractResult<()> {
    if is_dormant(review.vault, review.effective_date) {
        return Err(reject(
            "Account flagged \"Dormant\" does not accept external transactions.".to_string(),
            RejectionReason::AgainstTnc,
        ));
    }
    Ok(())
}

pub fn check_denominations(review: &BatchUnderReview<'_>, parameters: &CasaParameters) -> ContractResult<()> {
    for denomination in review.denominations() {
        if !parameters.is_permitted_denomination(&denomination) {
            let permitted: Vec<&str> = parameters.permitted_denominations().collect();
            return Err(reject(
                format!(
                    "Postings are not allowed. Only postings in the following denominations are allowed: {}",
                    permitted.join(", ")
                ),
                RejectionReason::WrongDenomination,
            ));
        }
    }
    Ok(())
}

pub fn check_minimum_amounts(review: &BatchUnderReview<'_>, parameters: &CasaParameters) -> ContractResult<()> {
    let denomination = &parameters.denomination;
    for effect in review.effects(denomination) {
        if effect < Decimal::ZERO {
            if let Some(minimum) = parameters.limits.minimum_withdrawal {
                if effect.abs() < minimum {
                    return Err(reject(
                        format!(
                            "Transaction amount {} {denomination} is less than the minimum withdrawal amount {minimum} {denomination}.",
                            effect.abs()
                        ),
                        RejectionReason::AgainstTnc,
                    ));
                }
            }
        } else if let Some(minimum) = parameters.limits.minimum_deposit {
            if effect < minimum {
                return Err(reject(
                    format!(
                        "Transaction amount {effect} {denomination} is less than the minimum deposit amount {minimum} {denomination}."
                    ),
                    RejectionReason::AgainstTnc,
                ));
            }
        }
    }
    Ok(())
}

pub fn check_maximum_balance(review: &BatchUnderReview<'_>, parameters: &CasaParameters) -> ContractResult<()> {
    let Some(maximum) = parameters.limits.maximum_balance else {
        return Ok(());
    };
    let denomination = &parameters.denomination;
    let effect = review.effect(denomination);
    if effect <= Decimal::ZERO {
        return Ok(());
    }
    let current = review.balance(&BalanceKey::default_committed(denomination))
        + review.balance(&BalanceKey::new(DEFAULT_ADDRESS, DEFAULT_ASSET, denomination, Phase::PendingIn));
    if current + effect > maximum {
        return Err(reject(
            format!("Posting would exceed maximum permitted balance {maximum} {denomination}."),
            RejectionReason::AgainstTnc,
        ));
    }
    Ok(())
}

/// Overdraft only ever extends the main denomination; every other denomination must stay
/// at or above zero
pub fn check_available_balance(review: &BatchUnderReview<'_>, parameters: &CasaParameters) -> ContractResult<()> {
    for denomination in review.denominations() {
        let effect = review.effect(&denomination);
        if effect >= Decimal::ZERO {
            continue;
        }
        let projected = review.available_balance(&denomination) + effect;
        let floor = match &parameters.overdraft {
            Some(overdraft) if denomination == parameters.denomination => -overdraft.unarranged_overdraft_limit,
            _ => Decimal::ZERO,
        };
        if projected < floor {
            return Err(reject(
                format!(
                    "Postings total {denomination} {effect}, which exceeds the available balance of {denomination} {}.",
                    review.available_balance(&denomination)
                ),
                RejectionReason::InsufficientFunds,
            ));
        }
    }
    Ok(())
}

/// Today's deposits and withdrawals including the batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyTotals {
    pub deposits: Decimal,
    pub withdrawals: Decimal,
    pub atm_withdrawals: Decimal,
}

pub fn daily_totals(review: &BatchUnderReview<'_>, parameters: &CasaParameters) -> DailyTotals {
    let account_id = review.vault.account_id();
    let denomination = &parameters.denomination;
    let transactions = transactions_with_batch(review.vault, review.batch);
    let mut totals = DailyTotals::default();

    for transaction in customer_transactions_since(&transactions, start_of_day(review.effective_date)) {
        let amount = transaction.effects(account_id, review.tside, denomination, None).total();
        if amount > Decimal::ZERO {
            totals.deposits += amount;
        } else if amount < Decimal::ZERO {
            totals.withdrawals += amount.abs();
            let is_atm = transaction
                .posting_instructions
                .iter()
                .any(|pi| parameters.transaction_code_to_type_map.is_type(pi, ATM));
            if is_atm {
                totals.atm_withdrawals += amount.abs();
            }
        }
    }
    debug!("Daily totals for {}: {:?}", account_id, totals);
    totals
}

pub fn check_daily_limits(
    review: &BatchUnderReview<'_>,
    parameters: &CasaParameters,
    tier: &TierName,
) -> ContractResult<()> {
    let limits = &parameters.limits;
    let denomination = &parameters.denomination;
    let has_withdrawals = review.has_withdrawals(denomination);
    let has_deposits = review.has_deposits(denomination);
    let atm_limit = match &limits.maximum_daily_atm_withdrawal_limit {
        Some(tiered) => Some(resolve_tiered_decimal(tiered, tier)?),
        None => None,
    };
    let checks_withdrawals = has_withdrawals && (atm_limit.is_some() || limits.maximum_daily_withdrawal.is_some());
    let checks_deposits = has_deposits && limits.maximum_daily_deposit.is_some();
    if !checks_withdrawals && !checks_deposits {
        return Ok(());
    }

    let totals = daily_totals(review, parameters);
    if checks_withdrawals {
        if let Some(limit) = atm_limit {
            if totals.atm_withdrawals > limit {
                return Err(reject(
                    format!(
                        "Transaction would cause the ATM daily withdrawal limit of {limit} {denomination} to be exceeded."
                    ),
                    RejectionReason::AgainstTnc,
                ));
            }
        }
        if let Some(limit) = limits.maximum_daily_withdrawal {
            if totals.withdrawals > limit {
                return Err(reject(
                    format!("Transaction would cause the maximum daily withdrawal limit of {limit} {denomination} to be exceeded."),
                    RejectionReason::AgainstTnc,
                ));
            }
        }
    }
    if checks_deposits {
        if let Some(limit) = limits.maximum_daily_deposit {
            if totals.deposits > limit {
                return Err(reject(
                    format!("Transaction would cause the maximum daily deposit limit of {limit} {denomination} to be exceeded."),
                    RejectionReason::AgainstTnc,
                ));
            }
        }
    }
    Ok(())
}

pub fn check_monthly_withdrawals(review: &BatchUnderReview<'_>, parameters: &CasaParameters) -> ContractResult<()> {
    let Some(feature) = &parameters.excess_withdrawals else {
        return Ok(());
    };
    if !feature.reject_excess_withdrawals {
        return Ok(());
    }
    let count = count_monthly_withdrawals(
        review.vault,
        review.tside,
        &parameters.denomination,
        review.batch,
        WithdrawalStage::Authorised,
        review.effective_date,
    )?;
    if count.current > 0 && count.total() > feature.monthly_withdrawal_limit {
        return Err(reject(
            format!(
                "Exceeding monthly allowed withdrawal number: {}",
                feature.monthly_withdrawal_limit
            ),
            RejectionReason::AgainstTnc,
        ));
    }
    Ok(())
}
