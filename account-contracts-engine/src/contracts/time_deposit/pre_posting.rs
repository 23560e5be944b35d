use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use account_contracts_api::{ContractResult, PostingInstructionBatch, RejectionReason, Vault};
use account_contracts_config::models::product::TimeDepositParameters;
use account_contracts_config::repository::LoadParameters;

use super::contract_impl::TimeDepositContract;
use crate::components::limits::{reject, BatchUnderReview};

impl TimeDepositContract {
    pub(super) fn pre_posting_impl(
        vault: &dyn Vault,
        batch: &PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<()> {
        let Some(review) = BatchUnderReview::new(vault, Self::TSIDE, batch, effective_date) else {
            return Ok(());
        };
        let parameters = TimeDepositParameters::load(vault, effective_date)?;
        let denomination = &parameters.denomination;

        if review.denominations().iter().any(|d| d != denomination) {
            return Err(reject(
                format!("Postings are not allowed. Only postings in {denomination} are allowed."),
                RejectionReason::WrongDenomination,
            ));
        }

        let deposits_close =
            vault.account_creation_date() + Duration::days(i64::from(parameters.deposit_period));
        if review.has_deposits(denomination) && effective_date > deposits_close {
            return Err(reject(
                format!(
                    "Deposits are only accepted within {} days of opening.",
                    parameters.deposit_period
                ),
                RejectionReason::AgainstTnc,
            ));
        }

        if review.has_withdrawals(denomination) {
            let maturity = Self::maturity(vault, &parameters)?;
            if effective_date < maturity {
                return Err(reject(
                    format!("Withdrawals are not allowed before maturity on {}.", maturity.date_naive()),
                    RejectionReason::AgainstTnc,
                ));
            }
        }

        let effect = review.effect(denomination);
        if effect < Decimal::ZERO && review.available_balance(denomination) + effect < Decimal::ZERO {
            return Err(reject(
                format!(
                    "Postings total {denomination} {effect}, which exceeds the available balance of {denomination} {}.",
                    review.available_balance(denomination)
                ),
                RejectionReason::InsufficientFunds,
            ));
        }
        debug!("Batch {} accepted for time deposit {}", batch.client_batch_id, vault.account_id());
        Ok(())
    }
}
