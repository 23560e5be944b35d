use chrono::{DateTime, Utc};
use tracing::debug;

use account_contracts_api::{ContractResult, PostingInstructionBatch, Vault};

use super::contract_impl::CasaContract;
use crate::components::limits::{validate_casa_batch, BatchUnderReview};

impl CasaContract {
    pub(super) fn pre_posting_impl(
        vault: &dyn Vault,
        batch: &PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<()> {
        let Some(review) = BatchUnderReview::new(vault, Self::TSIDE, batch, effective_date) else {
            return Ok(());
        };
        let (parameters, tier) = Self::load(vault, effective_date)?;
        validate_casa_batch(&review, &parameters, &tier)?;
        debug!("Batch {} accepted for account {}", batch.client_batch_id, vault.account_id());
        Ok(())
    }
}
