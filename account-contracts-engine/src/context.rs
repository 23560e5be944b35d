use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

use account_contracts_api::{
    ClientTransaction, ContractError, ContractResult, HookDirectives, Phase, Posting, PostingInstruction,
    PostingInstructionBatch, PostingInstructionType, ScheduleExpression, ScheduleUpdate, Tside, Vault,
    WorkflowRequest, DEFAULT_ADDRESS, DEFAULT_ASSET,
};
use account_contracts_config::utils::hash_as_uuid;

/// Client transaction id prefix of every transfer a contract makes itself
pub const INTERNAL_POSTING: &str = "INTERNAL_POSTING";
pub const INTERNAL_CLIENT_ID: &str = "CONTRACT";

/// True for transfers generated by contracts rather than customers
pub fn is_internal(transaction: &ClientTransaction) -> bool {
    transaction.client_transaction_id.starts_with(INTERNAL_POSTING)
        || transaction
            .posting_instructions
            .iter()
            .any(|pi| pi.override_all_restrictions)
}

/// One side of an internal transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLeg {
    pub account_id: String,
    pub address: String,
}

impl TransferLeg {
    pub fn new(account_id: &str, address: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            address: address.to_string(),
        }
    }

    /// DEFAULT address of an internal GL account
    pub fn gl(account_id: &str) -> Self {
        Self::new(account_id, DEFAULT_ADDRESS)
    }
}

/// Value moved from one (account, address) to another in a single denomination
#[derive(Debug, Clone, PartialEq)]
pub struct InternalTransfer {
    pub amount: Decimal,
    pub denomination: String,
    pub from: TransferLeg,
    pub to: TransferLeg,
    pub asset: String,
    /// Suffix of the generated client transaction id, e.g. `ACCRUE_INTEREST`
    pub purpose: String,
    pub instruction_details: BTreeMap<String, String>,
    pub override_all_restrictions: bool,
}

impl InternalTransfer {
    pub fn new(amount: Decimal, denomination: &str, from: TransferLeg, to: TransferLeg, purpose: &str) -> Self {
        Self {
            amount,
            denomination: denomination.to_string(),
            from,
            to,
            asset: DEFAULT_ASSET.to_string(),
            purpose: purpose.to_string(),
            instruction_details: BTreeMap::new(),
            override_all_restrictions: true,
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl ToString) -> Self {
        self.instruction_details.insert(key.to_string(), value.to_string());
        self
    }
}

/// Per-invocation view handed to components
///
/// Bundles the read-only vault with the effective date and a deterministic execution id,
/// and collects the directives the hook returns to the host.
pub struct HookContext<'a> {
    vault: &'a dyn Vault,
    tside: Tside,
    hook: String,
    effective_date: DateTime<Utc>,
    execution_id: Uuid,
    instruction_count: u64,
    directives: HookDirectives,
}

impl<'a> HookContext<'a> {
    pub fn new(vault: &'a dyn Vault, tside: Tside, hook: &str, effective_date: DateTime<Utc>) -> ContractResult<Self> {
        let execution_id = hash_as_uuid(&(vault.account_id(), hook, effective_date.timestamp_micros()))
            .map_err(ContractError::InvalidConfiguration)?;
        Ok(Self {
            vault,
            tside,
            hook: hook.to_string(),
            effective_date,
            execution_id,
            instruction_count: 0,
            directives: HookDirectives::default(),
        })
    }

    pub fn vault(&self) -> &'a dyn Vault {
        self.vault
    }

    pub fn tside(&self) -> Tside {
        self.tside
    }

    pub fn account_id(&self) -> &'a str {
        self.vault.account_id()
    }

    pub fn effective_date(&self) -> DateTime<Utc> {
        self.effective_date
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    /// Builds the instruction for an internal transfer.
    ///
    /// Zero amounts produce no instruction; negative amounts move value from `to` to `from`.
    /// Instruction ids are derived from the execution id so reruns of the same hook
    /// produce the same instructions.
    pub fn make_internal_transfer_instructions(
        &mut self,
        transfer: InternalTransfer,
    ) -> ContractResult<Vec<PostingInstruction>> {
        if transfer.amount.is_zero() {
            return Ok(Vec::new());
        }
        let (from, to) = if transfer.amount.is_sign_negative() {
            (transfer.to, transfer.from)
        } else {
            (transfer.from, transfer.to)
        };
        let amount = transfer.amount.abs();

        self.instruction_count += 1;
        let id = hash_as_uuid(&(self.execution_id, self.instruction_count))
            .map_err(ContractError::InvalidConfiguration)?;
        let leg = |credit: bool, target: &TransferLeg| Posting {
            credit,
            amount,
            denomination: transfer.denomination.clone(),
            account_id: target.account_id.clone(),
            account_address: target.address.clone(),
            asset: transfer.asset.clone(),
            phase: Phase::Committed,
        };

        Ok(vec![PostingInstruction {
            id,
            instruction_type: PostingInstructionType::Transfer,
            client_id: INTERNAL_CLIENT_ID.to_string(),
            client_transaction_id: format!(
                "{INTERNAL_POSTING}_{}_{}_{}",
                transfer.purpose, self.execution_id, transfer.denomination
            ),
            value_timestamp: self.effective_date,
            postings: vec![leg(false, &from), leg(true, &to)],
            instruction_details: transfer.instruction_details,
            override_all_restrictions: transfer.override_all_restrictions,
        }])
    }

    /// Queues instructions as one atomic batch; empty batches are dropped
    pub fn instruct_posting_batch(&mut self, instructions: Vec<PostingInstruction>, effective_date: DateTime<Utc>) {
        if instructions.is_empty() {
            return;
        }
        let client_batch_id = format!(
            "{}_{}_{}",
            self.hook,
            self.execution_id,
            self.directives.posting_batches.len()
        );
        self.directives
            .posting_batches
            .push(PostingInstructionBatch::new(client_batch_id, effective_date, instructions));
    }

    pub fn update_event_type(&mut self, event_type: &str, schedule: ScheduleExpression) {
        self.directives.schedule_updates.push(ScheduleUpdate {
            event_type: event_type.to_string(),
            schedule,
        });
    }

    pub fn start_workflow(&mut self, workflow: &str, context: BTreeMap<String, String>) {
        self.directives.workflows.push(WorkflowRequest {
            workflow: workflow.to_string(),
            context,
        });
    }

    pub fn into_directives(self) -> HookDirectives {
        self.directives
    }
}
