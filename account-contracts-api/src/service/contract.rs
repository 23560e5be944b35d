use chrono::{DateTime, Utc};

use crate::domain::{
    HookDirectives, ParameterDefinition, ParameterValues, PostingInstructionBatch, ScheduleUpdate, Tside,
};
use crate::error::ContractResult;
use crate::service::vault::Vault;

/// Lifecycle hooks a host invokes on an account contract
///
/// Each hook is a run-to-completion function of the vault snapshot and its inputs.
/// Hooks never touch the ledger directly; postings, schedule changes and workflows
/// are returned as `HookDirectives` and executed atomically by the host.
///
/// # Example
/// ```ignore
/// let contract = factory.get("casa")?;
/// let directives = contract.scheduled_code(&vault, "ACCRUE_INTEREST_AND_DAILY_FEES", now)?;
/// host.execute(directives)?;
/// ```
pub trait SmartContract: Send + Sync {
    /// Product name the contract is registered under
    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Ledger side of accounts running this contract
    fn tside(&self) -> Tside;

    /// Parameters the contract reads, with levels and defaults
    fn parameter_definitions(&self) -> Vec<ParameterDefinition>;

    /// Initial schedules for every event type the contract handles
    fn execution_schedules(
        &self,
        vault: &dyn Vault,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<Vec<ScheduleUpdate>>;

    /// Validates a posting batch before it is committed
    ///
    /// # Returns
    /// * `Ok(())` - The batch is accepted
    /// * `Err(ContractError::Rejected(_))` - The batch is rejected with a reason code
    /// * `Err(_)` - The contract is misconfigured
    fn pre_posting_code(
        &self,
        vault: &dyn Vault,
        batch: &PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<()>;

    /// Reacts to a batch that has been committed
    fn post_posting_code(
        &self,
        vault: &dyn Vault,
        batch: &PostingInstructionBatch,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives>;

    /// Handles a scheduled event
    fn scheduled_code(
        &self,
        vault: &dyn Vault,
        event_type: &str,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives>;

    /// Reacts to instance parameters having changed
    fn post_parameter_change_code(
        &self,
        vault: &dyn Vault,
        old_parameters: &ParameterValues,
        new_parameters: &ParameterValues,
        effective_date: DateTime<Utc>,
    ) -> ContractResult<HookDirectives>;

    /// Settles outstanding accruals before the account closes
    fn close_code(&self, vault: &dyn Vault, effective_date: DateTime<Utc>) -> ContractResult<HookDirectives>;
}
