use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::posting::{PostingInstruction, PostingInstructionBatch};
use super::schedule::ScheduleExpression;

/// Request to move an event type to a new schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub event_type: String,
    pub schedule: ScheduleExpression,
}

/// Fire-and-forget workflow trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub workflow: String,
    pub context: BTreeMap<String, String>,
}

/// Everything a hook asks the host to do once it returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookDirectives {
    pub posting_batches: Vec<PostingInstructionBatch>,
    pub schedule_updates: Vec<ScheduleUpdate>,
    pub workflows: Vec<WorkflowRequest>,
}

impl HookDirectives {
    pub fn is_empty(&self) -> bool {
        self.posting_batches.is_empty() && self.schedule_updates.is_empty() && self.workflows.is_empty()
    }

    /// Every instruction across all batches
    pub fn instructions(&self) -> impl Iterator<Item = &PostingInstruction> {
        self.posting_batches
            .iter()
            .flat_map(|batch| batch.posting_instructions.iter())
    }

    pub fn schedule_for(&self, event_type: &str) -> Option<&ScheduleExpression> {
        self.schedule_updates
            .iter()
            .rev()
            .find(|update| update.event_type == event_type)
            .map(|update| &update.schedule)
    }
}
