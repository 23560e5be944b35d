//! In-memory vault for exercising contracts without a host
//!
//! The vault records balances per value timestamp, keeps client transaction history,
//! and can commit the directives a hook returns so that accrual, application and
//! posting hooks can be chained into end-to-end scenarios.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use account_contracts_api::{
    Balance, BalanceKey, BalanceTimeseries, ClientTransaction, ClientTransactions, HookDirectives, ParameterValue,
    PostingInstruction, PostingInstructionBatch, Phase, ScheduleUpdate, Tside, Vault, DEFAULT_ADDRESS,
    DEFAULT_ASSET,
};

pub const TEST_ACCOUNT_ID: &str = "Main account";

pub fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 10, 10, 0, 0).unwrap()
}

pub fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second).unwrap()
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub struct TestVault {
    account_id: String,
    creation_date: DateTime<Utc>,
    tside: Tside,
    parameters: BTreeMap<String, Vec<(DateTime<Utc>, ParameterValue)>>,
    /// Flag name to the (set, cleared) intervals it was active for
    flags: BTreeMap<String, Vec<(DateTime<Utc>, Option<DateTime<Utc>>)>>,
    balances: BalanceTimeseries,
    client_transactions: ClientTransactions,
    proposed: Vec<PostingInstruction>,
    pub schedules: BTreeMap<String, ScheduleUpdate>,
    pub workflows: Vec<String>,
}

impl TestVault {
    pub fn new(account_id: &str, creation_date: DateTime<Utc>, tside: Tside) -> Self {
        Self {
            account_id: account_id.to_string(),
            creation_date,
            tside,
            parameters: BTreeMap::new(),
            flags: BTreeMap::new(),
            balances: BalanceTimeseries::new(),
            client_transactions: ClientTransactions::new(),
            proposed: Vec::new(),
            schedules: BTreeMap::new(),
            workflows: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: &str, value: impl Into<ParameterValue>) -> Self {
        self.set_parameter(name, value);
        self
    }

    pub fn set_parameter(&mut self, name: &str, value: impl Into<ParameterValue>) {
        let from = self.creation_date;
        self.set_parameter_from(name, value, from);
    }

    /// Sets a parameter value that applies from `from` onwards
    pub fn set_parameter_from(&mut self, name: &str, value: impl Into<ParameterValue>, from: DateTime<Utc>) {
        let series = self.parameters.entry(name.to_string()).or_default();
        series.retain(|(at, _)| *at < from);
        series.push((from, value.into()));
    }

    pub fn remove_parameter(&mut self, name: &str) {
        self.parameters.remove(name);
    }

    pub fn set_flag(&mut self, name: &str, from: DateTime<Utc>) {
        self.flags.entry(name.to_string()).or_default().push((from, None));
    }

    pub fn clear_flag(&mut self, name: &str, at: DateTime<Utc>) {
        if let Some(intervals) = self.flags.get_mut(name) {
            for interval in intervals.iter_mut().filter(|(_, end)| end.is_none()) {
                interval.1 = Some(at);
            }
        }
    }

    /// Records a raw balance snapshot without a client transaction
    pub fn record_balance(&mut self, key: BalanceKey, at: DateTime<Utc>, balance: Balance) {
        self.balances.record(key, at, balance);
    }

    /// Stages a batch so `get_client_transactions(true)` sees it, as a host does before pre-posting
    pub fn propose(&mut self, batch: &PostingInstructionBatch) {
        self.proposed = batch.posting_instructions.clone();
    }

    /// Commits a batch: balances move at each instruction's value timestamp
    pub fn commit(&mut self, batch: &PostingInstructionBatch) {
        self.proposed.clear();
        for instruction in &batch.posting_instructions {
            for posting in instruction.postings.iter().filter(|p| p.account_id == self.account_id) {
                self.balances
                    .apply_delta(posting.balance_key(), instruction.value_timestamp, posting.balance(self.tside));
            }
            let key = (instruction.client_id.clone(), instruction.client_transaction_id.clone());
            self.client_transactions
                .entry(key)
                .or_insert_with(|| ClientTransaction::new(&instruction.client_id, &instruction.client_transaction_id))
                .posting_instructions
                .push(instruction.clone());
        }
    }

    /// Applies everything a hook asked the host to do
    pub fn commit_directives(&mut self, directives: &HookDirectives) {
        for batch in &directives.posting_batches {
            self.commit(batch);
        }
        for update in &directives.schedule_updates {
            self.schedules.insert(update.event_type.clone(), update.clone());
        }
        for workflow in &directives.workflows {
            self.workflows.push(workflow.workflow.clone());
        }
    }

    pub fn deposit(&mut self, amount: Decimal, denomination: &str, at: DateTime<Utc>) -> PostingInstructionBatch {
        let client_transaction_id = format!("deposit_{}", self.client_transactions.len());
        let batch = PostingInstructionBatch::new(
            format!("batch_{client_transaction_id}"),
            at,
            vec![PostingInstruction::inbound_hard_settlement(
                amount,
                denomination,
                &self.account_id,
                &client_transaction_id,
                at,
            )],
        );
        self.commit(&batch);
        batch
    }

    pub fn cancel_client_transaction(&mut self, client_id: &str, client_transaction_id: &str) {
        if let Some(transaction) = self
            .client_transactions
            .get_mut(&(client_id.to_string(), client_transaction_id.to_string()))
        {
            transaction.cancelled = true;
        }
    }

    /// Latest net of a committed address
    pub fn balance(&self, address: &str, denomination: &str) -> Decimal {
        self.balances
            .latest(&BalanceKey::new(address, DEFAULT_ASSET, denomination, Phase::Committed))
            .net
    }

    pub fn default_balance(&self, denomination: &str) -> Decimal {
        self.balance(DEFAULT_ADDRESS, denomination)
    }
}

impl Vault for TestVault {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn account_creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    fn get_balance_timeseries(&self) -> &BalanceTimeseries {
        &self.balances
    }

    fn get_parameter(&self, name: &str, at: Option<DateTime<Utc>>) -> Option<ParameterValue> {
        let series = self.parameters.get(name)?;
        match at {
            None => series.last().map(|(_, value)| value.clone()),
            Some(at) => series
                .iter()
                .rev()
                .find(|(from, _)| *from <= at)
                .or_else(|| series.first())
                .map(|(_, value)| value.clone()),
        }
    }

    fn get_flag(&self, name: &str, at: Option<DateTime<Utc>>) -> bool {
        self.flags.get(name).is_some_and(|intervals| {
            intervals.iter().any(|(from, until)| match at {
                None => until.is_none(),
                Some(at) => *from <= at && until.map_or(true, |until| at < until),
            })
        })
    }

    fn get_client_transactions(&self, include_proposed: bool) -> ClientTransactions {
        let mut transactions = self.client_transactions.clone();
        if include_proposed {
            for instruction in &self.proposed {
                transactions
                    .entry((instruction.client_id.clone(), instruction.client_transaction_id.clone()))
                    .or_insert_with(|| {
                        ClientTransaction::new(&instruction.client_id, &instruction.client_transaction_id)
                    })
                    .posting_instructions
                    .push(instruction.clone());
            }
        }
        transactions
    }
}

/// Liability account created at `test_start()` with no parameters
pub fn create_test_vault() -> TestVault {
    TestVault::new(TEST_ACCOUNT_ID, test_start(), Tside::Liability)
}
