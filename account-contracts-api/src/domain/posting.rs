use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::balance::{Balance, BalanceKey, Balances, Phase, Tside, DEFAULT_ADDRESS, DEFAULT_ASSET};

/// Instruction detail key carrying the scheme transaction code
pub const TRANSACTION_CODE_KEY: &str = "transaction_code";

/// Batch detail key that lets an operator bypass pre-posting restrictions
pub const WITHDRAWAL_OVERRIDE_KEY: &str = "withdrawal_override";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostingInstructionType {
    InboundHardSettlement,
    OutboundHardSettlement,
    InboundAuthorisation,
    OutboundAuthorisation,
    Settlement,
    Release,
    Transfer,
}

/// One leg of a posting instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub credit: bool,
    pub amount: Decimal,
    pub denomination: String,
    pub account_id: String,
    pub account_address: String,
    pub asset: String,
    pub phase: Phase,
}

impl Posting {
    pub fn balance_key(&self) -> BalanceKey {
        BalanceKey::new(&self.account_address, &self.asset, &self.denomination, self.phase)
    }

    pub fn balance(&self, tside: Tside) -> Balance {
        if self.credit {
            Balance::new(Decimal::ZERO, self.amount, tside)
        } else {
            Balance::new(self.amount, Decimal::ZERO, tside)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingInstruction {
    pub id: Uuid,
    pub instruction_type: PostingInstructionType,
    pub client_id: String,
    pub client_transaction_id: String,
    pub value_timestamp: DateTime<Utc>,
    pub postings: Vec<Posting>,
    pub instruction_details: BTreeMap<String, String>,
    pub override_all_restrictions: bool,
}

impl PostingInstruction {
    /// Balance effects of this instruction on `account_id`
    pub fn balances(&self, account_id: &str, tside: Tside) -> Balances {
        let mut balances = Balances::new();
        for posting in self.postings.iter().filter(|p| p.account_id == account_id) {
            balances.add(posting.balance_key(), posting.balance(tside));
        }
        balances
    }

    pub fn transaction_code(&self) -> Option<&str> {
        self.instruction_details
            .get(TRANSACTION_CODE_KEY)
            .map(|code| code.as_str())
    }

    /// Denominations this instruction moves on `account_id`
    pub fn denominations(&self, account_id: &str) -> BTreeSet<String> {
        self.postings
            .iter()
            .filter(|p| p.account_id == account_id)
            .map(|p| p.denomination.clone())
            .collect()
    }

    /// Settled plus unsettled effect on the DEFAULT address in `denomination`
    pub fn default_effect(&self, account_id: &str, tside: Tside, denomination: &str) -> Decimal {
        self.balances(account_id, tside).default_net(
            denomination,
            &[Phase::Committed, Phase::PendingIn, Phase::PendingOut],
        )
    }

    /// Committed effect on the DEFAULT address in `denomination`
    pub fn settled_effect(&self, account_id: &str, tside: Tside, denomination: &str) -> Decimal {
        self.balances(account_id, tside)
            .default_net(denomination, &[Phase::Committed])
    }

    fn customer_instruction(
        instruction_type: PostingInstructionType,
        postings: Vec<Posting>,
        client_transaction_id: &str,
        value_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            instruction_type,
            client_id: "CUSTOMER".to_string(),
            client_transaction_id: client_transaction_id.to_string(),
            value_timestamp,
            postings,
            instruction_details: BTreeMap::new(),
            override_all_restrictions: false,
        }
    }

    fn default_leg(credit: bool, amount: Decimal, denomination: &str, account_id: &str, phase: Phase) -> Posting {
        Posting {
            credit,
            amount,
            denomination: denomination.to_string(),
            account_id: account_id.to_string(),
            account_address: DEFAULT_ADDRESS.to_string(),
            asset: DEFAULT_ASSET.to_string(),
            phase,
        }
    }

    /// Settled deposit into the DEFAULT address of `account_id`
    pub fn inbound_hard_settlement(
        amount: Decimal,
        denomination: &str,
        account_id: &str,
        client_transaction_id: &str,
        value_timestamp: DateTime<Utc>,
    ) -> Self {
        Self::customer_instruction(
            PostingInstructionType::InboundHardSettlement,
            vec![Self::default_leg(true, amount, denomination, account_id, Phase::Committed)],
            client_transaction_id,
            value_timestamp,
        )
    }

    /// Settled withdrawal from the DEFAULT address of `account_id`
    pub fn outbound_hard_settlement(
        amount: Decimal,
        denomination: &str,
        account_id: &str,
        client_transaction_id: &str,
        value_timestamp: DateTime<Utc>,
    ) -> Self {
        Self::customer_instruction(
            PostingInstructionType::OutboundHardSettlement,
            vec![Self::default_leg(false, amount, denomination, account_id, Phase::Committed)],
            client_transaction_id,
            value_timestamp,
        )
    }

    /// Outbound authorisation holding `amount` in PENDING_OUT
    pub fn outbound_authorisation(
        amount: Decimal,
        denomination: &str,
        account_id: &str,
        client_transaction_id: &str,
        value_timestamp: DateTime<Utc>,
    ) -> Self {
        Self::customer_instruction(
            PostingInstructionType::OutboundAuthorisation,
            vec![Self::default_leg(false, amount, denomination, account_id, Phase::PendingOut)],
            client_transaction_id,
            value_timestamp,
        )
    }

    /// Settles `amount` of an outbound authorisation: releases the hold and commits the debit
    pub fn outbound_settlement(
        amount: Decimal,
        denomination: &str,
        account_id: &str,
        client_transaction_id: &str,
        value_timestamp: DateTime<Utc>,
    ) -> Self {
        Self::customer_instruction(
            PostingInstructionType::Settlement,
            vec![
                Self::default_leg(true, amount, denomination, account_id, Phase::PendingOut),
                Self::default_leg(false, amount, denomination, account_id, Phase::Committed),
            ],
            client_transaction_id,
            value_timestamp,
        )
    }

    /// Releases `amount` of an outbound authorisation without settling it
    pub fn outbound_release(
        amount: Decimal,
        denomination: &str,
        account_id: &str,
        client_transaction_id: &str,
        value_timestamp: DateTime<Utc>,
    ) -> Self {
        Self::customer_instruction(
            PostingInstructionType::Release,
            vec![Self::default_leg(true, amount, denomination, account_id, Phase::PendingOut)],
            client_transaction_id,
            value_timestamp,
        )
    }

    pub fn with_transaction_code(mut self, code: &str) -> Self {
        self.instruction_details
            .insert(TRANSACTION_CODE_KEY.to_string(), code.to_string());
        self
    }

    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client_id = client_id.to_string();
        self
    }
}

/// Batch of posting instructions evaluated and committed atomically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingInstructionBatch {
    pub client_batch_id: String,
    pub value_timestamp: DateTime<Utc>,
    pub batch_details: BTreeMap<String, String>,
    pub posting_instructions: Vec<PostingInstruction>,
}

impl PostingInstructionBatch {
    pub fn new(
        client_batch_id: impl Into<String>,
        value_timestamp: DateTime<Utc>,
        posting_instructions: Vec<PostingInstruction>,
    ) -> Self {
        Self {
            client_batch_id: client_batch_id.into(),
            value_timestamp,
            batch_details: BTreeMap::new(),
            posting_instructions,
        }
    }

    /// Summed balance effects of every instruction on `account_id`
    pub fn balances(&self, account_id: &str, tside: Tside) -> Balances {
        let mut balances = Balances::new();
        for instruction in &self.posting_instructions {
            balances.merge(&instruction.balances(account_id, tside));
        }
        balances
    }

    pub fn is_withdrawal_override(&self) -> bool {
        self.batch_details
            .get(WITHDRAWAL_OVERRIDE_KEY)
            .map(|value| value == "true")
            .unwrap_or(false)
    }

    pub fn instruction_ids(&self) -> BTreeSet<Uuid> {
        self.posting_instructions.iter().map(|pi| pi.id).collect()
    }

    pub fn denominations(&self, account_id: &str) -> BTreeSet<String> {
        self.posting_instructions
            .iter()
            .flat_map(|pi| pi.denominations(account_id))
            .collect()
    }
}
