use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::balance::{Phase, Tside};
use super::posting::PostingInstruction;

/// (client_id, client_transaction_id)
pub type ClientTransactionKey = (String, String);

pub type ClientTransactions = BTreeMap<ClientTransactionKey, ClientTransaction>;

/// Cumulative effect of a client transaction on the DEFAULT address of one denomination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTransactionEffects {
    /// Committed movement
    pub settled: Decimal,
    /// Movement still held in a pending phase
    pub unsettled: Decimal,
}

impl ClientTransactionEffects {
    pub fn total(&self) -> Decimal {
        self.settled + self.unsettled
    }
}

/// A logical transaction made of every posting instruction sharing one client transaction id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientTransaction {
    pub client_id: String,
    pub client_transaction_id: String,
    pub cancelled: bool,
    pub posting_instructions: Vec<PostingInstruction>,
}

impl ClientTransaction {
    pub fn new(client_id: &str, client_transaction_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_transaction_id: client_transaction_id.to_string(),
            cancelled: false,
            posting_instructions: Vec::new(),
        }
    }

    pub fn key(&self) -> ClientTransactionKey {
        (self.client_id.clone(), self.client_transaction_id.clone())
    }

    /// Value timestamp of the first instruction
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.posting_instructions
            .iter()
            .map(|pi| pi.value_timestamp)
            .min()
    }

    /// Effects of instructions with a value timestamp at or before `at` (all when `None`)
    pub fn effects(
        &self,
        account_id: &str,
        tside: Tside,
        denomination: &str,
        at: Option<DateTime<Utc>>,
    ) -> ClientTransactionEffects {
        let mut effects = ClientTransactionEffects::default();
        for instruction in self
            .posting_instructions
            .iter()
            .filter(|pi| at.map_or(true, |at| pi.value_timestamp <= at))
        {
            let balances = instruction.balances(account_id, tside);
            effects.settled += balances.default_net(denomination, &[Phase::Committed]);
            effects.unsettled +=
                balances.default_net(denomination, &[Phase::PendingIn, Phase::PendingOut]);
        }
        effects
    }

    /// Copy of this transaction without the given instructions
    pub fn excluding(&self, instruction_ids: &BTreeSet<Uuid>) -> ClientTransaction {
        ClientTransaction {
            client_id: self.client_id.clone(),
            client_transaction_id: self.client_transaction_id.clone(),
            cancelled: self.cancelled,
            posting_instructions: self
                .posting_instructions
                .iter()
                .filter(|pi| !instruction_ids.contains(&pi.id))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.posting_instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_auth_and_settlement_are_not_double_counted() {
        let t1 = Utc.with_ymd_and_hms(2020, 3, 1, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2020, 3, 2, 9, 0, 0).unwrap();
        let mut txn = ClientTransaction::new("CUSTOMER", "tx1");
        txn.posting_instructions
            .push(PostingInstruction::outbound_authorisation(Decimal::new(100, 0), "GBP", "acc", "tx1", t1));
        txn.posting_instructions
            .push(PostingInstruction::outbound_settlement(Decimal::new(60, 0), "GBP", "acc", "tx1", t2));

        let before = txn.effects("acc", Tside::Liability, "GBP", Some(t1));
        assert_eq!(before.settled, Decimal::ZERO);
        assert_eq!(before.total(), Decimal::new(-100, 0));

        let after = txn.effects("acc", Tside::Liability, "GBP", None);
        assert_eq!(after.settled, Decimal::new(-60, 0));
        assert_eq!(after.total(), Decimal::new(-100, 0));
        assert_eq!(txn.start_time(), Some(t1));
    }

    #[test]
    fn test_excluding_drops_instructions() {
        let t1 = Utc.with_ymd_and_hms(2020, 3, 1, 9, 0, 0).unwrap();
        let mut txn = ClientTransaction::new("CUSTOMER", "tx1");
        let pi = PostingInstruction::outbound_hard_settlement(Decimal::new(5, 0), "GBP", "acc", "tx1", t1);
        let ids: BTreeSet<Uuid> = [pi.id].into_iter().collect();
        txn.posting_instructions.push(pi);

        let remaining = txn.excluding(&ids);
        assert!(remaining.is_empty());
        assert_eq!(remaining.start_time(), None);
    }
}
