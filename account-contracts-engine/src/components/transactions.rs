use chrono::{DateTime, Utc};

use account_contracts_api::{ClientTransaction, ClientTransactions, PostingInstructionBatch, Vault};

use crate::context::is_internal;

/// Client transaction history with every instruction of `batch` in it exactly once.
///
/// Works before commit (the batch may or may not be proposed to the vault) and after it.
pub fn transactions_with_batch(vault: &dyn Vault, batch: &PostingInstructionBatch) -> ClientTransactions {
    let mut transactions = vault.get_client_transactions(true);
    for instruction in &batch.posting_instructions {
        let transaction = transactions
            .entry((instruction.client_id.clone(), instruction.client_transaction_id.clone()))
            .or_insert_with(|| ClientTransaction::new(&instruction.client_id, &instruction.client_transaction_id));
        if !transaction.posting_instructions.iter().any(|pi| pi.id == instruction.id) {
            transaction.posting_instructions.push(instruction.clone());
        }
    }
    transactions
}

/// Non-internal, non-cancelled transactions
pub fn customer_transactions(transactions: &ClientTransactions) -> impl Iterator<Item = &ClientTransaction> {
    transactions
        .values()
        .filter(|transaction| !transaction.cancelled && !is_internal(transaction))
}

/// Customer transactions whose first instruction is at or after `since`
pub fn customer_transactions_since(
    transactions: &ClientTransactions,
    since: DateTime<Utc>,
) -> impl Iterator<Item = &ClientTransaction> {
    customer_transactions(transactions)
        .filter(move |transaction| transaction.start_time().is_some_and(|start| start >= since))
}
