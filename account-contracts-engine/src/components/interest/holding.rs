use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use account_contracts_api::{BalanceKey, Vault, DEFAULT_ADDRESS};
use account_contracts_config::models::product::InterestAccountsModel;

use super::{ACCRUED_DEPOSIT_PAYABLE, ACCRUED_DEPOSIT_RECEIVABLE, ACCRUED_OVERDRAFT_RECEIVABLE};
use crate::context::{InternalTransfer, TransferLeg};

/// Which party an accrual is owed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccrualSide {
    /// Owed by the bank to the customer
    Payable,
    /// Owed by the customer to the bank
    Receivable,
}

/// Customer address holding accrued amounts, with the GL accounts on the other side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingAccount {
    pub address: String,
    pub side: AccrualSide,
    /// GL account mirroring the holding address while amounts are accrued
    pub accrual_account: String,
    /// GL account the applied amount is paid from or received into
    pub outcome_account: String,
}

impl HoldingAccount {
    pub fn new(address: &str, side: AccrualSide, accrual_account: &str, outcome_account: &str) -> Self {
        Self {
            address: address.to_string(),
            side,
            accrual_account: accrual_account.to_string(),
            outcome_account: outcome_account.to_string(),
        }
    }

    /// Amount held as of `at`, positive whichever side the address is on
    pub fn accrued(&self, vault: &dyn Vault, denomination: &str, at: DateTime<Utc>) -> Decimal {
        let balance = vault.get_balance(&BalanceKey::committed(&self.address, denomination), at);
        match self.side {
            AccrualSide::Payable => balance.credit_minus_debit(),
            AccrualSide::Receivable => balance.debit_minus_credit(),
        }
    }

    /// Grows the holding address by `amount`; a negative amount shrinks it
    pub fn accrual_transfer(&self, account_id: &str, amount: Decimal, denomination: &str, purpose: &str) -> InternalTransfer {
        let holding = TransferLeg::new(account_id, &self.address);
        let gl = TransferLeg::gl(&self.accrual_account);
        match self.side {
            AccrualSide::Payable => InternalTransfer::new(amount, denomination, gl, holding, purpose),
            AccrualSide::Receivable => InternalTransfer::new(amount, denomination, holding, gl, purpose),
        }
    }

    /// Moves `amount` between the customer's DEFAULT address and the outcome account
    pub fn application_transfer(
        &self,
        account_id: &str,
        amount: Decimal,
        denomination: &str,
        purpose: &str,
    ) -> InternalTransfer {
        let customer = TransferLeg::new(account_id, DEFAULT_ADDRESS);
        let gl = TransferLeg::gl(&self.outcome_account);
        match self.side {
            AccrualSide::Payable => InternalTransfer::new(amount, denomination, gl, customer, purpose),
            AccrualSide::Receivable => InternalTransfer::new(amount, denomination, customer, gl, purpose),
        }
    }
}

/// Positive and negative deposit interest holdings
pub fn deposit_interest_holdings(accounts: &InterestAccountsModel) -> [HoldingAccount; 2] {
    [
        HoldingAccount::new(
            ACCRUED_DEPOSIT_PAYABLE,
            AccrualSide::Payable,
            &accounts.accrued_interest_payable_account,
            &accounts.interest_paid_account,
        ),
        HoldingAccount::new(
            ACCRUED_DEPOSIT_RECEIVABLE,
            AccrualSide::Receivable,
            &accounts.accrued_interest_receivable_account,
            &accounts.interest_received_account,
        ),
    ]
}

pub fn overdraft_interest_holding(accounts: &InterestAccountsModel) -> HoldingAccount {
    HoldingAccount::new(
        ACCRUED_OVERDRAFT_RECEIVABLE,
        AccrualSide::Receivable,
        &accounts.accrued_interest_receivable_account,
        &accounts.interest_received_account,
    )
}
