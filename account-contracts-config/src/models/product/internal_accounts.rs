use serde::{Deserialize, Serialize};

use account_contracts_api::ContractResult;

use crate::repository::ParameterReader;

pub mod names {
    pub const ACCRUED_INTEREST_PAYABLE_ACCOUNT: &str = "accrued_interest_payable_account";
    pub const ACCRUED_INTEREST_RECEIVABLE_ACCOUNT: &str = "accrued_interest_receivable_account";
    pub const INTEREST_PAID_ACCOUNT: &str = "interest_paid_account";
    pub const INTEREST_RECEIVED_ACCOUNT: &str = "interest_received_account";
    pub const OVERDRAFT_FEE_RECEIVABLE_ACCOUNT: &str = "overdraft_fee_receivable_account";
    pub const OVERDRAFT_FEE_INCOME_ACCOUNT: &str = "overdraft_fee_income_account";
    pub const MAINTENANCE_FEE_INCOME_ACCOUNT: &str = "maintenance_fee_income_account";
    pub const ANNUAL_MAINTENANCE_FEE_INCOME_ACCOUNT: &str = "annual_maintenance_fee_income_account";
    pub const INACTIVITY_FEE_INCOME_ACCOUNT: &str = "inactivity_fee_income_account";
    pub const MINIMUM_BALANCE_FEE_INCOME_ACCOUNT: &str = "minimum_balance_fee_income_account";
    pub const EXCESS_WITHDRAWAL_FEE_INCOME_ACCOUNT: &str = "excess_withdrawal_fee_income_account";
}

/// Internal GL accounts on the other side of interest accruals and applications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestAccountsModel {
    /// Bank-side liability for interest accrued to the customer
    pub accrued_interest_payable_account: heapless::String<50>,
    /// Bank-side asset for interest accrued from the customer
    pub accrued_interest_receivable_account: heapless::String<50>,
    /// Expense account interest is paid out of
    pub interest_paid_account: heapless::String<50>,
    /// Income account interest is received into
    pub interest_received_account: heapless::String<50>,
}

impl InterestAccountsModel {
    pub fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            accrued_interest_payable_account: reader.account_code(names::ACCRUED_INTEREST_PAYABLE_ACCOUNT)?,
            accrued_interest_receivable_account: reader
                .account_code(names::ACCRUED_INTEREST_RECEIVABLE_ACCOUNT)?,
            interest_paid_account: reader.account_code(names::INTEREST_PAID_ACCOUNT)?,
            interest_received_account: reader.account_code(names::INTEREST_RECEIVED_ACCOUNT)?,
        })
    }
}

/// Internal GL accounts fees are charged into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeAccountsModel {
    pub overdraft_fee_receivable_account: heapless::String<50>,
    pub overdraft_fee_income_account: heapless::String<50>,
    pub maintenance_fee_income_account: heapless::String<50>,
    pub annual_maintenance_fee_income_account: heapless::String<50>,
    pub inactivity_fee_income_account: heapless::String<50>,
    pub minimum_balance_fee_income_account: heapless::String<50>,
    pub excess_withdrawal_fee_income_account: heapless::String<50>,
}

impl FeeAccountsModel {
    pub fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            overdraft_fee_receivable_account: reader.account_code(names::OVERDRAFT_FEE_RECEIVABLE_ACCOUNT)?,
            overdraft_fee_income_account: reader.account_code(names::OVERDRAFT_FEE_INCOME_ACCOUNT)?,
            maintenance_fee_income_account: reader.account_code(names::MAINTENANCE_FEE_INCOME_ACCOUNT)?,
            annual_maintenance_fee_income_account: reader
                .account_code(names::ANNUAL_MAINTENANCE_FEE_INCOME_ACCOUNT)?,
            inactivity_fee_income_account: reader.account_code(names::INACTIVITY_FEE_INCOME_ACCOUNT)?,
            minimum_balance_fee_income_account: reader
                .account_code(names::MINIMUM_BALANCE_FEE_INCOME_ACCOUNT)?,
            excess_withdrawal_fee_income_account: reader
                .account_code(names::EXCESS_WITHDRAWAL_FEE_INCOME_ACCOUNT)?,
        })
    }
}
