pub mod accrual;
pub mod application;
pub mod holding;
pub mod overdraft;

#[cfg(test)]
pub mod test_utils;

pub use accrual::*;
pub use application::*;
pub use holding::*;
pub use overdraft::*;

pub const ACCRUED_DEPOSIT_PAYABLE: &str = "ACCRUED_DEPOSIT_PAYABLE";
pub const ACCRUED_DEPOSIT_RECEIVABLE: &str = "ACCRUED_DEPOSIT_RECEIVABLE";
pub const ACCRUED_OVERDRAFT_PAYABLE: &str = "ACCRUED_OVERDRAFT_PAYABLE";
pub const ACCRUED_OVERDRAFT_RECEIVABLE: &str = "ACCRUED_OVERDRAFT_RECEIVABLE";
pub const ACCRUED_OVERDRAFT_FEE_RECEIVABLE: &str = "ACCRUED_OVERDRAFT_FEE_RECEIVABLE";
