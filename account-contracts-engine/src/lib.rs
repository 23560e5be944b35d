pub mod components;
pub mod context;
pub mod contracts;
pub mod utils;

pub use context::{HookContext, InternalTransfer, TransferLeg};
pub use contracts::{CasaContract, CasaEvent, ContractFactory, TimeDepositContract, TimeDepositEvent};

#[cfg(test)]
pub mod test_helper;
