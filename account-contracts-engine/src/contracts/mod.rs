pub mod casa;
pub mod factory;
pub mod time_deposit;

pub use casa::{CasaContract, CasaEvent};
pub use factory::ContractFactory;
pub use time_deposit::{TimeDepositContract, TimeDepositEvent};
