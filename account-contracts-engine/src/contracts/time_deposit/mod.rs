pub mod close;
pub mod contract_impl;
pub mod events;
pub mod execution_schedules;
pub mod parameter_change;
pub mod parameter_definitions;
pub mod pre_posting;
pub mod scheduled;

#[cfg(test)]
pub mod test_utils;

pub use contract_impl::TimeDepositContract;
pub use events::TimeDepositEvent;
