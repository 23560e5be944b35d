pub mod contract_impl;
pub mod events;
pub mod execution_schedules;
pub mod pre_posting;
pub mod post_posting;
pub mod scheduled;
pub mod parameter_change;
pub mod close;
pub mod parameter_definitions;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod scenario_tests;

pub use contract_impl::CasaContract;
pub use events::CasaEvent;
