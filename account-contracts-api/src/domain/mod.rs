pub mod balance;
pub mod client_transaction;
pub mod directives;
pub mod parameter;
pub mod posting;
pub mod schedule;

pub use balance::*;
pub use client_transaction::*;
pub use directives::*;
pub use parameter::*;
pub use posting::*;
pub use schedule::*;
