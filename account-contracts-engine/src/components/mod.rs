pub mod dormancy;
pub mod fees;
pub mod interest;
pub mod limits;
pub mod schedule;
pub mod side_effects;
pub mod tier;
pub mod transactions;
pub mod withdrawal_count;
