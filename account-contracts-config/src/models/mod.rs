pub mod calendar;
pub mod interest_rate_tier;
pub mod product;
pub mod tier;

// Re-exports
pub use calendar::*;
pub use interest_rate_tier::*;
pub use product::*;
pub use tier::*;
