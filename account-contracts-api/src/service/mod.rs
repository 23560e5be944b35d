pub mod contract;
pub mod vault;

pub use contract::*;
pub use vault::*;
