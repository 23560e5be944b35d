pub mod load_parameters;
pub mod parameter_reader;

// Re-exports
pub use load_parameters::*;
pub use parameter_reader::*;
