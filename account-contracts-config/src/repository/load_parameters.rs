use chrono::{DateTime, Utc};
use validator::Validate;

use account_contracts_api::{ContractError, ContractResult, Vault};

use super::parameter_reader::ParameterReader;

/// Trait for loading a typed parameter model from the vault
///
/// Contracts read their configuration once at hook entry through this trait; the
/// components downstream only ever see the typed model.
///
/// # Example
/// ```ignore
/// impl LoadParameters for CasaParameters {
///     fn load(vault: &dyn Vault, at: DateTime<Utc>) -> ContractResult<Self> {
///         let reader = ParameterReader::new(vault, at);
///         // Read every field, then validate
///     }
/// }
/// ```
pub trait LoadParameters: Sized {
    /// Load the parameter model as of a timestamp
    ///
    /// # Arguments
    /// * `vault` - The account view supplied by the host
    /// * `at` - Timestamp the parameter values are read at
    ///
    /// # Returns
    /// * `Ok(Self)` - The loaded and validated model
    /// * `Err` - A required parameter is missing, malformed or out of range
    fn load(vault: &dyn Vault, at: DateTime<Utc>) -> ContractResult<Self>;
}

/// Group of optional parameters enabling one product feature
///
/// The feature is enabled only when every parameter in `PARAMETERS` is set. A partially
/// configured feature is disabled rather than an error.
pub trait OptionalFeature: Sized {
    const PARAMETERS: &'static [&'static str];

    fn read(reader: &ParameterReader<'_>) -> ContractResult<Self>;

    fn read_if_configured(reader: &ParameterReader<'_>) -> ContractResult<Option<Self>> {
        if reader.all_set(Self::PARAMETERS) {
            Self::read(reader).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Runs the model's `validator` rules, turning failures into configuration errors
pub fn validated<T: Validate>(model: T) -> ContractResult<T> {
    model
        .validate()
        .map_err(|e| ContractError::InvalidConfiguration(e.to_string()))?;
    Ok(model)
}
