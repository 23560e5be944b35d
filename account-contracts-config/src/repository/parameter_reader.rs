use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;

use account_contracts_api::{ContractError, ContractResult, ParameterValue, Vault};

/// Typed access to vault parameters as of one instant
///
/// Required getters fail with `MissingParameter` when unset and `InvalidParameter`
/// when the stored value has the wrong shape. `optional_*` getters return `None`
/// when unset but still fail on malformed values.
pub struct ParameterReader<'a> {
    vault: &'a dyn Vault,
    at: DateTime<Utc>,
}

impl<'a> ParameterReader<'a> {
    pub fn new(vault: &'a dyn Vault, at: DateTime<Utc>) -> Self {
        Self { vault, at }
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    fn value(&self, name: &str) -> Option<ParameterValue> {
        self.vault.get_parameter(name, Some(self.at))
    }

    fn required(&self, name: &str) -> ContractResult<ParameterValue> {
        self.value(name)
            .ok_or_else(|| ContractError::MissingParameter(name.to_string()))
    }

    /// True when every named parameter is set; features are enabled on this predicate
    pub fn all_set(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.value(name).is_some())
    }

    pub fn decimal(&self, name: &str) -> ContractResult<Decimal> {
        let value = self.required(name)?;
        value
            .as_decimal()
            .ok_or_else(|| ContractError::invalid_parameter(name, "expected a number"))
    }

    pub fn optional_decimal(&self, name: &str) -> ContractResult<Option<Decimal>> {
        match self.value(name) {
            None => Ok(None),
            Some(value) => value
                .as_decimal()
                .map(Some)
                .ok_or_else(|| ContractError::invalid_parameter(name, "expected a number")),
        }
    }

    pub fn decimal_or(&self, name: &str, default: Decimal) -> ContractResult<Decimal> {
        Ok(self.optional_decimal(name)?.unwrap_or(default))
    }

    pub fn u32(&self, name: &str) -> ContractResult<u32> {
        let value = self.decimal(name)?;
        to_u32(name, value)
    }

    pub fn u32_or(&self, name: &str, default: u32) -> ContractResult<u32> {
        match self.optional_decimal(name)? {
            Some(value) => to_u32(name, value),
            None => Ok(default),
        }
    }

    pub fn text(&self, name: &str) -> ContractResult<String> {
        let value = self.required(name)?;
        value
            .as_text()
            .map(|text| text.to_string())
            .ok_or_else(|| ContractError::invalid_parameter(name, "expected text"))
    }

    pub fn optional_text(&self, name: &str) -> ContractResult<Option<String>> {
        match self.value(name) {
            None => Ok(None),
            Some(value) => value
                .as_text()
                .map(|text| Some(text.to_string()))
                .ok_or_else(|| ContractError::invalid_parameter(name, "expected text")),
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> ContractResult<bool> {
        match self.value(name) {
            None => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| ContractError::invalid_parameter(name, "expected true or false")),
        }
    }

    pub fn date(&self, name: &str) -> ContractResult<DateTime<Utc>> {
        let value = self.required(name)?;
        value
            .as_date()
            .ok_or_else(|| ContractError::invalid_parameter(name, "expected a date"))
    }

    /// Union parameter parsed through `FromStr`
    pub fn parse<T: FromStr>(&self, name: &str) -> ContractResult<T> {
        let text = self.text(name)?;
        T::from_str(text.trim())
            .map_err(|_| ContractError::invalid_parameter(name, format!("unsupported value '{text}'")))
    }

    pub fn parse_or<T: FromStr>(&self, name: &str, default: T) -> ContractResult<T> {
        match self.optional_text(name)? {
            None => Ok(default),
            Some(text) => T::from_str(text.trim())
                .map_err(|_| ContractError::invalid_parameter(name, format!("unsupported value '{text}'"))),
        }
    }

    /// JSON parameter such as a tiered map or a list
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> ContractResult<T> {
        let text = self.text(name)?;
        parse_json(name, &text)
    }

    pub fn optional_json<T: DeserializeOwned>(&self, name: &str) -> ContractResult<Option<T>> {
        match self.optional_text(name)? {
            None => Ok(None),
            Some(text) => parse_json(name, &text).map(Some),
        }
    }

    /// Internal account id, held in a fixed-capacity string
    pub fn account_code(&self, name: &str) -> ContractResult<HeaplessString<50>> {
        let text = self.text(name)?;
        HeaplessString::from_str(&text).map_err(|_| {
            ContractError::invalid_parameter(name, "account id is too long (max 50 chars)")
        })
    }
}

fn to_u32(name: &str, value: Decimal) -> ContractResult<u32> {
    if !value.fract().is_zero() {
        return Err(ContractError::invalid_parameter(name, "expected a whole number"));
    }
    value
        .to_u32()
        .ok_or_else(|| ContractError::invalid_parameter(name, "expected a non-negative whole number"))
}

fn parse_json<T: DeserializeOwned>(name: &str, text: &str) -> ContractResult<T> {
    serde_json::from_str(text)
        .map_err(|e| ContractError::InvalidConfiguration(format!("Parameter {name} is not valid JSON: {e}")))
}
