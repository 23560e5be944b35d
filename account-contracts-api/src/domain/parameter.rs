use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a contract parameter as stored by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    Decimal(Decimal),
    /// Free text, union keys and JSON blobs (tiered maps, lists, ranges)
    Text(String),
    Date(DateTime<Utc>),
    Bool(bool),
}

impl ParameterValue {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            ParameterValue::Decimal(value) => Some(*value),
            ParameterValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            ParameterValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Booleans are also accepted as the union keys `"true"` / `"false"`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(value) => Some(*value),
            ParameterValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<Decimal> for ParameterValue {
    fn from(value: Decimal) -> Self {
        ParameterValue::Decimal(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

pub type ParameterValues = BTreeMap<String, ParameterValue>;

/// Who may set a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterLevel {
    Global,
    Template,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterShape {
    Number {
        min: Option<Decimal>,
        max: Option<Decimal>,
        step: Option<Decimal>,
    },
    Text,
    Date,
    Denomination,
    AccountId,
    /// One of a closed set of keys
    Union(Vec<String>),
    /// JSON blob (tiered maps, lists, tier ranges)
    Json,
}

/// Declaration of a parameter a contract reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub level: ParameterLevel,
    pub shape: ParameterShape,
    pub description: String,
    /// Optional parameters gate whole features when unset
    pub optional: bool,
    pub default_value: Option<ParameterValue>,
}

impl ParameterDefinition {
    pub fn new(name: &str, level: ParameterLevel, shape: ParameterShape, description: &str) -> Self {
        Self {
            name: name.to_string(),
            level,
            shape,
            description: description.to_string(),
            optional: false,
            default_value: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
