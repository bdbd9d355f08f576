//! Typed attribute table with named sub-tables.

use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single stored attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Int(i64),
    Double(f64),
    String(String),
}

/// Hierarchical key-value store.
///
/// Missing keys are reported as errors rather than defaulted; callers decide
/// whether a missing value means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigTable {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, ConfigValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tables: BTreeMap<String, ConfigTable>,
}

impl ConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn attribute(&self, name: &str) -> ConfigResult<&ConfigValue> {
        self.attributes
            .get(name)
            .ok_or_else(|| ConfigError::NoAttribute(name.to_string()))
    }

    fn wrong_type(name: &str, expected: &'static str) -> ConfigError {
        ConfigError::WrongType {
            name: name.to_string(),
            expected,
        }
    }

    pub fn get_i(&self, name: &str) -> ConfigResult<i64> {
        match self.attribute(name)? {
            ConfigValue::Int(value) => Ok(*value),
            _ => Err(Self::wrong_type(name, "an integer")),
        }
    }

    /// Read a double. Integer attributes are widened.
    pub fn get_d(&self, name: &str) -> ConfigResult<f64> {
        match self.attribute(name)? {
            ConfigValue::Double(value) => Ok(*value),
            ConfigValue::Int(value) => Ok(*value as f64),
            ConfigValue::String(_) => Err(Self::wrong_type(name, "a number")),
        }
    }

    pub fn get_s(&self, name: &str) -> ConfigResult<&str> {
        match self.attribute(name)? {
            ConfigValue::String(value) => Ok(value),
            _ => Err(Self::wrong_type(name, "a string")),
        }
    }

    /// Read a flag stored as a non-zero integer.
    pub fn get_bool(&self, name: &str) -> ConfigResult<bool> {
        self.get_i(name).map(|value| value != 0)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_i(&mut self, name: &str, value: i64) {
        self.attributes.insert(name.to_string(), ConfigValue::Int(value));
    }

    /// Store a double. Non-finite values have no JSON form and are skipped,
    /// leaving any previous value in place.
    pub fn set_d(&mut self, name: &str, value: f64) {
        if !value.is_finite() {
            log::warn!("Not storing non-finite value {} for {}", value, name);
            return;
        }
        self.attributes.insert(name.to_string(), ConfigValue::Double(value));
    }

    pub fn set_s(&mut self, name: &str, value: impl Into<String>) {
        self.attributes
            .insert(name.to_string(), ConfigValue::String(value.into()));
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_i(name, i64::from(value));
    }

    pub fn table(&self, name: &str) -> ConfigResult<&ConfigTable> {
        self.tables
            .get(name)
            .ok_or_else(|| ConfigError::NoTable(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> ConfigResult<&mut ConfigTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| ConfigError::NoTable(name.to_string()))
    }

    /// Create (or replace) an empty sub-table and return it.
    pub fn new_table(&mut self, name: &str) -> &mut ConfigTable {
        let table = self.tables.entry(name.to_string()).or_default();
        *table = ConfigTable::new();
        table
    }

    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
