//! Backend record abstraction
//!
//! The data-access layer is external to this crate. Anything that can list its
//! attribute names and read an attribute by name can be projected into a
//! delegate.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt;

/// A backend domain record exposing named attributes
pub trait BackendRecord: Send + Sync + fmt::Debug {
    /// Type name used in error messages
    fn record_type(&self) -> &str;

    /// Attribute names this record currently exposes, in declaration order
    fn attribute_names(&self) -> Vec<String>;

    /// Read one attribute, `None` when the record has no such attribute
    fn attribute(&self, name: &str) -> Option<JsonValue>;
}

/// Record backed by an ordered map of JSON values
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    record_type: String,
    attributes: IndexMap<String, JsonValue>,
}

impl JsonRecord {
    /// Create an empty record of the given type
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Build a record from a JSON object; non-object values yield `None`
    pub fn from_json(record_type: impl Into<String>, value: &JsonValue) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            record_type: record_type.into(),
            attributes: object
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    /// Overwrite an attribute in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.attributes.insert(name.into(), value.into());
    }
}

impl BackendRecord for JsonRecord {
    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    fn attribute(&self, name: &str) -> Option<JsonValue> {
        self.attributes.get(name).cloned()
    }
}
