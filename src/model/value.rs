//! Values flowing into delegates (construction input) and out of them
//! (template locals)

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use super::projection::ProjectedRecord;
use super::record::BackendRecord;
use crate::delegate::HelperFacade;

/// Explicit render-call parameters, merged into locals last
pub type Params = IndexMap<String, JsonValue>;

/// One entry of the construction input
#[derive(Debug, Clone)]
pub enum FieldInput {
    /// Plain value, used by value properties; a JSON object or array of
    /// objects is also accepted by record slots
    Value(JsonValue),
    /// A single backend record
    Record(Arc<dyn BackendRecord>),
    /// A sequence of backend records
    Records(Vec<Arc<dyn BackendRecord>>),
}

impl FieldInput {
    /// Short description of the input kind for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FieldInput::Value(_) => "value",
            FieldInput::Record(_) => "record",
            FieldInput::Records(_) => "record sequence",
        }
    }
}

impl From<JsonValue> for FieldInput {
    fn from(value: JsonValue) -> Self {
        FieldInput::Value(value)
    }
}

/// Construction input: field name to value
///
/// Keys the delegate type does not declare are ignored. Keys that are absent
/// leave the field unset, which is different from a key set to `null`.
#[derive(Debug, Clone, Default)]
pub struct ViewData {
    fields: IndexMap<String, FieldInput>,
}

impl ViewData {
    /// Create empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object; every member becomes a plain value
    pub fn from_json(value: &JsonValue) -> Self {
        let fields = value
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), FieldInput::Value(v.clone())))
                    .collect()
            })
            .unwrap_or_default();
        Self { fields }
    }

    /// Add a plain value
    pub fn value(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields
            .insert(name.into(), FieldInput::Value(value.into()));
        self
    }

    /// Add a backend record
    pub fn record(mut self, name: impl Into<String>, record: impl BackendRecord + 'static) -> Self {
        self.fields
            .insert(name.into(), FieldInput::Record(Arc::new(record)));
        self
    }

    /// Add an already shared backend record
    pub fn shared_record(mut self, name: impl Into<String>, record: Arc<dyn BackendRecord>) -> Self {
        self.fields.insert(name.into(), FieldInput::Record(record));
        self
    }

    /// Add a sequence of backend records
    pub fn records(
        mut self,
        name: impl Into<String>,
        records: impl IntoIterator<Item = Arc<dyn BackendRecord>>,
    ) -> Self {
        self.fields
            .insert(name.into(), FieldInput::Records(records.into_iter().collect()));
        self
    }

    /// Insert any input under `name`
    pub fn insert(&mut self, name: impl Into<String>, input: FieldInput) {
        self.fields.insert(name.into(), input);
    }

    /// Get the input for a field
    pub fn get(&self, name: &str) -> Option<&FieldInput> {
        self.fields.get(name)
    }

    /// Check whether a field was given
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Get number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single template local
#[derive(Debug, Clone)]
pub enum Local {
    /// Plain value (computed locals, properties, overrides)
    Value(JsonValue),
    /// Projection of a single record
    Record(ProjectedRecord),
    /// Projections of a record sequence
    Records(Vec<ProjectedRecord>),
    /// The helpers facade
    Helpers(HelperFacade),
}

impl Local {
    /// JSON form of this local; the helpers facade has none
    pub fn to_json(&self) -> Option<JsonValue> {
        match self {
            Local::Value(value) => Some(value.clone()),
            Local::Record(record) => Some(record.to_json()),
            Local::Records(records) => Some(JsonValue::Array(
                records.iter().map(ProjectedRecord::to_json).collect(),
            )),
            Local::Helpers(_) => None,
        }
    }

    /// Plain value, if this local is one
    pub fn as_value(&self) -> Option<&JsonValue> {
        match self {
            Local::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Single record, if this local is one
    pub fn as_record(&self) -> Option<&ProjectedRecord> {
        match self {
            Local::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Record sequence, if this local is one
    pub fn as_records(&self) -> Option<&[ProjectedRecord]> {
        match self {
            Local::Records(records) => Some(records),
            _ => None,
        }
    }

    /// Helpers facade, if this local is one
    pub fn as_helpers(&self) -> Option<&HelperFacade> {
        match self {
            Local::Helpers(facade) => Some(facade),
            _ => None,
        }
    }
}

impl From<JsonValue> for Local {
    fn from(value: JsonValue) -> Self {
        Local::Value(value)
    }
}

/// Ordered mapping of template locals handed to the renderer
///
/// Inserting a name that already exists replaces its value and keeps its
/// original position.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    entries: IndexMap<String, Local>,
}

impl Locals {
    /// Create empty locals
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a local
    pub fn insert(&mut self, name: impl Into<String>, local: Local) -> Option<Local> {
        self.entries.insert(name.into(), local)
    }

    /// Merge explicit parameters, replacing same-named locals
    pub fn merge_params(&mut self, params: &Params) {
        for (name, value) in params {
            self.entries
                .insert(name.clone(), Local::Value(value.clone()));
        }
    }

    /// Get a local by name
    pub fn get(&self, name: &str) -> Option<&Local> {
        self.entries.get(name)
    }

    /// Check whether a local is present
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Local names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate locals in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Local)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get number of locals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first helpers facade among the locals, if any
    pub fn helpers(&self) -> Option<&HelperFacade> {
        self.entries.values().find_map(Local::as_helpers)
    }

    /// JSON object of every data local; the helpers facade is left out
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .entries
            .iter()
            .filter_map(|(name, local)| local.to_json().map(|json| (name.clone(), json)))
            .collect();
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JsonRecord;
    use serde_json::json;

    #[test]
    fn test_view_data_absent_vs_null() {
        let data = ViewData::new().value("title", JsonValue::Null);
        assert!(data.contains("title"));
        assert!(!data.contains("subtitle"));
    }

    #[test]
    fn test_view_data_from_json() {
        let data = ViewData::from_json(&json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(data.get("a").map(FieldInput::kind), Some("value"));
        assert!(ViewData::from_json(&json!(5)).is_empty());
    }

    #[test]
    fn test_view_data_record_kinds() {
        let data = ViewData::new()
            .record("user", JsonRecord::new("User").with("id", 1))
            .records("tags", Vec::new());
        assert_eq!(data.get("user").map(FieldInput::kind), Some("record"));
        assert_eq!(data.get("tags").map(FieldInput::kind), Some("record sequence"));
    }

    #[test]
    fn test_locals_replace_keeps_position() {
        let mut locals = Locals::new();
        locals.insert("x", Local::Value(json!(1)));
        locals.insert("y", Local::Value(json!(2)));
        locals.merge_params(&Params::from([("x".to_string(), json!(3))]));

        assert_eq!(locals.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(locals.to_json(), json!({"x": 3, "y": 2}));
    }
}
