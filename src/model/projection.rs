//! Projection of backend records into detached, read-only value objects
//!
//! A projection copies the selected attributes at projection time. It keeps
//! no reference to the source record, so later changes to the record are not
//! observed.
//!
//! When no field list is given the shape is whatever attribute set the record
//! exposes at that moment. That keeps unconstrained record slots flexible at
//! the cost of a shape that is only known at runtime; declare an explicit
//! field list whenever a template must not see every attribute.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use super::record::BackendRecord;
use crate::core::{DelegateError, Result, VD0005};

/// Ordered field names shared by every projection of the same shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    fields: Box<[String]>,
}

impl RecordShape {
    /// Create a shape from an ordered list of field names
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Shape for `record`: the explicit field list, or every attribute the
    /// record exposes when the list is empty
    pub fn for_record(fields: &[String], record: &dyn BackendRecord) -> Self {
        if fields.is_empty() {
            Self::new(record.attribute_names())
        } else {
            Self::new(fields.iter().cloned())
        }
    }

    /// Field names in order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Get number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Immutable snapshot of selected record attributes
///
/// Equality is structural: two projections are equal when their shapes and
/// values are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRecord {
    shape: Arc<RecordShape>,
    values: Box<[JsonValue]>,
}

impl ProjectedRecord {
    /// Project `record` onto `shape`, copying each field's current value
    pub fn project(record: &dyn BackendRecord, shape: Arc<RecordShape>) -> Result<Self> {
        let values = shape
            .fields()
            .iter()
            .map(|field| {
                record
                    .attribute(field)
                    .ok_or_else(|| DelegateError::missing_attribute(record.record_type(), field))
            })
            .collect::<Result<Box<[_]>>>()?;

        Ok(Self { shape, values })
    }

    /// The shape this projection was built with
    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    /// Read a projected field
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.shape
            .fields()
            .iter()
            .position(|f| f == field)
            .map(|index| &self.values[index])
    }

    /// Whether `field` is part of this projection
    pub fn contains(&self, field: &str) -> bool {
        self.shape.fields().iter().any(|f| f == field)
    }

    /// Iterate over `(field, value)` pairs in shape order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.shape
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON object with the projected fields in shape order
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect();
        JsonValue::Object(map)
    }
}

impl Serialize for ProjectedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// Project a single record
///
/// An empty `fields` list selects every attribute the record exposes.
pub fn project(record: &dyn BackendRecord, fields: &[String]) -> Result<ProjectedRecord> {
    let shape = Arc::new(RecordShape::for_record(fields, record));
    ProjectedRecord::project(record, shape)
}

/// Project every record of a sequence onto one shared shape
///
/// Without an explicit field list the shape comes from the first element. A
/// later element that lacks one of those attributes fails with a projection
/// error; attributes it has beyond the shape are dropped. An empty sequence
/// without a field list has no shape at all and is rejected as a construction
/// error on behalf of `type_name`'s `slot`.
pub fn project_all(
    records: &[Arc<dyn BackendRecord>],
    fields: &[String],
    type_name: &str,
    slot: &str,
) -> Result<Vec<ProjectedRecord>> {
    let shape = match records.first() {
        Some(first) => Arc::new(RecordShape::for_record(fields, first.as_ref())),
        None if !fields.is_empty() => return Ok(Vec::new()),
        None => {
            return Err(DelegateError::construction(
                VD0005,
                type_name,
                format!(
                    "record slot '{slot}' received an empty sequence and declares no fields, so its shape cannot be determined"
                ),
            ));
        }
    };

    records
        .iter()
        .map(|record| ProjectedRecord::project(record.as_ref(), Arc::clone(&shape)))
        .collect()
}
