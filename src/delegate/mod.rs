//! Delegate instances
//!
//! A delegate is built once from its construction input and is read-only
//! afterwards. Cloning a [`Delegate`] clones the handle; clones share the same
//! identity and therefore the same render cache entries.

pub mod helpers;

pub use helpers::HelperFacade;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{DelegateError, Result, VD0006, VD0007};
use crate::model::{
    BackendRecord, FieldInput, JsonRecord, Local, Locals, Params, ProjectedRecord, ViewData,
    project, project_all,
};
use crate::registry::{Cardinality, DelegateType, RecordSlot};
use crate::render::{self, TemplateRenderer};

static NEXT_DELEGATE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a delegate instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelegateId(u64);

impl DelegateId {
    fn next() -> Self {
        Self(NEXT_DELEGATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn for_tests(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DelegateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Projected content of a record slot
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    One(ProjectedRecord),
    Many(Vec<ProjectedRecord>),
}

impl RecordValue {
    /// The projected record, if this is a single-record slot
    pub fn as_one(&self) -> Option<&ProjectedRecord> {
        match self {
            RecordValue::One(record) => Some(record),
            RecordValue::Many(_) => None,
        }
    }

    /// The projected records, if this is a sequence slot
    pub fn as_many(&self) -> Option<&[ProjectedRecord]> {
        match self {
            RecordValue::One(_) => None,
            RecordValue::Many(records) => Some(records),
        }
    }

    /// Number of projected records held
    pub fn count(&self) -> usize {
        match self {
            RecordValue::One(_) => 1,
            RecordValue::Many(records) => records.len(),
        }
    }

    /// Convert into a template local
    pub fn to_local(&self) -> Local {
        match self {
            RecordValue::One(record) => Local::Record(record.clone()),
            RecordValue::Many(records) => Local::Records(records.clone()),
        }
    }
}

struct DelegateInner {
    id: DelegateId,
    kind: Arc<DelegateType>,
    properties: IndexMap<String, JsonValue>,
    records: IndexMap<String, RecordValue>,
}

/// A constructed, immutable delegate
#[derive(Clone)]
pub struct Delegate {
    inner: Arc<DelegateInner>,
}

impl Delegate {
    /// Assign every declared field present in `data` to a fresh instance of
    /// `kind`
    ///
    /// Record slots are projected first, then properties are copied, each in
    /// schema order. Absent keys, and a `null` given for a record slot, leave
    /// the field unset. This is a single construction step; variant resolution
    /// lives in the registry.
    pub(crate) fn assign(kind: Arc<DelegateType>, data: &ViewData) -> Result<Self> {
        let schema = kind.schema();

        let mut records = IndexMap::new();
        for slot in schema.record_slots() {
            if let Some(input) = data
                .get(slot.name())
                .filter(|input| !matches!(input, FieldInput::Value(JsonValue::Null)))
            {
                let value = project_slot(kind.name(), slot, input)?;
                records.insert(slot.name().to_string(), value);
            }
        }

        let mut properties = IndexMap::new();
        for property in schema.properties() {
            match data.get(property.name()) {
                Some(FieldInput::Value(value)) => {
                    properties.insert(property.name().to_string(), value.clone());
                }
                Some(other) => {
                    return Err(DelegateError::construction(
                        VD0006,
                        kind.name(),
                        format!(
                            "property '{}' expects a value, got a {}",
                            property.name(),
                            other.kind()
                        ),
                    ));
                }
                None if property.is_required() => {
                    return Err(DelegateError::construction(
                        VD0007,
                        kind.name(),
                        format!("required property '{}' is missing", property.name()),
                    ));
                }
                None => {}
            }
        }

        for key in data.keys().filter(|key| !schema.declares_field(key)) {
            log::trace!("{}: ignoring undeclared input '{}'", kind.name(), key);
        }

        Ok(Self {
            inner: Arc::new(DelegateInner {
                id: DelegateId::next(),
                kind,
                properties,
                records,
            }),
        })
    }

    /// Get the instance id
    pub fn id(&self) -> DelegateId {
        self.inner.id
    }

    /// Get the delegate type
    pub fn kind(&self) -> &Arc<DelegateType> {
        &self.inner.kind
    }

    /// Get the delegate type name
    pub fn type_name(&self) -> &str {
        self.inner.kind.name()
    }

    /// Value of a set property
    pub fn property(&self, name: &str) -> Option<&JsonValue> {
        self.inner.properties.get(name)
    }

    /// Convenience string view of a set property
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(JsonValue::as_str)
    }

    /// Projection held by a set record slot
    pub fn record(&self, name: &str) -> Option<&RecordValue> {
        self.inner.records.get(name)
    }

    /// Whether a property or record slot was present in the construction input
    pub fn is_set(&self, name: &str) -> bool {
        self.inner.properties.contains_key(name) || self.inner.records.contains_key(name)
    }

    /// Set properties in schema order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.inner.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set record slots in schema order
    pub fn records(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.inner.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read the accessor `name` the way a computed local does
    ///
    /// A defined method wins over the implicit reader of a property or record
    /// slot of the same name. Reading an unset field yields `None`.
    pub fn read(&self, name: &str) -> Result<Option<Local>> {
        let schema = self.inner.kind.schema();
        if let Some(method) = schema.method(name) {
            return method(self).map(|value| Some(Local::Value(value)));
        }
        if schema.property(name).is_some() {
            return Ok(self.property(name).cloned().map(Local::Value));
        }
        if schema.record_slot(name).is_some() {
            return Ok(self.record(name).map(RecordValue::to_local));
        }
        Err(DelegateError::unknown_accessor(self.type_name(), name))
    }

    /// Call a defined method by name
    pub fn call(&self, name: &str) -> Result<JsonValue> {
        let method = self
            .inner
            .kind
            .schema()
            .method(name)
            .ok_or_else(|| DelegateError::unknown_accessor(self.type_name(), name))?;
        method(self)
    }

    /// Call a helper by name
    pub fn helper(&self, name: &str, args: &[JsonValue]) -> Result<JsonValue> {
        let helper = self
            .inner
            .kind
            .schema()
            .helper(name)
            .ok_or_else(|| DelegateError::unknown_helper(self.type_name(), name))?;
        helper(self, args)
    }

    /// Facade exposing this delegate's helpers to templates
    pub fn helpers_facade(&self) -> HelperFacade {
        HelperFacade::bind(self)
    }

    /// Locals a render of this delegate would receive
    pub fn locals(&self, params: &Params) -> Result<Locals> {
        render::build_locals(self, params)
    }

    /// Render `view` and return the text
    pub fn render(
        &self,
        renderer: &dyn TemplateRenderer,
        view: &str,
        params: &Params,
    ) -> Result<String> {
        render::render(self, renderer, view, params)
    }

    /// Render `view` and hand the text to `continuation`
    pub fn render_with<R>(
        &self,
        renderer: &dyn TemplateRenderer,
        view: &str,
        params: &Params,
        continuation: impl FnOnce(String) -> R,
    ) -> Result<R> {
        render::render_with(self, renderer, view, params, continuation)
    }
}

impl PartialEq for Delegate {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Delegate {}

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("id", &self.inner.id)
            .field("type", &self.inner.kind.name())
            .field("properties", &self.inner.properties)
            .field("records", &self.inner.records)
            .finish()
    }
}

fn project_slot(type_name: &str, slot: &RecordSlot, input: &FieldInput) -> Result<RecordValue> {
    let wrong_kind = || {
        DelegateError::construction(
            VD0006,
            type_name,
            format!(
                "record slot '{}' cannot be filled from a {}",
                slot.name(),
                input.kind()
            ),
        )
    };

    match (slot.cardinality(), input) {
        (Cardinality::One, FieldInput::Record(record)) => {
            Ok(RecordValue::One(project(record.as_ref(), slot.fields())?))
        }
        (Cardinality::One, FieldInput::Value(value)) => {
            let record = JsonRecord::from_json(slot.name(), value).ok_or_else(wrong_kind)?;
            Ok(RecordValue::One(project(&record, slot.fields())?))
        }
        (Cardinality::Many, FieldInput::Records(records)) => Ok(RecordValue::Many(project_all(
            records,
            slot.fields(),
            type_name,
            slot.name(),
        )?)),
        (Cardinality::Many, FieldInput::Value(JsonValue::Array(items))) => {
            let records = items
                .iter()
                .map(|item| {
                    JsonRecord::from_json(slot.name(), item)
                        .map(|record| Arc::new(record) as Arc<dyn BackendRecord>)
                        .ok_or_else(wrong_kind)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(RecordValue::Many(project_all(
                &records,
                slot.fields(),
                type_name,
                slot.name(),
            )?))
        }
        _ => Err(wrong_kind()),
    }
}
