//! Declarative delegate schema
//!
//! A schema lists, in declaration order, the computed locals, record slots,
//! value properties and helpers of a delegate type, together with the bodies
//! of its methods and helpers, an optional variant selector and an optional
//! cache configuration. Schemas are immutable once their type is built.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use crate::cache::CacheConfig;
use crate::core::Result;
use crate::delegate::Delegate;

/// Body of a computed local or other named accessor
pub type Accessor = Arc<dyn Fn(&Delegate) -> Result<JsonValue> + Send + Sync>;

/// Body of a helper exposed to templates
pub type HelperFn = Arc<dyn Fn(&Delegate, &[JsonValue]) -> Result<JsonValue> + Send + Sync>;

/// Picks the concrete type (by name) a provisional delegate should become
pub type VariantSelector = Arc<dyn Fn(&Delegate) -> Result<String> + Send + Sync>;

/// Whether a record slot holds one record or a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// A slot filled by projecting backend records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSlot {
    name: String,
    fields: Vec<String>,
    cardinality: Cardinality,
}

impl RecordSlot {
    /// Create a record slot
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            cardinality,
        }
    }

    /// Slot name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allow-list; empty means every attribute of the source record
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the slot holds one record or a sequence
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

/// A plain value field set from construction input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    required: bool,
}

impl Property {
    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construction fails when a required property is absent
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Schema of one delegate type, already merged with its ancestors
#[derive(Clone, Default)]
pub struct DelegateSchema {
    locals: IndexSet<String>,
    record_slots: IndexMap<String, RecordSlot>,
    properties: IndexMap<String, Property>,
    helpers: IndexMap<String, HelperFn>,
    methods: IndexMap<String, Accessor>,
    variant_selector: Option<VariantSelector>,
    cache: Option<CacheConfig>,
}

impl DelegateSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared computed locals in order
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.locals.iter().map(String::as_str)
    }

    /// Record slots in declaration order
    pub fn record_slots(&self) -> impl Iterator<Item = &RecordSlot> {
        self.record_slots.values()
    }

    /// Look up a record slot
    pub fn record_slot(&self, name: &str) -> Option<&RecordSlot> {
        self.record_slots.get(name)
    }

    /// Properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// Look up a property
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Helper names in declaration order
    pub fn helper_names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    /// Look up a helper
    pub fn helper(&self, name: &str) -> Option<&HelperFn> {
        self.helpers.get(name)
    }

    pub(crate) fn helpers(&self) -> impl Iterator<Item = (&str, &HelperFn)> {
        self.helpers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a method
    pub fn method(&self, name: &str) -> Option<&Accessor> {
        self.methods.get(name)
    }

    /// Variant selector, if declared
    pub fn variant_selector(&self) -> Option<&VariantSelector> {
        self.variant_selector.as_ref()
    }

    /// Cache configuration, if caching is enabled
    pub fn cache_config(&self) -> Option<&CacheConfig> {
        self.cache.as_ref()
    }

    /// Whether `name` is declared as a property or a record slot
    pub fn declares_field(&self, name: &str) -> bool {
        self.properties.contains_key(name) || self.record_slots.contains_key(name)
    }

    /// Whether `name` can be read as a computed local
    pub fn has_accessor(&self, name: &str) -> bool {
        self.methods.contains_key(name) || self.declares_field(name)
    }

    /// Declare a computed local; returns false when already declared
    pub(crate) fn add_local(&mut self, name: String) -> bool {
        self.locals.insert(name)
    }

    /// Declare a record slot; an existing slot of the same name is kept
    pub(crate) fn add_record_slot(&mut self, slot: RecordSlot) -> bool {
        if self.record_slots.contains_key(slot.name()) {
            return false;
        }
        self.record_slots.insert(slot.name.clone(), slot);
        true
    }

    /// Declare a property; re-declaring may only tighten it to required
    pub(crate) fn add_property(&mut self, name: String, required: bool) -> bool {
        match self.properties.get_mut(&name) {
            Some(existing) => {
                existing.required |= required;
                false
            }
            None => {
                self.properties
                    .insert(name.clone(), Property { name, required });
                true
            }
        }
    }

    /// Define or override a helper body; the name keeps its first position
    pub(crate) fn set_helper(&mut self, name: String, helper: HelperFn) {
        self.helpers.insert(name, helper);
    }

    /// Define or override a method body
    pub(crate) fn set_method(&mut self, name: String, accessor: Accessor) {
        self.methods.insert(name, accessor);
    }

    pub(crate) fn set_variant_selector(&mut self, selector: VariantSelector) {
        self.variant_selector = Some(selector);
    }

    pub(crate) fn set_cache(&mut self, config: CacheConfig) {
        self.cache = Some(config);
    }

    /// Layer `other` on top of `self`
    ///
    /// Declarations are unioned with `self`'s entries first. Method and helper
    /// bodies, the selector and the cache configuration of `other` win.
    pub(crate) fn merge(&mut self, other: &DelegateSchema) {
        for local in &other.locals {
            self.locals.insert(local.clone());
        }
        for slot in other.record_slots.values() {
            self.add_record_slot(slot.clone());
        }
        for property in other.properties.values() {
            self.add_property(property.name.clone(), property.required);
        }
        for (name, helper) in &other.helpers {
            self.helpers.insert(name.clone(), Arc::clone(helper));
        }
        for (name, method) in &other.methods {
            self.methods.insert(name.clone(), Arc::clone(method));
        }
        if let Some(selector) = &other.variant_selector {
            self.variant_selector = Some(Arc::clone(selector));
        }
        if let Some(cache) = &other.cache {
            self.cache = Some(cache.clone());
        }
    }
}

impl fmt::Debug for DelegateSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateSchema")
            .field("locals", &self.locals)
            .field("record_slots", &self.record_slots.values().collect::<Vec<_>>())
            .field("properties", &self.properties.values().collect::<Vec<_>>())
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("variant_selector", &self.variant_selector.is_some())
            .field("cache", &self.cache)
            .finish()
    }
}
