//! Delegate type registry
//!
//! Types are declared with a [`SchemaBuilder`] and registered once at start-up.
//! The registry is the closed set of types variant selectors may name; it is
//! read-only once rendering starts and can be shared behind an `Arc`.

pub mod builder;
pub mod delegate_type;
pub mod naming;
pub mod resolver;
pub mod schema;

pub use builder::SchemaBuilder;
pub use delegate_type::DelegateType;
pub use resolver::Resolution;
pub use schema::{
    Accessor, Cardinality, DelegateSchema, HelperFn, Property, RecordSlot, VariantSelector,
};

use indexmap::IndexMap;
use std::sync::Arc;

use crate::config::DelegateConfig;
use crate::core::{DelegateError, Result, VD0152, VD0153};
use crate::delegate::Delegate;
use crate::model::ViewData;

/// Registry of delegate types by name
#[derive(Debug, Default)]
pub struct DelegateRegistry {
    types: IndexMap<String, Arc<DelegateType>>,
    config: DelegateConfig,
}

impl DelegateRegistry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with custom configuration
    pub fn with_config(config: DelegateConfig) -> Self {
        Self {
            types: IndexMap::new(),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &DelegateConfig {
        &self.config
    }

    /// Start declaring a type with this registry's cache defaults
    pub fn define(&self, name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name).with_cache_defaults(self.config.cache_config())
    }

    /// Start declaring a type that extends the registered type `parent`
    pub fn define_extending(
        &self,
        name: impl Into<String>,
        parent: &str,
    ) -> Result<SchemaBuilder> {
        let name = name.into();
        let parent_type = self.get(parent).ok_or_else(|| {
            DelegateError::definition(
                VD0153,
                &name,
                format!("parent type '{parent}' is not registered"),
            )
        })?;
        Ok(self.define(name).extend(&parent_type))
    }

    /// Register a built type; names must be unique
    pub fn register(&mut self, delegate_type: DelegateType) -> Result<Arc<DelegateType>> {
        if self.types.contains_key(delegate_type.name()) {
            return Err(DelegateError::definition(
                VD0152,
                delegate_type.name(),
                "a type with this name is already registered",
            ));
        }
        let delegate_type = Arc::new(delegate_type);
        self.types
            .insert(delegate_type.name().to_string(), Arc::clone(&delegate_type));
        Ok(delegate_type)
    }

    /// Build and register in one step
    pub fn register_builder(&mut self, builder: SchemaBuilder) -> Result<Arc<DelegateType>> {
        self.register(builder.build()?)
    }

    /// Look up a type by name
    pub fn get(&self, name: &str) -> Option<Arc<DelegateType>> {
        self.types.get(name).cloned()
    }

    /// Check whether a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Get number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Construct a delegate of `type_name`, or of the variant its selector picks
    pub fn construct(&self, type_name: &str, data: &ViewData) -> Result<Delegate> {
        self.resolve(type_name, data)
            .map(|resolution| resolution.delegate)
    }

    /// Like [`DelegateRegistry::construct`], also reporting the resolution path
    pub fn resolve(&self, type_name: &str, data: &ViewData) -> Result<Resolution> {
        resolver::resolve(self, type_name, data)
    }
}
