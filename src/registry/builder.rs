//! Builder used once per delegate type to declare its schema
//!
//! ```rust,ignore
//! let user = SchemaBuilder::new("UserDelegate")
//!     .view_local("full_name", |d| { /* ... */ })
//!     .model("user", ["id", "email"])
//!     .property("title")
//!     .helper("initials", |d, args| { /* ... */ })
//!     .cache(true)
//!     .build()?;
//! ```

use serde_json::Value as JsonValue;
use std::sync::Arc;

use super::delegate_type::DelegateType;
use super::schema::{Cardinality, DelegateSchema, RecordSlot};
use crate::cache::CacheConfig;
use crate::core::{DelegateError, Result, VD0151};
use crate::delegate::Delegate;

/// Declarative registration of a delegate type's schema
#[derive(Debug)]
pub struct SchemaBuilder {
    type_name: String,
    parent: Option<String>,
    schema: DelegateSchema,
    cache_defaults: CacheConfig,
}

impl SchemaBuilder {
    /// Start a schema for `type_name` with no ancestor
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parent: None,
            schema: DelegateSchema::new(),
            cache_defaults: CacheConfig::default(),
        }
    }

    /// Cache settings used by [`SchemaBuilder::cache`]
    pub fn with_cache_defaults(mut self, defaults: CacheConfig) -> Self {
        self.cache_defaults = defaults;
        self
    }

    /// Inherit every declaration of `parent`
    ///
    /// The parent's declarations come first; anything already declared on
    /// this builder is layered on top.
    pub fn extend(mut self, parent: &DelegateType) -> Self {
        let mut schema = parent.schema().clone();
        schema.merge(&self.schema);
        self.schema = schema;
        self.parent = Some(parent.name().to_string());
        self
    }

    /// Declare computed locals backed by methods, properties or record slots
    pub fn view_locals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.schema.add_local(name.into());
        }
        self
    }

    /// Define a method and declare it as a computed local
    pub fn view_local<F>(self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Delegate) -> Result<JsonValue> + Send + Sync + 'static,
    {
        let name = name.into();
        self.method(name.clone(), accessor).view_locals([name])
    }

    /// Define (or override) a method without exposing it as a local
    pub fn method<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Delegate) -> Result<JsonValue> + Send + Sync + 'static,
    {
        self.schema.set_method(name.into(), Arc::new(accessor));
        self
    }

    /// Define (or override) a helper exposed through the helpers facade
    pub fn helper<F>(mut self, name: impl Into<String>, helper: F) -> Self
    where
        F: Fn(&Delegate, &[JsonValue]) -> Result<JsonValue> + Send + Sync + 'static,
    {
        self.schema.set_helper(name.into(), Arc::new(helper));
        self
    }

    /// Declare an optional value property
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.schema.add_property(name.into(), false);
        self
    }

    /// Declare several optional value properties
    pub fn properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.schema.add_property(name.into(), false);
        }
        self
    }

    /// Declare a value property that must be present in the construction input
    pub fn required_property(mut self, name: impl Into<String>) -> Self {
        self.schema.add_property(name.into(), true);
        self
    }

    /// Declare a single-record slot; an empty field list exposes every attribute
    pub fn model<I, S>(self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record_slot(RecordSlot::new(name, fields, Cardinality::One))
    }

    /// Declare a record-sequence slot; an empty field list takes the shape of
    /// the first record
    pub fn model_array<I, S>(self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record_slot(RecordSlot::new(name, fields, Cardinality::Many))
    }

    fn record_slot(mut self, slot: RecordSlot) -> Self {
        if let Some(existing) = self.schema.record_slot(slot.name()) {
            if existing != &slot {
                log::warn!(
                    "{}: record slot '{}' is already declared, keeping {:?}",
                    self.type_name,
                    slot.name(),
                    existing
                );
            }
        }
        self.schema.add_record_slot(slot);
        self
    }

    /// Register the variant selector; it returns the name of the type the
    /// provisional delegate should become (its own name to keep it)
    pub fn polymorph<F>(mut self, selector: F) -> Self
    where
        F: Fn(&Delegate) -> Result<String> + Send + Sync + 'static,
    {
        self.schema.set_variant_selector(Arc::new(selector));
        self
    }

    /// Turn render caching on or off using the builder's default settings
    pub fn cache(self, enabled: bool) -> Self {
        let config = CacheConfig {
            enabled,
            ..self.cache_defaults.clone()
        };
        self.cache_with(config)
    }

    /// Turn render caching on with an explicit maximum size
    pub fn cache_sized(self, max_size: usize) -> Self {
        let config = CacheConfig {
            enabled: true,
            max_size,
            ..self.cache_defaults.clone()
        };
        self.cache_with(config)
    }

    /// Use an explicit cache configuration
    pub fn cache_with(mut self, config: CacheConfig) -> Self {
        self.schema.set_cache(config);
        self
    }

    /// Validate the schema and produce the immutable type
    pub fn build(self) -> Result<DelegateType> {
        self.validate()?;
        Ok(DelegateType::new(self.type_name, self.parent, self.schema))
    }

    fn validate(&self) -> Result<()> {
        let invalid =
            |message: String| Err(DelegateError::definition(VD0151, &self.type_name, message));

        if self.type_name.trim().is_empty() {
            return invalid("type name must not be empty".to_string());
        }

        for local in self.schema.locals() {
            if !self.schema.has_accessor(local) {
                return invalid(format!(
                    "local '{local}' has no method, property or record slot to read from"
                ));
            }
        }

        for slot in self.schema.record_slots() {
            if self.schema.property(slot.name()).is_some() {
                return invalid(format!(
                    "'{}' is declared both as a property and as a record slot",
                    slot.name()
                ));
            }
        }

        if let Some(cache) = self.schema.cache_config() {
            cache
                .validate()
                .map_err(|message| DelegateError::definition(VD0151, &self.type_name, message))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_collects_declarations() {
        let kind = SchemaBuilder::new("UserDelegate")
            .view_local("full_name", |_| Ok(json!("Ada Lovelace")))
            .model("user", ["id", "email"])
            .model_array("posts", Vec::<String>::new())
            .properties(["title", "subtitle"])
            .helper("shout", |_, args| Ok(json!(args.len())))
            .build()
            .unwrap();

        let schema = kind.schema();
        assert_eq!(schema.locals().collect::<Vec<_>>(), vec!["full_name"]);
        assert_eq!(
            schema.record_slots().map(RecordSlot::name).collect::<Vec<_>>(),
            vec!["user", "posts"]
        );
        assert_eq!(schema.record_slot("posts").unwrap().cardinality(), Cardinality::Many);
        assert_eq!(schema.properties().count(), 2);
        assert_eq!(schema.helper_names().collect::<Vec<_>>(), vec!["shout"]);
        assert!(kind.cache().is_none());
    }

    #[test]
    fn test_local_without_accessor_is_rejected() {
        let err = SchemaBuilder::new("BrokenDelegate")
            .view_locals(["nothing"])
            .build()
            .unwrap_err();
        assert!(matches!(err, DelegateError::DefinitionError { .. }));
    }

    #[test]
    fn test_local_may_read_a_property() {
        let kind = SchemaBuilder::new("PageDelegate")
            .property("title")
            .view_locals(["title"])
            .build();
        assert!(kind.is_ok());
    }

    #[test]
    fn test_property_and_slot_name_clash() {
        let err = SchemaBuilder::new("ClashDelegate")
            .property("user")
            .model("user", ["id"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("both as a property and as a record slot"));
    }

    #[test]
    fn test_zero_sized_cache_is_rejected() {
        let err = SchemaBuilder::new("CachedDelegate")
            .cache_sized(0)
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), &VD0151);
    }

    #[test]
    fn test_cache_uses_defaults() {
        let kind = SchemaBuilder::new("CachedDelegate")
            .with_cache_defaults(CacheConfig::new(true, 7))
            .cache(true)
            .build()
            .unwrap();
        assert_eq!(kind.cache().map(|c| c.capacity()), Some(7));
    }

    #[test]
    fn test_disabled_cache_builds_no_store() {
        let kind = SchemaBuilder::new("PlainDelegate").cache(false).build().unwrap();
        assert!(kind.cache().is_none());
        assert!(kind.schema().cache_config().is_some());
    }

    #[test]
    fn test_extend_is_additive() {
        let parent = SchemaBuilder::new("BaseDelegate")
            .property("title")
            .model("user", ["id"])
            .view_local("kind", |_| Ok(json!("base")))
            .build()
            .unwrap();

        let child = SchemaBuilder::new("AdminDelegate")
            .extend(&parent)
            .property("permissions")
            .view_local("kind", |_| Ok(json!("admin")))
            .build()
            .unwrap();

        let schema = child.schema();
        assert_eq!(child.parent(), Some("BaseDelegate"));
        assert_eq!(
            schema.properties().map(|p| p.name()).collect::<Vec<_>>(),
            vec!["title", "permissions"]
        );
        assert!(schema.record_slot("user").is_some());
        assert_eq!(schema.locals().collect::<Vec<_>>(), vec!["kind"]);
        // the parent is untouched
        assert!(parent.schema().property("permissions").is_none());
    }
}
