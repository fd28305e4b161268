//! Type descriptor of a delegate: its name, derived names, schema and cache

use std::fmt;

use super::builder::SchemaBuilder;
use super::naming;
use super::schema::DelegateSchema;
use crate::cache::RenderCache;

/// An immutable delegate type
///
/// Each type owns its render cache when caching is enabled in its schema.
/// Types that inherit a cache configuration still get their own store.
pub struct DelegateType {
    name: String,
    parent: Option<String>,
    view_path: String,
    helpers_name: String,
    helpers_struct_name: String,
    schema: DelegateSchema,
    cache: Option<RenderCache>,
}

impl DelegateType {
    pub(crate) fn new(name: String, parent: Option<String>, schema: DelegateSchema) -> Self {
        let cache = schema
            .cache_config()
            .filter(|config| config.enabled)
            .map(|config| RenderCache::new(config.clone()));

        Self {
            view_path: naming::view_path(&name),
            helpers_name: naming::helpers_name(&name),
            helpers_struct_name: naming::helpers_struct_name(&name),
            name,
            parent,
            schema,
            cache,
        }
    }

    /// Start declaring a new type
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Get the type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the type this one was extended from
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Template directory, e.g. `admin/user` for `Admin::UserDelegate`
    pub fn view_path(&self) -> &str {
        &self.view_path
    }

    /// Template path for `view`
    pub fn template_path(&self, view: &str) -> String {
        format!("{}/{}", self.view_path, view)
    }

    /// Locals key of the helpers facade, e.g. `user_helper`
    pub fn helpers_name(&self) -> &str {
        &self.helpers_name
    }

    /// Display name of the helpers facade, e.g. `UserHelper`
    pub fn helpers_struct_name(&self) -> &str {
        &self.helpers_struct_name
    }

    /// Get the merged schema
    pub fn schema(&self) -> &DelegateSchema {
        &self.schema
    }

    /// The render cache of this type, when caching is enabled
    pub fn cache(&self) -> Option<&RenderCache> {
        self.cache.as_ref()
    }
}

impl fmt::Debug for DelegateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateType")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("view_path", &self.view_path)
            .field("helpers_name", &self.helpers_name)
            .field("schema", &self.schema)
            .field("cache", &self.cache.as_ref().map(RenderCache::len))
            .finish()
    }
}
