//! Helpers facade injected into template locals

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use super::Delegate;
use crate::core::{DelegateError, Result};

type BoundHelper = Arc<dyn Fn(&[JsonValue]) -> Result<JsonValue> + Send + Sync>;

/// One callable per declared helper, each bound to the delegate the facade
/// was built from
#[derive(Clone)]
pub struct HelperFacade {
    name: String,
    type_name: String,
    helpers: IndexMap<String, BoundHelper>,
}

impl HelperFacade {
    pub(crate) fn bind(delegate: &Delegate) -> Self {
        let kind = delegate.kind();
        let helpers = kind
            .schema()
            .helpers()
            .map(|(name, helper)| {
                let owner = delegate.clone();
                let helper = Arc::clone(helper);
                let bound: BoundHelper = Arc::new(move |args: &[JsonValue]| helper(&owner, args));
                (name.to_string(), bound)
            })
            .collect();

        Self {
            name: kind.helpers_struct_name().to_string(),
            type_name: kind.name().to_string(),
            helpers,
        }
    }

    /// Facade name, e.g. `UserHelper`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Helper names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    /// Check whether a helper is bound
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Get number of bound helpers
    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Forward `args` to the helper `name` of the bound delegate
    pub fn call(&self, name: &str, args: &[JsonValue]) -> Result<JsonValue> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| DelegateError::unknown_helper(&self.type_name, name))?;
        helper(args)
    }
}

impl fmt::Debug for HelperFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(&self.name)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ViewData;
    use crate::registry::SchemaBuilder;
    use serde_json::json;

    #[test]
    fn test_facade_forwards_to_bound_delegate() {
        let kind = Arc::new(
            SchemaBuilder::new("ArticleDelegate")
                .property("title")
                .helper("shout", |d, args| {
                    let suffix = args.first().and_then(JsonValue::as_str).unwrap_or("");
                    let title = d.property_str("title").unwrap_or_default();
                    Ok(json!(format!("{}{}", title.to_uppercase(), suffix)))
                })
                .helper("count", |_, args| Ok(json!(args.len())))
                .build()
                .unwrap(),
        );
        let delegate =
            Delegate::assign(kind, &ViewData::new().value("title", "news")).unwrap();

        let facade = delegate.helpers_facade();
        assert_eq!(facade.name(), "ArticleHelper");
        assert_eq!(facade.names().collect::<Vec<_>>(), vec!["shout", "count"]);
        assert_eq!(facade.call("shout", &[json!("!")]).unwrap(), json!("NEWS!"));
        assert_eq!(facade.call("count", &[json!(1), json!(2)]).unwrap(), json!(2));
        assert_eq!(
            facade.call("whisper", &[]).unwrap_err().to_string(),
            "VD0102: ArticleDelegate has no helper named 'whisper'"
        );
    }
}
