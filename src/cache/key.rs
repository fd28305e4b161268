//! Render cache keys
//!
//! A key identifies one render: which delegate instance, with which explicit
//! parameters, of which view. The parts are kept as separate fields so that no
//! two different combinations can ever produce the same key.

use rustc_hash::FxHasher;
use serde_json::Value as JsonValue;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::delegate::{Delegate, DelegateId};
use crate::model::Params;

/// Structured, versioned render cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderCacheKey {
    version: u16,
    type_name: String,
    instance: DelegateId,
    params_digest: u64,
    view: String,
}

impl RenderCacheKey {
    /// Layout version; bump when the key derivation changes
    pub const VERSION: u16 = 1;

    /// Create a key for one render of an instance
    pub fn new(
        type_name: impl Into<String>,
        instance: DelegateId,
        params: &Params,
        view: impl Into<String>,
    ) -> Self {
        Self {
            version: Self::VERSION,
            type_name: type_name.into(),
            instance,
            params_digest: params_digest(params),
            view: view.into(),
        }
    }

    /// Key of rendering `view` of `delegate` with `params`
    pub fn for_render(delegate: &Delegate, view: &str, params: &Params) -> Self {
        Self::new(delegate.type_name(), delegate.id(), params, view)
    }

    /// Instance the entry belongs to
    pub fn instance(&self) -> DelegateId {
        self.instance
    }

    /// View name
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Digest of the render params
    pub fn params_digest(&self) -> u64 {
        self.params_digest
    }
}

impl fmt::Display for RenderCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{}:{}{}:{:016x}:{}",
            self.version, self.type_name, self.instance, self.params_digest, self.view
        )
    }
}

/// Content digest of render parameters
///
/// Object members are hashed in key order, so two maps with the same entries
/// digest equally whatever order they were built in.
pub fn params_digest(params: &Params) -> u64 {
    let mut hasher = FxHasher::default();
    let mut entries: Vec<_> = params.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.len().hash(&mut hasher);
    for (name, value) in entries {
        name.hash(&mut hasher);
        hash_json(value, &mut hasher);
    }
    hasher.finish()
}

fn hash_json<H: Hasher>(value: &JsonValue, state: &mut H) {
    match value {
        JsonValue::Null => 0u8.hash(state),
        JsonValue::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        JsonValue::Number(n) => {
            2u8.hash(state);
            n.to_string().hash(state);
        }
        JsonValue::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        JsonValue::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_json(item, state);
            }
        }
        JsonValue::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut members: Vec<_> = map.iter().collect();
            members.sort_by(|a, b| a.0.cmp(b.0));
            for (name, member) in members {
                name.hash(state);
                hash_json(member, state);
            }
        }
    }
}
