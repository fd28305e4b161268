//! View engine - the main entry point for constructing and rendering delegates

use std::fmt;
use std::sync::Arc;

use crate::core::Result;
use crate::delegate::Delegate;
use crate::model::{Params, ViewData};
use crate::registry::{DelegateRegistry, Resolution};
use crate::render::TemplateRenderer;

/// A frozen registry paired with the host template renderer
///
/// Cloning is cheap; clones share the registry, the renderer and every type's
/// render cache.
#[derive(Clone)]
pub struct ViewEngine {
    registry: Arc<DelegateRegistry>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl ViewEngine {
    /// Create an engine that owns its registry and renderer
    pub fn new(registry: DelegateRegistry, renderer: impl TemplateRenderer + 'static) -> Self {
        Self::from_shared(Arc::new(registry), Arc::new(renderer))
    }

    /// Create an engine from shared parts
    pub fn from_shared(
        registry: Arc<DelegateRegistry>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self { registry, renderer }
    }

    /// Get the registry
    pub fn registry(&self) -> &DelegateRegistry {
        &self.registry
    }

    /// Construct a delegate of `type_name`, following its variant selector
    pub fn construct(&self, type_name: &str, data: &ViewData) -> Result<Delegate> {
        self.registry.construct(type_name, data)
    }

    /// Construct and report the resolution path
    pub fn resolve(&self, type_name: &str, data: &ViewData) -> Result<Resolution> {
        self.registry.resolve(type_name, data)
    }

    /// Render `view` of `delegate`
    pub fn render(&self, delegate: &Delegate, view: &str, params: &Params) -> Result<String> {
        delegate.render(self.renderer.as_ref(), view, params)
    }

    /// Render `view` of `delegate` and hand the text to `continuation`
    pub fn render_with<R>(
        &self,
        delegate: &Delegate,
        view: &str,
        params: &Params,
        continuation: impl FnOnce(String) -> R,
    ) -> Result<R> {
        delegate.render_with(self.renderer.as_ref(), view, params, continuation)
    }
}

impl fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEngine")
            .field("types", &self.registry.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
