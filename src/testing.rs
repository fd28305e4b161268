//! Test helpers for rendering delegates.
//!
//! [`RecordingRenderer`] stands in for a template engine: it renders every
//! template as `template|locals-json` and remembers each call, so tests can
//! count renderer invocations and inspect the locals a template received.
//!
//! # Example
//!
//! ```rust
//! use view_delegates::model::{Params, ViewData};
//! use view_delegates::registry::{DelegateRegistry, SchemaBuilder};
//! use view_delegates::testing::RecordingRenderer;
//!
//! let mut registry = DelegateRegistry::new();
//! registry
//!     .register_builder(SchemaBuilder::new("NoteDelegate").property("text"))
//!     .unwrap();
//!
//! let note = registry
//!     .construct("NoteDelegate", &ViewData::new().value("text", "hi"))
//!     .unwrap();
//! let renderer = RecordingRenderer::new();
//! let out = note.render(&renderer, "show", &Params::new()).unwrap();
//!
//! assert_eq!(out, r#"note/show|{"text":"hi"}"#);
//! assert_eq!(renderer.call_count(), 1);
//! ```

use parking_lot::Mutex;
use serde_json::Value as JsonValue;

use crate::model::Locals;
use crate::render::TemplateRenderer;

/// One recorded renderer invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    /// Template path, `view_path/view`
    pub template: String,
    /// JSON form of the data locals
    pub locals: JsonValue,
    /// Every local name in insertion order, the helpers facade included
    pub local_names: Vec<String>,
}

/// Renderer that records its calls
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
    failure: Option<String>,
}

impl RecordingRenderer {
    /// Create a renderer that succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Get number of render calls
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Get the most recent call
    pub fn last_call(&self) -> Option<RenderCall> {
        self.calls.lock().last().cloned()
    }
}

impl TemplateRenderer for RecordingRenderer {
    fn render(&self, template: &str, locals: &Locals) -> anyhow::Result<String> {
        let call = RenderCall {
            template: template.to_string(),
            locals: locals.to_json(),
            local_names: locals.keys().map(str::to_string).collect(),
        };
        let output = format!("{}|{}", call.template, call.locals);
        self.calls.lock().push(call);

        match &self.failure {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(output),
        }
    }
}
