//! Rendering delegates through a host template engine

pub mod pipeline;

pub use pipeline::{build_locals, render, render_with};

use crate::model::Locals;

/// Host template engine
///
/// Receives the template path (`view_path/view`) and the assembled locals.
/// Errors are passed through to the caller unchanged, wrapped in a render
/// error that keeps them as its source.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, locals: &Locals) -> anyhow::Result<String>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, &Locals) -> anyhow::Result<String> + Send + Sync,
{
    fn render(&self, template: &str, locals: &Locals) -> anyhow::Result<String> {
        self(template, locals)
    }
}
