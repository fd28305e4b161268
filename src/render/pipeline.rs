//! Locals assembly and the cached render path

use super::TemplateRenderer;
use crate::cache::RenderCacheKey;
use crate::core::{DelegateError, Result};
use crate::delegate::Delegate;
use crate::model::{Local, Locals, Params};

/// Assemble the locals a render of `delegate` receives
///
/// Later stages replace earlier ones on a name clash: computed locals, then
/// set properties, then set record slots, then `params`. The helpers facade is
/// inserted last under the type's helpers name.
pub fn build_locals(delegate: &Delegate, params: &Params) -> Result<Locals> {
    let kind = delegate.kind();
    let mut locals = Locals::new();

    for name in kind.schema().locals() {
        if let Some(local) = delegate.read(name)? {
            locals.insert(name, local);
        }
    }

    for (name, value) in delegate.properties() {
        locals.insert(name, Local::Value(value.clone()));
    }

    for (name, record) in delegate.records() {
        locals.insert(name, record.to_local());
    }

    locals.merge_params(params);

    locals.insert(
        kind.helpers_name(),
        Local::Helpers(delegate.helpers_facade()),
    );

    Ok(locals)
}

/// Render `view` of `delegate`, consulting the type's cache when it has one
pub fn render(
    delegate: &Delegate,
    renderer: &dyn TemplateRenderer,
    view: &str,
    params: &Params,
) -> Result<String> {
    render_with(delegate, renderer, view, params, |text| text)
}

/// Render `view` of `delegate` and pass the text to `continuation`
///
/// A cached text takes the same route as a fresh one, so the continuation
/// runs on every successful call.
pub fn render_with<R>(
    delegate: &Delegate,
    renderer: &dyn TemplateRenderer,
    view: &str,
    params: &Params,
    continuation: impl FnOnce(String) -> R,
) -> Result<R> {
    let kind = delegate.kind();

    let Some(cache) = kind.cache() else {
        return render_uncached(delegate, renderer, view, params).map(continuation);
    };

    let key = RenderCacheKey::for_render(delegate, view, params);
    if let Some(text) = cache.get(&key) {
        return Ok(continuation(text));
    }

    let text = render_uncached(delegate, renderer, view, params)?;
    cache.put(key, text.clone());
    Ok(continuation(text))
}

fn render_uncached(
    delegate: &Delegate,
    renderer: &dyn TemplateRenderer,
    view: &str,
    params: &Params,
) -> Result<String> {
    let template = delegate.kind().template_path(view);
    let locals = build_locals(delegate, params)?;
    log::trace!(
        "rendering {} for {} with {} locals",
        template,
        delegate.id(),
        locals.len()
    );
    renderer
        .render(&template, &locals)
        .map_err(|source| DelegateError::render(template, source))
}
