//! Seams to the template engine: what a template is, how one is found.

use std::fmt;
use std::sync::Arc;

use strata_core::{LayoutName, SlotMap};

use crate::context::RenderContext;
use crate::error::RenderError;

/// Values a template sees through `yield` while it renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    /// Returned by an unqualified yield.
    pub primary: String,
    /// Lookup table for named yields.
    pub slots: SlotMap,
}

impl Bindings {
    pub fn new(primary: impl Into<String>, slots: SlotMap) -> Self {
        Bindings {
            primary: primary.into(),
            slots,
        }
    }
}

/// A resolved, renderable template.
///
/// Rendering writes to the context's active output. The template reads its
/// [`Bindings`] through [`RenderContext::yield_content`] and
/// [`RenderContext::yield_slot`], and may wrap itself in a further layout with
/// [`RenderContext::inside_layout`].
pub trait Template: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError>;
}

/// Finds templates by name.
pub trait TemplateResolver: Send + Sync {
    /// Look up a template by its full name, with no namespace applied.
    fn resolve_path(&self, path: &str) -> Result<Arc<dyn Template>, RenderError>;

    /// Look up a layout: unqualified names are resolved inside `namespace`,
    /// qualified ones directly.
    fn resolve(&self, name: &LayoutName, namespace: &str) -> Result<Arc<dyn Template>, RenderError> {
        self.resolve_path(&name.qualified(namespace))
    }
}

type RenderFn = dyn Fn(&mut RenderContext<'_>) -> Result<(), RenderError> + Send + Sync;

/// A template whose body is a Rust closure.
pub struct FnTemplate {
    name: String,
    body: Box<RenderFn>,
}

impl FnTemplate {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut RenderContext<'_>) -> Result<(), RenderError> + Send + Sync + 'static,
    {
        FnTemplate {
            name: name.into(),
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for FnTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTemplate").field("name", &self.name).finish()
    }
}

impl Template for FnTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        (self.body)(ctx)
    }
}
