//! Nested layout composition.
//!
//! # One composer call
//!
//! 1. Validate the layout name and check the nesting depth.
//! 2. Capture the wrapped block once; its `content_for` calls fill a slot
//!    map owned by this call, seeded with what the caller registered before
//!    it. Registrations made inside nested calls never reach this map.
//! 3. Resolve the layout (unqualified names live in the layouts namespace).
//! 4. Render the layout into a fresh buffer with the captured string as its
//!    yield and the slot map as its named yields.
//! 5. Append the result to the output that was active before step 2.
//!
//! A layout may itself call [`RenderContext::inside_layout`]; that call is a
//! new, independently scoped link in the chain. Every swap made in steps 2
//! and 4 is undone before returning, on success and on failure.

use std::sync::Arc;

use strata_core::{ComposeConfig, LayoutName};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::template::{Bindings, TemplateResolver};

impl<'r> RenderContext<'r> {
    /// Wrap the output of `block` in `layout` and write the result inline.
    pub fn inside_layout<F>(&mut self, layout: &str, block: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        let name = LayoutName::parse(layout)?;
        let limit = self.config.max_depth;
        if self.depth >= limit {
            return Err(RenderError::DepthExceeded {
                layout: name.0,
                limit,
            });
        }

        self.depth += 1;
        let result = self.compose(&name, block);
        self.depth -= 1;

        let rendered = result?;
        self.sink.write(&rendered);
        Ok(())
    }

    fn compose<F>(&mut self, name: &LayoutName, block: F) -> Result<String, RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        // Capturing: the block appends to a copy of the caller's pending slots.
        // The caller's map is put back untouched afterwards.
        let outer_pending = self.pending.clone();
        let captured = self.capture(block);
        let slots = std::mem::replace(&mut self.pending, outer_pending);
        let primary = captured.map_err(|e| RenderError::Capture {
            layout: name.0.clone(),
            source: Box::new(e),
        })?;

        let template = self
            .resolver
            .resolve(name, &self.config.layouts_namespace)?;

        tracing::debug!(
            layout = %name,
            template = %template.name(),
            depth = self.depth,
            captured = primary.len(),
            slots = slots.len(),
            "composing layout"
        );

        // Composing: the layout sees only what this call collected. Slots it
        // registers outside its own composer calls go nowhere.
        let outer_bindings = std::mem::replace(&mut self.bindings, Bindings::new(primary, slots));
        let outer_pending = std::mem::take(&mut self.pending);
        let rendered = self.capture(|ctx| template.render(ctx));
        self.pending = outer_pending;
        self.bindings = outer_bindings;

        rendered.map_err(|e| RenderError::Render {
            layout: name.0.clone(),
            source: Box::new(e),
        })
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Entry point for top-level renders.
///
/// Holds the resolver and settings; every call builds its own
/// [`RenderContext`], so one composer can serve concurrent renders.
#[derive(Clone)]
pub struct Composer {
    resolver: Arc<dyn TemplateResolver>,
    config: ComposeConfig,
}

impl Composer {
    pub fn new(resolver: Arc<dyn TemplateResolver>, config: ComposeConfig) -> Self {
        Composer { resolver, config }
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Render `template` (full name) inside the configured default layout,
    /// or bare when none is configured.
    pub fn render(&self, template: &str, locals: &serde_json::Value) -> Result<String, RenderError> {
        self.render_with_layout(template, self.config.default_layout.as_deref(), locals)
    }

    /// Render `template` inside `layout`; `None` renders it bare.
    pub fn render_with_layout(
        &self,
        template: &str,
        layout: Option<&str>,
        locals: &serde_json::Value,
    ) -> Result<String, RenderError> {
        self.render_block(locals, |ctx| match layout {
            Some(layout) => ctx.inside_layout(layout, |ctx| ctx.render_partial(template)),
            None => ctx.render_partial(template),
        })
    }

    /// Run an ad hoc block in a fresh context and return its output.
    pub fn render_block<F>(&self, locals: &serde_json::Value, block: F) -> Result<String, RenderError>
    where
        F: for<'c> FnOnce(&mut RenderContext<'c>) -> Result<(), RenderError>,
    {
        let mut ctx = RenderContext::new(self.resolver.as_ref(), &self.config, locals);
        block(&mut ctx)?;
        Ok(ctx.into_output())
    }
}
