//! Per-render state: output target, yield bindings, pending slots.
//!
//! A [`RenderContext`] lives for exactly one top-level render. It owns three
//! pieces of state that nested composer calls swap out and restore in LIFO
//! order:
//!
//! - the [`OutputSink`], whose active buffer receives every write;
//! - the current [`Bindings`], read by `yield` / `yield(name)`;
//! - the pending [`SlotMap`], filled by `content_for` and handed to the layout
//!   of the innermost composer call in progress.

use strata_core::{ComposeConfig, SlotMap, SlotName};

use crate::error::RenderError;
use crate::sink::OutputSink;
use crate::template::{Bindings, TemplateResolver};

/// Render state for one top-level render. Never shared between renders.
pub struct RenderContext<'r> {
    pub(crate) resolver: &'r dyn TemplateResolver,
    pub(crate) config: &'r ComposeConfig,
    locals: &'r serde_json::Value,
    pub(crate) sink: OutputSink,
    pub(crate) bindings: Bindings,
    pub(crate) pending: SlotMap,
    pub(crate) depth: usize,
}

impl<'r> RenderContext<'r> {
    pub fn new(
        resolver: &'r dyn TemplateResolver,
        config: &'r ComposeConfig,
        locals: &'r serde_json::Value,
    ) -> Self {
        RenderContext {
            resolver,
            config,
            locals,
            sink: OutputSink::new(),
            bindings: Bindings::default(),
            pending: SlotMap::new(),
            depth: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Append text to the active output.
    pub fn write(&mut self, text: &str) {
        self.sink.write(text);
    }

    /// Write the primary content (unqualified yield) inline.
    pub fn write_yield(&mut self) {
        self.sink.write(&self.bindings.primary);
    }

    /// Write a named slot inline; nothing is written when it is absent.
    pub fn write_slot(&mut self, name: &str) {
        self.sink.write(self.bindings.slots.lookup(name));
    }

    /// Run `block` once with output redirected to a fresh buffer and return
    /// what it wrote.
    ///
    /// The previous output target is active again when this returns, whether
    /// the block succeeded or not. On failure the partial buffer is dropped and
    /// the block's error is returned unchanged.
    pub fn capture<F>(&mut self, block: F) -> Result<String, RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        self.sink.push();
        tracing::trace!(buffers = self.sink.depth(), "capture started");
        let result = block(self);
        let captured = self.sink.pop();
        match result {
            Ok(()) => Ok(captured),
            Err(err) => {
                tracing::trace!(discarded = captured.len(), "capture failed");
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Slots
    // -----------------------------------------------------------------------

    /// Register content for a named slot of the layout being composed.
    /// Repeated registrations under one name concatenate.
    pub fn content_for(&mut self, name: impl Into<SlotName>, content: &str) {
        self.pending.append(name, content);
    }

    /// Capture `block` and register its output under `name`.
    pub fn content_for_with<F>(&mut self, name: impl Into<SlotName>, block: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        let content = self.capture(block)?;
        self.pending.append(name, &content);
        Ok(())
    }

    /// Register content for a named slot, replacing earlier registrations.
    pub fn provide(&mut self, name: impl Into<SlotName>, content: impl Into<String>) {
        self.pending.replace(name, content);
    }

    /// Pass a slot this template received on to the layout being composed.
    pub fn forward_slot(&mut self, name: &str) {
        if let Some(content) = self.bindings.slots.get(name) {
            self.pending.append(name, content);
        }
    }

    /// Pass every slot this template received on to the layout being composed.
    pub fn forward_all_slots(&mut self) {
        self.pending.merge(&self.bindings.slots);
    }

    /// Slots registered so far for the layout being composed.
    pub fn pending_slots(&self) -> &SlotMap {
        &self.pending
    }

    // -----------------------------------------------------------------------
    // Yield
    // -----------------------------------------------------------------------

    /// Primary content wrapped by the template currently rendering.
    /// Empty outside of any layout.
    pub fn yield_content(&self) -> &str {
        &self.bindings.primary
    }

    /// Named yield. A slot nobody registered reads as `""`.
    pub fn yield_slot(&self, name: &str) -> &str {
        self.bindings.slots.lookup(name)
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.bindings.slots.contains(name)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    // -----------------------------------------------------------------------
    // Re-entrant rendering
    // -----------------------------------------------------------------------

    /// Render another template inline, by full name.
    ///
    /// The partial shares this template's bindings and pending slots, so its
    /// `content_for` calls reach the same layout.
    pub fn render_partial(&mut self, name: &str) -> Result<(), RenderError> {
        let template = self.resolver.resolve_path(name)?;
        tracing::trace!(template = %name, "rendering partial");
        template.render(self)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Render-wide data supplied by the host.
    pub fn locals(&self) -> &serde_json::Value {
        self.locals
    }

    pub fn config(&self) -> &ComposeConfig {
        self.config
    }

    /// Number of composer calls currently in progress.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Everything written to the active output so far.
    pub fn output(&self) -> &str {
        self.sink.current()
    }

    /// Finish the render, returning the top-level output.
    pub fn into_output(self) -> String {
        self.sink.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TemplateRegistry;
    use serde_json::json;

    fn with_context<T>(f: impl FnOnce(&mut RenderContext<'_>) -> T) -> T {
        let registry = TemplateRegistry::new();
        let config = ComposeConfig::default();
        let locals = json!({ "user": "ada" });
        let mut ctx = RenderContext::new(&registry, &config, &locals);
        f(&mut ctx)
    }

    #[test]
    fn capture_returns_concatenated_writes_and_isolates_them() {
        with_context(|ctx| {
            ctx.write("before|");
            let captured = ctx
                .capture(|ctx| {
                    ctx.write("s1");
                    ctx.write("s2");
                    ctx.write("s3");
                    Ok(())
                })
                .unwrap();
            assert_eq!(captured, "s1s2s3");
            assert_eq!(ctx.output(), "before|");
        });
    }

    #[test]
    fn capture_restores_output_on_failure() {
        with_context(|ctx| {
            ctx.write("kept");
            let err = ctx
                .capture(|ctx| {
                    ctx.write("partial");
                    Err(RenderError::aborted("block", "boom"))
                })
                .unwrap_err();
            assert!(matches!(err, RenderError::Aborted { .. }));
            assert_eq!(ctx.sink.depth(), 0, "redirection must be undone");
            ctx.write("|after");
            assert_eq!(ctx.output(), "kept|after");
        });
    }

    #[test]
    fn nested_captures_unwind_in_order() {
        with_context(|ctx| {
            let outer = ctx
                .capture(|ctx| {
                    ctx.write("<");
                    let inner = ctx.capture(|ctx| {
                        ctx.write("inner");
                        Ok(())
                    })?;
                    ctx.write(&inner.to_uppercase());
                    ctx.write(">");
                    Ok(())
                })
                .unwrap();
            assert_eq!(outer, "<INNER>");
            assert_eq!(ctx.output(), "");
        });
    }

    #[test]
    fn content_for_appends_and_provide_replaces() {
        with_context(|ctx| {
            ctx.content_for("head", "<a>");
            ctx.content_for("head", "<b>");
            ctx.provide("title", "Draft");
            ctx.provide("title", "Final");
            assert_eq!(ctx.pending_slots().lookup("head"), "<a><b>");
            assert_eq!(ctx.pending_slots().lookup("title"), "Final");
        });
    }

    #[test]
    fn content_for_with_captures_without_leaking() {
        with_context(|ctx| {
            ctx.content_for_with("menu", |ctx| {
                ctx.write("<ul></ul>");
                Ok(())
            })
            .unwrap();
            assert_eq!(ctx.pending_slots().lookup("menu"), "<ul></ul>");
            assert_eq!(ctx.output(), "");
        });
    }

    #[test]
    fn yields_are_empty_at_top_level() {
        with_context(|ctx| {
            assert_eq!(ctx.yield_content(), "");
            assert_eq!(ctx.yield_slot("anything"), "");
            assert!(!ctx.has_slot("anything"));
            assert_eq!(ctx.depth(), 0);
        });
    }

    #[test]
    fn forward_copies_only_bound_slots() {
        with_context(|ctx| {
            ctx.bindings = Bindings::new("", [("menu", "<ul>"), ("title", "T")].into_iter().collect());
            ctx.forward_slot("menu");
            ctx.forward_slot("missing");
            assert_eq!(ctx.pending_slots().lookup("menu"), "<ul>");
            assert!(!ctx.pending_slots().contains("missing"));
            assert!(!ctx.pending_slots().contains("title"));
            ctx.forward_all_slots();
            assert_eq!(ctx.pending_slots().lookup("title"), "T");
        });
    }

    #[test]
    fn locals_are_visible() {
        with_context(|ctx| {
            assert_eq!(ctx.locals()["user"], "ada");
        });
    }

    #[test]
    fn render_partial_of_unknown_template_fails() {
        with_context(|ctx| {
            let err = ctx.render_partial("views/nope").unwrap_err();
            assert!(matches!(err, RenderError::TemplateNotFound { ref name } if name == "views/nope"));
        });
    }
}
