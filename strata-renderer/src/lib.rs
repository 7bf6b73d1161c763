//! # strata-renderer
//!
//! Nested layout composition on top of a template engine.
//!
//! A template may wrap its own output in an outer layout with
//! [`RenderContext::inside_layout`], registering named slots with
//! [`RenderContext::content_for`] on the way. The outer layout reads the
//! wrapped output through `yield` and the slots through `yield(name)`, and may
//! wrap itself again, to any depth.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use strata_core::ComposeConfig;
//! use strata_renderer::{Composer, TemplateRegistry};
//!
//! let mut registry = TemplateRegistry::new();
//! registry
//!     .add_raw("layouts/outer", "<div>{{ slots.menu }}|{{ content }}</div>")
//!     .unwrap();
//! registry.register_fn("views/home", |ctx| {
//!     ctx.content_for("menu", "<ul></ul>");
//!     ctx.write("Body");
//!     Ok(())
//! });
//!
//! let composer = Composer::new(Arc::new(registry), ComposeConfig::default());
//! let html = composer
//!     .render_with_layout("views/home", Some("outer"), &serde_json::Value::Null)
//!     .unwrap();
//! assert_eq!(html, "<div><ul></ul>|Body</div>");
//! ```

pub mod composer;
pub mod context;
pub mod engine;
pub mod error;
pub mod sink;
pub mod template;

pub use composer::Composer;
pub use context::RenderContext;
pub use engine::{FrontMatter, TemplateRegistry, TeraTemplate};
pub use error::RenderError;
pub use sink::OutputSink;
pub use template::{Bindings, FnTemplate, Template, TemplateResolver};
