//! Error types for strata-renderer.

use std::path::PathBuf;

use thiserror::Error;

use strata_core::ConfigError;

/// All errors that can arise while composing and rendering templates.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template is registered under the (namespaced) name.
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// A layout name failed validation (empty, whitespace-only).
    #[error("invalid layout name: {0}")]
    InvalidLayoutName(#[from] ConfigError),

    /// The block wrapped by a layout failed while its output was being captured.
    #[error("content block for layout '{layout}' failed: {source}")]
    Capture {
        layout: String,
        #[source]
        source: Box<RenderError>,
    },

    /// The resolved layout failed while rendering around captured content.
    #[error("layout '{layout}' failed to render: {source}")]
    Render {
        layout: String,
        #[source]
        source: Box<RenderError>,
    },

    /// Too many nested composer calls; usually a layout chain that loops.
    #[error("layout '{layout}' exceeds the maximum nesting depth of {limit}")]
    DepthExceeded { layout: String, limit: usize },

    /// A programmatic template gave up explicitly.
    #[error("template '{template}' aborted: {reason}")]
    Aborted { template: String, reason: String },

    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// YAML front matter of a template could not be parsed.
    #[error("invalid front matter in '{name}': {source}")]
    FrontMatter {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Filesystem error while loading templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

impl RenderError {
    pub fn aborted(template: impl Into<String>, reason: impl Into<String>) -> Self {
        RenderError::Aborted {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// The innermost error beneath any `Capture` / `Render` wrapping.
    pub fn root_cause(&self) -> &RenderError {
        let mut err = self;
        while let RenderError::Capture { source, .. } | RenderError::Render { source, .. } = err {
            err = &**source;
        }
        err
    }
}
