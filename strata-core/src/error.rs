//! Error types for strata-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration loading and name validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, not a file, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// A layout name was empty or whitespace-only.
    #[error("layout name must not be empty")]
    EmptyLayoutName,

    /// `max_depth` of zero would forbid every layout.
    #[error("max_depth must be at least 1")]
    ZeroDepth,
}
