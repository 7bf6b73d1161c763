//! Composition settings, loaded from YAML.
//!
//! # File shape
//!
//! ```yaml
//! layouts_namespace: layouts   # base namespace for unqualified layout names
//! default_layout: application  # layout wrapping every top-level view (optional)
//! max_depth: 32                # nested composer calls allowed per render
//! template_dir: ./templates    # where `.tera` templates live (optional)
//! ```
//!
//! Every field is optional; an absent file means [`ComposeConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up by hosts that do not pass an explicit config path.
pub const CONFIG_FILE_NAME: &str = "strata.yaml";

const DEFAULT_NAMESPACE: &str = "layouts";
const DEFAULT_MAX_DEPTH: usize = 32;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Settings shared by every render performed by one composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComposeConfig {
    /// Namespace prepended to layout names without a `/`.
    #[serde(default = "default_namespace")]
    pub layouts_namespace: String,

    /// Layout wrapping top-level views when the caller does not pick one.
    #[serde(default)]
    pub default_layout: Option<String>,

    /// Upper bound on nested composer calls within one render.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Directory holding `.tera` templates.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        ComposeConfig {
            layouts_namespace: default_namespace(),
            default_layout: None,
            max_depth: DEFAULT_MAX_DEPTH,
            template_dir: None,
        }
    }
}

impl ComposeConfig {
    /// Parse a config from YAML text. `path` is only used for error context.
    pub fn from_yaml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as a mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ComposeConfig = serde_yaml::from_str(contents).map_err(|e| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no render could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if let Some(layout) = &self.default_layout {
            if layout.trim().is_empty() {
                return Err(ConfigError::EmptyLayoutName);
            }
        }
        Ok(())
    }

    /// A relative `template_dir` is interpreted against `base`.
    pub fn resolve_template_dir(&self, base: &Path) -> Option<PathBuf> {
        self.template_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                base.join(dir)
            }
        })
    }
}

/// Load a config file.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<ComposeConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    ComposeConfig::from_yaml(&contents, path)
}

/// Load a config file, falling back to defaults when it does not exist.
pub fn load_or_default_at(path: &Path) -> Result<ComposeConfig, ConfigError> {
    match load_at(path) {
        Err(ConfigError::NotFound { .. }) => Ok(ComposeConfig::default()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ComposeConfig::default();
        assert_eq!(config.layouts_namespace, "layouts");
        assert_eq!(config.max_depth, 32);
        assert!(config.default_layout.is_none());
        assert!(config.template_dir.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config =
            ComposeConfig::from_yaml("default_layout: application\n", Path::new("x.yaml"))
                .unwrap();
        assert_eq!(config.default_layout.as_deref(), Some("application"));
        assert_eq!(config.layouts_namespace, "layouts");
        assert_eq!(config.max_depth, 32);
    }

    #[test]
    fn empty_document_is_default() {
        let config = ComposeConfig::from_yaml("  \n", Path::new("x.yaml")).unwrap();
        assert_eq!(config, ComposeConfig::default());
    }

    #[test]
    fn zero_depth_rejected() {
        let err = ComposeConfig::from_yaml("max_depth: 0\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDepth), "got: {err}");
    }

    #[test]
    fn relative_template_dir_joins_base() {
        let config = ComposeConfig {
            template_dir: Some(PathBuf::from("views")),
            ..ComposeConfig::default()
        };
        assert_eq!(
            config.resolve_template_dir(Path::new("/srv/app")),
            Some(PathBuf::from("/srv/app/views"))
        );
    }
}
