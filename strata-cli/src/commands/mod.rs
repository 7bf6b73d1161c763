//! Subcommands and the setup they share.

pub mod list;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use strata_core::{config, ComposeConfig};
use strata_renderer::TemplateRegistry;

/// Where templates and settings come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Template directory (overrides `template_dir` from the config).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Config file (defaults to `./strata.yaml` when present).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load settings: an explicit `--config` must exist, the implicit one may not.
    pub fn load_config(&self) -> Result<(ComposeConfig, PathBuf)> {
        match &self.config {
            Some(path) => {
                let config = config::load_at(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?;
                let base = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                Ok((config, base))
            }
            None => {
                let path = PathBuf::from(config::CONFIG_FILE_NAME);
                let config = config::load_or_default_at(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?;
                Ok((config, PathBuf::from(".")))
            }
        }
    }

    /// Load settings and every template they point at.
    pub fn load(&self) -> Result<(ComposeConfig, TemplateRegistry)> {
        let (config, base) = self.load_config()?;
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => match config.resolve_template_dir(&base) {
                Some(dir) => dir,
                None => bail!("no template directory; pass --dir or set template_dir in the config"),
            },
        };
        let registry = TemplateRegistry::from_dir(&dir)
            .with_context(|| format!("failed to load templates from {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), templates = registry.names().len(), "templates ready");
        Ok((config, registry))
    }
}
