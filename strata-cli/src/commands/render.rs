//! `strata render <template>`: render a view through its layout chain.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use strata_renderer::Composer;

use super::SourceArgs;

/// Arguments for `strata render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template to render, by full name (e.g. `users/index`).
    pub template: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Layout wrapping the template (defaults to `default_layout` from the config).
    #[arg(long, conflicts_with = "no_layout")]
    pub layout: Option<String>,

    /// Render the template without any layout.
    #[arg(long)]
    pub no_layout: bool,

    /// JSON file whose contents templates see as `locals`.
    #[arg(long)]
    pub locals: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let (config, registry) = self.source.load()?;
        let locals = self.load_locals()?;

        let layout = if self.no_layout {
            None
        } else {
            self.layout.clone().or_else(|| config.default_layout.clone())
        };

        let composer = Composer::new(Arc::new(registry), config);
        let html = composer
            .render_with_layout(&self.template, layout.as_deref(), &locals)
            .with_context(|| format!("render failed for '{}'", self.template))?;

        match &self.output {
            Some(path) => std::fs::write(path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => print!("{html}"),
        }
        Ok(())
    }

    fn load_locals(&self) -> Result<serde_json::Value> {
        let Some(path) = &self.locals else {
            return Ok(serde_json::Value::Null);
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read locals {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("locals file {} is not valid JSON", path.display()))
    }
}
