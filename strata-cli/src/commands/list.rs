//! `strata list`: print every loaded template name.

use anyhow::Result;
use clap::Args;

use super::SourceArgs;

/// Arguments for `strata list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let (_, registry) = self.source.load()?;
        let names = registry.names();
        if names.is_empty() {
            println!("No templates found.");
            return Ok(());
        }
        for name in names {
            println!("{name}");
        }
        Ok(())
    }
}
