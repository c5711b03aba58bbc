//! `harbor rm <name>` — remove a registry entry.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use harbor_core::{ProjectName, ProjectService};

/// Arguments for `harbor rm`.
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Project to remove from the registry.
    pub name: String,
}

impl RmArgs {
    pub fn run(self, service: &ProjectService) -> Result<()> {
        let name = ProjectName::from(self.name.as_str());
        let removed = service
            .delete_project(&name)
            .with_context(|| format!("failed to remove '{}'", self.name))?;

        println!("{} Removed '{}' from the registry", "✓".green().bold(), removed.name);
        println!("  Directory untouched: {}", removed.directory.display());
        println!("  Port {} and Redis DB {} are free again", removed.port, removed.redis_db);
        Ok(())
    }
}
