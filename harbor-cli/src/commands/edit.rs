//! `harbor edit <name>` — partial update of a registry entry.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use harbor_core::{ProjectName, ProjectService, ProjectUpdate};

/// Arguments for `harbor edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Project to edit.
    pub name: String,

    /// New display name.
    #[arg(long)]
    pub pretty: Option<String>,

    /// New dev-server port.
    #[arg(long)]
    pub port: Option<u16>,

    /// New Redis DB index.
    #[arg(long)]
    pub redis_db: Option<u32>,
}

impl EditArgs {
    pub fn run(self, service: &ProjectService) -> Result<()> {
        if self.pretty.is_none() && self.port.is_none() && self.redis_db.is_none() {
            anyhow::bail!("nothing to change; pass --pretty, --port, or --redis-db");
        }

        let update = ProjectUpdate {
            pretty_name: self.pretty,
            port: self.port,
            redis_db: self.redis_db,
        };
        let name = ProjectName::from(self.name.as_str());
        let project = service
            .update_project(&name, update)
            .with_context(|| format!("failed to update '{}'", self.name))?;

        println!("{} Updated '{}'", "✓".green().bold(), project.name);
        println!(
            "  {} — port {}, redis db {}",
            project.pretty_name, project.port, project.redis_db
        );
        Ok(())
    }
}
