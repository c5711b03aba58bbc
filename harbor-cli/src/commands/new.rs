//! `harbor new <name>` — create a project via the boilerplate script.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use harbor_core::{pretty_name_from, NewProjectRequest, ProjectName, ProjectService};
use harbor_runner::ShellScriptRunner;

/// Arguments for `harbor new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Machine-safe project name; becomes the directory name.
    pub name: String,

    /// Display name. Defaults to the name, title-cased.
    #[arg(long)]
    pub pretty: Option<String>,

    /// Dev-server port. Defaults to the next free port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Redis DB index. Defaults to the next free index.
    #[arg(long)]
    pub redis_db: Option<u32>,

    /// Boilerplate script to run (default: the configured one).
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,
}

impl NewArgs {
    pub fn run(self, service: &ProjectService) -> Result<()> {
        let port = match self.port {
            Some(port) => port,
            None => service.next_free_port().context("no free port")?,
        };
        let redis_db = match self.redis_db {
            Some(db) => db,
            None => service.next_free_redis_db().context("no free Redis DB")?,
        };

        let request = NewProjectRequest {
            name: ProjectName::from(self.name.as_str()),
            pretty_name: self
                .pretty
                .unwrap_or_else(|| pretty_name_from(&self.name)),
            port,
            redis_db,
        };

        let script = self
            .script
            .unwrap_or_else(|| service.config().new_project_script.clone());
        let runner = ShellScriptRunner::new(script);

        let mut sink = |line: &str| println!("{line}");
        let project = service
            .create_project(request, &runner, &mut sink)
            .with_context(|| format!("failed to create project '{}'", self.name))?;

        println!();
        println!("{} Created '{}'", "✓".green().bold(), project.name);
        println!("  Frontend: {}", project.frontend_url());
        println!("  Backend:  {}", project.backend_url());
        println!("  Port: {}  Redis DB: {}", project.port, project.redis_db);
        Ok(())
    }
}
