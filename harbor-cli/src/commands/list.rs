//! `harbor list` — registry contents as a table or JSON.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use harbor_core::{Project, ProjectService};

/// Arguments for `harbor list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ProjectJson {
    name: String,
    pretty_name: String,
    directory: String,
    port: u16,
    redis_db: u32,
    frontend_path: Option<String>,
    backend_path: Option<String>,
    frontend_url: String,
    backend_url: String,
    created_at: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "pretty name")]
    pretty_name: String,
    #[tabled(rename = "port")]
    port: u16,
    #[tabled(rename = "redis db")]
    redis_db: u32,
    #[tabled(rename = "layout")]
    layout: String,
}

impl ListArgs {
    pub fn run(self, service: &ProjectService) -> Result<()> {
        let projects = service.list_projects();

        if self.json {
            let rows: Vec<ProjectJson> = projects.iter().map(to_json).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if projects.is_empty() {
            println!("No projects registered.");
            println!("Run: harbor scan");
            return Ok(());
        }

        let rows: Vec<ProjectRow> = projects.iter().map(to_row).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");

        let missing: Vec<&Project> = projects.iter().filter(|p| !p.directory.exists()).collect();
        for project in missing {
            println!(
                "{} directory missing for '{}': {}",
                "!".yellow().bold(),
                project.name,
                project.directory.display()
            );
        }
        Ok(())
    }
}

fn to_json(project: &Project) -> ProjectJson {
    ProjectJson {
        name: project.name.0.clone(),
        pretty_name: project.pretty_name.clone(),
        directory: project.directory.display().to_string(),
        port: project.port,
        redis_db: project.redis_db,
        frontend_path: project
            .frontend_path
            .as_ref()
            .map(|p| p.display().to_string()),
        backend_path: project
            .backend_path
            .as_ref()
            .map(|p| p.display().to_string()),
        frontend_url: project.frontend_url(),
        backend_url: project.backend_url(),
        created_at: project.created_at.to_rfc3339(),
    }
}

fn to_row(project: &Project) -> ProjectRow {
    let layout = match (&project.frontend_path, &project.backend_path) {
        (None, None) => "-".to_string(),
        (fe, be) => {
            let side = |p: &Option<std::path::PathBuf>| {
                p.as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            format!("{} + {}", side(fe), side(be))
        }
    };
    ProjectRow {
        name: project.name.0.clone(),
        pretty_name: project.pretty_name.clone(),
        port: project.port,
        redis_db: project.redis_db,
        layout,
    }
}
