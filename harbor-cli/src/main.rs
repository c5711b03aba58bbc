//! Harbor — local development project registry CLI.
//!
//! # Usage
//!
//! ```text
//! harbor list [--json]
//! harbor scan [--json]
//! harbor new <name> [--pretty <name>] [--port <n>] [--redis-db <n>] [--script <path>]
//! harbor rm <name>
//! harbor edit <name> [--pretty <name>] [--port <n>] [--redis-db <n>]
//! ```
//!
//! All commands accept `--root <dir>` to override the projects root
//! (default: `~/projects/personal`).

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{edit::EditArgs, list::ListArgs, new::NewArgs, rm::RmArgs, scan::ScanArgs};
use harbor_core::{Config, ProjectService};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "harbor",
    version,
    about = "Discover, configure, and track local development projects",
    long_about = None,
)]
struct Cli {
    /// Projects root directory (default: ~/projects/personal).
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered projects.
    List(ListArgs),

    /// Scan the projects root and reconcile the registry.
    Scan(ScanArgs),

    /// Create a new project via the boilerplate script.
    New(NewArgs),

    /// Remove a project from the registry (metadata only; the directory is untouched).
    Rm(RmArgs),

    /// Edit a project's display name, port, or Redis DB.
    Edit(EditArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match cli.root {
        Some(root) => Config::at_root(root),
        None => Config::from_home().context("could not resolve the projects root")?,
    };
    let service = ProjectService::open(config).context("failed to load the project registry")?;

    match cli.command {
        Commands::List(args) => args.run(&service),
        Commands::Scan(args) => args.run(&service),
        Commands::New(args) => args.run(&service),
        Commands::Rm(args) => args.run(&service),
        Commands::Edit(args) => args.run(&service),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
