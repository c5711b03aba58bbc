//! `harbor scan` — reconcile the registry with the projects root.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use harbor_core::ProjectService;

/// Arguments for `harbor scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    pub fn run(self, service: &ProjectService) -> Result<()> {
        let report = service
            .scan_and_reconcile()
            .context("scan of the projects root failed")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!(
            "{} {} added, {} refreshed, {} missing",
            "✓".green().bold(),
            report.added.len(),
            report.refreshed.len(),
            report.missing.len()
        );
        for name in &report.added {
            println!("  + {name}");
        }
        for name in &report.refreshed {
            println!("  ~ {name} (layout updated)");
        }
        for name in &report.missing {
            println!("  {} {name} (directory gone; entry retained)", "!".yellow());
        }
        Ok(())
    }
}
