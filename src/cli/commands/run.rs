//! Run command implementation
//!
//! This module implements the `run` command: a batch export over the
//! pending jobs in the ledger.

use super::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL, EXIT_JOB_FAILURES, EXIT_OK};
use crate::config::load_config;
use crate::core::export::{BatchRunner, ObjectExporter};
use crate::ledger::Ledger;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Maximum number of pending jobs to process this run
    #[arg(long)]
    pub limit: Option<u32>,

    /// Fetch and plan without writing files or updating the ledger
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting batch run command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if self.dry_run {
            tracing::info!("Dry run mode enabled, nothing will be written");
            println!("DRY RUN - no files will be written and the ledger will not change");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !self.dry_run {
            println!("Export configuration:");
            println!("  Repository: {}", config.repository.base_url);
            println!("  Export dir: {}", config.export.base_dir.display());
            println!("  Ledger:     {}", config.ledger.db_path.display());
            if let Some(limit) = self.limit {
                println!("  Limit:      {limit}");
            }
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(EXIT_OK);
            }
        }

        let exporter = match ObjectExporter::from_config(&config) {
            Ok(e) => e,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build exporter");
                eprintln!("Failed to initialize export: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Err(e) = exporter.repository().health_check().await {
            tracing::error!(error = %e, "Repository health check failed");
            eprintln!("Cannot reach repository: {e}");
            return Ok(EXIT_CONNECTION_ERROR);
        }

        let ledger = match Ledger::initialize(&config.ledger).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open job ledger");
                eprintln!("Failed to open job ledger: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let runner = BatchRunner::new(ledger, exporter, config.ledger.reclaim_after_minutes);

        let summary = if self.dry_run {
            runner.dry_run(self.limit, shutdown_signal).await
        } else {
            runner.run_batch(self.limit, shutdown_signal).await
        };

        let summary = match summary {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Batch run failed");
                eprintln!("Batch run failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        println!();
        println!("Run summary:");
        println!("  Processed: {}", summary.processed);
        println!("  Succeeded: {}", summary.succeeded);
        println!("  Failed:    {}", summary.failed);
        if summary.skipped > 0 {
            println!("  Skipped:   {} (shutdown requested)", summary.skipped);
        }
        println!("  Duration:  {:.2}s", summary.duration.as_secs_f64());

        if !summary.errors.is_empty() {
            println!();
            println!("Failed objects:");
            for (id, message) in &summary.errors {
                println!("  - {id}: {message}");
            }
        }

        if summary.is_clean() {
            Ok(EXIT_OK)
        } else {
            Ok(EXIT_JOB_FAILURES)
        }
    }
}
