//! Status command implementation
//!
//! This module implements the `status` command for reporting job ledger
//! counts.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK};
use crate::config::load_config;
use crate::ledger::Ledger;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking ledger status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let ledger = match Ledger::open(&config.ledger.db_path).await {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to open job ledger: {e}");
                eprintln!("Run 'fcrepo-export run' to create and seed it.");
                return Ok(EXIT_FATAL);
            }
        };

        let counts = match ledger.status_counts().await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to read job ledger: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        println!("Job ledger: {}", config.ledger.db_path.display());
        println!();
        println!("  Pending:    {}", counts.pending);
        println!("  Processing: {}", counts.processing);
        println!("  Complete:   {}", counts.complete);
        println!("  Error:      {}", counts.error);
        println!("  Total:      {}", counts.total());

        if let Some(threshold) = config.ledger.reclaim_after_minutes {
            match ledger.stale_processing_count(threshold).await {
                Ok(stale) if stale > 0 => {
                    println!();
                    println!(
                        "  {stale} processing job(s) older than {threshold} minutes; \
                         the next run will reclaim them."
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Failed to count stale jobs: {e}");
                    return Ok(EXIT_FATAL);
                }
            }
        }

        Ok(EXIT_OK)
    }
}
