//! Single command implementation
//!
//! This module implements the `single` command: export one object by
//! identifier, regardless of its current ledger status. Useful for retrying
//! an errored job or spot-exporting one object.

use super::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL, EXIT_JOB_FAILURES, EXIT_OK};
use crate::config::load_config;
use crate::core::export::{BatchRunner, ObjectExporter};
use crate::ledger::Ledger;
use clap::Args;

/// Arguments for the single command
#[derive(Args, Debug)]
pub struct SingleArgs {
    /// Object identifier, e.g. demo:1234
    pub id: String,
}

impl SingleArgs {
    /// Execute the single command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(id = %self.id, "Starting single-object export");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

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

        let runner = BatchRunner::new(ledger, exporter, None);

        match runner.process_single(&self.id).await {
            Ok(directory) => {
                println!("Exported {} to {}", self.id, directory.display());
                Ok(EXIT_OK)
            }
            Err(e) => {
                tracing::error!(id = %self.id, error = %e, "Export failed");
                eprintln!("Export of {} failed: {e}", self.id);
                Ok(EXIT_JOB_FAILURES)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_args_id() {
        let args = SingleArgs {
            id: "demo:1234".to_string(),
        };
        assert_eq!(args.id, "demo:1234");
    }
}
