//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "fcrepo-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            eprintln!("Configuration file already exists: {}", self.output);
            eprintln!("Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your repository settings", self.output);
                println!("  2. Put credentials in a .env file:");
                println!("     FCREPO_REPOSITORY_USERNAME=fedoraAdmin");
                println!("     FCREPO_REPOSITORY_PASSWORD=...");
                println!("  3. Point ledger.seed_listing at a file of object ids");
                println!("  4. Verify connectivity: fcrepo-export test");
                println!("  5. Start the export: fcrepo-export run");
                Ok(EXIT_OK)
            }
            Err(e) => {
                eprintln!("Failed to write configuration file: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# fcrepo-export configuration file
# Fedora Commons 3 to filesystem batch export

[application]
log_level = "info"

[repository]
# Base URL of the Fedora 3 REST API
base_url = "http://fedora.example.edu:8080/fedora"

# Basic auth credentials (use environment variables)
username = "${FCREPO_REPOSITORY_USERNAME}"
password = "${FCREPO_REPOSITORY_PASSWORD}"

# Request timeout in seconds
timeout_seconds = 60

# Object fetched by the health check and the `test` command
test_object = "demo:1234"
# Datastream the health check expects on the test object
test_datastream = "RDF"

[export]
# Root of the exported filesystem tree
base_dir = "/var/data/fcrepo-export"

# Optional Apache mime.types file; a built-in table is used when unset
# mime_types = "/etc/mime.types"

[ledger]
# SQLite job ledger; created on first run
db_path = "fcrepo-export.db"

# Listing of object ids to seed the ledger with, one per line.
# Only read when the ledger file does not exist yet.
# seed_listing = "object-ids.txt"

# Reset processing jobs older than this many minutes back to pending
# at the start of each run (reclaims jobs stranded by a crash).
# reclaim_after_minutes = 120

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "fcrepo-export.toml".to_string(),
            force: false,
        };

        assert_eq!(args.output, "fcrepo-export.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_generated_config_parses() {
        let raw = InitArgs::generate_config();
        assert!(raw.contains("[repository]"));
        assert!(raw.contains("[ledger]"));
        assert!(raw.contains("${FCREPO_REPOSITORY_PASSWORD}"));
    }
}
