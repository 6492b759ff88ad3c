//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for fcrepo-export using
//! clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// fcrepo-export - Fedora 3 repository export tool
#[derive(Parser, Debug)]
#[command(name = "fcrepo-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fcrepo-export.toml", env = "FCREPO_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FCREPO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a batch export over pending jobs in the ledger
    Run(commands::run::RunArgs),

    /// Export a single object by identifier
    Single(commands::single::SingleArgs),

    /// Verify repository connectivity using the configured test object
    Test(commands::test::TestArgs),

    /// Show job ledger status
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["fcrepo-export", "run"]);
        assert_eq!(cli.config, "fcrepo-export.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_with_flags() {
        let cli = Cli::parse_from(["fcrepo-export", "run", "--limit", "50", "--dry-run"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.limit, Some(50));
                assert!(args.dry_run);
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_cli_parse_single() {
        let cli = Cli::parse_from(["fcrepo-export", "single", "demo:1234"]);
        match cli.command {
            Commands::Single(args) => assert_eq!(args.id, "demo:1234"),
            _ => panic!("expected single subcommand"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["fcrepo-export", "--config", "custom.toml", "status"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_test() {
        let cli = Cli::parse_from(["fcrepo-export", "test"]);
        assert!(matches!(cli.command, Commands::Test(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["fcrepo-export", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
