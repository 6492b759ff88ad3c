//! Configuration management for fcrepo-export.
//!
//! TOML-based configuration loading, parsing, and validation with support
//! for environment variable substitution (`${VAR_NAME}`) and `FCREPO_*`
//! overrides.
//!
//! # Example Configuration
//!
//! ```toml
//! [repository]
//! base_url = "https://fedora.example.edu/fedora"
//! username = "fedoraAdmin"
//! password = "${FCREPO_REPOSITORY_PASSWORD}"
//! test_object = "qsr-object:189208"
//!
//! [export]
//! base_dir = "/srv/cold-storage/export"
//! mime_types = "/etc/mime.types"
//!
//! [ledger]
//! db_path = "/srv/cold-storage/export.db"
//! seed_listing = "/srv/cold-storage/object-ids.txt"
//! reclaim_after_minutes = 120
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    AppConfig, ApplicationConfig, ExportConfig, LedgerConfig, LoggingConfig, RepositoryConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
