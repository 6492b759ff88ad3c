//! Configuration schema types
//!
//! This module defines the configuration structure for fcrepo-export. The
//! root [`AppConfig`] maps directly onto the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main fcrepo-export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Source repository connection
    pub repository: RepositoryConfig,

    /// Export destination settings
    pub export: ExportConfig,

    /// Job ledger settings
    pub ledger: LedgerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.repository.validate()?;
        self.export.validate()?;
        self.ledger.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Source repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Base URL of the Fedora server (e.g. `https://fedora.example.edu/fedora`)
    pub base_url: String,

    /// Username for basic authentication (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Object used by the connectivity check and the `test` command
    #[serde(default)]
    pub test_object: Option<String>,

    /// Datastream the connectivity check fetches on the test object
    #[serde(default = "default_test_datastream")]
    pub test_datastream: String,
}

impl RepositoryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("repository.base_url cannot be empty".to_string());
        }
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("repository.base_url is not a valid URL: {e}"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("repository.base_url must use http:// or https://".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("repository.timeout_seconds must be greater than 0".to_string());
        }
        if let Some(ref test_object) = self.test_object {
            crate::domain::ObjectId::new(test_object.clone())
                .map_err(|e| format!("repository.test_object: {e}"))?;
        }
        Ok(())
    }
}

/// Export destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root directory of the exported filesystem tree
    pub base_dir: PathBuf,

    /// Path to an Apache-format mime.types file (built-in table when unset)
    #[serde(default)]
    pub mime_types: Option<PathBuf>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_dir.as_os_str().is_empty() {
            return Err("export.base_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Job ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Path of the SQLite ledger database
    pub db_path: PathBuf,

    /// Identifier listing used to seed the ledger when it is first created
    #[serde(default)]
    pub seed_listing: Option<PathBuf>,

    /// Reset `processing` rows older than this many minutes back to `pending`
    /// at the start of each batch run (disabled when unset)
    #[serde(default)]
    pub reclaim_after_minutes: Option<u64>,
}

impl LedgerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.db_path.as_os_str().is_empty() {
            return Err("ledger.db_path cannot be empty".to_string());
        }
        if self.reclaim_after_minutes == Some(0) {
            return Err("ledger.reclaim_after_minutes must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log file rotation (daily or hourly)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled"
                .to_string());
        }
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be 'daily' or 'hourly'",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_test_datastream() -> String {
    "RDF".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            application: ApplicationConfig::default(),
            repository: RepositoryConfig {
                base_url: "https://fedora.example.edu/fedora".to_string(),
                username: Some("fedoraAdmin".to_string()),
                password: None,
                timeout_seconds: 60,
                test_object: Some("qsr-object:189208".to_string()),
                test_datastream: "RDF".to_string(),
            },
            export: ExportConfig {
                base_dir: PathBuf::from("export"),
                mime_types: None,
            },
            ledger: LedgerConfig {
                db_path: PathBuf::from("export.db"),
                seed_listing: None,
                reclaim_after_minutes: None,
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut config = valid_config();
        config.repository.base_url = "ftp://fedora.example.edu".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_test_object_rejected() {
        let mut config = valid_config();
        config.repository.test_object = Some("no-colon".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_reclaim_threshold_rejected() {
        let mut config = valid_config();
        config.ledger.reclaim_after_minutes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_base_dir_rejected() {
        let mut config = valid_config();
        config.export.base_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
