//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Loading performs, in order: file read, `${VAR}` substitution, TOML parse,
//! `FCREPO_*` environment overrides, validation.

use super::schema::AppConfig;
use crate::config::secret_string;
use crate::domain::errors::ExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use fcrepo_export::config::load_config;
///
/// let config = load_config("fcrepo-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| ExportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ExportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the FCREPO_* prefix
///
/// Environment variables follow the pattern: FCREPO_<SECTION>_<KEY>
/// For example: FCREPO_REPOSITORY_BASE_URL, FCREPO_EXPORT_BASE_DIR
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var("FCREPO_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("FCREPO_REPOSITORY_BASE_URL") {
        config.repository.base_url = val;
    }
    if let Ok(val) = std::env::var("FCREPO_REPOSITORY_USERNAME") {
        config.repository.username = Some(val);
    }
    if let Ok(val) = std::env::var("FCREPO_REPOSITORY_PASSWORD") {
        config.repository.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("FCREPO_REPOSITORY_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.repository.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("FCREPO_REPOSITORY_TEST_OBJECT") {
        config.repository.test_object = Some(val);
    }

    if let Ok(val) = std::env::var("FCREPO_EXPORT_BASE_DIR") {
        config.export.base_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("FCREPO_EXPORT_MIME_TYPES") {
        config.export.mime_types = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("FCREPO_LEDGER_DB_PATH") {
        config.ledger.db_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("FCREPO_LEDGER_SEED_LISTING") {
        config.ledger.seed_listing = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("FCREPO_LEDGER_RECLAIM_AFTER_MINUTES") {
        if let Ok(minutes) = val.parse() {
            config.ledger.reclaim_after_minutes = Some(minutes);
        }
    }

    if let Ok(val) = std::env::var("FCREPO_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("FCREPO_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
