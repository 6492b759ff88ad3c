//! Integration tests for configuration loading

use fcrepo_export::config::load_config;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_config_round_trip() {
    let file = write_config(
        r#"
[application]
log_level = "debug"

[repository]
base_url = "http://fedora.example.edu:8080/fedora"
username = "fedoraAdmin"
timeout_seconds = 30
test_object = "demo:1234"
test_datastream = "DC"

[export]
base_dir = "/var/data/export"
mime_types = "/etc/mime.types"

[ledger]
db_path = "/var/data/export.db"
seed_listing = "ids.txt"
reclaim_after_minutes = 120

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.repository.timeout_seconds, 30);
    assert_eq!(config.repository.test_object.as_deref(), Some("demo:1234"));
    assert_eq!(config.repository.test_datastream, "DC");
    assert_eq!(config.export.base_dir, PathBuf::from("/var/data/export"));
    assert_eq!(
        config.export.mime_types,
        Some(PathBuf::from("/etc/mime.types"))
    );
    assert_eq!(config.ledger.seed_listing, Some(PathBuf::from("ids.txt")));
    assert_eq!(config.ledger.reclaim_after_minutes, Some(120));
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let file = write_config(
        r#"
[repository]
base_url = "https://fedora.example.edu/fedora"

[export]
base_dir = "export"

[ledger]
db_path = "export.db"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.repository.timeout_seconds, 60);
    assert_eq!(config.repository.test_datastream, "RDF");
    assert!(config.repository.test_object.is_none());
    assert!(config.export.mime_types.is_none());
    assert!(config.ledger.reclaim_after_minutes.is_none());
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_password_substituted_from_environment() {
    std::env::set_var("FCREPO_IT_SECRET", "hunter2");
    let file = write_config(
        r#"
[repository]
base_url = "https://fedora.example.edu/fedora"
username = "fedoraAdmin"
password = "${FCREPO_IT_SECRET}"

[export]
base_dir = "export"

[ledger]
db_path = "export.db"
"#,
    );

    let config = load_config(file.path()).unwrap();
    std::env::remove_var("FCREPO_IT_SECRET");

    let password = config.repository.password.unwrap();
    assert_eq!(password.expose_secret().as_ref(), "hunter2");
}

#[test]
fn test_validation_failure_rejected() {
    let file = write_config(
        r#"
[repository]
base_url = "not a url"

[export]
base_dir = "export"

[ledger]
db_path = "export.db"
"#,
    );

    assert!(load_config(file.path()).is_err());
}
