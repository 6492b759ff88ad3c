//! Domain error types
//!
//! This module defines the error hierarchy for fcrepo-export. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main fcrepo-export error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors (fatal, abort startup)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Repository-related errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Ledger-related errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Malformed object identifier (per-object, recorded in the ledger)
    #[error("Invalid object identifier: {0}")]
    InvalidIdentifier(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Fedora repository errors
///
/// Errors that occur when interacting with the source repository.
/// These errors don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Failed to connect to the repository
    #[error("Failed to connect to repository: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Object not found
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Datastream not found on an object
    #[error("Datastream {dsid} not found on object {id}")]
    DatastreamNotFound { id: String, dsid: String },

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Server error (4xx/5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Job ledger errors
///
/// Errors that occur when reading or writing the SQLite job ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to open or create the ledger store
    #[error("Failed to open ledger: {0}")]
    ConnectionFailed(String),

    /// Failed to create the ledger schema
    #[error("Failed to create ledger schema: {0}")]
    MigrationFailed(String),

    /// A ledger query failed
    #[error("Ledger query failed: {0}")]
    QueryFailed(String),

    /// Seed listing contained an identifier already present in the ledger
    #[error("Duplicate object id in seed listing: {0}")]
    DuplicateId(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
