//! Core domain types and models
//!
//! This module contains the domain layer: error types, the crate-wide
//! [`Result`] alias, validated identifiers, and the in-memory model of a
//! fetched repository object.

pub mod errors;
pub mod ids;
pub mod object;
pub mod result;

// Re-export commonly used items
pub use errors::{ExportError, LedgerError, RepositoryError};
pub use ids::ObjectId;
pub use object::{CreationDate, Datastream, Profile, RepositoryObject};
pub use result::Result;
