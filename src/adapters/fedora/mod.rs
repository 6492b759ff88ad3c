//! Fedora Commons 3 repository adapter
//!
//! [`Repository`] is the seam the export pipeline depends on: everything the
//! pipeline needs from the source repository is "fetch one object, with all
//! of its datastreams" plus a connectivity check. [`FedoraClient`] is the
//! concrete implementation speaking the Fedora 3 REST API.

pub mod client;
pub mod models;

use crate::domain::{ObjectId, RepositoryObject, Result};
use async_trait::async_trait;

pub use client::FedoraClient;

/// Object-fetch capability provided by the source repository
///
/// Implementations must be cheap to share behind an `Arc`; the batch runner
/// holds one instance for the lifetime of a run.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Fetch one object: object profile plus every datastream's content,
    /// content type, and profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RepositoryError::ObjectNotFound`] when the
    /// identifier does not exist, or a connection-level error when the
    /// repository is unreachable.
    async fn find_object(&self, id: &ObjectId) -> Result<RepositoryObject>;

    /// Verify connectivity by fetching the configured test object and
    /// checking that its designated datastream is present.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository is unreachable, credentials are
    /// rejected, or the test datastream is missing.
    async fn health_check(&self) -> Result<()>;
}
