//! On-disk directory layout for exported objects
//!
//! Objects land in a sharded tree derived from their identifier. For object
//! `<type>:<local>` under base directory `base`:
//!
//! ```text
//! base/<type>/<local[0:2]>/<local>/
//!     datastreams/
//! ```
//!
//! Sharding on the first two characters of the local part keeps directory
//! fan-out manageable for repositories with hundreds of thousands of objects
//! per namespace.

use crate::domain::{ExportError, ObjectId, Result};
use std::path::{Path, PathBuf};

/// Subdirectory holding datastream content and per-datastream metadata
pub const DATASTREAMS_DIR: &str = "datastreams";

/// Derives and creates the destination directory for an object
#[derive(Debug, Clone)]
pub struct PathPlanner {
    base_dir: PathBuf,
}

impl PathPlanner {
    /// Create a planner rooted at the given base directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The base directory all objects are planned under
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Compute the object directory without touching the filesystem
    pub fn object_dir(&self, id: &ObjectId) -> PathBuf {
        self.base_dir
            .join(id.namespace())
            .join(id.shard())
            .join(id.local())
    }

    /// Plan the directory for a raw identifier string
    ///
    /// Validates the identifier, then creates the object directory and its
    /// `datastreams` subdirectory if absent. Creation is idempotent. Returns
    /// the object directory (the parent of `datastreams`).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidIdentifier`] for malformed identifiers
    /// (no directory is created in that case), or [`ExportError::Io`] when
    /// directory creation fails.
    pub fn plan(&self, id: &str) -> Result<PathBuf> {
        let id = ObjectId::new(id).map_err(ExportError::InvalidIdentifier)?;
        self.plan_object(&id)
    }

    /// Plan the directory for an already-validated identifier
    pub fn plan_object(&self, id: &ObjectId) -> Result<PathBuf> {
        let object_dir = self.object_dir(id);
        let datastreams_dir = object_dir.join(DATASTREAMS_DIR);

        std::fs::create_dir_all(&datastreams_dir).map_err(|e| {
            ExportError::Io(format!(
                "Failed to create object directory {}: {}",
                datastreams_dir.display(),
                e
            ))
        })?;

        Ok(object_dir)
    }
}
