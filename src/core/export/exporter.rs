//! Single-object export
//!
//! [`ObjectExporter`] drives the full export of one repository object: fetch
//! the object with its datastreams, plan the on-disk directory, write every
//! datastream, then write the aggregate object metadata file.

use crate::adapters::fedora::{FedoraClient, Repository};
use crate::config::AppConfig;
use crate::core::layout::PathPlanner;
use crate::core::mime::MimeRegistry;
use crate::core::export::writer::{DatastreamWriter, WrittenDatastream};
use crate::domain::{ExportError, ObjectId, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Key under which per-datastream summaries are injected into the aggregate
/// object metadata
const DATASTREAMS_KEY: &str = "datastreams";

/// Outcome of a dry-run pass over one object
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Directory the object would be written to
    pub directory: PathBuf,
    /// Number of datastreams that would be written
    pub datastream_count: usize,
}

/// Exports one object at a time: fetch, plan, write
pub struct ObjectExporter {
    repository: Arc<dyn Repository>,
    planner: PathPlanner,
    writer: DatastreamWriter,
}

impl ObjectExporter {
    /// Create an exporter from its parts
    pub fn new(
        repository: Arc<dyn Repository>,
        planner: PathPlanner,
        mime: Arc<MimeRegistry>,
    ) -> Self {
        Self {
            repository,
            planner,
            writer: DatastreamWriter::new(mime),
        }
    }

    /// Build an exporter from application configuration: a Fedora client, a
    /// path planner rooted at the configured export directory, and a mime
    /// registry loaded from the configured table when one is set.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = FedoraClient::new(config.repository.clone())?;
        let mime = match &config.export.mime_types {
            Some(path) => MimeRegistry::from_file(path)?,
            None => MimeRegistry::builtin(),
        };
        let planner = PathPlanner::new(&config.export.base_dir);
        Ok(Self::new(Arc::new(client), planner, Arc::new(mime)))
    }

    /// The underlying repository handle
    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    /// Export one object to disk and return its directory
    ///
    /// Writes each datastream's content and metadata files, then an aggregate
    /// `<namespace>-<local>_metadata.json` in the object directory combining
    /// the object profile with a per-datastream summary map. All writes
    /// overwrite, so re-exporting an object converges to the same tree.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the fetch fails, or an I/O error when
    /// any file cannot be written. Nothing is recorded in the job ledger
    /// here; that is the batch runner's concern.
    pub async fn export_object(&self, id: &ObjectId) -> Result<PathBuf> {
        let started = Instant::now();
        let object = self.repository.find_object(id).await?;
        let object_dir = self.planner.plan_object(id)?;

        let mut written: Vec<(String, WrittenDatastream)> =
            Vec::with_capacity(object.datastreams.len());
        for (dsid, datastream) in &object.datastreams {
            let summary = self.writer.write(&object_dir, dsid, datastream)?;
            written.push((dsid.clone(), summary));
        }

        self.write_aggregate_metadata(&object_dir, id, object.profile, &written)?;

        tracing::info!(
            id = %id,
            directory = %object_dir.display(),
            datastreams = written.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Exported object"
        );

        Ok(object_dir)
    }

    /// Fetch the object and report what an export would do, without touching
    /// the filesystem
    pub async fn plan_export(&self, id: &ObjectId) -> Result<ExportPlan> {
        let object = self.repository.find_object(id).await?;
        Ok(ExportPlan {
            directory: self.planner.object_dir(id),
            datastream_count: object.datastreams.len(),
        })
    }

    /// Write `<namespace>-<local>_metadata.json`: the object profile with a
    /// `datastreams` map of per-datastream write summaries
    fn write_aggregate_metadata(
        &self,
        object_dir: &std::path::Path,
        id: &ObjectId,
        profile: crate::domain::Profile,
        written: &[(String, WrittenDatastream)],
    ) -> Result<()> {
        let mut aggregate = profile;
        let mut summaries = serde_json::Map::new();
        for (dsid, summary) in written {
            summaries.insert(dsid.clone(), serde_json::to_value(summary)?);
        }
        aggregate.insert(DATASTREAMS_KEY.to_string(), Value::Object(summaries));

        let path = object_dir.join(format!("{}_metadata.json", id.file_stem()));
        let json = serde_json::to_string_pretty(&aggregate)?;
        std::fs::write(&path, json).map_err(|e| {
            ExportError::Io(format!(
                "Failed to write object metadata {}: {}",
                path.display(),
                e
            ))
        })
    }
}
