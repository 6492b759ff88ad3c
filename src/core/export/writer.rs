//! Datastream persistence
//!
//! Writes one datastream's content and profile to disk under the object's
//! `datastreams/` directory and applies the source creation timestamp to the
//! content file, so the exported tree preserves original dates for cold
//! storage audits.

use crate::core::layout::DATASTREAMS_DIR;
use crate::core::mime::MimeRegistry;
use crate::domain::{CreationDate, Datastream, ExportError, Profile, Result};
use serde::Serialize;
use std::fs::{File, FileTimes};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

/// Summary of one written datastream, keyed into the aggregate metadata
#[derive(Debug, Clone, Serialize)]
pub struct WrittenDatastream {
    /// Content type reported by the repository
    pub mime_type: String,
    /// Content file path relative to the object directory
    pub datastream_file: String,
    /// Metadata file path relative to the object directory
    pub metadata_file: String,
    /// Full datastream profile
    pub metadata: Profile,
}

/// Writes datastream content and metadata files
#[derive(Debug, Clone)]
pub struct DatastreamWriter {
    mime: Arc<MimeRegistry>,
}

impl DatastreamWriter {
    /// Create a writer using the given mime registry
    pub fn new(mime: Arc<MimeRegistry>) -> Self {
        Self { mime }
    }

    /// Write one datastream's content and metadata under `object_dir`
    ///
    /// The content file is `datastreams/<dsid><ext>` and the profile is
    /// serialized as pretty JSON to `datastreams/<dsid>_metadata.json`; both
    /// overwrite existing files so a retry converges to the same tree. When
    /// the profile carries a parseable creation date it is applied to the
    /// content file's access and modification times; failures there are
    /// logged as warnings and never fail the write.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] when either file cannot be written.
    pub fn write(
        &self,
        object_dir: &Path,
        dsid: &str,
        datastream: &Datastream,
    ) -> Result<WrittenDatastream> {
        let ext = self.mime.extension_for(&datastream.content_type);
        let content_rel = format!("{DATASTREAMS_DIR}/{dsid}{ext}");
        let metadata_rel = format!("{DATASTREAMS_DIR}/{dsid}_metadata.json");

        let content_path = object_dir.join(&content_rel);
        std::fs::write(&content_path, &datastream.content).map_err(|e| {
            ExportError::Io(format!(
                "Failed to write datastream {}: {}",
                content_path.display(),
                e
            ))
        })?;

        let metadata_path = object_dir.join(&metadata_rel);
        let metadata_json = serde_json::to_string_pretty(&datastream.profile)?;
        std::fs::write(&metadata_path, metadata_json).map_err(|e| {
            ExportError::Io(format!(
                "Failed to write datastream metadata {}: {}",
                metadata_path.display(),
                e
            ))
        })?;

        tracing::debug!(
            dsid = %dsid,
            path = %content_path.display(),
            mime_type = %datastream.content_type,
            "Wrote datastream"
        );

        self.apply_creation_date(&content_path, dsid, &datastream.profile);

        Ok(WrittenDatastream {
            mime_type: datastream.content_type.clone(),
            datastream_file: content_rel,
            metadata_file: metadata_rel,
            metadata: datastream.profile.clone(),
        })
    }

    /// Set the content file's atime/mtime from the profile's creation date.
    /// Unparseable dates and filesystem refusals downgrade to warnings.
    fn apply_creation_date(&self, content_path: &Path, dsid: &str, profile: &Profile) {
        let creation_date = CreationDate::from_profile(profile);
        if creation_date == CreationDate::Absent {
            return;
        }

        let Some(timestamp) = creation_date.resolve() else {
            tracing::warn!(
                dsid = %dsid,
                path = %content_path.display(),
                "Could not parse creation date, leaving file times unchanged"
            );
            return;
        };

        let system_time: SystemTime = timestamp.into();
        let times = FileTimes::new()
            .set_accessed(system_time)
            .set_modified(system_time);

        let result = File::options()
            .write(true)
            .open(content_path)
            .and_then(|file| file.set_times(times));

        if let Err(e) = result {
            tracing::warn!(
                dsid = %dsid,
                path = %content_path.display(),
                error = %e,
                "Could not set timestamp on datastream file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::PathPlanner;
    use crate::domain::ObjectId;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_datastream(content_type: &str, create_date: Option<&str>) -> Datastream {
        let mut profile = Profile::new();
        profile.insert("dsLabel".to_string(), json!("Test datastream"));
        profile.insert("dsState".to_string(), json!("A"));
        if let Some(date) = create_date {
            profile.insert("dsCreateDate".to_string(), json!(date));
        }
        Datastream {
            content: b"payload".to_vec(),
            content_type: content_type.to_string(),
            profile,
        }
    }

    fn planned_dir(base: &TempDir) -> std::path::PathBuf {
        let planner = PathPlanner::new(base.path());
        let id = ObjectId::new("demo:42").unwrap();
        planner.plan_object(&id).unwrap()
    }

    #[test]
    fn test_write_content_and_metadata() {
        let base = TempDir::new().unwrap();
        let dir = planned_dir(&base);
        let writer = DatastreamWriter::new(Arc::new(MimeRegistry::builtin()));

        let ds = test_datastream("application/pdf", None);
        let written = writer.write(&dir, "OBJ", &ds).unwrap();

        assert_eq!(written.mime_type, "application/pdf");
        assert_eq!(written.datastream_file, "datastreams/OBJ.pdf");
        assert_eq!(written.metadata_file, "datastreams/OBJ_metadata.json");
        assert_eq!(std::fs::read(dir.join("datastreams/OBJ.pdf")).unwrap(), b"payload");
    }

    #[test]
    fn test_metadata_round_trip() {
        let base = TempDir::new().unwrap();
        let dir = planned_dir(&base);
        let writer = DatastreamWriter::new(Arc::new(MimeRegistry::builtin()));

        let ds = test_datastream("text/xml", Some("2012-03-01T10:15:30.000Z"));
        writer.write(&dir, "MODS", &ds).unwrap();

        let raw = std::fs::read_to_string(dir.join("datastreams/MODS_metadata.json")).unwrap();
        let read_back: Profile = serde_json::from_str(&raw).unwrap();
        assert_eq!(read_back, ds.profile);
    }

    #[test]
    fn test_creation_date_applied_to_mtime() {
        let base = TempDir::new().unwrap();
        let dir = planned_dir(&base);
        let writer = DatastreamWriter::new(Arc::new(MimeRegistry::builtin()));

        let ds = test_datastream("application/pdf", Some("2012-03-01T10:15:30.000Z"));
        writer.write(&dir, "OBJ", &ds).unwrap();

        let mtime = std::fs::metadata(dir.join("datastreams/OBJ.pdf"))
            .unwrap()
            .modified()
            .unwrap();
        let expected: SystemTime = chrono::DateTime::parse_from_rfc3339("2012-03-01T10:15:30Z")
            .unwrap()
            .into();
        assert_eq!(mtime, expected);
    }

    #[test]
    fn test_unparseable_creation_date_is_non_fatal() {
        let base = TempDir::new().unwrap();
        let dir = planned_dir(&base);
        let writer = DatastreamWriter::new(Arc::new(MimeRegistry::builtin()));

        let ds = test_datastream("application/pdf", Some("yesterday-ish"));
        // The write itself must stand
        assert!(writer.write(&dir, "OBJ", &ds).is_ok());
        assert!(dir.join("datastreams/OBJ.pdf").exists());
    }

    #[test]
    fn test_overwrites_existing_files() {
        let base = TempDir::new().unwrap();
        let dir = planned_dir(&base);
        let writer = DatastreamWriter::new(Arc::new(MimeRegistry::builtin()));

        let mut ds = test_datastream("application/pdf", None);
        writer.write(&dir, "OBJ", &ds).unwrap();

        ds.content = b"replacement".to_vec();
        writer.write(&dir, "OBJ", &ds).unwrap();

        assert_eq!(
            std::fs::read(dir.join("datastreams/OBJ.pdf")).unwrap(),
            b"replacement"
        );
    }

    #[test]
    fn test_xml_content_gets_xml_extension() {
        let base = TempDir::new().unwrap();
        let dir = planned_dir(&base);
        let writer = DatastreamWriter::new(Arc::new(MimeRegistry::builtin()));

        let ds = test_datastream("application/rdf+xml", None);
        let written = writer.write(&dir, "RDF", &ds).unwrap();
        assert_eq!(written.datastream_file, "datastreams/RDF.xml");
    }
}
