//! Content-type to file-extension mapping
//!
//! The registry is loaded once at startup, either from an Apache-format
//! `mime.types` file or from a small built-in table, and consulted for every
//! datastream written to disk.
//!
//! Resolution policy, in order:
//! 1. Content types containing the substring `xml` map to `.xml`, whether or
//!    not they appear in the table. This is a fast path for XML variants
//!    like `application/rdf+xml` that Apache's table doesn't list verbatim.
//! 2. A registry hit yields the registered extension.
//! 3. Everything else falls back to `.bin`.

use crate::domain::{ExportError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Extension used when a content type is neither XML nor registered
const DEFAULT_EXTENSION: &str = ".bin";

/// Built-in fallback table for when no mime.types file is configured.
/// Covers the types commonly attached to Islandora datastreams.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("application/zip", "zip"),
    ("application/json", "json"),
    ("application/msword", "doc"),
    ("application/vnd.ms-excel", "xls"),
    ("application/vnd.ms-powerpoint", "ppt"),
    ("audio/mpeg", "mp3"),
    ("audio/x-wav", "wav"),
    ("image/gif", "gif"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/tiff", "tif"),
    ("image/jp2", "jp2"),
    ("text/plain", "txt"),
    ("text/html", "html"),
    ("text/csv", "csv"),
    ("video/mp4", "mp4"),
    ("video/quicktime", "mov"),
];

/// Maps a content-type string to a preferred file extension
#[derive(Debug, Clone)]
pub struct MimeRegistry {
    types: HashMap<String, String>,
}

impl MimeRegistry {
    /// Build a registry from the built-in table
    pub fn builtin() -> Self {
        let types = BUILTIN_TYPES
            .iter()
            .map(|(mime, ext)| (mime.to_string(), ext.to_string()))
            .collect();
        Self { types }
    }

    /// Build a registry from an Apache-format mime.types file
    ///
    /// Each non-comment line holds a content type followed by one or more
    /// extensions; the first extension is registered. The first mapping seen
    /// for a content type wins on duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Configuration(format!(
                "Failed to read mime types file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::parse(&contents))
    }

    fn parse(contents: &str) -> Self {
        let mut types = HashMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            if let (Some(mime), Some(ext)) = (parts.next(), parts.next()) {
                types
                    .entry(mime.to_string())
                    .or_insert_with(|| ext.to_string());
            }
        }
        tracing::debug!(count = types.len(), "Loaded mime type table");
        Self { types }
    }

    /// Resolve a content type to an extension, leading dot included
    pub fn extension_for(&self, content_type: &str) -> String {
        if content_type.contains("xml") {
            return ".xml".to_string();
        }
        match self.types.get(content_type) {
            Some(ext) => format!(".{ext}"),
            None => DEFAULT_EXTENSION.to_string(),
        }
    }
}
