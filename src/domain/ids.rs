//! Domain identifier types with validation
//!
//! This module provides a newtype wrapper for Fedora object identifiers.
//! An object id has the form `<namespace>:<local>` (e.g. `qsr-object:189208`);
//! the local part must be at least two characters long because the on-disk
//! layout shards objects by the first two characters of the local part.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fedora object identifier (PID) newtype wrapper
///
/// Splits on the first colon into a namespace and a local part, both of
/// which are validated at construction.
///
/// # Examples
///
/// ```
/// use fcrepo_export::domain::ids::ObjectId;
/// use std::str::FromStr;
///
/// let id = ObjectId::from_str("qsr-object:189208").unwrap();
/// assert_eq!(id.namespace(), "qsr-object");
/// assert_eq!(id.local(), "189208");
/// assert_eq!(id.shard(), "18");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Creates a new ObjectId from a string
    ///
    /// # Errors
    ///
    /// Returns `Err` when the identifier does not split into a namespace and
    /// a local part on the first colon, or when the local part is shorter
    /// than two characters.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let (namespace, local) = match id.split_once(':') {
            Some(parts) => parts,
            None => {
                return Err(format!(
                    "Invalid object id '{id}': expected format <namespace>:<local>"
                ))
            }
        };
        if namespace.is_empty() {
            return Err(format!("Invalid object id '{id}': empty namespace"));
        }
        if local.chars().count() < 2 {
            return Err(format!(
                "Invalid object id '{id}': local part must be at least 2 characters"
            ));
        }
        Ok(Self(id))
    }

    /// Returns the full identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The namespace part (before the first colon)
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map(|(ns, _)| ns).unwrap_or(&self.0)
    }

    /// The local part (after the first colon)
    pub fn local(&self) -> &str {
        self.0.split_once(':').map(|(_, local)| local).unwrap_or("")
    }

    /// The two-character shard prefix of the local part
    pub fn shard(&self) -> &str {
        let local = self.local();
        let end = local
            .char_indices()
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or(local.len());
        &local[..end]
    }

    /// Filesystem-safe stem for the aggregate metadata file (colon → hyphen)
    pub fn file_stem(&self) -> String {
        self.0.replace(':', "-")
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_id() {
        let id = ObjectId::new("qsr-object:189208").unwrap();
        assert_eq!(id.namespace(), "qsr-object");
        assert_eq!(id.local(), "189208");
        assert_eq!(id.shard(), "18");
        assert_eq!(id.file_stem(), "qsr-object-189208");
    }

    #[test]
    fn test_colon_in_local_part() {
        // Only the first colon splits namespace from local
        let id = ObjectId::new("ns:a:b").unwrap();
        assert_eq!(id.namespace(), "ns");
        assert_eq!(id.local(), "a:b");
    }

    #[test]
    fn test_missing_colon_rejected() {
        assert!(ObjectId::new("no-colon-here").is_err());
    }

    #[test]
    fn test_short_local_part_rejected() {
        assert!(ObjectId::new("ns:1").is_err());
        assert!(ObjectId::new("ns:").is_err());
    }

    #[test]
    fn test_empty_namespace_rejected() {
        assert!(ObjectId::new(":189208").is_err());
    }

    #[test]
    fn test_two_char_local_part_accepted() {
        let id = ObjectId::new("ns:ab").unwrap();
        assert_eq!(id.shard(), "ab");
    }

    #[test]
    fn test_display_roundtrip() {
        let id = ObjectId::new("demo:42").unwrap();
        assert_eq!(id.to_string(), "demo:42");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = ObjectId::new("demo:42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"demo:42\"");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let result: Result<ObjectId, _> = serde_json::from_str("\"bad\"");
        assert!(result.is_err());
    }
}
