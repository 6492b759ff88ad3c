//! In-memory model of a fetched repository object
//!
//! A [`RepositoryObject`] is the result of one `find_object` call: the
//! object-level profile plus every datastream's content and profile. Profiles
//! are kept as opaque JSON maps because Fedora's field set varies between
//! repository versions and local customizations; the export pipeline only
//! interprets `dsCreateDate`.

use crate::domain::ids::ObjectId;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// A mapping of descriptive fields attached to an object or datastream
pub type Profile = serde_json::Map<String, Value>;

/// One named payload attached to an object
#[derive(Debug, Clone)]
pub struct Datastream {
    /// Raw content bytes
    pub content: Vec<u8>,
    /// Content type reported by the fetch response headers
    pub content_type: String,
    /// Datastream profile (timestamps, labels, control state)
    pub profile: Profile,
}

/// A fetched repository object
#[derive(Debug, Clone)]
pub struct RepositoryObject {
    /// Object identifier
    pub id: ObjectId,
    /// Object-level profile
    pub profile: Profile,
    /// Datastreams keyed by dsid; BTreeMap keeps export order deterministic
    pub datastreams: BTreeMap<String, Datastream>,
}

/// A datastream creation date, resolved from the profile before use
///
/// The profile may carry the creation date as RFC 3339 text, as an
/// already-parsed timestamp (when constructed in-process), or not at all.
#[derive(Debug, Clone, PartialEq)]
pub enum CreationDate {
    /// Already a timestamp
    Timestamp(DateTime<Utc>),
    /// Text that still needs parsing
    Text(String),
    /// No creation date in the profile
    Absent,
}

impl CreationDate {
    /// Profile field holding the creation date, per the Fedora 3 datastream
    /// profile schema.
    pub const PROFILE_FIELD: &'static str = "dsCreateDate";

    /// Extract the creation date from a datastream profile
    pub fn from_profile(profile: &Profile) -> Self {
        match profile.get(Self::PROFILE_FIELD) {
            Some(Value::String(s)) if !s.is_empty() => CreationDate::Text(s.clone()),
            _ => CreationDate::Absent,
        }
    }

    /// Resolve to a concrete timestamp, if one can be produced
    ///
    /// `Text` values are parsed as RFC 3339; a parse failure yields `None`
    /// (the caller decides whether that is a warning or an error).
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            CreationDate::Timestamp(ts) => Some(*ts),
            CreationDate::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            CreationDate::Absent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_with(value: Value) -> Profile {
        let mut profile = Profile::new();
        profile.insert("dsCreateDate".to_string(), value);
        profile
    }

    #[test]
    fn test_creation_date_from_text() {
        let profile = profile_with(json!("2012-03-01T10:15:30.000Z"));
        let date = CreationDate::from_profile(&profile);
        assert!(matches!(date, CreationDate::Text(_)));

        let resolved = date.resolve().unwrap();
        assert_eq!(resolved.to_rfc3339(), "2012-03-01T10:15:30+00:00");
    }

    #[test]
    fn test_creation_date_absent() {
        let profile = Profile::new();
        assert_eq!(CreationDate::from_profile(&profile), CreationDate::Absent);
        assert!(CreationDate::from_profile(&profile).resolve().is_none());
    }

    #[test]
    fn test_creation_date_unparseable_text() {
        let profile = profile_with(json!("not a timestamp"));
        let date = CreationDate::from_profile(&profile);
        assert!(matches!(date, CreationDate::Text(_)));
        assert!(date.resolve().is_none());
    }

    #[test]
    fn test_creation_date_empty_string_is_absent() {
        let profile = profile_with(json!(""));
        assert_eq!(CreationDate::from_profile(&profile), CreationDate::Absent);
    }

    #[test]
    fn test_creation_date_timestamp_passthrough() {
        let ts = Utc::now();
        assert_eq!(CreationDate::Timestamp(ts).resolve(), Some(ts));
    }
}
