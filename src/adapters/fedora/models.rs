//! Fedora 3 REST API response models
//!
//! Only the datastream listing has a fixed shape worth modelling; object and
//! datastream profiles are passed through as opaque JSON maps because their
//! field sets vary across Fedora versions.

use crate::domain::Profile;
use serde::Deserialize;
use serde_json::Value;

/// Response envelope of `GET /objects/<pid>/datastreams?format=json`
#[derive(Debug, Deserialize)]
pub struct ListDatastreamsResponse {
    #[serde(rename = "objectDatastreams")]
    pub object_datastreams: ObjectDatastreams,
}

/// Inner listing object
#[derive(Debug, Deserialize)]
pub struct ObjectDatastreams {
    #[serde(default)]
    pub datastream: Vec<DatastreamRef>,
}

/// One entry of the datastream listing
#[derive(Debug, Clone, Deserialize)]
pub struct DatastreamRef {
    pub dsid: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
}

/// Response envelope of `GET /objects/<pid>/datastreams/<dsid>?format=json`
#[derive(Debug, Deserialize)]
pub struct DatastreamProfileResponse {
    #[serde(rename = "datastreamProfile")]
    pub datastream_profile: Value,
}

impl DatastreamProfileResponse {
    /// The profile as a field map (empty when the server returned a
    /// non-object payload)
    pub fn into_profile(self) -> Profile {
        match self.datastream_profile {
            Value::Object(map) => map,
            _ => Profile::new(),
        }
    }
}

/// Convert an object-profile payload (`GET /objects/<pid>?format=json`) into
/// a field map
pub fn value_into_profile(value: Value) -> Profile {
    match value {
        Value::Object(map) => map,
        _ => Profile::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_datastream_listing() {
        let payload = json!({
            "objectDatastreams": {
                "datastream": [
                    {"dsid": "DC", "label": "Dublin Core", "mimeType": "text/xml"},
                    {"dsid": "OBJ", "mimeType": "application/pdf"}
                ]
            }
        });

        let parsed: ListDatastreamsResponse = serde_json::from_value(payload).unwrap();
        let entries = parsed.object_datastreams.datastream;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].dsid, "DC");
        assert_eq!(entries[1].mime_type.as_deref(), Some("application/pdf"));
        assert!(entries[1].label.is_none());
    }

    #[test]
    fn test_parse_empty_listing() {
        let payload = json!({"objectDatastreams": {}});
        let parsed: ListDatastreamsResponse = serde_json::from_value(payload).unwrap();
        assert!(parsed.object_datastreams.datastream.is_empty());
    }

    #[test]
    fn test_datastream_profile_into_map() {
        let payload = json!({
            "datastreamProfile": {
                "dsLabel": "Dublin Core",
                "dsCreateDate": "2012-03-01T10:15:30.000Z"
            }
        });

        let parsed: DatastreamProfileResponse = serde_json::from_value(payload).unwrap();
        let profile = parsed.into_profile();
        assert_eq!(
            profile.get("dsCreateDate").and_then(|v| v.as_str()),
            Some("2012-03-01T10:15:30.000Z")
        );
    }

    #[test]
    fn test_non_object_profile_becomes_empty() {
        assert!(value_into_profile(json!("scalar")).is_empty());
    }
}
