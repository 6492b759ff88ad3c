//! Fedora 3 REST API client
//!
//! Fetches object profiles, datastream listings, datastream profiles, and
//! datastream content over the Fedora 3.x REST API (`format=json` variants
//! of the profile endpoints). Basic auth credentials come from
//! [`RepositoryConfig`]; the password is only exposed at request time.

use super::models::{value_into_profile, DatastreamProfileResponse, ListDatastreamsResponse};
use super::Repository;
use crate::config::RepositoryConfig;
use crate::domain::{
    Datastream, ExportError, ObjectId, Profile, RepositoryError, RepositoryObject, Result,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use std::collections::BTreeMap;
use std::time::Duration;

/// Content type assumed when the server omits the Content-Type header
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// HTTP client for a Fedora Commons 3 repository
pub struct FedoraClient {
    base_url: String,
    client: Client,
    config: RepositoryConfig,
}

impl FedoraClient {
    /// Create a new client from repository configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                ExportError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// The repository base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach basic auth credentials when configured
    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => {
                request.basic_auth(username, Some(password.expose_secret().as_ref()))
            }
            (Some(username), None) => request.basic_auth::<_, &str>(username, None),
            _ => request,
        }
    }

    /// Issue a GET and map transport/status failures into domain errors
    async fn get(&self, url: &str, not_found: RepositoryError) -> Result<Response> {
        let response = self
            .with_auth(self.client.get(url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RepositoryError::Timeout(url.to_string())
                } else {
                    RepositoryError::ConnectionFailed(e.to_string())
                }
            })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(not_found.into()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                RepositoryError::AuthenticationFailed(format!("{} rejected credentials", url))
                    .into(),
            ),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(RepositoryError::ServerError {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
        }
    }

    /// Fetch the object-level profile
    async fn fetch_object_profile(&self, id: &ObjectId) -> Result<Profile> {
        let url = format!("{}/objects/{}?format=json", self.base_url, id);
        let response = self
            .get(&url, RepositoryError::ObjectNotFound(id.to_string()))
            .await?;
        let value = response
            .json()
            .await
            .map_err(|e| RepositoryError::InvalidResponse(e.to_string()))?;
        Ok(value_into_profile(value))
    }

    /// List the object's datastream ids
    async fn list_datastreams(&self, id: &ObjectId) -> Result<Vec<String>> {
        let url = format!("{}/objects/{}/datastreams?format=json", self.base_url, id);
        let response = self
            .get(&url, RepositoryError::ObjectNotFound(id.to_string()))
            .await?;
        let listing: ListDatastreamsResponse = response
            .json()
            .await
            .map_err(|e| RepositoryError::InvalidResponse(e.to_string()))?;
        Ok(listing
            .object_datastreams
            .datastream
            .into_iter()
            .map(|ds| ds.dsid)
            .collect())
    }

    /// Fetch one datastream's profile
    async fn fetch_datastream_profile(&self, id: &ObjectId, dsid: &str) -> Result<Profile> {
        let url = format!(
            "{}/objects/{}/datastreams/{}?format=json",
            self.base_url, id, dsid
        );
        let not_found = RepositoryError::DatastreamNotFound {
            id: id.to_string(),
            dsid: dsid.to_string(),
        };
        let response = self.get(&url, not_found).await?;
        let profile: DatastreamProfileResponse = response
            .json()
            .await
            .map_err(|e| RepositoryError::InvalidResponse(e.to_string()))?;
        Ok(profile.into_profile())
    }

    /// Fetch one datastream's raw content plus its response content type
    async fn fetch_datastream_content(
        &self,
        id: &ObjectId,
        dsid: &str,
    ) -> Result<(Vec<u8>, String)> {
        let url = format!(
            "{}/objects/{}/datastreams/{}/content",
            self.base_url, id, dsid
        );
        let not_found = RepositoryError::DatastreamNotFound {
            id: id.to_string(),
            dsid: dsid.to_string(),
        };
        let response = self.get(&url, not_found).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Ok((body.to_vec(), content_type))
    }
}

#[async_trait]
impl Repository for FedoraClient {
    async fn find_object(&self, id: &ObjectId) -> Result<RepositoryObject> {
        tracing::debug!(id = %id, "Fetching object from repository");

        let profile = self.fetch_object_profile(id).await?;
        let dsids = self.list_datastreams(id).await?;

        let mut datastreams = BTreeMap::new();
        for dsid in dsids {
            let (content, content_type) = self.fetch_datastream_content(id, &dsid).await?;
            let ds_profile = self.fetch_datastream_profile(id, &dsid).await?;
            tracing::trace!(
                id = %id,
                dsid = %dsid,
                content_type = %content_type,
                size = content.len(),
                "Fetched datastream"
            );
            datastreams.insert(
                dsid,
                Datastream {
                    content,
                    content_type,
                    profile: ds_profile,
                },
            );
        }

        Ok(RepositoryObject {
            id: id.clone(),
            profile,
            datastreams,
        })
    }

    async fn health_check(&self) -> Result<()> {
        let test_object = self.config.test_object.as_deref().ok_or_else(|| {
            ExportError::Configuration(
                "repository.test_object is required for the connectivity check".to_string(),
            )
        })?;
        let id = ObjectId::new(test_object).map_err(ExportError::InvalidIdentifier)?;
        let dsid = &self.config.test_datastream;

        let object = self.find_object(&id).await?;
        if !object.datastreams.contains_key(dsid) {
            return Err(RepositoryError::DatastreamNotFound {
                id: id.to_string(),
                dsid: dsid.clone(),
            }
            .into());
        }

        tracing::info!(
            base_url = %self.base_url,
            test_object = %id,
            "Repository connectivity check passed"
        );
        Ok(())
    }
}
