//! Read-only site operations
//!
//! A 404 answer means "absent" here: existence checks return `false`,
//! downloads and recycle-bin lookups return `None`. Every other non-success
//! status goes through [`classify`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use spconnector_core::domain::resources::ODataEnvelope;
use spconnector_core::domain::{ConnectorResult, DomainError, RecycleBinId, RecycleBinResource};
use spconnector_core::ports::ISiteQueries;
use tracing::debug;

use crate::classify::classify;
use crate::client::{read_json, send, HeaderProfile, SiteClient};

/// [`ISiteQueries`] over the site's REST API
pub struct SiteQueries {
    client: Arc<SiteClient>,
}

impl SiteQueries {
    /// Creates query operations on a shared client
    pub fn new(client: Arc<SiteClient>) -> Self {
        Self { client }
    }

    /// GETs an `/exists` endpoint and reads the boolean answer
    async fn exists(&self, endpoint: String) -> ConnectorResult<bool> {
        let configured = self.client.configure(HeaderProfile::JsonNoMetadata).await?;
        debug!(endpoint = %endpoint, "Checking existence");

        let response = send(configured.request(Method::GET, &endpoint), "existence check").await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(classify(response).await);
        }

        let json: Value = read_json(response, "existence check").await?;
        parse_exists(&json)
    }
}

/// Reads `value` (nometadata) or `d.Exists` (verbose)
fn parse_exists(json: &Value) -> ConnectorResult<bool> {
    json.get("value")
        .or_else(|| json.get("d").and_then(|d| d.get("Exists")))
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            DomainError::InvalidResponse("existence check answer has no boolean value".to_string())
        })
}

#[async_trait]
impl ISiteQueries for SiteQueries {
    async fn exists_folder(&self, path: &str) -> ConnectorResult<bool> {
        let endpoint = self.client.endpoints().folder_exists(path);
        self.exists(endpoint).await
    }

    async fn exists_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool> {
        let endpoint = self.client.endpoints().file_exists(path, file_name);
        self.exists(endpoint).await
    }

    async fn download_file(&self, path: &str, file_name: &str) -> ConnectorResult<Option<Vec<u8>>> {
        let configured = self.client.configure(HeaderProfile::DownloadFile).await?;
        let endpoint = self.client.endpoints().file_content(path, file_name);
        debug!(path, file_name, "Downloading file");

        let response = send(configured.request(Method::GET, &endpoint), "download").await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, file_name, "File not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(classify(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::transport("Failed to read file content", e))?;
        debug!(path, file_name, size = bytes.len(), "File downloaded");
        Ok(Some(bytes.to_vec()))
    }

    async fn get_recycle_bin_resource_by_id(
        &self,
        id: RecycleBinId,
    ) -> ConnectorResult<Option<RecycleBinResource>> {
        let configured = self.client.configure(HeaderProfile::Default).await?;
        let endpoint = self.client.endpoints().recycle_bin_item(id);
        debug!(%id, "Looking up recycle bin item");

        let response = send(configured.request(Method::GET, &endpoint), "recycle bin lookup").await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%id, "Recycle bin item not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(classify(response).await);
        }

        let envelope: ODataEnvelope<RecycleBinResource> =
            read_json(response, "recycle bin lookup").await?;
        Ok(Some(envelope.into_inner()))
    }
}
