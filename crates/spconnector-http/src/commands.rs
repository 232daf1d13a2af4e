//! Mutating site operations
//!
//! Deletes and the recycle-bin move are POSTs carrying the
//! [`HeaderProfile::DeleteResource`] verb override. Only the recycle-bin move
//! translates a 404 into a value (the nil identifier); every other
//! non-success status goes through [`classify`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde_json::{json, Value};
use spconnector_core::domain::resources::ODataEnvelope;
use spconnector_core::domain::{ConnectorResult, DomainError, File, Folder, RecycleBinId};
use spconnector_core::ports::ISiteCommands;
use tracing::{debug, info};

use crate::classify::classify;
use crate::client::{read_json, send, HeaderProfile, SiteClient};

/// [`ISiteCommands`] over the site's REST API
pub struct SiteCommands {
    client: Arc<SiteClient>,
}

impl SiteCommands {
    /// Creates command operations on a shared client
    pub fn new(client: Arc<SiteClient>) -> Self {
        Self { client }
    }

    /// Issues a verb-override delete against an endpoint
    async fn delete(&self, endpoint: &str) -> ConnectorResult<bool> {
        let configured = self.client.configure(HeaderProfile::DeleteResource).await?;
        let response = send(configured.request(Method::POST, endpoint), "delete").await?;
        ensure_success(response).await?;
        Ok(true)
    }
}

/// Passes success responses through and classifies everything else
async fn ensure_success(response: Response) -> ConnectorResult<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(classify(response).await)
    }
}

/// Reads the recycle-bin identifier from a `recycle()` answer
///
/// The identifier arrives as `value` (nometadata / minimal metadata) or as
/// `d.Recycle` (verbose). A missing or empty value means nothing was moved.
fn parse_recycle_id(json: &Value) -> ConnectorResult<RecycleBinId> {
    let raw = json
        .get("value")
        .or_else(|| json.get("d").and_then(|d| d.get("Recycle")))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if raw.is_empty() {
        return Ok(RecycleBinId::nil());
    }
    raw.parse()
}

#[async_trait]
impl ISiteCommands for SiteCommands {
    async fn create_folder(&self, parent: Option<&str>, name: &str) -> ConnectorResult<Folder> {
        let configured = self.client.configure(HeaderProfile::JsonNoMetadata).await?;
        let endpoints = self.client.endpoints();
        let folder_url = endpoints.folder_url(parent, name);
        debug!(folder_url = %folder_url, "Creating folder");

        let request = configured
            .request(Method::POST, endpoints.folders())
            .json(&json!({ "ServerRelativeUrl": folder_url }));
        let response = ensure_success(send(request, "create folder").await?).await?;

        let folder = read_json::<ODataEnvelope<Folder>>(response, "create folder")
            .await?
            .into_inner();
        info!(folder_url = %folder.server_relative_url, "Folder created");
        Ok(folder)
    }

    async fn upload_file(
        &self,
        path: &str,
        file_name: &str,
        content: &[u8],
    ) -> ConnectorResult<File> {
        let configured = self.client.configure(HeaderProfile::JsonNoMetadata).await?;
        let endpoint = self.client.endpoints().file_add(path, file_name);
        debug!(path, file_name, size = content.len(), "Uploading file");

        let request = configured
            .request(Method::POST, &endpoint)
            .body(content.to_vec());
        let response = ensure_success(send(request, "upload").await?).await?;

        let file = read_json::<ODataEnvelope<File>>(response, "upload")
            .await?
            .into_inner();
        info!(file_url = %file.server_relative_url, "File uploaded");
        Ok(file)
    }

    async fn delete_resource(&self, path: &str) -> ConnectorResult<bool> {
        let endpoint = self.client.endpoints().resource(path);
        debug!(path, "Deleting resource");
        let deleted = self.delete(&endpoint).await?;
        info!(path, "Resource deleted");
        Ok(deleted)
    }

    async fn delete_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool> {
        let endpoint = self.client.endpoints().file_resource(path, file_name);
        debug!(path, file_name, "Deleting file");
        let deleted = self.delete(&endpoint).await?;
        info!(path, file_name, "File deleted");
        Ok(deleted)
    }

    async fn delete_resource_to_recycle_bin(&self, path: &str) -> ConnectorResult<RecycleBinId> {
        let configured = self.client.configure(HeaderProfile::DeleteResource).await?;
        let endpoint = self.client.endpoints().recycle(path);
        debug!(path, "Moving resource to recycle bin");

        let response = send(configured.request(Method::POST, &endpoint), "recycle").await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(path, "Nothing to recycle");
            return Ok(RecycleBinId::nil());
        }
        let response = ensure_success(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::transport("Failed to read recycle response", e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RecycleBinId::nil());
        }
        let json: Value = serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::InvalidResponse(format!("Failed to parse recycle response: {e}"))
        })?;

        let id = parse_recycle_id(&json)?;
        info!(path, %id, "Recycle request finished");
        Ok(id)
    }

    async fn restore_recycle_bin_resource(&self, id: RecycleBinId) -> ConnectorResult<bool> {
        let configured = self.client.configure(HeaderProfile::Default).await?;
        let endpoint = self.client.endpoints().recycle_bin_restore(id);
        debug!(%id, "Restoring recycle bin item");

        let response = send(configured.request(Method::POST, &endpoint), "restore").await?;
        ensure_success(response).await?;
        info!(%id, "Recycle bin item restored");
        Ok(true)
    }
}
