//! Site data context use case
//!
//! [`SiteDataContext`] is the facade applications talk to. Single-step
//! operations are delegated to the query or command port unchanged; the
//! recycle-bin workflows chain two calls:
//!
//! - delete to recycle bin: command (get identifier) → query (fetch entry)
//! - restore: query (check entry exists) → command (restore)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{ConnectorResult, File, Folder, RecycleBinId, RecycleBinResource};
use crate::ports::{ISiteCommands, ISiteDataContext, ISiteQueries};

/// Facade composing the query and command ports
pub struct SiteDataContext {
    queries: Arc<dyn ISiteQueries>,
    commands: Arc<dyn ISiteCommands>,
}

impl SiteDataContext {
    /// Creates a new SiteDataContext with the required dependencies
    ///
    /// # Arguments
    ///
    /// * `queries` - Read-only operations against the site
    /// * `commands` - Mutating operations against the site
    pub fn new(queries: Arc<dyn ISiteQueries>, commands: Arc<dyn ISiteCommands>) -> Self {
        Self { queries, commands }
    }
}

#[async_trait]
impl ISiteDataContext for SiteDataContext {
    async fn get_recycle_bin_resource_by_id(
        &self,
        id: RecycleBinId,
    ) -> ConnectorResult<Option<RecycleBinResource>> {
        self.queries.get_recycle_bin_resource_by_id(id).await
    }

    async fn exists_folder(&self, path: &str) -> ConnectorResult<bool> {
        self.queries.exists_folder(path).await
    }

    async fn exists_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool> {
        self.queries.exists_file(path, file_name).await
    }

    async fn delete_resource(&self, path: &str) -> ConnectorResult<bool> {
        self.commands.delete_resource(path).await
    }

    async fn delete_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool> {
        self.commands.delete_file(path, file_name).await
    }

    async fn download_file(&self, path: &str, file_name: &str) -> ConnectorResult<Option<Vec<u8>>> {
        self.queries.download_file(path, file_name).await
    }

    async fn create_folder(&self, name: &str) -> ConnectorResult<Folder> {
        self.commands.create_folder(None, name).await
    }

    async fn create_folder_in(&self, parent: &str, name: &str) -> ConnectorResult<Folder> {
        self.commands.create_folder(Some(parent), name).await
    }

    async fn upload_file(
        &self,
        path: &str,
        file_name: &str,
        content: &[u8],
    ) -> ConnectorResult<File> {
        self.commands.upload_file(path, file_name, content).await
    }

    /// Moves a resource to the recycle bin, then fetches the new entry
    ///
    /// The two calls are not atomic. A failure in the lookup leaves the
    /// resource in the recycle bin and surfaces the lookup error.
    async fn delete_resource_to_recycle_bin_by_id(
        &self,
        path: &str,
    ) -> ConnectorResult<Option<RecycleBinResource>> {
        let id = self.commands.delete_resource_to_recycle_bin(path).await?;
        if id.is_nil() {
            debug!(path, "Nothing moved to recycle bin");
            return Ok(None);
        }

        info!(path, %id, "Resource moved to recycle bin");
        self.queries.get_recycle_bin_resource_by_id(id).await
    }

    /// Restores a recycle-bin item after confirming it is still there
    async fn restore_recycle_bin_resource_by_id(
        &self,
        id: RecycleBinId,
    ) -> ConnectorResult<Option<bool>> {
        if self
            .queries
            .get_recycle_bin_resource_by_id(id)
            .await?
            .is_none()
        {
            debug!(%id, "Recycle bin item not found, nothing to restore");
            return Ok(None);
        }

        let restored = self.commands.restore_recycle_bin_resource(id).await?;
        info!(%id, restored, "Recycle bin item restore finished");
        Ok(Some(restored))
    }
}
