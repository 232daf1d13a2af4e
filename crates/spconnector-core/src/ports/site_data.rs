//! Site data ports (driven/secondary ports)
//!
//! Every path argument is relative to the configured root
//! (`server_relative_url`); implementations concatenate the two before
//! sending anything.
//!
//! ## Design Notes
//!
//! - Uses [`ConnectorResult`] rather than `anyhow::Result` so callers can
//!   match on the typed error taxonomy.
//! - "Absent" is a value, not an error: existence checks return `false`,
//!   downloads and recycle-bin lookups return `None` when the site answers 404.
//! - Uses `#[async_trait]` for async trait methods.

use async_trait::async_trait;

use crate::domain::{ConnectorResult, File, Folder, RecycleBinId, RecycleBinResource};

// ============================================================================
// ISiteQueries
// ============================================================================

/// Read-only operations against the remote site
#[async_trait]
pub trait ISiteQueries: Send + Sync {
    /// Checks whether a folder exists
    ///
    /// # Returns
    /// `false` when the folder is missing, including a 404 answer
    async fn exists_folder(&self, path: &str) -> ConnectorResult<bool>;

    /// Checks whether a file exists inside a folder
    async fn exists_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool>;

    /// Downloads the raw content of a file
    ///
    /// # Returns
    /// The exact bytes served by the site, or `None` when the file does not exist
    async fn download_file(&self, path: &str, file_name: &str) -> ConnectorResult<Option<Vec<u8>>>;

    /// Looks up an item in the recycle bin
    ///
    /// # Returns
    /// `None` when no item carries the identifier
    async fn get_recycle_bin_resource_by_id(
        &self,
        id: RecycleBinId,
    ) -> ConnectorResult<Option<RecycleBinResource>>;
}

// ============================================================================
// ISiteCommands
// ============================================================================

/// Mutating operations against the remote site
#[async_trait]
pub trait ISiteCommands: Send + Sync {
    /// Creates a folder at `<root><parent>/<name>`, or `<root><name>` without a parent
    async fn create_folder(&self, parent: Option<&str>, name: &str) -> ConnectorResult<Folder>;

    /// Uploads a file, always overwriting an existing one with the same name
    async fn upload_file(&self, path: &str, file_name: &str, content: &[u8])
        -> ConnectorResult<File>;

    /// Permanently deletes a folder (or any resource addressed by path)
    async fn delete_resource(&self, path: &str) -> ConnectorResult<bool>;

    /// Permanently deletes a file inside a folder
    async fn delete_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool>;

    /// Moves a resource to the recycle bin
    ///
    /// # Returns
    /// The recycle-bin identifier, or [`RecycleBinId::nil`] when nothing was moved
    async fn delete_resource_to_recycle_bin(&self, path: &str) -> ConnectorResult<RecycleBinId>;

    /// Restores a recycle-bin item to its original location
    async fn restore_recycle_bin_resource(&self, id: RecycleBinId) -> ConnectorResult<bool>;
}

// ============================================================================
// ISiteDataContext
// ============================================================================

/// Facade exposed to applications
///
/// Combines the query and command ports and adds the two-step recycle-bin
/// workflows. Those workflows issue two sequential round trips with no
/// transaction between them: if the process stops after the delete but
/// before the lookup, the resource is in the recycle bin and its identifier
/// is lost. Treat them as at-most-once.
#[async_trait]
pub trait ISiteDataContext: Send + Sync {
    /// See [`ISiteQueries::get_recycle_bin_resource_by_id`]
    async fn get_recycle_bin_resource_by_id(
        &self,
        id: RecycleBinId,
    ) -> ConnectorResult<Option<RecycleBinResource>>;

    /// See [`ISiteQueries::exists_folder`]
    async fn exists_folder(&self, path: &str) -> ConnectorResult<bool>;

    /// See [`ISiteQueries::exists_file`]
    async fn exists_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool>;

    /// See [`ISiteCommands::delete_resource`]
    async fn delete_resource(&self, path: &str) -> ConnectorResult<bool>;

    /// See [`ISiteCommands::delete_file`]
    async fn delete_file(&self, path: &str, file_name: &str) -> ConnectorResult<bool>;

    /// See [`ISiteQueries::download_file`]
    async fn download_file(&self, path: &str, file_name: &str) -> ConnectorResult<Option<Vec<u8>>>;

    /// Creates a folder directly under the configured root
    async fn create_folder(&self, name: &str) -> ConnectorResult<Folder>;

    /// Creates a folder under `parent` (relative to the configured root)
    async fn create_folder_in(&self, parent: &str, name: &str) -> ConnectorResult<Folder>;

    /// See [`ISiteCommands::upload_file`]
    async fn upload_file(&self, path: &str, file_name: &str, content: &[u8])
        -> ConnectorResult<File>;

    /// Moves a resource to the recycle bin and returns the recycle-bin entry
    ///
    /// # Returns
    /// `None` when nothing was moved (nil identifier)
    async fn delete_resource_to_recycle_bin_by_id(
        &self,
        path: &str,
    ) -> ConnectorResult<Option<RecycleBinResource>>;

    /// Restores a recycle-bin item if it exists
    ///
    /// # Returns
    /// `None` when the identifier is unknown, otherwise the restore result
    async fn restore_recycle_bin_resource_by_id(
        &self,
        id: RecycleBinId,
    ) -> ConnectorResult<Option<bool>>;
}
