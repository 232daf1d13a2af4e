//! Domain entities and error types
//!
//! This module contains the core domain types for the connector:
//! - Newtypes for the bearer token and recycle-bin identifiers
//! - Resource types returned by the remote site (folders, files, recycle-bin items)
//! - The connector error taxonomy

pub mod errors;
pub mod newtypes;
pub mod resources;

// Re-export commonly used types
pub use errors::{ConnectorResult, DomainError};
pub use newtypes::{AccessToken, RecycleBinId};
pub use resources::{File, Folder, RecycleBinItemState, RecycleBinResource};
