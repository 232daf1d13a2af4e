//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the operations the core depends on; the HTTP adapter in
//! `spconnector-http` implements them against the remote site.
//!
//! ## Ports Overview
//!
//! - [`ISiteQueries`] - Read-only calls (existence checks, download, recycle-bin lookup)
//! - [`ISiteCommands`] - Mutating calls (create, upload, delete, recycle, restore)
//! - [`ISiteDataContext`] - The facade contract exposed to callers

pub mod site_data;

pub use site_data::{ISiteCommands, ISiteDataContext, ISiteQueries};
