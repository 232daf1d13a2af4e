//! spconnector HTTP - REST adapter for the remote site
//!
//! Implements the core ports over the site's `_api/web` endpoints:
//! - OAuth client-credentials token exchange
//! - Per-operation header profiles on an authenticated request builder
//! - Status-driven error classification into [`DomainError`]
//! - Query and command operations, wired into the facade by [`connect`]
//!
//! ## Modules
//!
//! - [`auth`] - Token provider for the client-credentials grant
//! - [`client`] - Request builder and header profiles
//! - [`endpoints`] - URL construction from the configured root
//! - [`classify`] - Error classifier for non-success responses
//! - [`queries`] - Existence checks, download, recycle-bin lookup
//! - [`commands`] - Folder creation, upload, delete, recycle, restore
//! - [`provider`] - Facade wiring
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spconnector_core::config::SiteConfiguration;
//! use spconnector_core::ports::ISiteDataContext;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SiteConfiguration::load(&SiteConfiguration::default_path())?;
//! let site = spconnector_http::connect(config)?;
//! if !site.exists_folder("Reports").await? {
//!     site.create_folder("Reports").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod classify;
pub mod client;
pub mod commands;
pub mod endpoints;
pub mod provider;
pub mod queries;

pub use client::{HeaderProfile, SiteClient};
pub use provider::{connect, connect_with};
pub use spconnector_core::domain::{ConnectorResult, DomainError};
