//! spconnector core - Domain types and contracts for the site connector
//!
//! This crate contains the hexagonal core of the connector:
//! - **Configuration** - `SiteConfiguration`, loaded from YAML or built in code
//! - **Domain types** - `Folder`, `File`, `RecycleBinResource`, `AccessToken`, `RecycleBinId`
//! - **Error taxonomy** - `DomainError`, the single error surfaced by every operation
//! - **Port definitions** - `ISiteQueries`, `ISiteCommands`, `ISiteDataContext`
//! - **Use cases** - `SiteDataContext`, the facade composing queries and commands
//!
//! # Architecture
//!
//! Ports define the read-only and mutating operations against the remote site.
//! The HTTP adapter lives in `spconnector-http`; this crate has no network
//! dependency so the facade workflows can be exercised against fakes.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
