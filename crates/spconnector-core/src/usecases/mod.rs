//! Use cases (interactors) for spconnector
//!
//! ## Use Cases
//!
//! - [`SiteDataContext`] - Facade over queries and commands, including the
//!   two-step recycle-bin workflows

pub mod data_context;

pub use data_context::SiteDataContext;
