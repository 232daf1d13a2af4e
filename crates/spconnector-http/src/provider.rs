//! Facade wiring
//!
//! Builds one shared [`SiteClient`] and hands it to both [`SiteQueries`]
//! and [`SiteCommands`], producing the [`SiteDataContext`] applications use.

use std::sync::Arc;

use spconnector_core::config::SiteConfiguration;
use spconnector_core::domain::{ConnectorResult, DomainError};
use spconnector_core::usecases::SiteDataContext;
use tracing::info;

use crate::client::SiteClient;
use crate::commands::SiteCommands;
use crate::queries::SiteQueries;

/// Validates the configuration and wires the facade on a default HTTP client
///
/// # Errors
///
/// [`DomainError::InvalidConfiguration`] listing every invalid field
pub fn connect(config: SiteConfiguration) -> ConnectorResult<SiteDataContext> {
    let errors = config.validate();
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(DomainError::InvalidConfiguration(message));
    }

    info!(site_url = %config.site_url, root = %config.server_relative_url, "Connecting to site");
    Ok(connect_with(SiteClient::new(Arc::new(config))))
}

/// Wires the facade around a preconfigured client
///
/// Use this to supply a custom `reqwest::Client` or enable the token cache.
/// The configuration is not validated again.
pub fn connect_with(client: SiteClient) -> SiteDataContext {
    let client = Arc::new(client);
    let queries = Arc::new(SiteQueries::new(Arc::clone(&client)));
    let commands = Arc::new(SiteCommands::new(client));
    SiteDataContext::new(queries, commands)
}
