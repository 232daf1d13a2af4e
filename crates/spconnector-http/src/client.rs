//! Request builder for the remote site
//!
//! [`SiteClient`] owns the HTTP client, the shared configuration and the
//! token provider. For every operation it hands out a [`ConfiguredClient`]
//! carrying a bearer token and the headers of one [`HeaderProfile`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use reqwest::Method;
//! use spconnector_core::config::SiteConfiguration;
//! use spconnector_http::client::{HeaderProfile, SiteClient};
//!
//! # async fn example(config: SiteConfiguration) -> anyhow::Result<()> {
//! let client = SiteClient::new(Arc::new(config));
//! let configured = client.configure(HeaderProfile::JsonNoMetadata).await?;
//! let response = configured
//!     .request(Method::GET, "_api/web/folders")
//!     .send()
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, IF_MATCH};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use spconnector_core::config::SiteConfiguration;
use spconnector_core::domain::{AccessToken, ConnectorResult, DomainError};
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::endpoints::Endpoints;

/// `Accept` value asking the site for plain JSON without OData metadata
const ACCEPT_JSON_NO_METADATA: &str = "application/json;odata=nometadata";

/// `Accept` value for raw file content
const ACCEPT_OCTET_STREAM: &str = "application/octet-stream";

const X_REQUEST_DIGEST: &str = "x-requestdigest";
const X_HTTP_METHOD: &str = "x-http-method";
const BINARY_STRING_REQUEST_BODY: &str = "binarystringrequestbody";

// ============================================================================
// HeaderProfile
// ============================================================================

/// Header set attached to a request, chosen per operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    /// Bearer token only (recycle-bin lookup and restore)
    Default,
    /// Raw content retrieval
    DownloadFile,
    /// Delete expressed as POST with a verb override
    DeleteResource,
    /// Plain JSON answers (existence checks, folder creation, upload)
    JsonNoMetadata,
}

impl HeaderProfile {
    /// Builds the profile-specific headers
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidConfiguration`] when the form digest is not a
    /// valid header value
    pub fn headers(&self, form_digest: &str) -> ConnectorResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        match self {
            Self::Default => {}
            Self::DownloadFile => {
                headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_OCTET_STREAM));
                headers.insert(
                    HeaderName::from_static(BINARY_STRING_REQUEST_BODY),
                    HeaderValue::from_static("true"),
                );
            }
            Self::DeleteResource => {
                let digest = HeaderValue::from_str(form_digest).map_err(|_| {
                    DomainError::InvalidConfiguration(
                        "form_digest is not a valid header value".to_string(),
                    )
                })?;
                headers.insert(HeaderName::from_static(X_REQUEST_DIGEST), digest);
                headers.insert(IF_MATCH, HeaderValue::from_static("*"));
                headers.insert(
                    HeaderName::from_static(X_HTTP_METHOD),
                    HeaderValue::from_static("DELETE"),
                );
            }
            Self::JsonNoMetadata => {
                headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON_NO_METADATA));
            }
        }
        Ok(headers)
    }
}

// ============================================================================
// SiteClient
// ============================================================================

/// Authenticated entry point to the site's REST API
pub struct SiteClient {
    /// The underlying HTTP client
    http: Client,
    /// Shared, read-only site configuration
    config: Arc<SiteConfiguration>,
    /// Source of bearer tokens
    tokens: TokenProvider,
}

impl SiteClient {
    /// Creates a new SiteClient for the given configuration
    pub fn new(config: Arc<SiteConfiguration>) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Creates a SiteClient on a caller-supplied HTTP client
    ///
    /// This is where callers impose timeouts: the connector itself never
    /// cancels or retries a request.
    pub fn with_http_client(config: Arc<SiteConfiguration>, http: Client) -> Self {
        let tokens = TokenProvider::with_http_client(Arc::clone(&config), http.clone());
        Self {
            http,
            config,
            tokens,
        }
    }

    /// Enables reuse of bearer tokens until shortly before they expire
    pub fn with_token_cache(mut self) -> Self {
        self.tokens = self.tokens.with_cache();
        debug!("Token cache enabled on SiteClient");
        self
    }

    /// Returns the site configuration
    pub fn config(&self) -> &SiteConfiguration {
        &self.config
    }

    /// Returns the token provider
    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    /// Endpoint helpers for the configured root
    pub fn endpoints(&self) -> Endpoints<'_> {
        Endpoints::new(&self.config.server_relative_url)
    }

    /// Acquires a token and returns a client configured for `profile`
    ///
    /// Every call performs a token exchange unless the token cache is enabled.
    ///
    /// # Errors
    ///
    /// [`DomainError::Unauthorized`] when the token endpoint rejects the
    /// credentials or issues an empty token
    pub async fn configure(&self, profile: HeaderProfile) -> ConnectorResult<ConfiguredClient<'_>> {
        let token = self.tokens.acquire_token().await?;
        if token.is_empty() {
            warn!("Token endpoint answered without an access_token");
            return Err(DomainError::Unauthorized(Some(
                "token endpoint returned no access_token".to_string(),
            )));
        }

        let headers = profile.headers(self.config.form_digest())?;
        Ok(ConfiguredClient {
            http: &self.http,
            base_url: &self.config.site_url,
            token,
            headers,
            profile,
        })
    }
}

// ============================================================================
// ConfiguredClient
// ============================================================================

/// A token plus one header profile, ready to issue requests
pub struct ConfiguredClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: AccessToken,
    headers: HeaderMap,
    profile: HeaderProfile,
}

impl ConfiguredClient<'_> {
    /// Creates an authenticated request builder for the given method and path
    ///
    /// Relative paths are appended to the site base URL; absolute URLs are
    /// used unchanged.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };
        self.http
            .request(method, &url)
            .bearer_auth(self.token.secret())
            .headers(self.headers.clone())
    }

    /// Returns the header profile this client was configured with
    pub fn profile(&self) -> HeaderProfile {
        self.profile
    }

    /// Returns the profile-specific headers (without `Authorization`)
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// Sends a request, mapping transport failures to [`DomainError::Transport`]
pub(crate) async fn send(request: RequestBuilder, action: &str) -> ConnectorResult<Response> {
    request
        .send()
        .await
        .map_err(|e| DomainError::transport(format!("Failed to send {action} request"), e))
}

/// Reads a success body and deserializes it
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    action: &str,
) -> ConnectorResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| DomainError::transport(format!("Failed to read {action} response"), e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| DomainError::InvalidResponse(format!("Failed to parse {action} response: {e}")))
}
