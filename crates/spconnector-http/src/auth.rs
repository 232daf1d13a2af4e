//! OAuth client-credentials token exchange
//!
//! The site's authentication endpoint issues short-lived bearer tokens for a
//! `client_id` / `client_secret` pair. [`TokenProvider`] posts the four
//! form-encoded credential fields to `<authentication_url>/tokens/oAuth/2`
//! and extracts `access_token` from the JSON answer.
//!
//! ## Design Notes
//!
//! - By default every call is a fresh exchange; the token lifetime is not
//!   tracked. [`TokenProvider::with_cache`] turns on an in-memory cache that
//!   reuses a token until shortly before its `expires_in`.
//! - A missing `access_token` yields an empty [`AccessToken`]; the request
//!   builder treats that as an authentication failure.
//! - Tokens and secrets are never logged.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use spconnector_core::config::SiteConfiguration;
use spconnector_core::domain::{AccessToken, ConnectorResult, DomainError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Lifetime assumed when the token response carries no `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Upper bound on the lifetime trusted from a token response
const MAX_EXPIRES_IN_SECS: i64 = 24 * 60 * 60;

/// Cached tokens are refreshed this long before they actually expire
const EXPIRY_SKEW_SECS: i64 = 60;

// ============================================================================
// CachedToken
// ============================================================================

/// A token held by the optional cache together with its expiry
#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token will expire within the given duration
    fn expires_within(&self, duration: Duration) -> bool {
        Utc::now() + duration >= self.expires_at
    }
}

/// Token and expiry extracted from a token endpoint answer
#[derive(Debug)]
struct IssuedToken {
    token: AccessToken,
    expires_at: DateTime<Utc>,
}

// ============================================================================
// TokenProvider
// ============================================================================

/// Exchanges client credentials for bearer tokens
pub struct TokenProvider {
    http: Client,
    config: Arc<SiteConfiguration>,
    cache: Option<Mutex<Option<CachedToken>>>,
}

impl TokenProvider {
    /// Creates a provider that requests a fresh token on every call
    pub fn new(config: Arc<SiteConfiguration>) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Creates a provider on a caller-supplied HTTP client (timeouts, proxies)
    pub fn with_http_client(config: Arc<SiteConfiguration>, http: Client) -> Self {
        Self {
            http,
            config,
            cache: None,
        }
    }

    /// Enables the in-memory token cache
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Mutex::new(None));
        self
    }

    /// Returns true when the token cache is enabled
    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns a bearer token for the configured credentials
    ///
    /// # Errors
    ///
    /// - [`DomainError::Unauthorized`] when the endpoint answers with a non-success status
    /// - [`DomainError::Transport`] when the endpoint cannot be reached
    /// - [`DomainError::InvalidResponse`] when the answer is not JSON
    pub async fn acquire_token(&self) -> ConnectorResult<AccessToken> {
        let Some(cache) = &self.cache else {
            return Ok(self.request_token().await?.token);
        };

        let mut cached = cache.lock().await;
        if let Some(entry) = cached.as_ref() {
            if !entry.expires_within(Duration::seconds(EXPIRY_SKEW_SECS)) {
                debug!("Reusing cached access token");
                return Ok(entry.token.clone());
            }
        }

        let issued = self.request_token().await?;
        if issued.token.is_empty() {
            *cached = None;
        } else {
            *cached = Some(CachedToken {
                token: issued.token.clone(),
                expires_at: issued.expires_at,
            });
        }
        Ok(issued.token)
    }

    /// Performs the client-credentials POST
    async fn request_token(&self) -> ConnectorResult<IssuedToken> {
        let endpoint = self.config.token_endpoint();
        debug!(endpoint = %endpoint, "Requesting access token");

        let form = [
            ("resource", self.config.resource.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", self.config.grant_type.as_str()),
        ];

        let response = self
            .http
            .post(&endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| DomainError::transport("Failed to reach token endpoint", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::transport("Failed to read token response", e))?;

        if !status.is_success() {
            let description = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error_description").and_then(Value::as_str).map(str::to_string))
                .filter(|d| !d.is_empty());
            warn!(status = status.as_u16(), "Token endpoint rejected the client credentials");
            return Err(DomainError::Unauthorized(description));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| DomainError::InvalidResponse(format!("token response is not JSON: {e}")))?;

        Ok(parse_token_response(&json))
    }
}

/// Extracts the token and its expiry from a token endpoint answer
///
/// `expires_in` arrives as a string from some issuers and as a number from
/// others. Missing, non-positive or unparsable values fall back to
/// [`DEFAULT_EXPIRES_IN_SECS`]; larger ones are capped at
/// [`MAX_EXPIRES_IN_SECS`].
fn parse_token_response(json: &Value) -> IssuedToken {
    let token = json
        .get("access_token")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let expires_in = json
        .get("expires_in")
        .and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS)
        .min(MAX_EXPIRES_IN_SECS);

    IssuedToken {
        token: AccessToken::new(token),
        expires_at: expiry_after(expires_in),
    }
}

/// `now + secs`, saturating at `now` if chrono cannot represent the result
fn expiry_after(secs: i64) -> DateTime<Utc> {
    let now = Utc::now();
    Duration::try_seconds(secs)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(now)
}
