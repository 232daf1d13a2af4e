//! Configuration module for spconnector.
//!
//! [`SiteConfiguration`] is the single source of truth for authentication and
//! URL construction. It is supplied by the host application (YAML file or the
//! builder), validated once, and shared read-only by every operation.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

/// `X-RequestDigest` value sent when no form digest is configured.
pub const DEFAULT_FORM_DIGEST: &str = "SHAREPOINT_FORM_DIGEST";

/// Path of the OAuth client-credentials endpoint, relative to the authentication URL.
const TOKEN_ENDPOINT_PATH: &str = "tokens/oAuth/2";

// ---------------------------------------------------------------------------
// SiteConfiguration
// ---------------------------------------------------------------------------

/// Connection settings for one remote site.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfiguration {
    /// Authentication endpoint root, e.g. `https://accounts.accesscontrol.windows.net/<tenant>/`.
    pub authentication_url: String,
    /// Directory (tenant) identifier.
    pub tenant_id: String,
    /// Client identifier, usually `<app-id>@<tenant-id>`.
    pub client_id: String,
    /// Client secret. Never printed by `Debug`.
    pub client_secret: String,
    /// OAuth grant type, normally `client_credentials`.
    pub grant_type: String,
    /// Resource identifier the token is requested for.
    pub resource: String,
    /// Site identifier.
    pub site_id: String,
    /// Human-readable site (library) name.
    pub site_name: String,
    /// Tenant instance URL, e.g. `https://contoso.sharepoint.com/`.
    pub instance_url: String,
    /// Site base URL every API path is appended to; must end with `/`.
    pub site_url: String,
    /// Root relative path prepended to every caller path, e.g. `/sites/X/Docs/`.
    pub server_relative_url: String,
    /// Form digest for mutating calls. Falls back to [`DEFAULT_FORM_DIGEST`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_digest: Option<String>,
}

impl fmt::Debug for SiteConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfiguration")
            .field("authentication_url", &self.authentication_url)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("grant_type", &self.grant_type)
            .field("resource", &self.resource)
            .field("site_id", &self.site_id)
            .field("site_name", &self.site_name)
            .field("instance_url", &self.instance_url)
            .field("site_url", &self.site_url)
            .field("server_relative_url", &self.server_relative_url)
            .field("form_digest", &self.form_digest.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl SiteConfiguration {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site configuration {}", path.display()))?;
        let config: SiteConfiguration =
            serde_yaml::from_str(&content).context("Failed to parse site configuration")?;
        Ok(config)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/spconnector/site.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("spconnector")
            .join("site.yaml")
    }

    /// Full URL of the client-credentials token endpoint.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.authentication_url.trim_end_matches('/'),
            TOKEN_ENDPOINT_PATH
        )
    }

    /// Value for the `X-RequestDigest` header.
    pub fn form_digest(&self) -> &str {
        self.form_digest
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_FORM_DIGEST)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending field, e.g. `"site_url"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl SiteConfiguration {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let required = [
            ("authentication_url", &self.authentication_url),
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("grant_type", &self.grant_type),
            ("resource", &self.resource),
            ("site_id", &self.site_id),
            ("site_name", &self.site_name),
            ("instance_url", &self.instance_url),
            ("site_url", &self.site_url),
            ("server_relative_url", &self.server_relative_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError {
                    field: field.into(),
                    message: "must not be empty".into(),
                });
            }
        }

        // --- urls ---
        let urls = [
            ("authentication_url", &self.authentication_url),
            ("instance_url", &self.instance_url),
            ("site_url", &self.site_url),
        ];
        for (field, value) in urls {
            if value.trim().is_empty() {
                continue;
            }
            if let Err(e) = Url::parse(value) {
                errors.push(ValidationError {
                    field: field.into(),
                    message: format!("not an absolute URL: {e}"),
                });
            }
        }

        if !self.site_url.is_empty() && !self.site_url.ends_with('/') {
            errors.push(ValidationError {
                field: "site_url".into(),
                message: "must end with '/'".into(),
            });
        }

        // --- paths ---
        if !self.server_relative_url.is_empty() && !self.server_relative_url.starts_with('/') {
            errors.push(ValidationError {
                field: "server_relative_url".into(),
                message: "must start with '/'".into(),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// SiteConfigurationBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`SiteConfiguration`] programmatically.
///
/// Every field starts empty; [`build_validated`](Self::build_validated)
/// reports the ones that were never set.
///
/// # Example
///
/// ```rust,no_run
/// use spconnector_core::config::SiteConfigurationBuilder;
///
/// let config = SiteConfigurationBuilder::new()
///     .authentication_url("https://accounts.accesscontrol.windows.net/tenant/")
///     .tenant_id("tenant")
///     .client_id("app@tenant")
///     .client_secret("secret")
///     .grant_type("client_credentials")
///     .resource("00000003-0000-0ff1-ce00-000000000000/contoso.sharepoint.com@tenant")
///     .site_id("site")
///     .site_name("Documents")
///     .instance_url("https://contoso.sharepoint.com/")
///     .site_url("https://contoso.sharepoint.com/sites/X/")
///     .server_relative_url("/sites/X/Docs/")
///     .build_validated()
///     .expect("valid configuration");
/// ```
#[derive(Debug, Clone)]
pub struct SiteConfigurationBuilder {
    config: SiteConfiguration,
}

impl SiteConfigurationBuilder {
    /// Create a new builder with every field empty.
    pub fn new() -> Self {
        Self {
            config: SiteConfiguration {
                authentication_url: String::new(),
                tenant_id: String::new(),
                client_id: String::new(),
                client_secret: String::new(),
                grant_type: String::new(),
                resource: String::new(),
                site_id: String::new(),
                site_name: String::new(),
                instance_url: String::new(),
                site_url: String::new(),
                server_relative_url: String::new(),
                form_digest: None,
            },
        }
    }

    // --- authentication ---

    pub fn authentication_url(mut self, url: impl Into<String>) -> Self {
        self.config.authentication_url = url.into();
        self
    }

    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.config.tenant_id = tenant_id.into();
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = client_id.into();
        self
    }

    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.client_secret = secret.into();
        self
    }

    pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.config.grant_type = grant_type.into();
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.config.resource = resource.into();
        self
    }

    // --- site ---

    pub fn site_id(mut self, site_id: impl Into<String>) -> Self {
        self.config.site_id = site_id.into();
        self
    }

    pub fn site_name(mut self, site_name: impl Into<String>) -> Self {
        self.config.site_name = site_name.into();
        self
    }

    pub fn instance_url(mut self, url: impl Into<String>) -> Self {
        self.config.instance_url = url.into();
        self
    }

    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.config.site_url = url.into();
        self
    }

    pub fn server_relative_url(mut self, path: impl Into<String>) -> Self {
        self.config.server_relative_url = path.into();
        self
    }

    pub fn form_digest(mut self, digest: impl Into<String>) -> Self {
        self.config.form_digest = Some(digest.into());
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`SiteConfiguration`].
    pub fn build(self) -> SiteConfiguration {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<SiteConfiguration, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for SiteConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
