//! Domain error types
//!
//! Every connector operation surfaces exactly one [`DomainError`]. The typed
//! variants mirror the status codes the remote site reports; `Status` is the
//! raw "status does not indicate success" error used whenever no typed
//! message can be extracted from the response body.
//!
//! "Resource absent" is never an error for existence checks, downloads and
//! recycle-bin lookups: those operations return `false` / `None` instead.

use thiserror::Error;

/// Message used when a 404 response carries no extractable error message
pub const RESOURCE_NOT_FOUND_MESSAGE: &str = "The resource does not exist.";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by every connector operation
pub type ConnectorResult<T> = std::result::Result<T, DomainError>;

/// Errors that can occur when talking to the remote site
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was rejected as malformed (400)
    #[error("Bad request{}", optional_message(.0))]
    BadRequest(Option<String>),

    /// Credentials were rejected or no usable token was issued (401)
    #[error("Unauthorized{}", optional_message(.0))]
    Unauthorized(Option<String>),

    /// The remote site failed while processing the request (500)
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// A status code with no dedicated mapping
    #[error("Unknown error (status {status})")]
    Unknown {
        /// HTTP status code returned by the remote site
        status: u16,
    },

    /// Non-success status whose body carried no usable error message
    #[error("Response status code does not indicate success: {status} ({reason})")]
    Status {
        /// HTTP status code returned by the remote site
        status: u16,
        /// Canonical reason phrase for the status code
        reason: String,
    },

    /// The request never produced a response (DNS, TCP, TLS, body read)
    #[error("Transport error: {message}")]
    Transport {
        /// What the connector was doing when the failure happened
        message: String,
        /// The underlying transport error
        #[source]
        source: BoxError,
    },

    /// A success response could not be mapped to the expected result type
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The site configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

fn optional_message(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl DomainError {
    /// Wraps a transport-level failure, keeping the cause chain
    pub fn transport(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: source.into(),
        }
    }

    /// A `NotFound` carrying the generic "does not exist" message
    pub fn resource_not_found() -> Self {
        Self::NotFound(RESOURCE_NOT_FOUND_MESSAGE.to_string())
    }

    /// Returns true for the `NotFound` variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status code associated with this error, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::InternalServerError(_) => Some(500),
            Self::Unknown { status } | Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::InvalidResponse(_) | Self::InvalidConfiguration(_) => {
                None
            }
        }
    }
}
