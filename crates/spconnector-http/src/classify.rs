//! Error classifier for non-success responses
//!
//! The site reports failures with one of two JSON envelopes:
//!
//! ```json
//! {"error": {"code": "...", "message": {"lang": "en-US", "value": "File Not Found."}}}
//! {"odata.error": {"code": "...", "message": {"lang": "en-US", "value": "..."}}}
//! ```
//!
//! and the token endpoint with a flat `{"error": "...", "error_description": "..."}`.
//! The status code picks the [`DomainError`] variant; the body only supplies
//! the message. When the body is empty or not JSON the raw [`DomainError::Status`]
//! is returned (except for an empty 404, which is always [`DomainError::NotFound`]).

use reqwest::{Response, StatusCode};
use serde_json::Value;
use spconnector_core::domain::DomainError;
use tracing::warn;

/// Converts a non-success response into a [`DomainError`]
///
/// A body that cannot be read yields [`DomainError::Transport`] carrying the
/// read failure.
pub async fn classify(response: Response) -> DomainError {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status = status.as_u16(), path = %url, "Failed to read error response body");
            return DomainError::transport(
                format!("Failed to read error response ({})", status.as_u16()),
                e,
            );
        }
    };

    let error = classify_body(status, &body);
    warn!(status = status.as_u16(), path = %url, error = %error, "Request failed");
    error
}

/// Classifies a status code and an already-read body
pub fn classify_body(status: StatusCode, body: &str) -> DomainError {
    if body.trim().is_empty() {
        return if status == StatusCode::NOT_FOUND {
            DomainError::resource_not_found()
        } else {
            status_error(status)
        };
    }

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return status_error(status);
    };

    match status {
        StatusCode::NOT_FOUND => message_value(&json, "error")
            .or_else(|| message_value(&json, "odata.error"))
            .map(DomainError::NotFound)
            .unwrap_or_else(DomainError::resource_not_found),
        StatusCode::BAD_REQUEST => DomainError::BadRequest(error_description(&json)),
        StatusCode::UNAUTHORIZED => match error_description(&json) {
            Some(description) => DomainError::Unauthorized(Some(description)),
            None => status_error(status),
        },
        StatusCode::INTERNAL_SERVER_ERROR => match message_value(&json, "error") {
            Some(message) => DomainError::InternalServerError(message),
            None => status_error(status),
        },
        other => DomainError::Unknown {
            status: other.as_u16(),
        },
    }
}

/// The raw "status does not indicate success" error
fn status_error(status: StatusCode) -> DomainError {
    DomainError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

/// `<envelope>.message.value`
fn message_value(json: &Value, envelope: &str) -> Option<String> {
    json.get(envelope)?
        .get("message")?
        .get("value")?
        .as_str()
        .map(str::to_string)
}

/// Top-level `error_description`
fn error_description(json: &Value) -> Option<String> {
    json.get("error_description")
        .and_then(Value::as_str)
        .map(str::to_string)
}
