//! Domain newtypes
//!
//! Strongly-typed wrappers for the bearer token and recycle-bin identifiers.

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// AccessToken
// ============================================================================

/// Opaque bearer token issued by the authentication endpoint
///
/// The value is only reachable through [`AccessToken::secret`]. `Debug` is
/// redacted and there is no `Display`, so a token cannot end up in a log line
/// by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header
    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Returns true when the endpoint issued no token at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

// ============================================================================
// RecycleBinId
// ============================================================================

/// Identifier of an item in the remote recycle bin
///
/// The nil GUID is the sentinel the remote site returns when nothing was
/// moved to the recycle bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecycleBinId(Uuid);

impl RecycleBinId {
    /// Create a RecycleBinId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The "nothing moved" sentinel
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns true for the nil sentinel
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecycleBinId {
    fn default() -> Self {
        Self::nil()
    }
}

impl Display for RecycleBinId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecycleBinId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::InvalidResponse(format!("Invalid recycle bin id: {e}")))
    }
}

impl From<Uuid> for RecycleBinId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
