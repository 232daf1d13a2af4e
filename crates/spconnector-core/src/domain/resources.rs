//! Resource types returned by the remote site
//!
//! These structs map the JSON payloads of the `_api/web` endpoints. The site
//! answers either with plain objects (`odata=nometadata`) or, for verbose
//! requests, with the object wrapped in a `{"d": {...}}` envelope;
//! [`ODataEnvelope`] accepts both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::newtypes::RecycleBinId;

// ============================================================================
// Folder
// ============================================================================

/// A folder as reported by the site after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Folder {
    /// Server-relative URL of the folder (e.g., "/sites/X/Docs/Reports")
    pub server_relative_url: String,
    /// Folder name
    #[serde(default)]
    pub name: Option<String>,
    /// Number of items directly inside the folder
    #[serde(default)]
    pub item_count: Option<u64>,
    /// Whether the folder exists
    #[serde(default)]
    pub exists: Option<bool>,
    /// Unique identifier assigned by the site
    #[serde(default)]
    pub unique_id: Option<Uuid>,
    /// Creation timestamp
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default)]
    pub time_last_modified: Option<DateTime<Utc>>,
}

// ============================================================================
// File
// ============================================================================

/// A file as reported by the site after upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct File {
    /// Server-relative URL of the file
    pub server_relative_url: String,
    /// File name
    #[serde(default)]
    pub name: Option<String>,
    /// Size in bytes (sent as a string by the site)
    #[serde(default, deserialize_with = "lenient_u64")]
    pub length: Option<u64>,
    /// Entity tag of the stored version
    #[serde(default, rename = "ETag")]
    pub etag: Option<String>,
    /// Unique identifier assigned by the site
    #[serde(default)]
    pub unique_id: Option<Uuid>,
    /// Creation timestamp
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    /// Last modification timestamp
    #[serde(default)]
    pub time_last_modified: Option<DateTime<Utc>>,
}

// ============================================================================
// RecycleBinResource
// ============================================================================

/// Stage of the recycle bin an item currently sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum RecycleBinItemState {
    /// Not in any recycle bin (already restored or purged)
    None,
    /// End-user recycle bin
    FirstStageRecycleBin,
    /// Site collection recycle bin
    SecondStageRecycleBin,
    /// A state code this library does not know about
    Unknown(i32),
}

impl From<i32> for RecycleBinItemState {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::FirstStageRecycleBin,
            2 => Self::SecondStageRecycleBin,
            other => Self::Unknown(other),
        }
    }
}

impl From<RecycleBinItemState> for i32 {
    fn from(state: RecycleBinItemState) -> Self {
        match state {
            RecycleBinItemState::None => 0,
            RecycleBinItemState::FirstStageRecycleBin => 1,
            RecycleBinItemState::SecondStageRecycleBin => 2,
            RecycleBinItemState::Unknown(code) => code,
        }
    }
}

/// An item held in the remote recycle bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecycleBinResource {
    /// Recycle-bin identifier
    pub id: RecycleBinId,
    /// Display title of the deleted item
    #[serde(default)]
    pub title: Option<String>,
    /// Name of the deleted item
    #[serde(default)]
    pub leaf_name: Option<String>,
    /// Server-relative directory the item was deleted from (no leading slash)
    #[serde(default)]
    pub dir_name: Option<String>,
    /// When the item was deleted
    #[serde(default)]
    pub deleted_date: Option<DateTime<Utc>>,
    /// Who deleted the item
    #[serde(default)]
    pub deleted_by_name: Option<String>,
    /// Current recycle-bin stage
    #[serde(default)]
    pub item_state: Option<RecycleBinItemState>,
    /// Raw item type code (file, folder, list item, ...)
    #[serde(default)]
    pub item_type: Option<i32>,
    /// Size in bytes (sent as a string by the site)
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
}

impl RecycleBinResource {
    /// Server-relative path the item had before deletion
    ///
    /// Rebuilt from `DirName` and `LeafName`; `None` when the site omitted
    /// either of them.
    pub fn original_path(&self) -> Option<String> {
        let dir = self.dir_name.as_deref()?;
        let leaf = self.leaf_name.as_deref()?;
        let dir = dir.trim_matches('/');
        if dir.is_empty() {
            Some(format!("/{leaf}"))
        } else {
            Some(format!("/{dir}/{leaf}"))
        }
    }

    /// Returns true while the item can still be restored
    pub fn is_restorable(&self) -> bool {
        matches!(
            self.item_state,
            Some(RecycleBinItemState::FirstStageRecycleBin)
                | Some(RecycleBinItemState::SecondStageRecycleBin)
        )
    }
}

// ============================================================================
// OData envelope
// ============================================================================

/// Response body that is either a plain object or a verbose `{"d": ...}` wrapper
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ODataEnvelope<T> {
    /// `application/json;odata=verbose`
    Verbose {
        /// Wrapped payload
        d: T,
    },
    /// `nometadata` / `minimalmetadata`
    Plain(T),
}

impl<T> ODataEnvelope<T> {
    /// Unwraps the payload regardless of the envelope shape
    pub fn into_inner(self) -> T {
        match self {
            Self::Verbose { d } => d,
            Self::Plain(inner) => inner,
        }
    }
}

/// Accepts integer sizes sent either as JSON numbers or as numeric strings
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
