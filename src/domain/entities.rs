//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/wire types here; these are mapped from adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user's minimal public profile.
///
/// Owned by the session store; replaced wholesale on login/logout,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

/// One published image record with metadata and uploader reference.
///
/// The uploader fields are a weak join: the referenced account may have been
/// removed since the item was created, in which case `uploader_name` is
/// "Unknown" and `uploader_id` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub uploader_id: String,
    pub uploader_name: String,
}

impl GalleryItem {
    /// True when `identity` owns this item. Advisory only; the backend
    /// re-verifies ownership on delete.
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        !self.uploader_id.is_empty() && self.uploader_id == identity.id
    }
}

/// A candidate upload. Exists only for the duration of one pipeline run;
/// never persisted, discarded on success or failure.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub data: Vec<u8>,
    pub filename: String,
    /// Declared media type, e.g. "image/png".
    pub content_type: String,
    pub declared_title: String,
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// A transient user-facing message (toast). Owned by the notification bus;
/// removed automatically after the display interval or by explicit dismissal.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Opaque id assigned by the bus. Never reused within a bus instance.
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub severity: Severity,
}
