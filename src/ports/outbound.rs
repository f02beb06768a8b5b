//! Outbound port. Application calls into infrastructure.
//!
//! Implemented by adapters. One method per backend request; the adapter owns
//! transport and classification, the use cases own sequencing and policy.

use crate::domain::{GatewayError, Identity};
use chrono::{DateTime, Utc};

/// A gallery row as the backend returns it. The uploader join is optional:
/// the referenced account may have been removed after the item was created.
#[derive(Debug, Clone)]
pub struct GalleryRecord {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub uploader: Option<UploaderRef>,
}

/// Uploader half of the gallery join.
#[derive(Debug, Clone)]
pub struct UploaderRef {
    pub id: String,
    pub username: String,
}

/// Result of a binary upload: the opaque storage handle plus the resolved
/// public URL for rendering.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub reference: String,
    pub url: String,
}

/// Result of creating a gallery record. The backend assigns id and
/// creation timestamp.
#[derive(Debug, Clone)]
pub struct CreatedRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Hosted gallery backend gateway. Sessions, gallery collection, blob storage.
#[async_trait::async_trait]
pub trait BackendGateway: Send + Sync {
    /// Authenticate with username/password. 401 means invalid credentials.
    async fn login(&self, username: &str, password: &str) -> Result<Identity, GatewayError>;

    /// Fetch the identity bound to the current session, if any.
    /// `Ok(None)` is a valid answer: no session is live.
    async fn current_session(&self) -> Result<Option<Identity>, GatewayError>;

    /// Invalidate the current session server-side.
    async fn logout(&self) -> Result<(), GatewayError>;

    /// Register a new account. The backend logs the new user in on success.
    /// 4xx carries field-level validation messages.
    async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, GatewayError>;

    /// Fetch all gallery rows, ordered by creation time descending.
    async fn list_gallery(&self) -> Result<Vec<GalleryRecord>, GatewayError>;

    /// Store a binary blob. Returns the handle to attach to a record.
    async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredFile, GatewayError>;

    /// Create a gallery record pointing at a stored blob.
    async fn create_gallery_record(
        &self,
        title: &str,
        file_reference: &str,
        user_id: &str,
    ) -> Result<CreatedRecord, GatewayError>;

    /// Delete a gallery record by id. 404 when already gone, 403 when the
    /// session does not own it.
    async fn delete_gallery_record(&self, item_id: &str) -> Result<(), GatewayError>;
}
