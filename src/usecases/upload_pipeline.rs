//! Upload pipeline: validate, store the blob, create the gallery record.
//!
//! One invocation walks `Idle -> Validating -> UploadingFile -> CreatingRecord
//! -> Done`, bailing out to `Failed` from any non-terminal stage. The caller
//! only ever sees the single terminal result; intermediate stages exist for
//! sequencing and are exposed solely as optional progress reporting through
//! a watch channel (consumed by the CLI progress bar) and tracing events.
//!
//! Validation runs before any network call: a doomed request costs zero
//! round-trips. A record-creation failure after a stored blob leaves the
//! blob orphaned; no compensating delete is attempted (backend-side garbage
//! collection is out of scope here).

use crate::domain::{GalleryItem, GatewayError, Identity, PendingUpload, UploadError};
use crate::ports::BackendGateway;
use crate::usecases::GalleryRepository;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Hard ceiling on upload size: 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted declared media types.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Progress of one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    Validating,
    UploadingFile,
    CreatingRecord,
    Done,
    Failed,
}

pub struct UploadPipeline {
    gateway: Arc<dyn BackendGateway>,
    repository: Arc<GalleryRepository>,
    stage: watch::Sender<UploadStage>,
}

impl UploadPipeline {
    pub fn new(gateway: Arc<dyn BackendGateway>, repository: Arc<GalleryRepository>) -> Self {
        let (stage, _) = watch::channel(UploadStage::Idle);
        Self {
            gateway,
            repository,
            stage,
        }
    }

    /// Observe stage transitions of the running attempt. Progress only; the
    /// authoritative outcome is the return value of [`upload`](Self::upload).
    pub fn subscribe_stage(&self) -> watch::Receiver<UploadStage> {
        self.stage.subscribe()
    }

    /// Run one upload attempt to its single terminal outcome.
    pub async fn upload(
        &self,
        pending: PendingUpload,
        owner: &Identity,
    ) -> Result<GalleryItem, UploadError> {
        let outcome = self.run_stages(&pending, owner).await;
        match &outcome {
            Ok(item) => {
                self.set_stage(UploadStage::Done);
                info!(item_id = %item.id, user_id = %owner.id, "upload complete");
            }
            Err(e) => {
                self.set_stage(UploadStage::Failed);
                warn!(error = %e, filename = %pending.filename, "upload failed");
            }
        }
        outcome
    }

    async fn run_stages(
        &self,
        pending: &PendingUpload,
        owner: &Identity,
    ) -> Result<GalleryItem, UploadError> {
        self.set_stage(UploadStage::Validating);
        let title = validate(pending)?;

        self.set_stage(UploadStage::UploadingFile);
        let filename = sanitize_filename(&pending.filename);
        debug!(filename = %filename, bytes = pending.data.len(), "storing blob");
        let stored = self
            .gateway
            .upload_file(&filename, &pending.content_type, &pending.data)
            .await
            .map_err(|e| match e {
                GatewayError::Unconfigured => UploadError::BackendUnavailable,
                other => UploadError::StorageError(other.to_string()),
            })?;

        self.set_stage(UploadStage::CreatingRecord);
        self.repository.create_record(&title, &stored, owner).await
    }

    fn set_stage(&self, stage: UploadStage) {
        self.stage.send_replace(stage);
    }
}

/// Local checks, in order: media type, size, title. Returns the trimmed title.
fn validate(pending: &PendingUpload) -> Result<String, UploadError> {
    if !ALLOWED_CONTENT_TYPES.contains(&pending.content_type.as_str()) {
        return Err(UploadError::InvalidType(pending.content_type.clone()));
    }
    let size = pending.data.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge(size));
    }
    let title = pending.declared_title.trim();
    if title.is_empty() {
        return Err(UploadError::MissingTitle);
    }
    Ok(title.to_string())
}

/// Replace every character outside `[A-Za-z0-9._-]` with an underscore.
/// Idempotent: sanitizing an already-sanitized name changes nothing.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::mock_gateway::MockGateway;
    use crate::adapters::backend::unconfigured::UnconfiguredGateway;

    fn alice() -> Identity {
        Identity {
            id: "u-alice".to_string(),
            display_name: "alice".to_string(),
        }
    }

    fn png(title: &str, bytes: usize) -> PendingUpload {
        PendingUpload {
            data: vec![0u8; bytes],
            filename: "photo.png".to_string(),
            content_type: "image/png".to_string(),
            declared_title: title.to_string(),
        }
    }

    fn pipeline(gateway: Arc<MockGateway>) -> UploadPipeline {
        let repository = Arc::new(GalleryRepository::new(gateway.clone()));
        UploadPipeline::new(gateway, repository)
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_without_network_io() {
        let gateway = Arc::new(MockGateway::new());
        let p = pipeline(gateway.clone());

        let err = p
            .upload(png("big", (MAX_UPLOAD_BYTES + 1) as usize), &alice())
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TooLarge(n) if n == MAX_UPLOAD_BYTES + 1));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn wrong_type_and_empty_title_are_rejected_locally() {
        let gateway = Arc::new(MockGateway::new());
        let p = pipeline(gateway.clone());

        let gif = PendingUpload {
            content_type: "image/gif".to_string(),
            ..png("animated", 10)
        };
        assert!(matches!(
            p.upload(gif, &alice()).await.unwrap_err(),
            UploadError::InvalidType(_)
        ));

        assert!(matches!(
            p.upload(png("   ", 10), &alice()).await.unwrap_err(),
            UploadError::MissingTitle
        ));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn storage_failure_creates_no_record() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_next_upload();
        let p = pipeline(gateway.clone());

        let err = p.upload(png("sunset", 10), &alice()).await.unwrap_err();
        assert!(matches!(err, UploadError::StorageError(_)));
        assert_eq!(gateway.stored_file_count(), 0);
        assert_eq!(gateway.gallery_len(), 0);
    }

    #[tokio::test]
    async fn record_failure_after_stored_blob_is_partial_upload() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_next_create_record();
        let p = pipeline(gateway.clone());

        let err = p.upload(png("sunset", 10), &alice()).await.unwrap_err();
        assert!(matches!(err, UploadError::PartialUpload(_)));
        // Blob stored, record missing: the orphan the design accepts.
        assert_eq!(gateway.stored_file_count(), 1);
        assert_eq!(gateway.gallery_len(), 0);
    }

    #[tokio::test]
    async fn successful_upload_lists_exactly_once_and_first() {
        let gateway = Arc::new(MockGateway::new());
        let repository = Arc::new(GalleryRepository::new(gateway.clone()));
        let p = UploadPipeline::new(gateway.clone(), repository.clone());
        gateway.seed_item(
            "g-old",
            "earlier",
            chrono::Utc::now() - chrono::Duration::hours(1),
            Some(("u-alice", "alice")),
        );

        let before = repository.list().await.unwrap();
        let created = p.upload(png("sunset", 10), &alice()).await.unwrap();
        let after = repository.list().await.unwrap();

        assert_eq!(after.len(), before.len() + 1);
        let occurrences = after.iter().filter(|i| i.id == created.id).count();
        assert_eq!(occurrences, 1);
        assert_eq!(after[0].id, created.id);
        assert!(before.iter().all(|i| created.created_at >= i.created_at));
    }

    #[tokio::test]
    async fn stage_progression_is_observable() {
        let gateway = Arc::new(MockGateway::new());
        let p = pipeline(gateway);
        let rx = p.subscribe_stage();

        assert_eq!(*rx.borrow(), UploadStage::Idle);
        p.upload(png("sunset", 10), &alice()).await.unwrap();
        assert_eq!(*rx.borrow(), UploadStage::Done);
    }

    #[tokio::test]
    async fn unconfigured_backend_fails_fast_for_valid_input() {
        let gateway = Arc::new(UnconfiguredGateway);
        let repository = Arc::new(GalleryRepository::new(gateway.clone()));
        let p = UploadPipeline::new(gateway, repository);

        let err = p.upload(png("sunset", 10), &alice()).await.unwrap_err();
        assert!(matches!(err, UploadError::BackendUnavailable));
    }

    #[test]
    fn sanitize_replaces_disallowed_and_is_idempotent() {
        assert_eq!(sanitize_filename("My Photo!!.png"), "My_Photo__.png");
        let once = sanitize_filename("weird name (1) ü.jpg");
        assert_eq!(sanitize_filename(&once), once);
        assert_eq!(sanitize_filename("already_clean-1.jpeg"), "already_clean-1.jpeg");
    }
}
