//! Gallery repository: read and mutate the hosted gallery collection.
//!
//! Stateless: every call is a fresh round-trip and every returned sequence
//! is a snapshot, not a live view. Callers own local list mutation (prepend
//! after create, remove after delete) upon a successful result; the
//! repository never caches.

use crate::domain::{GalleryItem, GatewayError, Identity, RepositoryError, UploadError};
use crate::ports::{BackendGateway, GalleryRecord, StoredFile};
use std::sync::Arc;
use tracing::{debug, info};

/// Uploader label when the join is missing or the account was removed.
const UNKNOWN_UPLOADER: &str = "Unknown";

pub struct GalleryRepository {
    gateway: Arc<dyn BackendGateway>,
}

impl GalleryRepository {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch the full gallery, newest first. Ordering is `created_at`
    /// descending with ties broken by `id` descending, so repeated calls
    /// over unchanged data render identically.
    ///
    /// The uploader join is best-effort: a row whose uploader no longer
    /// exists comes back labeled "Unknown" rather than failing the list.
    pub async fn list(&self) -> Result<Vec<GalleryItem>, RepositoryError> {
        let records = self.gateway.list_gallery().await?;
        let mut items: Vec<GalleryItem> = records.into_iter().map(item_from_record).collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        debug!(count = items.len(), "listed gallery");
        Ok(items)
    }

    /// Persistence half of the upload pipeline: create the gallery record
    /// for an already-stored blob. A failure here means the blob is
    /// orphaned, hence `PartialUpload`.
    pub async fn create_record(
        &self,
        title: &str,
        stored: &StoredFile,
        owner: &Identity,
    ) -> Result<GalleryItem, UploadError> {
        let created = self
            .gateway
            .create_gallery_record(title, &stored.reference, &owner.id)
            .await
            .map_err(|e| match e {
                GatewayError::Unconfigured => UploadError::BackendUnavailable,
                other => UploadError::PartialUpload(other.to_string()),
            })?;

        info!(item_id = %created.id, user_id = %owner.id, "gallery record created");
        Ok(GalleryItem {
            id: created.id,
            title: title.to_string(),
            image_url: stored.url.clone(),
            created_at: created.created_at,
            uploader_id: owner.id.clone(),
            uploader_name: owner.display_name.clone(),
        })
    }

    /// Delete an item by id. Ownership is enforced server-side (403 maps to
    /// `Unauthorized`); any client-side owner check (`GalleryItem::is_owned_by`)
    /// is advisory only. `NotFound` means the item was already gone, which
    /// callers treat as the desired end state.
    pub async fn delete(
        &self,
        item_id: &str,
        requester: &Identity,
    ) -> Result<(), RepositoryError> {
        self.gateway.delete_gallery_record(item_id).await?;
        info!(item_id, user_id = %requester.id, "gallery item deleted");
        Ok(())
    }
}

fn item_from_record(record: GalleryRecord) -> GalleryItem {
    let (uploader_id, uploader_name) = match record.uploader {
        Some(u) => (u.id, u.username),
        None => (String::new(), UNKNOWN_UPLOADER.to_string()),
    };
    GalleryItem {
        id: record.id,
        title: record.title,
        image_url: record.image_url,
        created_at: record.created_at,
        uploader_id,
        uploader_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::mock_gateway::MockGateway;
    use crate::adapters::backend::unconfigured::UnconfiguredGateway;
    use chrono::{TimeZone, Utc};

    fn alice() -> Identity {
        Identity {
            id: "u-alice".to_string(),
            display_name: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn list_orders_newest_first_with_stable_ties() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.seed_item("g-1", "older", t0, Some(("u-alice", "alice")));
        gateway.seed_item("g-2", "tie-low", t1, Some(("u-alice", "alice")));
        gateway.seed_item("g-3", "tie-high", t1, Some(("u-alice", "alice")));

        let repo = GalleryRepository::new(gateway);
        let first = repo.list().await.unwrap();
        let ids: Vec<&str> = first.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["g-3", "g-2", "g-1"]);

        // Same data, same order.
        let second = repo.list().await.unwrap();
        let again: Vec<&str> = second.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, again);
    }

    #[tokio::test]
    async fn missing_uploader_join_degrades_to_unknown() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.seed_item("g-1", "orphaned account", t, None);

        let repo = GalleryRepository::new(gateway);
        let items = repo.list().await.unwrap();
        assert_eq!(items[0].uploader_name, "Unknown");
        assert_eq!(items[0].uploader_id, "");
    }

    #[tokio::test]
    async fn delete_of_absent_item_is_not_found() {
        let gateway = Arc::new(MockGateway::new());
        let repo = GalleryRepository::new(gateway);
        let err = repo.delete("g-nope", &alice()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn delete_of_foreign_item_is_unauthorized() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let gateway = Arc::new(
            MockGateway::new().with_user("alice", "alice@example.com", "s3cret"),
        );
        gateway.seed_item("g-1", "bob's photo", t, Some(("u-bob", "bob")));

        let store = crate::usecases::SessionStore::new(gateway.clone());
        store.login("alice", "s3cret").await.unwrap();

        let repo = GalleryRepository::new(gateway);
        let err = repo.delete("g-1", &alice()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Unauthorized));
    }

    #[tokio::test]
    async fn unconfigured_backend_fails_fast() {
        let repo = GalleryRepository::new(Arc::new(UnconfiguredGateway));
        assert!(matches!(
            repo.list().await.unwrap_err(),
            RepositoryError::BackendUnavailable
        ));
        assert!(matches!(
            repo.delete("g-1", &alice()).await.unwrap_err(),
            RepositoryError::BackendUnavailable
        ));
    }
}
