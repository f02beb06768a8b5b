//! Degraded-mode gateway. Wired in when credentials are missing or still
//! the .env placeholder: every operation fails immediately with
//! `Unconfigured` and no network I/O is ever attempted.

use crate::domain::{GatewayError, Identity};
use crate::ports::{BackendGateway, CreatedRecord, GalleryRecord, StoredFile};

pub struct UnconfiguredGateway;

#[async_trait::async_trait]
impl BackendGateway for UnconfiguredGateway {
    async fn login(&self, _username: &str, _password: &str) -> Result<Identity, GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    async fn current_session(&self) -> Result<Option<Identity>, GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    async fn sign_up(
        &self,
        _username: &str,
        _email: &str,
        _password: &str,
    ) -> Result<Identity, GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    async fn list_gallery(&self) -> Result<Vec<GalleryRecord>, GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    async fn upload_file(
        &self,
        _filename: &str,
        _content_type: &str,
        _data: &[u8],
    ) -> Result<StoredFile, GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    async fn create_gallery_record(
        &self,
        _title: &str,
        _file_reference: &str,
        _user_id: &str,
    ) -> Result<CreatedRecord, GatewayError> {
        Err(GatewayError::Unconfigured)
    }

    async fn delete_gallery_record(&self, _item_id: &str) -> Result<(), GatewayError> {
        Err(GatewayError::Unconfigured)
    }
}
