//! REST adapter for the hosted gallery backend.
//!
//! One method per backend request. Credentials travel as headers on every
//! call; cookies carry the session. Classification happens here and only
//! here: non-2xx responses become `GatewayError::Api` (message lifted from
//! the JSON error body when present), connection/decode failures become
//! `GatewayError::Transport`.

use crate::domain::{GatewayError, Identity};
use crate::ports::{BackendGateway, CreatedRecord, GalleryRecord, StoredFile, UploaderRef};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const APP_ID_HEADER: &str = "X-Application-Id";
const CLIENT_KEY_HEADER: &str = "X-Client-Key";

pub struct RestGateway {
    client: Client,
    base_url: String,
}

impl RestGateway {
    /// Build the gateway. Fails only on malformed credentials (non-ASCII
    /// header values) or client construction.
    pub fn new(
        base_url: &str,
        app_id: &str,
        client_key: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            APP_ID_HEADER,
            HeaderValue::from_str(app_id)
                .map_err(|e| GatewayError::Transport(format!("bad app id: {e}")))?,
        );
        headers.insert(
            CLIENT_KEY_HEADER,
            HeaderValue::from_str(client_key)
                .map_err(|e| GatewayError::Transport(format!("bad client key: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Pass 2xx through; turn everything else into `Api { code, message }`.
async fn check(res: Response) -> Result<Response, GatewayError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let code = status.as_u16();
    let message = match res.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(GatewayError::Api { code, message })
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityDto {
    id: String,
    display_name: String,
}

impl From<IdentityDto> for Identity {
    fn from(dto: IdentityDto) -> Self {
        Identity {
            id: dto.id,
            display_name: dto.display_name,
        }
    }
}

#[derive(Deserialize)]
struct IdentityResponse {
    identity: IdentityDto,
}

/// `identity` is null or missing when no session is live.
#[derive(Deserialize)]
struct SessionResponse {
    #[serde(default)]
    identity: Option<IdentityDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRefDto {
    reference: String,
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFileResponse {
    file_ref: FileRefDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GalleryRowDto {
    id: String,
    title: String,
    image_ref: FileRefDto,
    created_at: DateTime<Utc>,
    #[serde(default)]
    uploader: Option<UploaderDto>,
}

#[derive(Deserialize)]
struct UploaderDto {
    id: String,
    username: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedResponse {
    id: String,
    created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl BackendGateway for RestGateway {
    async fn login(&self, username: &str, password: &str) -> Result<Identity, GatewayError> {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(transport)?;
        let body: IdentityResponse = check(res).await?.json().await.map_err(transport)?;
        Ok(body.identity.into())
    }

    async fn current_session(&self) -> Result<Option<Identity>, GatewayError> {
        let res = self
            .client
            .get(self.url("/sessions/current"))
            .send()
            .await
            .map_err(transport)?;
        let body: SessionResponse = check(res).await?.json().await.map_err(transport)?;
        Ok(body.identity.map(Into::into))
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        let res = self
            .client
            .post(self.url("/logout"))
            .send()
            .await
            .map_err(transport)?;
        check(res).await?;
        Ok(())
    }

    async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, GatewayError> {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(transport)?;
        let body: IdentityResponse = check(res).await?.json().await.map_err(transport)?;
        Ok(body.identity.into())
    }

    async fn list_gallery(&self) -> Result<Vec<GalleryRecord>, GatewayError> {
        let res = self
            .client
            .get(self.url("/gallery"))
            .query(&[("order", "createdAt:desc")])
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<GalleryRowDto> = check(res).await?.json().await.map_err(transport)?;
        debug!(count = rows.len(), "fetched gallery rows");
        Ok(rows
            .into_iter()
            .map(|row| GalleryRecord {
                id: row.id,
                title: row.title,
                image_url: row.image_ref.url,
                created_at: row.created_at,
                uploader: row.uploader.map(|u| UploaderRef {
                    id: u.id,
                    username: u.username,
                }),
            })
            .collect())
    }

    async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredFile, GatewayError> {
        let res = self
            .client
            .post(self.url(&format!("/files/{filename}")))
            .header(CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(transport)?;
        let body: StoredFileResponse = check(res).await?.json().await.map_err(transport)?;
        Ok(StoredFile {
            reference: body.file_ref.reference,
            url: body.file_ref.url,
        })
    }

    async fn create_gallery_record(
        &self,
        title: &str,
        file_reference: &str,
        user_id: &str,
    ) -> Result<CreatedRecord, GatewayError> {
        let res = self
            .client
            .post(self.url("/gallery"))
            .json(&serde_json::json!({
                "title": title,
                "imageRef": file_reference,
                "userRef": user_id,
            }))
            .send()
            .await
            .map_err(transport)?;
        let body: CreatedResponse = check(res).await?.json().await.map_err(transport)?;
        Ok(CreatedRecord {
            id: body.id,
            created_at: body.created_at,
        })
    }

    async fn delete_gallery_record(&self, item_id: &str) -> Result<(), GatewayError> {
        let res = self
            .client
            .delete(self.url(&format!("/gallery/{item_id}")))
            .send()
            .await
            .map_err(transport)?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(());
        }
        check(res).await?;
        Ok(())
    }
}
