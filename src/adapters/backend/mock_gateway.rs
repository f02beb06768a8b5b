//! In-memory mock backend for testing without network calls.
//!
//! Keeps users, a session, stored blobs, and gallery rows behind a mutex,
//! counts every invocation (tests assert zero network I/O for locally
//! rejected requests), and can be scripted to fail the next call of a
//! given kind.

use crate::domain::{GatewayError, Identity};
use crate::ports::{BackendGateway, CreatedRecord, GalleryRecord, StoredFile, UploaderRef};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

struct MockUser {
    username: String,
    #[allow(dead_code)] // kept to mirror the sign-up payload
    email: String,
    password: String,
    identity: Identity,
}

#[derive(Default)]
struct MockState {
    users: Vec<MockUser>,
    session: Option<Identity>,
    gallery: Vec<GalleryRecord>,
    stored: Vec<StoredFile>,
    next_seq: u64,
}

/// Scriptable in-memory backend.
pub struct MockGateway {
    state: Mutex<MockState>,
    calls: AtomicUsize,
    login_delay: Duration,
    fail_next_upload: AtomicBool,
    fail_next_create: AtomicBool,
    fail_next_logout: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            calls: AtomicUsize::new(0),
            login_delay: Duration::ZERO,
            fail_next_upload: AtomicBool::new(false),
            fail_next_create: AtomicBool::new(false),
            fail_next_logout: AtomicBool::new(false),
        }
    }

    /// Register an account the mock will accept for login.
    pub fn with_user(self, username: &str, email: &str, password: &str) -> Self {
        self.state.lock().unwrap().users.push(MockUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            identity: Identity {
                id: format!("u-{username}"),
                display_name: username.to_string(),
            },
        });
        self
    }

    /// Make every login sleep before resolving. Used to race login against
    /// faster operations.
    pub fn with_login_delay_ms(mut self, ms: u64) -> Self {
        self.login_delay = Duration::from_millis(ms);
        self
    }

    /// Insert a gallery row directly, bypassing the upload path.
    pub fn seed_item(
        &self,
        id: &str,
        title: &str,
        created_at: DateTime<Utc>,
        uploader: Option<(&str, &str)>,
    ) {
        self.state.lock().unwrap().gallery.push(GalleryRecord {
            id: id.to_string(),
            title: title.to_string(),
            image_url: format!("https://files.test/{id}.jpg"),
            created_at,
            uploader: uploader.map(|(uid, name)| UploaderRef {
                id: uid.to_string(),
                username: name.to_string(),
            }),
        });
    }

    pub fn fail_next_upload(&self) {
        self.fail_next_upload.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_create_record(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_logout(&self) {
        self.fail_next_logout.store(true, Ordering::SeqCst);
    }

    /// Total backend invocations observed, across all methods.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn gallery_len(&self) -> usize {
        self.state.lock().unwrap().gallery.len()
    }

    pub fn stored_file_count(&self) -> usize {
        self.state.lock().unwrap().stored.len()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BackendGateway for MockGateway {
    async fn login(&self, username: &str, password: &str) -> Result<Identity, GatewayError> {
        self.record_call();
        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(|u| u.identity.clone());
        match user {
            Some(identity) => {
                state.session = Some(identity.clone());
                Ok(identity)
            }
            None => Err(GatewayError::Api {
                code: 401,
                message: "invalid username/password".to_string(),
            }),
        }
    }

    async fn current_session(&self) -> Result<Option<Identity>, GatewayError> {
        self.record_call();
        Ok(self.state.lock().unwrap().session.clone())
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.record_call();
        if self.fail_next_logout.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        self.state.lock().unwrap().session = None;
        Ok(())
    }

    async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, GatewayError> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.username == username) {
            return Err(GatewayError::Api {
                code: 400,
                message: "username already taken".to_string(),
            });
        }
        let identity = Identity {
            id: format!("u-{username}"),
            display_name: username.to_string(),
        };
        state.users.push(MockUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            identity: identity.clone(),
        });
        state.session = Some(identity.clone());
        Ok(identity)
    }

    async fn list_gallery(&self) -> Result<Vec<GalleryRecord>, GatewayError> {
        self.record_call();
        Ok(self.state.lock().unwrap().gallery.clone())
    }

    async fn upload_file(
        &self,
        filename: &str,
        _content_type: &str,
        _data: &[u8],
    ) -> Result<StoredFile, GatewayError> {
        self.record_call();
        if self.fail_next_upload.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Transport("storage unavailable".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.next_seq += 1;
        let stored = StoredFile {
            reference: format!("file-{}", state.next_seq),
            url: format!("https://files.test/{filename}"),
        };
        state.stored.push(stored.clone());
        Ok(stored)
    }

    async fn create_gallery_record(
        &self,
        title: &str,
        file_reference: &str,
        user_id: &str,
    ) -> Result<CreatedRecord, GatewayError> {
        self.record_call();
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Api {
                code: 500,
                message: "record creation failed".to_string(),
            });
        }
        let mut state = self.state.lock().unwrap();
        let stored_url = state
            .stored
            .iter()
            .find(|f| f.reference == file_reference)
            .map(|f| f.url.clone())
            .ok_or_else(|| GatewayError::Api {
                code: 400,
                message: format!("unknown file reference {file_reference}"),
            })?;

        let username = state
            .users
            .iter()
            .find(|u| u.identity.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_else(|| user_id.to_string());

        state.next_seq += 1;
        let record = GalleryRecord {
            id: format!("g-{}", state.next_seq),
            title: title.to_string(),
            image_url: stored_url,
            created_at: Utc::now(),
            uploader: Some(UploaderRef {
                id: user_id.to_string(),
                username,
            }),
        };
        let created = CreatedRecord {
            id: record.id.clone(),
            created_at: record.created_at,
        };
        state.gallery.push(record);
        Ok(created)
    }

    async fn delete_gallery_record(&self, item_id: &str) -> Result<(), GatewayError> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        let Some(item) = state.gallery.iter().find(|g| g.id == item_id) else {
            return Err(GatewayError::Api {
                code: 404,
                message: "object not found".to_string(),
            });
        };
        let owner_id = item.uploader.as_ref().map(|u| u.id.clone());
        let authorized = matches!(
            (&state.session, owner_id),
            (Some(session), Some(owner)) if session.id == owner
        );
        if !authorized {
            return Err(GatewayError::Api {
                code: 403,
                message: "session does not own this object".to_string(),
            });
        }
        state.gallery.retain(|g| g.id != item_id);
        Ok(())
    }
}
