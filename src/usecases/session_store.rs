//! Session store: cached authenticated identity plus login/logout/refresh.
//!
//! The cache is the single source of truth for "who is logged in". Reads are
//! synchronous; only the operations that talk to the backend are async.
//! Subscribers observe transitions through a watch channel; a transition is
//! published synchronously when the cached value actually changes, exactly
//! once, and no-op writes (refresh resolving to the same value) publish
//! nothing.
//!
//! Overlapping operations are not fenced: whichever resolves last wins the
//! cache. Only one identity is meaningful at a time and the UI always shows
//! the most recently resolved state.

use crate::domain::{AuthError, GatewayError, Identity, SessionError};
use crate::ports::BackendGateway;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct SessionStore {
    gateway: Arc<dyn BackendGateway>,
    cache: watch::Sender<Option<Identity>>,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        let (cache, _) = watch::channel(None);
        Self { gateway, cache }
    }

    /// Cached identity. Never performs network I/O.
    pub fn current_identity(&self) -> Option<Identity> {
        self.cache.borrow().clone()
    }

    /// Subscribe to identity transitions. The receiver sees the value as of
    /// subscription time plus every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.cache.subscribe()
    }

    /// Ask the backend which session is live and replace the cache with the
    /// answer (possibly absent). On failure the prior cached value stays.
    pub async fn refresh(&self) -> Result<Option<Identity>, SessionError> {
        let identity = self.gateway.current_session().await?;
        self.replace_cache(identity.clone());
        Ok(identity)
    }

    /// Authenticate. On success the cache is updated before this resolves,
    /// so any other component reading `current_identity` sees the new user.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = self
            .gateway
            .login(username, password)
            .await
            .map_err(classify_login_error)?;
        info!(user_id = %identity.id, "logged in");
        self.replace_cache(Some(identity.clone()));
        Ok(identity)
    }

    /// Register a new account. The backend logs the new user in on success,
    /// so the cache is set exactly like `login`.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let identity = self
            .gateway
            .sign_up(username, email, password)
            .await
            .map_err(classify_sign_up_error)?;
        info!(user_id = %identity.id, "account created");
        self.replace_cache(Some(identity.clone()));
        Ok(identity)
    }

    /// Invalidate the session server-side, then clear the cache. If the
    /// backend call fails the cached identity stays set: the session token
    /// is still live and the UI must not pretend otherwise.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if let Err(e) = self.gateway.logout().await {
            warn!(error = %e, "logout failed, keeping cached identity");
            return Err(e.into());
        }
        self.replace_cache(None);
        info!("logged out");
        Ok(())
    }

    fn replace_cache(&self, next: Option<Identity>) {
        // send_if_modified notifies subscribers synchronously and only on a
        // real transition.
        self.cache.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

fn classify_login_error(e: GatewayError) -> AuthError {
    match e {
        GatewayError::Unconfigured => AuthError::BackendUnavailable,
        GatewayError::Api { code, .. } if (400..500).contains(&code) => {
            AuthError::InvalidCredentials
        }
        GatewayError::Api { code, message } => {
            AuthError::Transport(format!("unexpected backend response {code}: {message}"))
        }
        GatewayError::Transport(msg) => AuthError::Transport(msg),
    }
}

fn classify_sign_up_error(e: GatewayError) -> AuthError {
    match e {
        GatewayError::Unconfigured => AuthError::BackendUnavailable,
        GatewayError::Api { code, message } if (400..500).contains(&code) => {
            AuthError::Rejected(message)
        }
        GatewayError::Api { code, message } => {
            AuthError::Transport(format!("unexpected backend response {code}: {message}"))
        }
        GatewayError::Transport(msg) => AuthError::Transport(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::mock_gateway::MockGateway;
    use crate::adapters::backend::unconfigured::UnconfiguredGateway;

    fn store_with_user() -> (SessionStore, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::new().with_user("alice", "alice@example.com", "s3cret"));
        let store = SessionStore::new(gateway.clone());
        (store, gateway)
    }

    #[tokio::test]
    async fn login_sets_cache_before_resolving() {
        let (store, _) = store_with_user();
        let identity = store.login("alice", "s3cret").await.unwrap();
        assert_eq!(store.current_identity(), Some(identity));
    }

    #[tokio::test]
    async fn failed_login_leaves_cache_untouched() {
        let (store, _) = store_with_user();
        store.login("alice", "s3cret").await.unwrap();
        let before = store.current_identity();

        let err = store.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(store.current_identity(), before);
    }

    #[tokio::test]
    async fn failed_logout_keeps_identity_set() {
        let (store, gateway) = store_with_user();
        store.login("alice", "s3cret").await.unwrap();

        gateway.fail_next_logout();
        let err = store.logout().await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert!(store.current_identity().is_some());

        store.logout().await.unwrap();
        assert!(store.current_identity().is_none());
    }

    #[tokio::test]
    async fn last_resolved_operation_wins_the_cache() {
        let gateway = Arc::new(
            MockGateway::new()
                .with_user("alice", "alice@example.com", "s3cret")
                .with_login_delay_ms(50),
        );
        let store = Arc::new(SessionStore::new(gateway));

        // Slow login raced against a fast refresh: the refresh resolves
        // first (no session yet -> absent), then the login lands.
        let login = {
            let store = store.clone();
            tokio::spawn(async move { store.login("alice", "s3cret").await })
        };
        store.refresh().await.unwrap();
        let identity = login.await.unwrap().unwrap();
        assert_eq!(store.current_identity(), Some(identity));
    }

    #[tokio::test]
    async fn noop_refresh_publishes_no_transition() {
        let (store, _) = store_with_user();
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        // No session live; refresh resolves absent -> absent.
        assert_eq!(store.refresh().await.unwrap(), None);
        assert!(!rx.has_changed().unwrap());

        store.login("alice", "s3cret").await.unwrap();
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn transition_notifies_subscribers_exactly_once() {
        let (store, _) = store_with_user();
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.login("alice", "s3cret").await.unwrap();
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.unwrap().display_name, "alice");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn unconfigured_backend_fails_fast() {
        let store = SessionStore::new(Arc::new(UnconfiguredGateway));
        assert!(matches!(
            store.login("a", "b").await.unwrap_err(),
            AuthError::BackendUnavailable
        ));
        assert!(matches!(
            store.refresh().await.unwrap_err(),
            SessionError::BackendUnavailable
        ));
        assert!(matches!(
            store.logout().await.unwrap_err(),
            SessionError::BackendUnavailable
        ));
        assert!(matches!(
            store.sign_up("a", "a@a", "b").await.unwrap_err(),
            AuthError::BackendUnavailable
        ));
    }

    #[tokio::test]
    async fn sign_up_rejection_carries_backend_message() {
        let (store, _) = store_with_user();
        let err = store
            .sign_up("alice", "other@example.com", "pw")
            .await
            .unwrap_err();
        match err {
            AuthError::Rejected(msg) => assert!(msg.contains("username")),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
