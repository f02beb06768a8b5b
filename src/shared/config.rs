//! Application configuration. Backend credentials, server URL, tunables.

use serde::Deserialize;

/// Default hosted backend base URL.
pub const DEFAULT_SERVER_URL: &str = "https://api.pixhive.app";

/// Credential value shipped in .env templates; treated the same as absent.
pub const PLACEHOLDER_CREDENTIAL: &str = "YOUR_API_KEY";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Opaque application identifier. Read from PIXHIVE_APP_ID.
    pub app_id: Option<String>,

    /// Opaque client key. Read from PIXHIVE_CLIENT_KEY.
    pub client_key: Option<String>,

    /// Backend base URL. Read from PIXHIVE_SERVER_URL.
    #[serde(default)]
    pub server_url: Option<String>,

    /// Request timeout in seconds for backend calls. Read from PIXHIVE_HTTP_TIMEOUT_SECS.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    /// Toast display interval in milliseconds. Read from PIXHIVE_TOAST_TTL_MS.
    #[serde(default)]
    pub toast_ttl_ms: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("PIXHIVE"));
        if let Ok(path) = std::env::var("PIXHIVE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the backend base URL. Defaults to the hosted instance.
    pub fn server_url_or_default(&self) -> String {
        self.server_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Returns the request timeout in seconds. Defaults to 30.
    pub fn http_timeout_secs_or_default(&self) -> u64 {
        self.http_timeout_secs.unwrap_or(30)
    }

    /// Returns the toast display interval in milliseconds. Defaults to 5000.
    pub fn toast_ttl_ms_or_default(&self) -> u64 {
        self.toast_ttl_ms.unwrap_or(5_000)
    }

    /// Returns the application identifier if it is usable (present, non-empty,
    /// not the .env template placeholder).
    pub fn app_id(&self) -> Option<String> {
        self.app_id.clone().filter(|s| is_usable_credential(s))
    }

    /// Returns the client key if it is usable.
    pub fn client_key(&self) -> Option<String> {
        self.client_key.clone().filter(|s| is_usable_credential(s))
    }

    /// Returns true when both credentials are usable. When false, the client
    /// runs degraded: every network-dependent operation fails fast with
    /// BackendUnavailable instead of attempting a call.
    pub fn is_backend_configured(&self) -> bool {
        self.app_id().is_some() && self.client_key().is_some()
    }
}

fn is_usable_credential(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && trimmed != PLACEHOLDER_CREDENTIAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_credential_counts_as_unconfigured() {
        let cfg = AppConfig {
            app_id: Some(PLACEHOLDER_CREDENTIAL.to_string()),
            client_key: Some("real-key".to_string()),
            ..Default::default()
        };
        assert!(!cfg.is_backend_configured());
        assert!(cfg.app_id().is_none());
        assert!(cfg.client_key().is_some());
    }

    #[test]
    fn empty_credential_counts_as_unconfigured() {
        let cfg = AppConfig {
            app_id: Some("app-123".to_string()),
            client_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!cfg.is_backend_configured());
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server_url_or_default(), DEFAULT_SERVER_URL);
        assert_eq!(cfg.toast_ttl_ms_or_default(), 5_000);
        assert_eq!(cfg.http_timeout_secs_or_default(), 30);
    }
}
