//! Wiring & DI. Entry point: bootstrap adapters, inject into use cases, run UI.
//! No business logic here.

use dotenv::dotenv;
use pixhive::adapters::backend::{RestGateway, UnconfiguredGateway};
use pixhive::adapters::ui::tui::TuiInputPort;
use pixhive::ports::{BackendGateway, InputPort};
use pixhive::shared::config::AppConfig;
use pixhive::usecases::{GalleryRepository, NotificationBus, SessionStore, UploadPipeline};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found (check CWD)"),
    }

    pixhive::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();

    // Degraded mode when credentials are absent or still the placeholder:
    // every network-dependent operation fails fast with BackendUnavailable.
    let gateway: Arc<dyn BackendGateway> = if cfg.is_backend_configured() {
        let server_url = cfg.server_url_or_default();
        info!(server_url = %server_url, "backend gateway configured");
        Arc::new(
            RestGateway::new(
                &server_url,
                &cfg.app_id().unwrap_or_default(),
                &cfg.client_key().unwrap_or_default(),
                Duration::from_secs(cfg.http_timeout_secs_or_default()),
            )
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        )
    } else {
        warn!("PIXHIVE_APP_ID / PIXHIVE_CLIENT_KEY missing or placeholder, running degraded");
        Arc::new(UnconfiguredGateway)
    };

    // --- Use cases ---
    let session = Arc::new(SessionStore::new(Arc::clone(&gateway)));
    let repository = Arc::new(GalleryRepository::new(Arc::clone(&gateway)));
    let uploads = Arc::new(UploadPipeline::new(
        Arc::clone(&gateway),
        Arc::clone(&repository),
    ));
    let toasts = Arc::new(NotificationBus::with_ttl(Duration::from_millis(
        cfg.toast_ttl_ms_or_default(),
    )));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        session,
        repository,
        uploads,
        toasts,
    ));

    // --- Run (menu -> browse / upload / login / sign up / logout) ---
    input_port.run().await?;

    Ok(())
}
