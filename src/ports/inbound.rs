//! Inbound port. UI (adapter) calls into the application.

/// Input port: UI/CLI invokes application use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive loop (browse, upload, login/logout) until the
    /// user quits.
    async fn run(&self) -> anyhow::Result<()>;
}
