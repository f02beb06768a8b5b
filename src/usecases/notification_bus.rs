//! Notification bus: fire-and-forget transient messages (toasts).
//!
//! Any component publishes; the bus owns the active set and expires each
//! entry after a fixed display interval unless it is dismissed first.
//! Dismissal aborts the expiry timer, and ids come from an atomic counter so
//! they are never reused within a bus instance.

use crate::domain::{Notification, Severity};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default display interval before auto-dismissal.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Inner {
    active: Vec<Notification>,
    timers: HashMap<String, JoinHandle<()>>,
}

pub struct NotificationBus {
    inner: Arc<Mutex<Inner>>,
    ttl: Duration,
    next_seq: AtomicU64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TOAST_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            ttl,
            next_seq: AtomicU64::new(1),
        }
    }

    /// Enqueue a notification. Always succeeds; returns the assigned id.
    /// The entry auto-expires after the display interval unless dismissed.
    pub fn publish(&self, title: &str, body: Option<&str>, severity: Severity) -> String {
        let id = format!("t-{}", self.next_seq.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id: id.clone(),
            title: title.to_string(),
            body: body.map(str::to_string),
            severity,
        };

        let inner = Arc::clone(&self.inner);
        // Anchor the deadline now so the interval counts from publication,
        // not from when the spawned task is first polled.
        let deadline = tokio::time::Instant::now() + self.ttl;
        let timer_id = id.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut guard = inner.lock().expect("notification bus lock poisoned");
            guard.active.retain(|n| n.id != timer_id);
            guard.timers.remove(&timer_id);
            debug!(id = %timer_id, "toast expired");
        });

        let mut guard = self.inner.lock().expect("notification bus lock poisoned");
        guard.active.push(notification);
        guard.timers.insert(id.clone(), timer);
        id
    }

    /// Remove a notification immediately. No-op when it already expired or
    /// was dismissed; the expiry timer is aborted so it cannot fire later.
    pub fn dismiss(&self, id: &str) {
        let mut guard = self.inner.lock().expect("notification bus lock poisoned");
        guard.active.retain(|n| n.id != id);
        if let Some(timer) = guard.timers.remove(id) {
            timer.abort();
        }
    }

    /// Snapshot of the currently active notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .expect("notification bus lock poisoned")
            .active
            .clone()
    }

    /// Take everything currently active, dismissing it in the same step.
    /// Used by the CLI, which renders each toast exactly once per loop.
    pub fn drain(&self) -> Vec<Notification> {
        let mut guard = self.inner.lock().expect("notification bus lock poisoned");
        for (_, timer) in guard.timers.drain() {
            timer.abort();
        }
        std::mem::take(&mut guard.active)
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::yield_now;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn toast_expires_after_exactly_the_display_interval() {
        let bus = NotificationBus::new();
        let id = bus.publish("Upload Successful", None, Severity::Success);

        advance(Duration::from_millis(4_999)).await;
        yield_now().await;
        assert!(bus.active().iter().any(|n| n.id == id), "expired too early");

        advance(Duration::from_millis(1)).await;
        yield_now().await;
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissal_cancels_the_expiry_timer() {
        let bus = NotificationBus::new();
        let id = bus.publish("Upload Failed", Some("disk on fire"), Severity::Error);
        bus.dismiss(&id);
        assert!(bus.active().is_empty());

        // Timer is gone; advancing past the interval must not panic or
        // resurrect anything.
        advance(Duration::from_secs(6)).await;
        yield_now().await;
        assert!(bus.active().is_empty());

        // Dismissing again is a no-op.
        bus.dismiss(&id);
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique_and_ordering_is_publication_order() {
        let bus = NotificationBus::new();
        let a = bus.publish("first", None, Severity::Info);
        let b = bus.publish("second", None, Severity::Info);
        assert_ne!(a, b);

        let titles: Vec<String> = bus.active().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_takes_everything_once() {
        let bus = NotificationBus::new();
        bus.publish("one", None, Severity::Info);
        bus.publish("two", Some("body"), Severity::Error);

        let drained = bus.drain();
        assert_eq!(drained.len(), 2);
        assert!(bus.active().is_empty());
        assert!(bus.drain().is_empty());
    }
}
