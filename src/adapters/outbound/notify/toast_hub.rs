use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::{domain::models::Notification, ports::services::NotificationSink};

/// An expiring collection of active notifications: each published entry is
/// removed again after its duration, and callers may dismiss an entry
/// early. Rendering is not this type's concern; a display layer polls
/// `active()`.
#[derive(Clone)]
pub struct ToastHub {
    entries: Arc<Mutex<HashMap<Uuid, Notification>>>,
}

impl ToastHub {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Snapshot of the currently visible notifications
    pub fn active(&self) -> Vec<(Uuid, Notification)> {
        self.entries
            .lock()
            .expect("toast hub lock poisoned")
            .iter()
            .map(|(id, notification)| (*id, notification.clone()))
            .collect()
    }

    /// Remove an entry before its scheduled expiry. Unknown ids are
    /// ignored; the expiry task may have beaten the caller to it.
    pub fn dismiss(&self, id: Uuid) {
        self.entries
            .lock()
            .expect("toast hub lock poisoned")
            .remove(&id);
    }
}

impl Default for ToastHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for ToastHub {
    fn publish(&self, notification: Notification) {
        let id = Uuid::new_v4();
        let duration = notification.duration;

        self.entries
            .lock()
            .expect("toast hub lock poisoned")
            .insert(id, notification);

        // Scheduled removal; single-threaded cooperative scheduling is
        // enough, no dedicated timer wheel needed.
        let entries = Arc::clone(&self.entries);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            entries.lock().expect("toast hub lock poisoned").remove(&id);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_duration() {
        let hub = ToastHub::new();
        hub.publish(Notification::success("Post added"));
        assert_eq!(hub.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(hub.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_removes_entry_early() {
        let hub = ToastHub::new();
        hub.publish(Notification::info("Adding post..."));

        let (id, _) = hub.active().pop().unwrap();
        hub.dismiss(id);
        assert!(hub.active().is_empty());

        // Late expiry of a dismissed entry is a no-op
        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(hub.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_with_different_durations() {
        let hub = ToastHub::new();
        hub.publish(Notification::info("short").with_duration(Duration::from_millis(100)));
        hub.publish(Notification::info("long").with_duration(Duration::from_millis(5000)));

        tokio::time::sleep(Duration::from_millis(101)).await;
        let remaining = hub.active();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].1.message, "long");
    }
}
