use crate::domain::models::Notification;

/// Sink for user-facing status notifications.
///
/// Fire-and-forget: publishing must not block, and the core never awaits or
/// inspects the outcome. The display side (toasts, logs) lives behind this
/// trait.
pub trait NotificationSink: Send + Sync + 'static {
    fn publish(&self, notification: Notification);
}
