use tracing::{error, info};

use crate::{
    domain::models::{Notification, NotificationKind},
    ports::services::NotificationSink,
};

/// NotificationSink that forwards status messages to the tracing pipeline.
/// Used by the server binary, where no toast display exists.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingSink {
    fn publish(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => {
                error!(kind = notification.kind.as_str(), "{}", notification.message)
            }
            _ => info!(kind = notification.kind.as_str(), "{}", notification.message),
        }
    }
}
