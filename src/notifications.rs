//! User-visible notices raised at the boundary with upstream collaborators.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub retryable: bool,
}

/// Shared queue drained by the host to show notices (and retry buttons).
#[derive(Clone, Default)]
pub struct Notifications {
    queue: Arc<Mutex<Vec<Notification>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        self.queue.lock().push(notification);
    }

    pub fn retryable_error(&self, message: impl Into<String>) {
        self.push(Notification {
            message: message.into(),
            retryable: true,
        });
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
