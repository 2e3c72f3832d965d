use std::sync::Mutex;

use async_trait::async_trait;

use super::{Level, Notification, Notifier};

/// Keeps every notification in memory, in order.
#[derive(Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.by_level(Level::Error)
    }

    pub fn infos(&self) -> Vec<Notification> {
        self.by_level(Level::Info)
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn by_level(&self, level: Level) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.level == level).collect()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, notification: Notification) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
