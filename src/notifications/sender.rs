use async_trait::async_trait;

use super::{Level, Notification, Notifier};
use crate::log::logger::Logger;

/// Prints notifications on the daemon's terminal and appends them to the log
/// file that `autofetch logs` reads.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    logger: Logger,
}

impl LogNotifier {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) {
        let res = match notification.level {
            Level::Info => {
                println!("ℹ️  {}", notification.message);
                self.logger.info(&notification.message).await
            }
            Level::Error => {
                eprintln!("❌ {}", notification.message);
                self.logger.error(&notification.message).await
            }
        };
        if let Err(e) = res {
            eprintln!("❌ Failed to write notification to log: {e}");
        }
    }
}
