use std::sync::Arc;

use anyhow::Result;
use tokio::{
    sync::{Mutex, broadcast::error::RecvError},
    task::JoinHandle,
};

use crate::{
    config::{ENABLED_KEY, accessor::{ConfigAccessor, parse_interval}},
    core::{
        fetcher::{FetchOutcome, FetchRunner},
        scheduler::Scheduler,
    },
    notifications::{Notification, Notifier},
    panel::{PanelRow, PanelView},
};

/// The user-facing actions. Each one updates the settings, brings the
/// scheduler in line, re-renders the panel and sends one notification.
pub struct Controller {
    accessor: ConfigAccessor,
    scheduler: Mutex<Scheduler>,
    notifier: Arc<dyn Notifier>,
    panel: PanelView,
}

impl Controller {
    pub fn new(accessor: ConfigAccessor, runner: FetchRunner, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            accessor,
            scheduler: Mutex::new(Scheduler::new(runner)),
            notifier,
            panel: PanelView::new(),
        }
    }

    pub fn accessor(&self) -> &ConfigAccessor {
        &self.accessor
    }

    pub fn panel(&self) -> &PanelView {
        &self.panel
    }

    /// Process start: when enabled, fetch once right away and then keep
    /// fetching on the configured interval.
    pub async fn startup(&self) -> Result<()> {
        let settings = self.accessor.get().await?;
        if settings.enabled {
            let mut scheduler = self.scheduler.lock().await;
            let _ = scheduler.fetch_now();
            scheduler.start(settings.interval_secs);
        }
        self.panel.refresh(&settings);
        Ok(())
    }

    /// Stops the timer. Fetches already running are left to finish.
    pub async fn shutdown(&self) {
        self.scheduler.lock().await.stop();
    }

    pub async fn toggle(&self) -> Result<Notification> {
        let enabled = !self.accessor.enabled().await?;
        self.accessor.set_enabled(enabled).await?;

        {
            let mut scheduler = self.scheduler.lock().await;
            if enabled {
                let interval_secs = self.accessor.interval_secs().await?;
                let _ = scheduler.fetch_now();
                scheduler.start(interval_secs);
            } else {
                scheduler.stop();
            }
        }

        self.refresh_panel().await?;

        let notification = if enabled {
            Notification::info("Auto Git Fetch is now enabled.")
        } else {
            Notification::info("Auto Git Fetch is now disabled.")
        };
        self.notify(notification).await
    }

    /// `None` or blank input means the prompt was dismissed: nothing happens.
    pub async fn edit_interval(&self, input: Option<&str>) -> Result<Option<Notification>> {
        let Some(input) = input.filter(|i| !i.trim().is_empty()) else {
            return Ok(None);
        };

        let interval_secs = match parse_interval(input) {
            Ok(n) => n,
            Err(e) => return self.notify(Notification::error(e.to_string())).await.map(Some),
        };

        self.accessor.set_interval(interval_secs).await?;

        if self.accessor.enabled().await? {
            self.scheduler.lock().await.restart(interval_secs);
        }

        self.refresh_panel().await?;
        self.notify(Notification::info(format!(
            "Interval updated to {interval_secs} seconds."
        )))
        .await
        .map(Some)
    }

    /// Stores the path exactly as typed. Blank input cancels.
    pub async fn edit_folder_path(&self, input: Option<&str>) -> Result<Option<Notification>> {
        let Some(folder_path) = input.filter(|i| !i.trim().is_empty()) else {
            return Ok(None);
        };

        self.accessor.set_folder_path(folder_path).await?;
        self.refresh_panel().await?;
        self.notify(Notification::info(format!(
            "Folder path updated to {folder_path}."
        )))
        .await
        .map(Some)
    }

    /// Runs one fetch now, whether or not the timer is enabled, and waits
    /// for it.
    pub async fn fetch_now(&self) -> FetchOutcome {
        let runner = self.scheduler.lock().await.runner().clone();
        runner.fetch_once().await
    }

    pub async fn refresh_panel(&self) -> Result<Vec<PanelRow>> {
        let settings = self.accessor.get().await?;
        Ok(self.panel.refresh(&settings))
    }

    pub async fn is_scheduled(&self) -> bool {
        self.scheduler.lock().await.is_running()
    }

    pub async fn scheduled_interval(&self) -> Option<u64> {
        self.scheduler.lock().await.interval_secs()
    }

    /// Re-renders the panel whenever the enabled flag changes in the store,
    /// including edits made outside this process.
    pub fn spawn_settings_watch(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.accessor.store().subscribe();
        let controller = Arc::clone(self);

        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(key) if key == ENABLED_KEY => controller.refresh_after_change().await,
                    Ok(_) => {}
                    Err(RecvError::Lagged(_)) => controller.refresh_after_change().await,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    async fn refresh_after_change(&self) {
        if let Err(e) = self.refresh_panel().await {
            eprintln!("❌ Failed to refresh panel: {e}");
        }
    }

    async fn notify(&self, notification: Notification) -> Result<Notification> {
        self.notifier.notify(notification.clone()).await;
        Ok(notification)
    }
}
