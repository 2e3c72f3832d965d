use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Result;
use tokio::task::JoinHandle;

use crate::{
    config::accessor::ConfigAccessor,
    core::error::FetchError,
    exec::command::CommandOutput,
    git::fetch::GitFetch,
    log::logger::Logger,
    notifications::{Notification, Notifier},
};

pub const SUCCESS_MESSAGE: &str = "Git fetch executed successfully.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Failed(FetchError),
    /// Another fetch was still running; nothing was started or reported.
    Skipped,
}

/// Runs `git fetch` in the configured folder and reports the result.
///
/// At most one fetch runs at a time: an invocation that arrives while the
/// previous one is still in flight is skipped.
#[derive(Clone)]
pub struct FetchRunner {
    accessor: ConfigAccessor,
    git: Arc<dyn GitFetch>,
    notifier: Arc<dyn Notifier>,
    logger: Option<Logger>,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the fetch finishes or its task is dropped.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl FetchRunner {
    pub fn new(
        accessor: ConfigAccessor,
        git: Arc<dyn GitFetch>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            accessor,
            git,
            notifier,
            logger: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Fire and forget: the fetch runs on its own task and the caller gets
    /// control back immediately.
    pub fn run(&self) -> JoinHandle<FetchOutcome> {
        let runner = self.clone();
        tokio::spawn(async move { runner.fetch_once().await })
    }

    pub async fn fetch_once(&self) -> FetchOutcome {
        let folder_path = match self.accessor.folder_path().await {
            Ok(Some(path)) => path,
            Ok(None) => return self.report(Err(FetchError::ConfigurationMissing)).await,
            Err(e) => {
                let err = FetchError::CommandLaunchFailure(format!("failed to read settings: {e}"));
                return self.report(Err(err)).await;
            }
        };

        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.log_warning(&format!(
                "fetch already in progress for {folder_path}, skipping"
            ))
            .await;
            return FetchOutcome::Skipped;
        }
        let _guard = InFlight(Arc::clone(&self.in_flight));

        if let Some(logger) = &self.logger {
            let _ = logger.fetch_start(&format!("git -C \"{folder_path}\" fetch")).await;
        }

        let result = classify(self.git.fetch(&folder_path).await);

        if let Some(logger) = &self.logger {
            let status = if result.is_ok() { "ok" } else { "failed" };
            let _ = logger.fetch_end(&format!("{folder_path}: {status}")).await;
        }

        self.report(result).await
    }

    async fn report(&self, result: Result<(), FetchError>) -> FetchOutcome {
        match result {
            Ok(()) => {
                self.notifier.notify(Notification::info(SUCCESS_MESSAGE)).await;
                FetchOutcome::Success
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string())).await;
                FetchOutcome::Failed(e)
            }
        }
    }

    async fn log_warning(&self, msg: &str) {
        match &self.logger {
            Some(logger) => {
                let _ = logger.warning(msg).await;
            }
            None => eprintln!("⚠ {msg}"),
        }
    }
}

/// Maps the result of running git to the three possible outcomes.
///
/// Any stderr output on a successful exit counts as an error. git writes
/// progress there, so this is knowingly noisy.
pub fn classify(result: Result<CommandOutput>) -> Result<(), FetchError> {
    let output = result.map_err(|e| FetchError::CommandLaunchFailure(format!("{e:#}")))?;

    if !output.success() {
        let status = match output.status_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        let stderr = output.stderr.trim();
        let detail = if stderr.is_empty() {
            status
        } else {
            format!("{status}: {stderr}")
        };
        return Err(FetchError::CommandLaunchFailure(detail));
    }

    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return Err(FetchError::CommandDiagnosticOutput(stderr.to_string()));
    }
    Ok(())
}
