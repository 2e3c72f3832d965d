//! In-process stand-in for [`SystemGit`](super::fetch::SystemGit).
//!
//! Records every folder it was asked to fetch and answers with a scripted
//! result, optionally after a delay so overlapping fetches can be simulated
//! under a paused tokio clock.

use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;

use super::fetch::GitFetch;
use crate::exec::command::CommandOutput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// exit 0, nothing on stderr
    Clean,
    /// exit 0 with text on stderr
    Stderr(String),
    /// non-zero exit with the given stderr
    Exit(i32, String),
    /// the process never started
    LaunchError(String),
}

pub struct MockGit {
    calls: AtomicUsize,
    folders: Mutex<Vec<String>>,
    response: Mutex<MockResponse>,
    delay: Mutex<Option<Duration>>,
}

impl MockGit {
    pub fn new(response: MockResponse) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            folders: Mutex::new(Vec::new()),
            response: Mutex::new(response),
            delay: Mutex::new(None),
        }
    }

    pub fn clean() -> Self {
        Self::new(MockResponse::Clean)
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap_or_else(|e| e.into_inner()) = Some(delay);
        self
    }

    pub fn set_response(&self, response: MockResponse) {
        *self.response.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn folders(&self) -> Vec<String> {
        self.folders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::clean()
    }
}

#[async_trait]
impl GitFetch for MockGit {
    async fn fetch(&self, folder_path: &str) -> Result<CommandOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.folders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(folder_path.to_string());

        let delay = *self.delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        let response = self
            .response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match response {
            MockResponse::Clean => Ok(CommandOutput {
                status_code: Some(0),
                ..Default::default()
            }),
            MockResponse::Stderr(stderr) => Ok(CommandOutput {
                status_code: Some(0),
                stderr,
            }),
            MockResponse::Exit(code, stderr) => Ok(CommandOutput {
                status_code: Some(code),
                stderr,
            }),
            MockResponse::LaunchError(msg) => Err(anyhow::anyhow!(msg)),
        }
    }
}
