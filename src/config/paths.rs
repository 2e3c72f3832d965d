//! Filesystem locations used by the daemon and the CLI.
//!
//! Every location can be moved with an environment variable so that several
//! daemons (or a test suite) can run side by side:
//!
//! - `AUTOFETCH_HOME`: data directory (settings + logs)
//! - `AUTOFETCH_SOCKET`: daemon socket
//! - `AUTOFETCH_GIT`: git program used for fetches
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

const DEFAULT_SOCKET: &str = "/tmp/autofetchd.sock";
const DEFAULT_GIT: &str = "git";

pub fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("AUTOFETCH_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::data_local_dir()
        .map(|d| d.join("autofetch"))
        .or_else(|| dirs::home_dir().map(|h| h.join(".autofetch")))
        .unwrap_or_else(|| PathBuf::from(".autofetch"))
}

pub fn settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn log_path() -> PathBuf {
    log_dir().join("autofetch.log")
}

pub fn socket_path() -> PathBuf {
    std::env::var_os("AUTOFETCH_SOCKET")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET))
}

pub fn git_program() -> String {
    std::env::var("AUTOFETCH_GIT")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GIT.to_string())
}

/// Creates the data and log directories if they are missing.
pub async fn init_dirs() -> Result<()> {
    let log_dir = log_dir();
    if !fs::try_exists(&log_dir).await? {
        fs::create_dir_all(&log_dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
        println!("init logs directory : {}", log_dir.display());
    }
    Ok(())
}
