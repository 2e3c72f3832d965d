use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    config::paths,
    core::{controller::Controller, fetcher::FetchOutcome},
    log::logger::Logger,
    notifications::Notification,
    panel::PanelRow,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action")]
pub enum DaemonRequest {
    #[serde(rename = "toggle")]
    Toggle,

    #[serde(rename = "edit_interval")]
    EditInterval { value: String },

    #[serde(rename = "edit_folder_path")]
    EditFolderPath { value: String },

    #[serde(rename = "panel")]
    Panel { follow: bool },

    #[serde(rename = "fetch_now")]
    FetchNow,

    #[serde(rename = "logs")]
    Logs { follow: bool, lines: Option<usize> },

    None,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum DaemonResponse {
    Success(String),
    Error(String),
    Panel(Vec<PanelRow>),
    LogFile(String, bool),
    LogLines(Vec<String>),
    Ignore,
    None,
}

impl From<Notification> for DaemonResponse {
    fn from(n: Notification) -> Self {
        if n.is_error() {
            DaemonResponse::Error(n.message)
        } else {
            DaemonResponse::Success(n.message)
        }
    }
}

/// Handles one request and writes the resulting [`DaemonResponse`] lines to
/// `stream`. Failures inside a handler become `DaemonResponse::Error`; only
/// failures to write the response are returned.
///
/// `stream` is only read from while following the panel, to notice the client
/// hanging up.
pub async fn handle_request<S>(
    req: DaemonRequest,
    controller: Arc<Controller>,
    stream: &mut S,
) -> Result<(), anyhow::Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let response = match req {
        DaemonRequest::Toggle => into_response(controller.toggle().await.map(Some)),

        DaemonRequest::EditInterval { value } => {
            into_response(controller.edit_interval(Some(&value)).await)
        }

        DaemonRequest::EditFolderPath { value } => {
            into_response(controller.edit_folder_path(Some(&value)).await)
        }

        DaemonRequest::Panel { follow: false } => match controller.refresh_panel().await {
            Ok(rows) => DaemonResponse::Panel(rows),
            Err(e) => DaemonResponse::Error(format!("Failed to render panel: {e}")),
        },

        DaemonRequest::Panel { follow: true } => {
            handle_follow_panel(&controller, stream).await?;
            DaemonResponse::Ignore
        }

        DaemonRequest::FetchNow => handle_fetch_now(&controller).await,

        DaemonRequest::Logs { follow, lines } => handle_logs(paths::log_path(), follow, lines).await,

        DaemonRequest::None => DaemonResponse::None,
    };

    if response != DaemonResponse::Ignore {
        send_response(stream, response).await?;
    }
    Ok(())
}

fn into_response(result: Result<Option<Notification>>) -> DaemonResponse {
    match result {
        Ok(Some(n)) => n.into(),
        Ok(None) => DaemonResponse::None,
        Err(e) => DaemonResponse::Error(format!("Failed to update settings: {e}")),
    }
}

async fn handle_fetch_now(controller: &Controller) -> DaemonResponse {
    match controller.fetch_now().await {
        FetchOutcome::Success => {
            DaemonResponse::Success(crate::core::fetcher::SUCCESS_MESSAGE.to_string())
        }
        FetchOutcome::Failed(e) => DaemonResponse::Error(e.to_string()),
        FetchOutcome::Skipped => {
            DaemonResponse::Success("A fetch is already running, skipped.".to_string())
        }
    }
}

/// Sends the current panel, then one more panel per re-render until the
/// client hangs up.
async fn handle_follow_panel<S>(controller: &Controller, stream: &mut S) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut rows = controller.panel().subscribe();
    let current = controller.refresh_panel().await?;
    rows.mark_unchanged();
    send_response(stream, DaemonResponse::Panel(current)).await?;

    let mut scratch = [0u8; 256];
    loop {
        tokio::select! {
            changed = rows.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rows.borrow_and_update().clone();
                if send_response(stream, DaemonResponse::Panel(snapshot)).await.is_err() {
                    break;
                }
            }
            read = stream.read(&mut scratch) => match read {
                // EOF or a broken socket: the client is gone
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            },
        }
    }
    Ok(())
}

/// Either the last `lines` log lines, or the log path for the client to read
/// (and follow) itself.
pub async fn handle_logs(log_path: PathBuf, follow: bool, lines: Option<usize>) -> DaemonResponse {
    match lines {
        Some(n) => match Logger::fetchn(&log_path, n).await {
            Ok(lines) => DaemonResponse::LogLines(lines),
            Err(e) => DaemonResponse::Error(format!("Failed to fetch logs: {e}")),
        },
        None => match log_path.to_str() {
            Some(p) => DaemonResponse::LogFile(p.to_string(), follow),
            None => DaemonResponse::Error("Failed to find log path".to_string()),
        },
    }
}

pub async fn send_response<W>(stream: &mut W, response: DaemonResponse) -> Result<(), anyhow::Error>
where
    W: AsyncWrite + Unpin,
{
    let response_str = serde_json::to_string(&response)? + "\n";
    stream.write_all(response_str.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}
