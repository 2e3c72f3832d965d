use std::io::{BufRead, Write};

use anyhow::{Ok, Result};

use crate::{
    cli::{Cli, Commands, client::send_request},
    config::{accessor::ConfigAccessor, paths, store::FileStore},
    daemon::server::DaemonRequest,
};

/// Turns the command line into a daemon request and sends it.
pub async fn handle_cli(cli: &Cli) -> Result<()> {
    let stdin = std::io::stdin();
    let req = build_request(cli, &mut stdin.lock()).await?;
    send_request(req).await?;
    Ok(())
}

/// Builds the [`DaemonRequest`] for the given command. Edit commands without
/// a value read one line from `input`; an empty line cancels and yields
/// [`DaemonRequest::None`].
pub async fn build_request<R: BufRead>(cli: &Cli, input: &mut R) -> Result<DaemonRequest> {
    match &cli.command {
        Commands::Toggle => Ok(DaemonRequest::Toggle),
        Commands::Interval { value } => {
            let value = match value {
                Some(v) => Some(v.clone()),
                None => {
                    let current = current_settings_hint(|s| s.interval_secs.to_string()).await;
                    prompt(input, "Enter the interval in seconds", current.as_deref())?
                }
            };
            Ok(edit_request(value, |value| DaemonRequest::EditInterval { value }))
        }
        Commands::Folder { path } => {
            let value = match path {
                Some(p) => Some(p.clone()),
                None => {
                    let current = current_settings_hint(|s| s.folder_path.clone().unwrap_or_default()).await;
                    prompt(input, "Enter the folder path", current.as_deref())?
                }
            };
            Ok(edit_request(value, |value| DaemonRequest::EditFolderPath { value }))
        }
        Commands::Panel { follow } => Ok(DaemonRequest::Panel { follow: *follow }),
        Commands::Fetch => Ok(DaemonRequest::FetchNow),
        Commands::Logs { follow, lines } => Ok(DaemonRequest::Logs {
            follow: *follow,
            lines: *lines,
        }),
    }
}

fn edit_request(value: Option<String>, build: impl FnOnce(String) -> DaemonRequest) -> DaemonRequest {
    match value {
        Some(v) if !v.trim().is_empty() => build(v),
        _ => DaemonRequest::None,
    }
}

/// Prints `placeholder` (and the current value, if any) and reads one line.
/// Returns `None` on an empty line or end of input.
pub fn prompt<R: BufRead>(input: &mut R, placeholder: &str, current: Option<&str>) -> Result<Option<String>> {
    match current.filter(|c| !c.is_empty()) {
        Some(c) => print!("{placeholder} [{c}]: "),
        None => print!("{placeholder}: "),
    }
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

/// Current value read straight from the settings file, used as a prompt
/// hint. Missing or unreadable settings just mean no hint.
async fn current_settings_hint(
    pick: impl FnOnce(&crate::config::FetchSettings) -> String,
) -> Option<String> {
    let store = FileStore::open(paths::settings_path()).await.ok()?;
    let accessor = ConfigAccessor::new(std::sync::Arc::new(store));
    let settings = accessor.get().await.ok()?;
    Some(pick(&settings))
}
