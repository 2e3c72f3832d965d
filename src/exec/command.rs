use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;

/// What a finished child process left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub status_code: Option<i32>, // None when killed by a signal
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Runs `program args..` to completion and captures stderr. stdout is
/// discarded.
///
/// Only a failure to start the process is an `Err`; a non-zero exit is
/// reported through [`CommandOutput::status_code`]. No timeout is applied.
pub async fn run_command(program: &str, args: &[String]) -> Result<CommandOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = cmd
        .output()
        .await
        .with_context(|| format!("Failed to launch `{program}`"))?;

    Ok(CommandOutput {
        status_code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
