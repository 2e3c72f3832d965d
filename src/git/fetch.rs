use anyhow::Result;
use async_trait::async_trait;

use crate::{
    config::paths::git_program,
    exec::command::{CommandOutput, run_command},
};

/// Something that can run `git fetch` for a working tree.
#[async_trait]
pub trait GitFetch: Send + Sync {
    async fn fetch(&self, folder_path: &str) -> Result<CommandOutput>;
}

/// Arguments for `git -C <folder> fetch`. The folder is passed as a single
/// argument, never through a shell.
pub fn fetch_args(folder_path: &str) -> Vec<String> {
    vec!["-C".to_string(), folder_path.to_string(), "fetch".to_string()]
}

/// Runs the real git binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
}

impl SystemGit {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses `AUTOFETCH_GIT` if set, `git` otherwise.
    pub fn from_env() -> Self {
        Self::new(git_program())
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::from_env()
    }
}

#[async_trait]
impl GitFetch for SystemGit {
    async fn fetch(&self, folder_path: &str) -> Result<CommandOutput> {
        run_command(&self.program, &fetch_args(folder_path)).await
    }
}
