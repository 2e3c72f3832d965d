use thiserror::Error;

/// Why a fetch did not end cleanly. None of these stop the scheduler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("No folder path set. Please configure the folder path in settings.")]
    ConfigurationMissing,

    /// git could not be started or exited with a non-zero status.
    #[error("Error running git fetch: {0}")]
    CommandLaunchFailure(String),

    /// git exited with status 0 but wrote to stderr. git reports progress on
    /// stderr, so this also fires for perfectly normal fetches.
    #[error("Git fetch error output: {0}")]
    CommandDiagnosticOutput(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid interval entered.")]
    InvalidUserInput(String),
}
