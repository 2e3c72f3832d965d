pub mod builders;
pub mod client;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Turn periodic fetching on or off
    Toggle,

    /// Change the fetch interval (prompts when VALUE is omitted)
    Interval { value: Option<String> },

    /// Change the repository folder (prompts when PATH is omitted)
    Folder { path: Option<String> },

    /// Show the settings panel
    Panel {
        #[arg(short = 'f', long)]
        follow: bool,
    },

    /// Run one fetch now
    Fetch,

    /// Show fetch notifications
    Logs {
        #[arg(short = 'f', long)]
        follow: bool,

        #[arg(short = 'n', long)]
        lines: Option<usize>,
    },
}
