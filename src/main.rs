use clap::Parser;

use core_lib::cli::{Cli, builders::handle_cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    handle_cli(&cli).await
}
