use std::sync::Arc;

use core_lib::{
    config::{accessor::ConfigAccessor, paths, store::FileStore},
    core::{controller::Controller, fetcher::FetchRunner},
    daemon::listener::start_socket_listener,
    git::fetch::SystemGit,
    log::logger::Logger,
    notifications::{Notifier, sender::LogNotifier},
};

// single thread: ticks, requests and settings changes are handled one at a time
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    paths::init_dirs().await?;
    let logger = Logger::open_default().await?;

    let store = Arc::new(FileStore::open(paths::settings_path()).await?);
    let _watcher = match Arc::clone(&store).watch() {
        Ok(w) => Some(w),
        Err(e) => {
            eprintln!("⚠ Settings file will not be watched for outside edits: {e}");
            None
        }
    };

    let accessor = ConfigAccessor::new(store);
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier::new(logger.clone()));
    let runner = FetchRunner::new(
        accessor.clone(),
        Arc::new(SystemGit::from_env()),
        Arc::clone(&notifier),
    )
    .with_logger(logger.clone());

    let controller = Arc::new(Controller::new(accessor, runner, notifier));
    logger
        .info(&format!(
            "autofetchd started, settings at {}",
            paths::settings_path().display()
        ))
        .await?;

    controller.startup().await?;
    controller.spawn_settings_watch();

    let sock_path = paths::socket_path();
    tokio::select! {
        res = start_socket_listener(Arc::clone(&controller), &sock_path) => res?,
        _ = tokio::signal::ctrl_c() => {
            println!("autofetchd shutting down");
        }
    }

    controller.shutdown().await;
    logger.info("autofetchd stopped").await?;
    if sock_path.exists() {
        std::fs::remove_file(&sock_path)?;
    }
    Ok(())
}
