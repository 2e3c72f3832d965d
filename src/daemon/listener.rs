use std::{os::unix::fs::PermissionsExt, path::Path, sync::Arc};

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::UnixListener,
};

use crate::{
    core::controller::Controller,
    daemon::server::{DaemonRequest, DaemonResponse, handle_request, send_response},
};

/// Accepts clients on `sock_path`, one JSON request per connection.
pub async fn start_socket_listener(
    controller: Arc<Controller>,
    sock_path: &Path,
) -> anyhow::Result<()> {
    if sock_path.exists() {
        std::fs::remove_file(sock_path)?;
    }

    let listener = UnixListener::bind(sock_path)?;
    std::fs::set_permissions(sock_path, std::fs::Permissions::from_mode(0o600))?;

    println!("🔌 autofetchd is listening on {sock_path:?}");

    loop {
        let (stream, _) = listener.accept().await?;

        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            // BufReader passes writes through to the socket
            let mut stream = BufReader::new(stream);
            let mut buf = String::new();
            if let Err(e) = stream.read_line(&mut buf).await {
                eprintln!("❌ Failed to read from stream: {e}");
                return;
            }

            match serde_json::from_str::<DaemonRequest>(&buf) {
                Ok(req) => {
                    if let Err(e) = handle_request(req, controller, &mut stream).await {
                        eprintln!("❌ Request handling failed: {e}");
                    }
                }
                Err(e) => {
                    eprintln!("❌ JSON parsing error: {e}");
                    let _ = send_response(
                        &mut stream,
                        DaemonResponse::Error(format!("Malformed request: {e}")),
                    )
                    .await;
                }
            }
        });
    }
}
