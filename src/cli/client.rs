use std::{fs::File, io::Read, path::PathBuf, thread, time::Duration};

use anyhow::Result;
use std::io::BufRead;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
};

use crate::{
    config::paths,
    daemon::server::{DaemonRequest, DaemonResponse},
    panel::PanelRow,
};

pub async fn send_request(req: DaemonRequest) -> Result<(), anyhow::Error> {
    if let DaemonRequest::None = req {
        return Ok(());
    }
    let sock_path = paths::socket_path();
    let mut stream = UnixStream::connect(&sock_path).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect with daemon at {} => {e} (is autofetchd running?)",
            sock_path.display()
        )
    })?;

    let json = serde_json::to_string(&req)? + "\n";
    stream.write_all(json.as_bytes()).await?;
    stream.flush().await?;

    // a followed panel keeps sending one response per re-render
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    while reader.read_line(&mut line).await? > 0 {
        let response: DaemonResponse = serde_json::from_str(line.trim())?;
        handle_daemon_response(response)?;
        line.clear();
    }

    Ok(())
}

/// Prints success, error, the panel or the logs.
fn handle_daemon_response(response: DaemonResponse) -> Result<()> {
    match response {
        DaemonResponse::Success(msg) => {
            println!("✅ {msg}");
        }
        DaemonResponse::Error(e) => {
            eprintln!("❌ Error: {e}");
        }
        DaemonResponse::Panel(rows) => {
            print_panel(&rows);
        }
        DaemonResponse::LogFile(p, f) => {
            display_logs(&p, f)?;
        }
        DaemonResponse::LogLines(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        DaemonResponse::Ignore | DaemonResponse::None => {}
    }
    Ok(())
}

fn display_logs(path: &str, follow: bool) -> Result<()> {
    let log_path = PathBuf::from(path);
    if !log_path.exists() {
        return Err(anyhow::anyhow!("Failed to find log file : {}", path));
    }
    let file = File::open(log_path)?;
    let mut reader = std::io::BufReader::new(file);

    match follow {
        true => loop {
            let mut buffer = String::new();
            match reader.read_line(&mut buffer) {
                Ok(0) => {
                    thread::sleep(Duration::from_millis(200));
                }
                Ok(_) => {
                    print!("{buffer}");
                }
                Err(e) => return Err(anyhow::anyhow!("Failed to read: {e}")),
            }
        },
        false => {
            let mut buffer = String::new();
            reader.read_to_string(&mut buffer)?;
            println!("{buffer}");
            Ok(())
        }
    }
}

pub fn format_panel(rows: &[PanelRow]) -> String {
    let mut out = format!("{:<16} {:<40} {:<20}\n", "ICON", "SETTING", "ACTION");
    for row in rows {
        let action = row.action.map(|a| a.command()).unwrap_or("");
        out.push_str(&format!(
            "{:<16} {:<40} {:<20}\n",
            row.icon.name(),
            row.label,
            action
        ));
    }
    out
}

fn print_panel(rows: &[PanelRow]) {
    print!("{}", format_panel(rows));
}
