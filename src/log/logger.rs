use std::{io::SeekFrom, path::Path, sync::Arc};

use anyhow::Ok;
use chrono::Local;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
    sync::Mutex,
};

use crate::config::paths;

#[derive(Debug, Clone)]
pub struct Logger {
    file: Arc<Mutex<tokio::fs::File>>,
    color_enable: bool,
}

const RESET: &str = "\x1b[0m";
const BG_BLUE: &str = "\x1b[44m"; // info
const BG_ORANGE: &str = "\x1b[48;5;208m"; // warning
const BG_RED: &str = "\x1b[41m";
const BG_GREEN: &str = "\x1b[42m"; // fetch start
const BG_MAGENTA: &str = "\x1b[45m"; // fetch end
const FG_BOLD_WHITE: &str = "\x1b[97;1m";

impl Logger {
    pub async fn new(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .await?;
        let no_color = std::env::var("AUTOFETCH_NO_COLOR").ok().as_deref() == Some("1");
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            color_enable: !no_color,
        })
    }

    /// Logger writing to the daemon's default log file.
    pub async fn open_default() -> anyhow::Result<Self> {
        Logger::new(&paths::log_path()).await
    }

    /// Returns the last `n` non-empty lines of the log at `path`, oldest first.
    pub async fn fetchn(path: &Path, n: usize) -> anyhow::Result<Vec<String>> {
        if !tokio::fs::try_exists(path).await? {
            return Err(anyhow::anyhow!("Failed to find log file"));
        }

        let mut file = File::open(path).await?;
        let file_size = file.metadata().await?.len();

        let mut buffer = vec![0; 8192];
        let mut collected = Vec::new();
        let mut carry = String::new();

        let mut pos = file_size as i64;

        while pos > 0 && collected.len() < n {
            let read_size = buffer.len().min(pos as usize);
            pos -= read_size as i64;

            file.seek(SeekFrom::Start(pos as u64)).await?;
            file.read_exact(&mut buffer[..read_size]).await?;

            let chunk = String::from_utf8_lossy(&buffer[..read_size]);

            let combined = format!("{chunk}{carry}");
            let mut parts: Vec<&str> = combined.split('\n').collect();

            // first piece may be the tail of a line that starts in the previous chunk
            carry = parts.remove(0).to_string();

            for line in parts.into_iter().rev() {
                if !line.is_empty() {
                    collected.push(line.to_string());
                    if collected.len() >= n {
                        break;
                    }
                }
            }
        }

        if !carry.is_empty() && collected.len() < n {
            collected.push(carry);
        }

        collected.reverse();

        Ok(collected)
    }

    fn paint_level(&self, level: &str) -> String {
        if !self.color_enable {
            return level.to_string();
        }
        match level {
            "INFO" => format!("{BG_BLUE}{FG_BOLD_WHITE} {level} {RESET}"),
            "WARNING" => format!("{BG_ORANGE}{FG_BOLD_WHITE} {level} {RESET}"),
            "ERROR" => format!("{BG_RED}{FG_BOLD_WHITE} {level} {RESET}"),
            "FETCH START" => format!("{BG_GREEN}{FG_BOLD_WHITE} {level} {RESET}"),
            "FETCH END" => format!("{BG_MAGENTA}{FG_BOLD_WHITE} {level} {RESET}"),
            _ => level.to_string(),
        }
    }

    pub async fn log(&self, level: &str, msg: &str) -> anyhow::Result<()> {
        let mut f = self.file.lock().await;
        let now = Local::now();
        let line = format!(
            "[{}] {}: {}\n",
            now.format("%Y-%m-%d %H:%M:%S"),
            self.paint_level(level),
            msg
        );
        f.write_all(line.as_bytes()).await?;
        f.flush().await?;
        Ok(())
    }

    pub async fn info(&self, msg: &str) -> anyhow::Result<()> {
        self.log("INFO", msg).await
    }

    pub async fn warning(&self, msg: &str) -> anyhow::Result<()> {
        self.log("WARNING", msg).await
    }

    pub async fn error(&self, msg: &str) -> anyhow::Result<()> {
        self.log("ERROR", msg).await
    }

    pub async fn fetch_start(&self, msg: &str) -> anyhow::Result<()> {
        self.log("FETCH START", msg).await
    }

    pub async fn fetch_end(&self, msg: &str) -> anyhow::Result<()> {
        self.log("FETCH END", msg).await
    }
}
