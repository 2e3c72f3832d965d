use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::{Map, Value};
use tokio::{
    fs,
    sync::{Mutex, broadcast, mpsc},
};

const CHANGE_CAPACITY: usize = 64;

/// Persistent key/value settings with a change stream.
///
/// Every successful [`SettingsStore::update`] publishes the written key on the
/// channel returned by [`SettingsStore::subscribe`]. Stores that can be edited
/// from outside the process publish those changes on the same channel.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn update(&self, key: &str, value: Value) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<String>;
}

/// Keys whose value differs between `old` and `new`, including added and
/// removed keys.
pub fn changed_keys(old: &Map<String, Value>, new: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = old
        .keys()
        .chain(new.keys())
        .filter(|k| old.get(*k) != new.get(*k))
        .cloned()
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

pub struct MemoryStore {
    values: Mutex<Map<String, Value>>,
    changes: broadcast::Sender<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_values(Map::new())
    }

    pub fn with_values(values: Map<String, Value>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            values: Mutex::new(values),
            changes,
        }
    }

    /// Replaces a value without going through [`SettingsStore::update`], the
    /// way another process editing the settings would. Subscribers are still
    /// told about it.
    pub async fn set_external(&self, key: &str, value: Value) {
        self.values.lock().await.insert(key.to_string(), value);
        let _ = self.changes.send(key.to_string());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn update(&self, key: &str, value: Value) -> Result<()> {
        self.values.lock().await.insert(key.to_string(), value);
        let _ = self.changes.send(key.to_string());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

/// Settings kept in a flat JSON object on disk, e.g.
///
/// ```json
/// {
///   "autoGitFetch.enabled": true,
///   "autoGitFetch.folderPath": "/home/me/project",
///   "autoGitFetch.interval": 300
/// }
/// ```
///
/// The file is the source of truth: it is read again on every `get`.
pub struct FileStore {
    path: PathBuf,
    // last contents this process wrote or observed, used to diff external edits
    snapshot: Mutex<Map<String, Value>>,
    changes: broadcast::Sender<String>,
}

impl FileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = load_map(&path).await?;
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Ok(Self {
            path,
            snapshot: Mutex::new(snapshot),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file and publishes every key that changed since the last
    /// read or write made by this store.
    pub async fn sync_from_disk(&self) -> Result<Vec<String>> {
        let mut snapshot = self.snapshot.lock().await;
        let current = load_map(&self.path).await?;
        let changed = changed_keys(&snapshot, &current);
        *snapshot = current;
        drop(snapshot);

        for key in &changed {
            let _ = self.changes.send(key.clone());
        }
        Ok(changed)
    }

    /// Watches the settings file for edits made outside the daemon.
    ///
    /// The returned watcher must be kept alive for as long as changes should
    /// be picked up.
    pub fn watch(self: Arc<Self>) -> Result<RecommendedWatcher> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create settings directory {}", dir.display()))?;

        let file_name = self.path.file_name().map(|n| n.to_os_string());
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
                        && event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == file_name.as_deref())
                    {
                        let _ = tx.send(());
                    }
                }
                Err(e) => eprintln!("⚠ settings watcher error: {e}"),
            })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                if let Err(e) = self.sync_from_disk().await {
                    // editors often write in several steps, the next event catches up
                    eprintln!("⚠ Failed to reload settings: {e}");
                }
            }
        });

        Ok(watcher)
    }

    async fn save(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .with_context(|| format!("Error writing settings file {tmp:?}"))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Error replacing settings file {:?}", self.path))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let map = load_map(&self.path).await?;
        Ok(map.get(key).cloned())
    }

    async fn update(&self, key: &str, value: Value) -> Result<()> {
        let mut snapshot = self.snapshot.lock().await;
        // merge into what is on disk so concurrent external edits survive
        let mut current = load_map(&self.path).await?;
        current.insert(key.to_string(), value);
        self.save(&current).await?;
        *snapshot = current;
        drop(snapshot);

        let _ = self.changes.send(key.to_string());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

async fn load_map(path: &Path) -> Result<Map<String, Value>> {
    let content = match fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("Error reading settings file {path:?}")));
        }
    };
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(&content).with_context(|| format!("Error parsing settings file {path:?}"))
}
