use serde::{Deserialize, Serialize};

pub mod accessor;
pub mod paths;
pub mod store;

pub const ENABLED_KEY: &str = "autoGitFetch.enabled";
pub const INTERVAL_KEY: &str = "autoGitFetch.interval";
pub const FOLDER_PATH_KEY: &str = "autoGitFetch.folderPath";

pub const DEFAULT_INTERVAL_SECS: u64 = 600;
/// One year. Larger intervals are refused on input and clamped on read.
pub const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// The three user settings, as read from the store at a given moment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub enabled: bool,
    pub interval_secs: u64, // always in 1..=MAX_INTERVAL_SECS
    pub folder_path: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: DEFAULT_INTERVAL_SECS,
            folder_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Enabled,
    Interval,
    FolderPath,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Enabled => ENABLED_KEY,
            SettingKey::Interval => INTERVAL_KEY,
            SettingKey::FolderPath => FOLDER_PATH_KEY,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            ENABLED_KEY => Some(SettingKey::Enabled),
            INTERVAL_KEY => Some(SettingKey::Interval),
            FOLDER_PATH_KEY => Some(SettingKey::FolderPath),
            _ => None,
        }
    }
}
