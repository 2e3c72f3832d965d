use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::{
    config::{
        DEFAULT_INTERVAL_SECS, ENABLED_KEY, FOLDER_PATH_KEY, FetchSettings, INTERVAL_KEY,
        MAX_INTERVAL_SECS, store::SettingsStore,
    },
    core::error::CommandError,
};

/// Typed access to the three `autoGitFetch.*` keys.
///
/// Nothing is cached: every read goes back to the store.
#[derive(Clone)]
pub struct ConfigAccessor {
    store: Arc<dyn SettingsStore>,
}

impl ConfigAccessor {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    pub async fn get(&self) -> Result<FetchSettings> {
        Ok(FetchSettings {
            enabled: coerce_enabled(self.store.get(ENABLED_KEY).await?.as_ref()),
            interval_secs: coerce_interval(self.store.get(INTERVAL_KEY).await?.as_ref()),
            folder_path: coerce_folder_path(self.store.get(FOLDER_PATH_KEY).await?.as_ref()),
        })
    }

    pub async fn enabled(&self) -> Result<bool> {
        Ok(coerce_enabled(self.store.get(ENABLED_KEY).await?.as_ref()))
    }

    pub async fn interval_secs(&self) -> Result<u64> {
        Ok(coerce_interval(self.store.get(INTERVAL_KEY).await?.as_ref()))
    }

    pub async fn folder_path(&self) -> Result<Option<String>> {
        Ok(coerce_folder_path(
            self.store.get(FOLDER_PATH_KEY).await?.as_ref(),
        ))
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.store.update(ENABLED_KEY, Value::Bool(enabled)).await
    }

    pub async fn set_interval(&self, interval_secs: u64) -> Result<()> {
        if !(1..=MAX_INTERVAL_SECS).contains(&interval_secs) {
            anyhow::bail!("interval must be between 1 and {MAX_INTERVAL_SECS} seconds");
        }
        self.store
            .update(INTERVAL_KEY, Value::from(interval_secs))
            .await
    }

    pub async fn set_folder_path(&self, folder_path: &str) -> Result<()> {
        self.store
            .update(FOLDER_PATH_KEY, Value::String(folder_path.to_string()))
            .await
    }
}

/// Parses user input for the interval setting: a whole number of seconds,
/// from 1 up to [`MAX_INTERVAL_SECS`].
pub fn parse_interval(input: &str) -> Result<u64, CommandError> {
    match input.trim().parse::<u64>() {
        Ok(n) if (1..=MAX_INTERVAL_SECS).contains(&n) => Ok(n),
        _ => Err(CommandError::InvalidUserInput(input.to_string())),
    }
}

fn coerce_enabled(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn coerce_interval(value: Option<&Value>) -> u64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| *n > 0)
        .map_or(DEFAULT_INTERVAL_SECS, |n| n.min(MAX_INTERVAL_SECS))
}

fn coerce_folder_path(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
