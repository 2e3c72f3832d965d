use std::{fs, sync::Arc};

use core_lib::{
    config::{
        DEFAULT_INTERVAL_SECS, ENABLED_KEY, FOLDER_PATH_KEY, FetchSettings, INTERVAL_KEY,
        MAX_INTERVAL_SECS, SettingKey,
        accessor::{ConfigAccessor, parse_interval},
        store::{FileStore, MemoryStore, SettingsStore, changed_keys},
    },
    core::error::CommandError,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

fn memory_accessor(values: Value) -> (ConfigAccessor, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_values(
        values.as_object().cloned().unwrap_or_default(),
    ));
    (ConfigAccessor::new(store.clone()), store)
}

#[tokio::test]
async fn test_defaults_when_nothing_is_set() -> anyhow::Result<()> {
    let (accessor, _) = memory_accessor(json!({}));

    let settings = accessor.get().await?;

    assert_eq!(settings, FetchSettings::default());
    assert_eq!(settings.interval_secs, 600);
    assert_eq!(settings.folder_path, None);
    assert!(!settings.enabled);
    Ok(())
}

#[tokio::test]
async fn test_interval_is_coerced_to_default() -> anyhow::Result<()> {
    let cases = vec![
        (json!("abc"), DEFAULT_INTERVAL_SECS),
        (json!(0), DEFAULT_INTERVAL_SECS),
        (json!(-5), DEFAULT_INTERVAL_SECS),
        (json!(1.5), DEFAULT_INTERVAL_SECS),
        (json!(null), DEFAULT_INTERVAL_SECS),
        (json!(true), DEFAULT_INTERVAL_SECS),
        (json!(1e30), DEFAULT_INTERVAL_SECS),
        (json!("45"), 45),
        (json!(30), 30),
        (json!(MAX_INTERVAL_SECS), MAX_INTERVAL_SECS),
        (json!(MAX_INTERVAL_SECS + 1), MAX_INTERVAL_SECS),
        (json!(u64::MAX), MAX_INTERVAL_SECS),
        (json!("18446744073709551615"), MAX_INTERVAL_SECS),
    ];

    for (value, expected) in cases {
        let (accessor, _) = memory_accessor(json!({ INTERVAL_KEY: value.clone() }));
        assert_eq!(
            accessor.get().await?.interval_secs,
            expected,
            "Failed on case: {value}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_non_bool_enabled_reads_as_false() -> anyhow::Result<()> {
    let (accessor, _) = memory_accessor(json!({ ENABLED_KEY: "yes" }));
    assert!(!accessor.get().await?.enabled);
    Ok(())
}

#[tokio::test]
async fn test_setters_write_one_key_each() -> anyhow::Result<()> {
    let (accessor, store) = memory_accessor(json!({}));

    accessor.set_enabled(true).await?;
    accessor.set_interval(42).await?;
    accessor.set_folder_path("/repo").await?;

    assert_eq!(store.get(ENABLED_KEY).await?, Some(json!(true)));
    assert_eq!(store.get(INTERVAL_KEY).await?, Some(json!(42)));
    assert_eq!(store.get(FOLDER_PATH_KEY).await?, Some(json!("/repo")));
    assert_eq!(
        accessor.get().await?,
        FetchSettings {
            enabled: true,
            interval_secs: 42,
            folder_path: Some("/repo".to_string()),
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_zero_interval_is_refused() -> anyhow::Result<()> {
    let (accessor, store) = memory_accessor(json!({ INTERVAL_KEY: 30 }));

    assert!(accessor.set_interval(0).await.is_err());
    assert!(accessor.set_interval(MAX_INTERVAL_SECS + 1).await.is_err());
    assert!(accessor.set_interval(u64::MAX).await.is_err());
    assert_eq!(store.get(INTERVAL_KEY).await?, Some(json!(30)));
    Ok(())
}

#[tokio::test]
async fn test_updates_are_broadcast() -> anyhow::Result<()> {
    let (accessor, store) = memory_accessor(json!({}));
    let mut changes = store.subscribe();

    accessor.set_enabled(true).await?;
    accessor.set_folder_path("/repo").await?;

    assert_eq!(changes.recv().await?, ENABLED_KEY);
    assert_eq!(changes.recv().await?, FOLDER_PATH_KEY);
    Ok(())
}

#[test]
fn test_parse_interval() {
    let cases: Vec<(&str, Option<u64>)> = vec![
        ("30", Some(30)),
        ("31536000", Some(MAX_INTERVAL_SECS)),
        ("31536001", None),
        ("18446744073709551615", None),
        ("99999999999999999999999", None),
        (" 42 ", Some(42)),
        ("1", Some(1)),
        ("abc", None),
        ("12abc", None),
        ("0", None),
        ("-5", None),
        ("1.5", None),
        ("", None),
    ];

    for (input, expected) in cases {
        match expected {
            Some(n) => assert_eq!(parse_interval(input), Ok(n), "Failed on case: {input}"),
            None => assert_eq!(
                parse_interval(input),
                Err(CommandError::InvalidUserInput(input.to_string())),
                "Failed on case: {input}"
            ),
        }
    }
}

#[test]
fn test_setting_keys() {
    for key in [SettingKey::Enabled, SettingKey::Interval, SettingKey::FolderPath] {
        assert_eq!(SettingKey::from_key(key.as_str()), Some(key));
    }
    assert_eq!(SettingKey::Interval.as_str(), "autoGitFetch.interval");
    assert_eq!(SettingKey::from_key("autoGitFetch.other"), None);
}

#[tokio::test]
async fn test_file_store_missing_file_reads_empty() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = FileStore::open(dir.path().join("settings.json")).await?;

    assert_eq!(store.get(ENABLED_KEY).await?, None);
    let accessor = ConfigAccessor::new(Arc::new(store));
    assert_eq!(accessor.get().await?, FetchSettings::default());
    Ok(())
}

#[tokio::test]
async fn test_file_store_persists_across_instances() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("nested").join("settings.json");

    let first = ConfigAccessor::new(Arc::new(FileStore::open(&path).await?));
    first.set_interval(120).await?;
    first.set_folder_path("/srv/repo").await?;

    let second = ConfigAccessor::new(Arc::new(FileStore::open(&path).await?));
    let settings = second.get().await?;
    assert_eq!(settings.interval_secs, 120);
    assert_eq!(settings.folder_path.as_deref(), Some("/srv/repo"));

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(
        on_disk,
        json!({ INTERVAL_KEY: 120, FOLDER_PATH_KEY: "/srv/repo" })
    );
    Ok(())
}

#[tokio::test]
async fn test_file_store_keeps_keys_written_by_others() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.json");
    let store = FileStore::open(&path).await?;

    fs::write(&path, r#"{ "editor.fontSize": 14 }"#)?;
    store.update(ENABLED_KEY, json!(true)).await?;

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(on_disk, json!({ "editor.fontSize": 14, ENABLED_KEY: true }));
    Ok(())
}

#[tokio::test]
async fn test_file_store_reports_external_edits() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.json");
    fs::write(&path, json!({ INTERVAL_KEY: 60 }).to_string())?;

    let store = FileStore::open(&path).await?;
    let mut changes = store.subscribe();

    fs::write(&path, json!({ INTERVAL_KEY: 60, ENABLED_KEY: true }).to_string())?;
    let changed = store.sync_from_disk().await?;

    assert_eq!(changed, vec![ENABLED_KEY.to_string()]);
    assert_eq!(changes.recv().await?, ENABLED_KEY);

    // nothing new on a second look
    assert!(store.sync_from_disk().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_own_writes_are_not_reported_twice() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.json");
    let store = FileStore::open(&path).await?;

    store.update(FOLDER_PATH_KEY, json!("/repo")).await?;

    assert!(store.sync_from_disk().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_file_store_malformed_file_is_an_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.json");
    let store = FileStore::open(&path).await?;

    fs::write(&path, "{ not json")?;

    assert!(store.get(ENABLED_KEY).await.is_err());
    Ok(())
}

#[test]
fn test_changed_keys() {
    let old = json!({ "a": 1, "b": 2, "c": 3 });
    let new = json!({ "a": 1, "b": 5, "d": 4 });

    let changed = changed_keys(
        old.as_object().unwrap_or(&serde_json::Map::new()),
        new.as_object().unwrap_or(&serde_json::Map::new()),
    );

    assert_eq!(changed, vec!["b", "c", "d"]);
}

#[tokio::test]
async fn test_file_store_oversized_interval_reads_clamped() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{ "autoGitFetch.enabled": true, "autoGitFetch.interval": 18446744073709551615 }"#,
    )?;

    let accessor = ConfigAccessor::new(Arc::new(FileStore::open(&path).await?));

    assert_eq!(accessor.interval_secs().await?, MAX_INTERVAL_SECS);
    assert!(accessor.enabled().await?);
    Ok(())
}
