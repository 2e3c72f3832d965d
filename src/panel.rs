//! Sidebar panel: the settings rendered as a fixed list of rows.
//!
//! [`render`] is a pure function of [`FetchSettings`]; [`PanelView`] only
//! remembers the last rendering and lets clients follow re-renders.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::FetchSettings;

pub const TOGGLE_LABEL: &str = "Toggle Git Fetch";
pub const FOLDER_NOT_SET: &str = "Not set";

/// Action a row triggers when clicked.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    ToggleEnabled,
    EditInterval,
    EditFolderPath,
}

impl PanelAction {
    /// CLI invocation that performs the action.
    pub fn command(&self) -> &'static str {
        match self {
            PanelAction::ToggleEnabled => "autofetch toggle",
            PanelAction::EditInterval => "autofetch interval",
            PanelAction::EditFolderPath => "autofetch folder",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIcon {
    Sync,
    Gear,
    Clock,
    FileDirectory,
}

impl RowIcon {
    pub fn name(&self) -> &'static str {
        match self {
            RowIcon::Sync => "sync",
            RowIcon::Gear => "gear",
            RowIcon::Clock => "clock",
            RowIcon::FileDirectory => "file-directory",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub label: String,
    pub action: Option<PanelAction>,
    pub icon: RowIcon,
}

/// Always four rows, always in this order: toggle, enabled flag, interval,
/// folder path.
pub fn render(settings: &FetchSettings) -> Vec<PanelRow> {
    let folder = settings
        .folder_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(FOLDER_NOT_SET);

    vec![
        PanelRow {
            label: TOGGLE_LABEL.to_string(),
            action: Some(PanelAction::ToggleEnabled),
            icon: RowIcon::Sync,
        },
        PanelRow {
            label: format!("Enabled: {}", settings.enabled),
            action: None,
            icon: RowIcon::Gear,
        },
        PanelRow {
            label: format!("Interval: {} seconds", settings.interval_secs),
            action: Some(PanelAction::EditInterval),
            icon: RowIcon::Clock,
        },
        PanelRow {
            label: format!("Folder Path: {folder}"),
            action: Some(PanelAction::EditFolderPath),
            icon: RowIcon::FileDirectory,
        },
    ]
}

pub struct PanelView {
    rows: watch::Sender<Vec<PanelRow>>,
}

impl PanelView {
    pub fn new() -> Self {
        let (rows, _) = watch::channel(render(&FetchSettings::default()));
        Self { rows }
    }

    /// Re-renders from `settings` and wakes every follower.
    pub fn refresh(&self, settings: &FetchSettings) -> Vec<PanelRow> {
        let rows = render(settings);
        self.rows.send_replace(rows.clone());
        rows
    }

    pub fn rows(&self) -> Vec<PanelRow> {
        self.rows.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<PanelRow>> {
        self.rows.subscribe()
    }
}

impl Default for PanelView {
    fn default() -> Self {
        Self::new()
    }
}
