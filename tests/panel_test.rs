use core_lib::{
    cli::client::format_panel,
    config::FetchSettings,
    panel::{PanelAction, PanelView, RowIcon, render},
};
use pretty_assertions::assert_eq;

fn labels(settings: &FetchSettings) -> Vec<String> {
    render(settings).into_iter().map(|r| r.label).collect()
}

#[test]
fn test_default_settings_render_four_rows() {
    assert_eq!(
        labels(&FetchSettings::default()),
        vec![
            "Toggle Git Fetch",
            "Enabled: false",
            "Interval: 600 seconds",
            "Folder Path: Not set",
        ]
    );
}

#[test]
fn test_rows_follow_settings() {
    let settings = FetchSettings {
        enabled: true,
        interval_secs: 30,
        folder_path: Some("/home/me/project".to_string()),
    };

    assert_eq!(
        labels(&settings),
        vec![
            "Toggle Git Fetch",
            "Enabled: true",
            "Interval: 30 seconds",
            "Folder Path: /home/me/project",
        ]
    );
}

#[test]
fn test_empty_folder_shows_not_set() {
    let settings = FetchSettings {
        folder_path: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(labels(&settings)[3], "Folder Path: Not set");
}

#[test]
fn test_rows_actions_and_icons() {
    let rows = render(&FetchSettings::default());

    let actions: Vec<_> = rows.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![
            Some(PanelAction::ToggleEnabled),
            None,
            Some(PanelAction::EditInterval),
            Some(PanelAction::EditFolderPath),
        ]
    );

    let icons: Vec<_> = rows.iter().map(|r| r.icon.name()).collect();
    assert_eq!(icons, vec!["sync", "gear", "clock", "file-directory"]);
    assert_eq!(rows[0].icon, RowIcon::Sync);
}

#[tokio::test]
async fn test_panel_view_refresh_wakes_followers() -> anyhow::Result<()> {
    let view = PanelView::new();
    let mut follower = view.subscribe();
    assert_eq!(view.rows(), render(&FetchSettings::default()));

    let settings = FetchSettings {
        enabled: true,
        ..Default::default()
    };
    let rows = view.refresh(&settings);

    follower.changed().await?;
    assert_eq!(*follower.borrow_and_update(), rows);
    assert_eq!(view.rows()[1].label, "Enabled: true");
    Ok(())
}

#[test]
fn test_format_panel_lists_commands() {
    let table = format_panel(&render(&FetchSettings::default()));
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[1].contains("Toggle Git Fetch") && lines[1].contains("autofetch toggle"));
    assert!(lines[2].contains("Enabled: false"));
    assert!(!lines[2].contains("autofetch"));
    assert!(lines[3].contains("autofetch interval"));
    assert!(lines[4].contains("autofetch folder"));
}
