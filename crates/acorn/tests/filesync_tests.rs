#![cfg(unix)]

use acorn::{
    component::ComponentConfig,
    filesync::{SyncAction, SyncState, Syncer},
    fs::RealFileSystem,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use test_common::{TempDir, create_dotfile};

fn component(home: &Path) -> ComponentConfig {
    let yaml = format!(
        r#"
name: ghostty
sync_files:
  - source: ghostty/config
    target: {home}/.config/ghostty/config
  - source: ghostty/themes.txt
    target: {home}/.config/ghostty/themes.txt
    mode: copy
  - source: vscode/settings.json
    target: {home}/settings.json
    mode: merge
"#,
        home = home.display()
    );
    ComponentConfig::parse(&yaml, Path::new("ghostty.yaml")).unwrap()
}

fn dotfiles() -> TempDir {
    let root = TempDir::new().unwrap();
    let _ = create_dotfile(&root, "ghostty/config", "font-size = 13\n");
    let _ = create_dotfile(&root, "ghostty/themes.txt", "dark\n");
    let _ = create_dotfile(&root, "vscode/settings.json", r#"{"a": 1, "nested": {"x": 1}}"#);
    root
}

#[test]
fn test_sync_links_copies_and_merges() {
    let root = dotfiles();
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("settings.json.local"), r#"{"nested": {"y": 2}}"#).unwrap();
    let config = component(home.path());
    let syncer = Syncer::new(RealFileSystem, root.path(), false);

    let result = syncer.sync(config.name(), &config.sync_files);

    assert!(result.is_success(), "{result:?}");
    assert_eq!(result.synced.len(), 3);
    assert!(result.synced.iter().all(|f| f.action == SyncAction::Created));

    let link = home.path().join(".config/ghostty/config");
    assert_eq!(std::fs::read_link(&link).unwrap(), root.path().join("ghostty/config"));
    assert_eq!(
        std::fs::read_to_string(home.path().join(".config/ghostty/themes.txt")).unwrap(),
        "dark\n"
    );
    let merged: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(home.path().join("settings.json")).unwrap())
            .unwrap();
    assert_eq!(merged, serde_json::json!({"a": 1, "nested": {"x": 1, "y": 2}}));

    let states: Vec<SyncState> = syncer
        .status(&config.sync_files)
        .unwrap()
        .into_iter()
        .map(|s| s.state)
        .collect();
    assert_eq!(states[0], SyncState::Synced);

    let again = syncer.sync(config.name(), &config.sync_files);
    assert!(again.synced.is_empty());
    assert_eq!(again.skipped.len(), 3);
    assert!(again.skipped.iter().all(|f| f.action == SyncAction::Unchanged));
}

#[test]
fn test_dry_run_touches_nothing() {
    let root = dotfiles();
    let home = TempDir::new().unwrap();
    let config = component(home.path());

    let result = Syncer::new(RealFileSystem, root.path(), true).sync("ghostty", &config.sync_files);

    assert!(result.dry_run);
    assert!(!home.path().join(".config").exists());
    assert!(!home.path().join("settings.json").exists());
}

#[test]
fn test_missing_source_is_reported_per_file() {
    let root = TempDir::new().unwrap();
    let _ = create_dotfile(&root, "ghostty/config", "x\n");
    let home = TempDir::new().unwrap();
    let config = component(home.path());

    let result = Syncer::new(RealFileSystem, root.path(), false).sync("ghostty", &config.sync_files);

    assert!(!result.is_success());
    assert_eq!(result.synced.len(), 1);
    assert_eq!(result.errors.len(), 2);
}
