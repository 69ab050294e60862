pub mod common;

use std::fs;

use common::{dotfiles_dir, get_command_with_test_config, setup_default_test_config};
use predicates::prelude::*;
use test_common::{create_component_file, create_test_component_file};

#[test]
fn test_plan_lists_tools() {
    let temp_dir = setup_default_test_config();
    create_test_component_file(&temp_dir);

    get_command_with_test_config(&temp_dir)
        .args(["plan", "test-tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("will install"))
        .stdout(predicate::str::contains("acorn-test-missing"));
}

#[test]
fn test_dry_run_install() {
    let temp_dir = setup_default_test_config();
    create_test_component_file(&temp_dir);

    get_command_with_test_config(&temp_dir)
        .args(["--dry-run", "install", "test-tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"))
        .stdout(predicate::str::contains("Dry run test-tool"));
}

#[test]
fn test_install_without_tools_fails() {
    let temp_dir = setup_default_test_config();
    create_component_file(&temp_dir, "no-tools", "description: Nothing to install\n");

    get_command_with_test_config(&temp_dir)
        .args(["--dry-run", "install", "no-tools"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no install configuration"));
}

#[test]
fn test_shell_prints_snippet() {
    let temp_dir = setup_default_test_config();
    create_test_component_file(&temp_dir);

    get_command_with_test_config(&temp_dir)
        .args(["shell", "test-tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alias tt='test-tool run'"))
        .stdout(predicate::str::contains("export TEST_TOOL_HOME=\"$HOME/.test-tool\""));
}

#[test]
fn test_generate_dry_run_prints_content() {
    let temp_dir = setup_default_test_config();
    let target = temp_dir.path().join("out").join("settings.json");
    create_component_file(
        &temp_dir,
        "editor",
        &format!(
            "files:\n  - target: {}\n    format: json\n    values:\n      fontSize: 14\n",
            target.display()
        ),
    );

    get_command_with_test_config(&temp_dir)
        .args(["--dry-run", "generate", "editor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would write"))
        .stdout(predicate::str::contains("\"fontSize\": 14"));
    assert!(!target.exists());

    let generated = temp_dir.path().join("generated");
    get_command_with_test_config(&temp_dir)
        .args(["generate", "editor", "--generated-dir"])
        .arg(&generated)
        .assert()
        .success()
        .stdout(predicate::str::contains("ln -sf"));
    assert!(generated.join("editor").join("settings.json").exists());
}

#[cfg(unix)]
#[test]
fn test_sync_and_status() {
    let temp_dir = setup_default_test_config();
    fs::create_dir_all(dotfiles_dir(&temp_dir).join("app")).unwrap();
    fs::write(dotfiles_dir(&temp_dir).join("app").join("rc"), "set x\n").unwrap();
    let target = temp_dir.path().join("home").join(".apprc");
    create_component_file(
        &temp_dir,
        "app",
        &format!("sync_files:\n  - source: app/rc\n    target: {}\n", target.display()),
    );

    get_command_with_test_config(&temp_dir)
        .args(["sync-status", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing"));

    get_command_with_test_config(&temp_dir)
        .args(["sync", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));
    assert_eq!(fs::read_link(&target).unwrap(), dotfiles_dir(&temp_dir).join("app").join("rc"));

    get_command_with_test_config(&temp_dir)
        .args(["sync-status", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("synced"));
}

#[test]
fn test_sync_missing_source_fails() {
    let temp_dir = setup_default_test_config();
    create_component_file(
        &temp_dir,
        "app",
        "sync_files:\n  - source: app/nope\n    target: /tmp/acorn-cli-test-never\n",
    );

    get_command_with_test_config(&temp_dir)
        .args(["sync", "app"])
        .assert()
        .failure();
}
