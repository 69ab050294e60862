pub mod common;

use common::{get_command_with_test_config, setup_default_test_config};
use predicates::prelude::*;
use test_common::{create_component_file, create_invalid_component_file, create_test_component_file};

#[test]
fn test_list_includes_builtins_and_overrides() {
    let temp_dir = setup_default_test_config();
    create_test_component_file(&temp_dir);

    get_command_with_test_config(&temp_dir)
        .args(["component", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node"))
        .stdout(predicate::str::contains("test-tool"))
        .stdout(predicate::str::contains("override"));
}

#[test]
fn test_list_fails_when_a_component_is_broken() {
    let temp_dir = setup_default_test_config();
    create_invalid_component_file(&temp_dir, "broken");

    get_command_with_test_config(&temp_dir)
        .args(["component", "list"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("broken"));
}

#[test]
fn test_info_shows_tools() {
    let temp_dir = setup_default_test_config();
    create_test_component_file(&temp_dir);

    get_command_with_test_config(&temp_dir)
        .args(["component", "info", "test-tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test component for integration testing"))
        .stdout(predicate::str::contains("acorn-test-missing"))
        .stdout(predicate::str::contains("tt = test-tool run"));
}

#[test]
fn test_info_unknown_component() {
    let temp_dir = setup_default_test_config();

    get_command_with_test_config(&temp_dir)
        .args(["component", "info", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Component Not Found"));
}

#[test]
fn test_validate_valid_component() {
    let temp_dir = setup_default_test_config();
    create_test_component_file(&temp_dir);

    get_command_with_test_config(&temp_dir)
        .args(["component", "validate", "test-tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test-tool: valid"));
}

#[test]
fn test_validate_rejects_unknown_format() {
    let temp_dir = setup_default_test_config();
    create_component_file(
        &temp_dir,
        "bad-format",
        "name: bad-format\ndescription: Bad\nfiles:\n  - target: /tmp/x\n    format: toml\n",
    );

    get_command_with_test_config(&temp_dir)
        .args(["component", "validate", "bad-format"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn test_override_creates_and_requires_force() {
    let temp_dir = setup_default_test_config();

    get_command_with_test_config(&temp_dir)
        .args(["component", "override", "golang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("golang.yaml"));
    assert!(temp_dir.path().join("golang.yaml").exists());

    get_command_with_test_config(&temp_dir)
        .args(["component", "override", "golang"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Override already exists"));

    get_command_with_test_config(&temp_dir)
        .args(["component", "override", "golang", "--force"])
        .assert()
        .success();
}

#[test]
fn test_override_requires_builtin() {
    let temp_dir = setup_default_test_config();

    get_command_with_test_config(&temp_dir)
        .args(["component", "override", "not-builtin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not built in"));
}
