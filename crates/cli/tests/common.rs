use std::{fs, path::PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Where `config.yaml` lives inside the temp dir. Component overrides live
/// in the temp dir's root so the test-common fixtures can write them.
#[must_use]
pub fn config_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("config")
}

#[must_use]
pub fn dotfiles_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("dotfiles")
}

#[must_use]
pub fn setup_default_test_config() -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    let yaml = format!(
        "dotfiles_root: {}\noverride_directory: {}\n",
        dotfiles_dir(&temp_dir).display(),
        temp_dir.path().display()
    );
    write_config(&temp_dir, &yaml);
    temp_dir
}

#[must_use]
pub fn setup_test_config(config_yaml: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    write_config(&temp_dir, config_yaml);
    temp_dir
}

fn write_config(temp_dir: &TempDir, yaml: &str) {
    fs::create_dir_all(config_dir(temp_dir)).unwrap();
    fs::create_dir_all(dotfiles_dir(temp_dir)).unwrap();
    fs::write(config_dir(temp_dir).join("config.yaml"), yaml).unwrap();
}

/// The `acorn` binary reading its config from `temp_dir`.
#[must_use]
pub fn get_command_with_test_config(temp_dir: &TempDir) -> Command {
    let mut cmd = get_command();
    cmd.env("ACORN_CONFIG_DIR", config_dir(temp_dir))
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[must_use]
pub fn get_command() -> Command {
    Command::cargo_bin("acorn").unwrap()
}
