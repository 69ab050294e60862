//! Component and dotfile creation helpers for integration tests.

use crate::constants::{TEST_COMPONENT, TEST_VERSION};
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Writes `<dir>/<name>.yaml` with `content` and returns its path.
///
/// # Example
/// ```rust
/// let temp_dir = TempDir::new().unwrap();
/// let path = create_component_file(&temp_dir, "mine", "description: Mine\n");
/// ```
pub fn create_component_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(format!("{name}.yaml"));
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Creates a user-only component with shell integration and two tools that
/// both resolve without a package manager: `sh` is always installed and
/// `acorn-test-missing` never is.
pub fn create_test_component_file(dir: &TempDir) -> PathBuf {
    let content = format!(
        r#"name: {TEST_COMPONENT}
description: Test component for integration testing
version: "{TEST_VERSION}"
env:
  TEST_TOOL_HOME: $HOME/.test-tool
aliases:
  tt: test-tool run
install:
  tools:
    - name: sh
      check: command -v sh
      methods:
        darwin: {{type: brew}}
        linux: {{type: apt}}
    - name: acorn-test-missing
      description: Never installed
      check: acorn-test-missing --version
      methods:
        darwin: {{type: brew}}
        linux: {{type: apt}}
        windows: {{type: brew}}
"#
    );

    create_component_file(dir, TEST_COMPONENT, &content)
}

/// Creates a component whose YAML does not parse.
pub fn create_invalid_component_file(dir: &TempDir, name: &str) -> PathBuf {
    create_component_file(dir, name, "name: [unclosed\ninstall: {tools: ")
}

/// Writes `content` to `root/relative`, creating parents. Used to lay out a
/// dotfiles checkout for sync tests.
pub fn create_dotfile(root: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = root.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
