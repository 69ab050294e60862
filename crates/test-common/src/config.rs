//! `AppConfig` test helpers to eliminate duplication across command tests.

use crate::constants::{TEST_COMMAND_TIMEOUT_SECS, TEST_DOTFILES_ROOT, TEST_OVERRIDE_DIR};
use acorn::config::{AppConfig, AppConfigBuilder};
use std::path::Path;

fn base() -> AppConfigBuilder {
    AppConfigBuilder::default()
        .dotfiles_root(TEST_DOTFILES_ROOT)
        .override_directory(TEST_OVERRIDE_DIR)
        .command_timeout_unchecked(TEST_COMMAND_TIMEOUT_SECS)
        .use_colors(false)
}

/// Creates a standard test configuration with colors disabled.
#[must_use]
pub fn test_config() -> AppConfig {
    base().build()
}

/// Creates a verbose test configuration.
#[must_use]
pub fn test_config_verbose() -> AppConfig {
    base().verbose(true).build()
}

/// Creates a test configuration whose component overrides live in `override_dir`.
/// Used primarily in integration tests with temporary directories.
pub fn test_config_with_dir<P: AsRef<Path>>(override_dir: P) -> AppConfig {
    base().override_directory(override_dir).build()
}

/// Creates a dry-run test configuration with overrides in `override_dir`.
pub fn test_config_dry_run_with_dir<P: AsRef<Path>>(override_dir: P) -> AppConfig {
    base().override_directory(override_dir).dry_run(true).build()
}

/// Creates a test configuration with both override directory and dotfiles root.
/// Most flexible config creator for sync and generate scenarios.
pub fn test_config_with_dirs<P, Q>(override_dir: P, dotfiles_root: Q) -> AppConfig
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    base()
        .override_directory(override_dir)
        .dotfiles_root(dotfiles_root)
        .build()
}
