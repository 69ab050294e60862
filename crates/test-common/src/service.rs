//! Service creation helpers to eliminate setup duplication in tests.

use acorn::{
    commands::ShellCommandRunner,
    component::repository::yaml::YamlComponentRepository,
    config::AppConfig,
    fs::RealFileSystem,
    installer::InstallServiceImpl,
    platform::Platform,
};
use std::time::Duration;
use tempfile::TempDir;

use crate::{config::test_config_dry_run_with_dir, constants::TEST_COMMAND_TIMEOUT_SECS};

pub type TestRepository = YamlComponentRepository<RealFileSystem>;

/// A repository with the built-ins and overrides from `temp_dir`.
#[must_use]
pub fn create_test_repository(temp_dir: &TempDir) -> TestRepository {
    YamlComponentRepository::new(RealFileSystem, temp_dir.path().to_path_buf())
}

#[must_use]
pub fn create_test_runner() -> ShellCommandRunner {
    ShellCommandRunner::new(
        acorn::commands::DEFAULT_SHELL,
        Duration::from_secs(TEST_COMMAND_TIMEOUT_SECS),
    )
}

/// A dry-run install service on `platform`, reading overrides from `temp_dir`.
#[must_use]
pub fn create_dry_run_install_service(
    temp_dir: &TempDir,
    platform: Platform,
) -> InstallServiceImpl<TestRepository, ShellCommandRunner> {
    let config = test_config_dry_run_with_dir(temp_dir.path());
    create_install_service_with_config(&config, platform)
}

/// An install service with a specific configuration.
#[must_use]
pub fn create_install_service_with_config(
    config: &AppConfig,
    platform: Platform,
) -> InstallServiceImpl<TestRepository, ShellCommandRunner> {
    let repo = YamlComponentRepository::new(RealFileSystem, config.override_directory().to_path_buf());
    InstallServiceImpl::from_config(repo, create_test_runner(), platform, config)
}
