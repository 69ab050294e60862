pub mod yaml;

pub use self::yaml::Yaml;

use std::path::PathBuf;

use thiserror::Error;

use crate::{config::AppConfig, fs::FileSystemError};

/// Port for loading configuration from disk
///
#[cfg_attr(test, mockall::automock)]
pub trait ConfigLoader: Send + Sync {
    /// Load configuration from defaults, the config file (if any) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError`] if the config directory cannot be
    /// determined, both `config.yaml` and `config.yml` exist, or a source
    /// fails to parse.
    fn load_config(&self) -> Result<AppConfig, ConfigLoadError>;

    /// The config files present in the config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError`] if the config directory cannot be
    /// determined.
    fn find_config_file_paths(&self) -> Result<Vec<PathBuf>, ConfigLoadError>;
}

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error(transparent)]
    FileSystemError(#[from] FileSystemError),

    #[error("Multiple configuration files found: {}", .0.join(", "))]
    MultipleFound(Vec<String>),

    #[error(transparent)]
    ConfigError(#[from] ::config::ConfigError),
}

/// Applies runtime CLI arguments on top of the configuration that was loaded
/// from disk and the environment.
///
pub trait ApplyToConfig {
    /// Return `config` with the arguments in `self` applied over it.
    ///
    fn apply_to_config(&self, config: AppConfig) -> AppConfig;
}
