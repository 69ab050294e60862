pub mod loader;
pub mod validate;

pub use loader::{ApplyToConfig, ConfigLoadError, ConfigLoader, Yaml as YamlLoader};

use std::{
    num::NonZeroU64,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::fs::{FileSystem, FileSystemError};

const VERBOSE_DEFAULT: bool = false;
const USE_COLORS_DEFAULT: bool = true;
const DRY_RUN_DEFAULT: bool = false;
const STOP_ON_ERROR_DEFAULT: bool = false;
pub(crate) const EDITOR_DEFAULT: &str = "vim";
pub(crate) const SHELL_DEFAULT: &str = "/bin/bash";
const COMMAND_TIMEOUT_DEFAULT: NonZeroU64 = match NonZeroU64::new(300) {
    Some(timeout) => timeout,
    None => NonZeroU64::MIN,
};

/// Application configuration: defaults, then `config.yaml`, then `ACORN_*`
/// environment variables, then CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Root of the dotfiles checkout that `sync_files` sources are relative to.
    pub(crate) dotfiles_root: PathBuf,

    /// Where user overrides (`<component>.yaml`) live.
    pub(crate) override_directory: PathBuf,

    /// When set, generated config files are written under
    /// `<generated_dir>/<component>/` instead of directly to their targets.
    #[serde(default)]
    pub(crate) generated_dir: Option<PathBuf>,

    #[serde(default = "default_editor")]
    pub(crate) editor: String,

    #[serde(default = "default_shell")]
    pub(crate) shell: String,

    #[serde(default)]
    pub(crate) verbose: bool,

    #[serde(default = "default_use_colors")]
    pub(crate) use_colors: bool,

    #[serde(default)]
    pub(crate) dry_run: bool,

    #[serde(default = "default_stop_on_error")]
    pub(crate) stop_on_error: bool,

    /// Seconds; applies to each check and install command.
    #[serde(default = "default_command_timeout")]
    pub(crate) command_timeout: NonZeroU64,

    #[serde(skip)]
    pub(crate) config_file_path: Option<PathBuf>,
}

fn default_editor() -> String {
    EDITOR_DEFAULT.to_string()
}
fn default_shell() -> String {
    SHELL_DEFAULT.to_string()
}
fn default_use_colors() -> bool {
    USE_COLORS_DEFAULT
}
fn default_stop_on_error() -> bool {
    STOP_ON_ERROR_DEFAULT
}
fn default_command_timeout() -> NonZeroU64 {
    COMMAND_TIMEOUT_DEFAULT
}

impl AppConfig {
    #[must_use]
    pub fn dotfiles_root(&self) -> &Path {
        &self.dotfiles_root
    }

    #[must_use]
    pub fn override_directory(&self) -> &Path {
        &self.override_directory
    }

    #[must_use]
    pub fn generated_dir(&self) -> Option<&Path> {
        self.generated_dir.as_deref()
    }

    #[must_use]
    pub fn editor(&self) -> &str {
        &self.editor
    }

    #[must_use]
    pub fn shell(&self) -> &str {
        &self.shell
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    #[must_use]
    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub fn stop_on_error(&self) -> bool {
        self.stop_on_error
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout.get())
    }

    /// The file this configuration was read from, if any.
    #[must_use]
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Create acorn's config, data and cache directories, plus the override
    /// directory, if they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if a directory cannot be determined or
    /// created.
    pub fn ensure_dirs<F: FileSystem>(&self, fs: &F) -> Result<(), FileSystemError> {
        let dirs = [
            fs.config_dir()?,
            fs.data_dir()?,
            fs.cache_dir()?,
            self.override_directory.clone(),
        ];

        for dir in dirs.iter().filter(|dir| !fs.is_dir(dir)) {
            tracing::debug!(dir = %dir.display(), "creating directory");
            fs.create_dir_all(dir)?;
        }

        Ok(())
    }

    pub fn dotfiles_root_mut(&mut self) -> &mut PathBuf {
        &mut self.dotfiles_root
    }

    pub fn generated_dir_mut(&mut self) -> &mut Option<PathBuf> {
        &mut self.generated_dir
    }

    pub fn verbose_mut(&mut self) -> &mut bool {
        &mut self.verbose
    }

    pub fn use_colors_mut(&mut self) -> &mut bool {
        &mut self.use_colors
    }

    pub fn dry_run_mut(&mut self) -> &mut bool {
        &mut self.dry_run
    }
}

/// Builder for `AppConfig` in tests
///
#[derive(Default, Debug)]
pub struct AppConfigBuilder {
    dotfiles_root: PathBuf,
    override_directory: PathBuf,
    generated_dir: Option<PathBuf>,
    editor: Option<String>,
    shell: Option<String>,
    verbose: Option<bool>,
    use_colors: Option<bool>,
    dry_run: Option<bool>,
    stop_on_error: Option<bool>,
    command_timeout: Option<NonZeroU64>,
}

impl AppConfigBuilder {
    #[must_use]
    pub fn dotfiles_root(mut self, dir: impl AsRef<Path>) -> Self {
        self.dotfiles_root = dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn override_directory(mut self, dir: impl AsRef<Path>) -> Self {
        self.override_directory = dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn generated_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.generated_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn editor(mut self, editor: &str) -> Self {
        self.editor = Some(editor.to_string());
        self
    }

    #[must_use]
    pub fn shell(mut self, shell: &str) -> Self {
        self.shell = Some(shell.to_string());
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    #[must_use]
    pub fn use_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = Some(use_colors);
        self
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    #[must_use]
    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = Some(stop);
        self
    }

    /// # Panics
    ///
    /// Panics if `timeout` is zero.
    #[must_use]
    pub fn command_timeout_unchecked(mut self, timeout: u64) -> Self {
        self.command_timeout = Some(NonZeroU64::new(timeout).expect("timeout must be non-zero"));
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        AppConfig {
            dotfiles_root: self.dotfiles_root,
            override_directory: self.override_directory,
            generated_dir: self.generated_dir,
            editor: self.editor.unwrap_or_else(default_editor),
            shell: self.shell.unwrap_or_else(default_shell),
            verbose: self.verbose.unwrap_or(VERBOSE_DEFAULT),
            use_colors: self.use_colors.unwrap_or(USE_COLORS_DEFAULT),
            dry_run: self.dry_run.unwrap_or(DRY_RUN_DEFAULT),
            stop_on_error: self.stop_on_error.unwrap_or(STOP_ON_ERROR_DEFAULT),
            command_timeout: self.command_timeout.unwrap_or_else(default_command_timeout),
            config_file_path: None,
        }
    }
}
