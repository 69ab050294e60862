//! File system port
//!
//! Component overrides, generated config files and synced dotfiles are all
//! read and written through [`FileSystem`], which keeps the services testable
//! with mocks and temp directories.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

/// Port for file system operations.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem: Send + Sync {
    /// Read a whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the file is missing, unreadable or not
    /// valid UTF-8.
    fn read_file(&self, path: &Path) -> Result<String, FileSystemError>;

    /// Read a whole file as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the file is missing or unreadable.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, FileSystemError>;

    /// Write `data` to `path`, creating missing parent directories and
    /// replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the parent cannot be created or the
    /// write fails.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), FileSystemError>;

    /// `true` if `path` exists. Symlinks are followed, so a dangling link
    /// reports `false`.
    fn path_exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// `true` if `path` itself is a symlink, dangling or not.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Where the symlink at `path` points.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if `path` is not a symlink.
    fn read_link(&self, path: &Path) -> Result<PathBuf, FileSystemError>;

    /// Create a symlink at `link` pointing to `original`.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if `link` already exists or cannot be
    /// created.
    fn symlink(&self, original: &Path, link: &Path) -> Result<(), FileSystemError>;

    /// Copy the file at `from` to `to`, replacing `to` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if `from` cannot be read or `to` cannot be
    /// written.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FileSystemError>;

    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError>;

    /// Remove a file or a symlink (never follows the link).
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the entry cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<(), FileSystemError>;

    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the directory tree cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError>;

    /// List the entries of a directory, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the directory does not exist or cannot
    /// be read.
    fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>, FileSystemError>;

    /// Expand `~`, `$VAR` and `${VAR:-default}` in `path`.
    ///
    /// The result is not canonicalized and need not exist.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError::HomeDirNotFound`] if `path` starts with `~`
    /// and the home directory is unknown.
    fn expand_path(&self, path: &Path) -> Result<PathBuf, FileSystemError>;

    /// # Errors
    ///
    /// Returns [`FileSystemError::HomeDirNotFound`] if it cannot be determined.
    fn home_dir(&self) -> Result<PathBuf, FileSystemError>;

    /// acorn's configuration directory (`$XDG_CONFIG_HOME/acorn`).
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError::HomeDirNotFound`] if it cannot be determined.
    fn config_dir(&self) -> Result<PathBuf, FileSystemError>;

    /// acorn's data directory (`$XDG_DATA_HOME/acorn`).
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError::HomeDirNotFound`] if it cannot be determined.
    fn data_dir(&self) -> Result<PathBuf, FileSystemError>;

    /// acorn's cache directory (`$XDG_CACHE_HOME/acorn`).
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError::HomeDirNotFound`] if it cannot be determined.
    fn cache_dir(&self) -> Result<PathBuf, FileSystemError>;
}

/// Errors from file system operations.
#[derive(Error, Debug, Clone)]
pub enum FileSystemError {
    #[error("IO error at {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("Home directory not found")]
    HomeDirNotFound,
}

impl FileSystemError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::IoError {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }

    /// `true` when the underlying IO error is `NotFound`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IoError { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
impl MockFileSystem {
    pub(crate) fn mock_read_file<P, S>(&mut self, path: P, content: S)
    where
        PathBuf: From<P>,
        S: ToString,
    {
        let content = content.to_string();
        self.expect_read_file()
            .with(mockall::predicate::eq(PathBuf::from(path)))
            .returning(move |_| Ok(content.clone()));
    }

    pub(crate) fn mock_path_exists<P>(&mut self, path: P, exists: bool)
    where
        PathBuf: From<P>,
    {
        self.expect_path_exists()
            .with(mockall::predicate::eq(PathBuf::from(path)))
            .returning(move |_| exists);
    }

    pub(crate) fn mock_config_dir_ok<P>(&mut self, path: P)
    where
        PathBuf: From<P>,
    {
        let path = PathBuf::from(path);
        self.expect_config_dir().returning(move || Ok(path.clone()));
    }

    pub(crate) fn mock_home_dir_ok<P>(&mut self, path: P)
    where
        PathBuf: From<P>,
    {
        let path = PathBuf::from(path);
        self.expect_home_dir().returning(move || Ok(path.clone()));
    }

    /// `config.yaml` present in `config_dir` with `config_yaml` as content.
    pub(crate) fn mock_config_file(&mut self, config_dir: &Path, config_yaml: &str) {
        self.mock_config_dir_ok(config_dir);
        self.mock_path_exists(config_dir.join("config.yaml"), true);
        self.mock_path_exists(config_dir.join("config.yml"), false);
        self.mock_read_file(config_dir.join("config.yaml"), config_yaml);
    }
}
