use std::{
    fs,
    path::{Path, PathBuf},
};

use etcetera::{AppStrategy, AppStrategyArgs, choose_app_strategy};

use super::{
    expand::expand_env,
    filesystem::{FileSystem, FileSystemError},
};

/// Overrides [`FileSystem::config_dir`]; the CLI tests point this at a temp
/// directory.
pub const CONFIG_DIR_ENV: &str = "ACORN_CONFIG_DIR";

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    fn strategy() -> Result<impl AppStrategy, FileSystemError> {
        choose_app_strategy(AppStrategyArgs {
            top_level_domain: "dev".to_string(),
            author: "acorn".to_string(),
            app_name: "acorn".to_string(),
        })
        .map_err(|_| FileSystemError::HomeDirNotFound)
    }
}

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path) -> Result<String, FileSystemError> {
        fs::read_to_string(path).map_err(|e| FileSystemError::io(path, e))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).map_err(|e| FileSystemError::io(path, e))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), FileSystemError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir_all(parent)?;
        }

        fs::write(path, data).map_err(|e| FileSystemError::io(path, e))
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf, FileSystemError> {
        fs::read_link(path).map_err(|e| FileSystemError::io(path, e))
    }

    #[cfg(unix)]
    fn symlink(&self, original: &Path, link: &Path) -> Result<(), FileSystemError> {
        std::os::unix::fs::symlink(original, link).map_err(|e| FileSystemError::io(link, e))
    }

    #[cfg(windows)]
    fn symlink(&self, original: &Path, link: &Path) -> Result<(), FileSystemError> {
        let result = if original.is_dir() {
            std::os::windows::fs::symlink_dir(original, link)
        } else {
            std::os::windows::fs::symlink_file(original, link)
        };
        result.map_err(|e| FileSystemError::io(link, e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| FileSystemError::io(from, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::rename(from, to).map_err(|e| FileSystemError::io(from, e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::remove_file(path).map_err(|e| FileSystemError::io(path, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::create_dir_all(path).map_err(|e| FileSystemError::io(path, e))
    }

    fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>, FileSystemError> {
        let mut paths = fs::read_dir(path)
            .map_err(|e| FileSystemError::io(path, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FileSystemError::io(path, e))?;
        paths.sort();

        Ok(paths)
    }

    fn expand_path(&self, path: &Path) -> Result<PathBuf, FileSystemError> {
        let raw = path.to_string_lossy();
        let home = if raw.contains('~') {
            Some(self.home_dir()?)
        } else {
            None
        };

        Ok(PathBuf::from(expand_env(&raw, home.as_deref())))
    }

    fn home_dir(&self) -> Result<PathBuf, FileSystemError> {
        etcetera::home_dir().map_err(|_| FileSystemError::HomeDirNotFound)
    }

    fn config_dir(&self) -> Result<PathBuf, FileSystemError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        Ok(Self::strategy()?.config_dir())
    }

    fn data_dir(&self) -> Result<PathBuf, FileSystemError> {
        Ok(Self::strategy()?.data_dir())
    }

    fn cache_dir(&self) -> Result<PathBuf, FileSystemError> {
        Ok(Self::strategy()?.cache_dir())
    }
}
