//! Dotfile syncing
//!
//! A component's `sync_files` put files from the dotfiles checkout into place
//! in one of three ways: a symlink back to the checkout, a plain copy, or a
//! JSON merge of the checkout's file with a per-machine user file.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    component::{MergeConfig, MergeStrategy, SyncFileConfig, SyncMode},
    fs::{FileSystem, FileSystemError},
};

/// What syncing did to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,

    /// The target existed and was replaced (backed up first when it was not
    /// a symlink).
    Updated,

    Unchanged,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Updated => f.write_str("updated"),
            Self::Unchanged => f.write_str("unchanged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedFile {
    /// As written in the component.
    pub source: String,
    pub target: PathBuf,
    pub mode: SyncMode,
    pub action: SyncAction,
}

#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub source: String,
    pub target: PathBuf,
    pub error: SyncError,
}

#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    pub synced: Vec<SyncedFile>,

    /// Targets that were already up to date.
    pub skipped: Vec<SyncedFile>,

    pub errors: Vec<SyncFailure>,

    pub dry_run: bool,
}

impl SyncResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sync state of one target, as reported by [`Syncer::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Synced,
    Missing,
    NotSymlink,
    WrongTarget,
    UnknownMode,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced => f.write_str("synced"),
            Self::Missing => f.write_str("missing"),
            Self::NotSymlink => f.write_str("not_symlink"),
            Self::WrongTarget => f.write_str("wrong_target"),
            Self::UnknownMode => f.write_str("unknown_mode"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub source: String,
    pub target: PathBuf,
    pub mode: SyncMode,
    pub state: SyncState,
}

/// Puts `sync_files` entries into place.
#[derive(Debug, Clone)]
pub struct Syncer<F: FileSystem> {
    fs: F,
    dotfiles_root: PathBuf,
    dry_run: bool,
}

impl<F: FileSystem> Syncer<F> {
    pub fn new(fs: F, dotfiles_root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            fs,
            dotfiles_root: dotfiles_root.into(),
            dry_run,
        }
    }

    /// Sync every entry. Failures are collected per entry; one bad entry
    /// does not stop the rest.
    pub fn sync(&self, component: &str, files: &[SyncFileConfig]) -> SyncResult {
        let mut result = SyncResult {
            dry_run: self.dry_run,
            ..SyncResult::default()
        };

        for file in files {
            let (source, target) = match self.resolve(file) {
                Ok(paths) => paths,
                Err(error) => {
                    result.errors.push(SyncFailure {
                        source: file.source.clone(),
                        target: PathBuf::from(&file.target),
                        error,
                    });
                    continue;
                }
            };

            let action = match &file.mode {
                SyncMode::Symlink => self.sync_symlink(&source, &target),
                SyncMode::Copy => self.sync_copy(&source, &target),
                SyncMode::Merge => self.sync_merge(&source, &target, file.merge.as_ref()),
                SyncMode::Other(mode) => Err(SyncError::UnknownMode(mode.clone())),
            };

            match action {
                Ok(action) => {
                    tracing::debug!(
                        component,
                        source = %source.display(),
                        target = %target.display(),
                        mode = %file.mode,
                        %action,
                        dry_run = self.dry_run,
                        "synced file"
                    );
                    let synced = SyncedFile {
                        source: file.source.clone(),
                        target,
                        mode: file.mode.clone(),
                        action,
                    };
                    if action == SyncAction::Unchanged {
                        result.skipped.push(synced);
                    } else {
                        result.synced.push(synced);
                    }
                }
                Err(error) => {
                    tracing::warn!(component, target = %target.display(), %error, "sync failed");
                    result.errors.push(SyncFailure {
                        source: file.source.clone(),
                        target,
                        error,
                    });
                }
            }
        }

        result
    }

    /// Report whether each target is in place, without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if a path cannot be expanded.
    pub fn status(&self, files: &[SyncFileConfig]) -> Result<Vec<FileStatus>, SyncError> {
        files
            .iter()
            .map(|file| {
                let (source, target) = self.resolve(file)?;
                Ok(FileStatus {
                    source: file.source.clone(),
                    state: self.state(&source, &target, &file.mode),
                    target,
                    mode: file.mode.clone(),
                })
            })
            .collect()
    }

    fn state(&self, source: &Path, target: &Path, mode: &SyncMode) -> SyncState {
        match mode {
            SyncMode::Symlink => {
                if !self.fs.is_symlink(target) {
                    if self.fs.path_exists(target) {
                        SyncState::NotSymlink
                    } else {
                        SyncState::Missing
                    }
                } else if self.fs.read_link(target).is_ok_and(|dest| dest == source) {
                    SyncState::Synced
                } else {
                    SyncState::WrongTarget
                }
            }
            SyncMode::Copy | SyncMode::Merge => {
                if self.fs.path_exists(target) {
                    SyncState::Synced
                } else {
                    SyncState::Missing
                }
            }
            SyncMode::Other(_) => SyncState::UnknownMode,
        }
    }

    /// `(source, target)`: the source under the dotfiles root unless
    /// absolute, the target expanded.
    fn resolve(&self, file: &SyncFileConfig) -> Result<(PathBuf, PathBuf), SyncError> {
        let source = self.fs.expand_path(Path::new(&file.source))?;
        let source = if source.is_absolute() {
            source
        } else {
            self.dotfiles_root.join(source)
        };
        let target = self.fs.expand_path(Path::new(&file.target))?;

        Ok((source, target))
    }

    fn sync_symlink(&self, source: &Path, target: &Path) -> Result<SyncAction, SyncError> {
        self.require_source(source)?;

        let mut action = SyncAction::Created;
        if self.fs.is_symlink(target) {
            if self.fs.read_link(target)? == source {
                return Ok(SyncAction::Unchanged);
            }
            if !self.dry_run {
                self.fs.remove_file(target)?;
            }
            action = SyncAction::Updated;
        } else if self.fs.path_exists(target) {
            if !self.dry_run {
                let backup = with_suffix(target, ".backup");
                self.fs.rename(target, &backup)?;
                tracing::info!(target = %target.display(), backup = %backup.display(), "backed up existing file");
            }
            action = SyncAction::Updated;
        }

        if self.dry_run {
            return Ok(action);
        }

        self.create_parent(target)?;
        self.fs.symlink(source, target)?;

        Ok(action)
    }

    fn sync_copy(&self, source: &Path, target: &Path) -> Result<SyncAction, SyncError> {
        self.require_source(source)?;

        if self.fs.is_dir(source) {
            self.copy_dir(source, target)
        } else {
            self.copy_file(source, target)
        }
    }

    fn copy_file(&self, source: &Path, target: &Path) -> Result<SyncAction, SyncError> {
        let existed = self.fs.path_exists(target);
        if existed {
            let data = self.fs.read_bytes(source)?;
            if self.fs.read_bytes(target).is_ok_and(|current| current == data) {
                return Ok(SyncAction::Unchanged);
            }
        }

        if !self.dry_run {
            self.create_parent(target)?;
            self.fs.copy_file(source, target)?;
        }

        Ok(created_or_updated(existed))
    }

    fn copy_dir(&self, source: &Path, target: &Path) -> Result<SyncAction, SyncError> {
        let existed = self.fs.path_exists(target);
        if !self.dry_run {
            self.fs.create_dir_all(target)?;
        }

        let mut changed = !existed;
        for entry in self.fs.list_directory(source)? {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let destination = target.join(name);

            let action = if self.fs.is_dir(&entry) {
                self.copy_dir(&entry, &destination)?
            } else {
                self.copy_file(&entry, &destination)?
            };
            changed |= action != SyncAction::Unchanged;
        }

        Ok(if changed {
            created_or_updated(existed)
        } else {
            SyncAction::Unchanged
        })
    }

    fn sync_merge(
        &self,
        source: &Path,
        target: &Path,
        config: Option<&MergeConfig>,
    ) -> Result<SyncAction, SyncError> {
        self.require_source(source)?;
        let base = self.read_json_object(source)?;

        let user_path = match config.and_then(|c| c.user_file.as_deref()) {
            Some(file) => self.fs.expand_path(Path::new(file))?,
            None => with_suffix(target, ".local"),
        };
        let strategy = config.map(|c| c.strategy).unwrap_or_default();

        let merged = if self.fs.path_exists(&user_path) {
            let user = self.read_json_object(&user_path)?;
            let preserved: Vec<(String, Value)> = config
                .map(|c| c.preserve_user_keys.as_slice())
                .unwrap_or_default()
                .iter()
                .filter_map(|key| user.get(key).map(|v| (key.clone(), v.clone())))
                .collect();

            // Preserved keys take the user's value whole, not the merged one.
            let mut merged = merge_json(base, user, strategy);
            merged.extend(preserved);
            merged
        } else {
            base
        };

        let existed = self.fs.path_exists(target);
        let current = existed
            .then(|| self.read_json_object(target).ok())
            .flatten();

        if current.as_ref() == Some(&merged) {
            return Ok(SyncAction::Unchanged);
        }
        if self.dry_run {
            return Ok(created_or_updated(existed));
        }

        if self.fs.is_symlink(target) {
            self.fs.remove_file(target)?;
        }
        let mut content = serde_json::to_string_pretty(&merged).map_err(|source| {
            SyncError::Serialize {
                path: target.to_path_buf(),
                source: Arc::new(source),
            }
        })?;
        content.push('\n');
        self.fs.write_file(target, content.as_bytes())?;

        Ok(created_or_updated(existed))
    }

    fn require_source(&self, source: &Path) -> Result<(), SyncError> {
        if self.fs.path_exists(source) {
            Ok(())
        } else {
            Err(SyncError::SourceNotFound(source.to_path_buf()))
        }
    }

    fn create_parent(&self, path: &Path) -> Result<(), SyncError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent)?;
        }
        Ok(())
    }

    fn read_json_object(&self, path: &Path) -> Result<Map<String, Value>, SyncError> {
        let content = self.fs.read_file(path)?;
        let value = serde_json::from_str(&content).map_err(|source| SyncError::ParseJson {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(SyncError::NotAnObject(path.to_path_buf())),
        }
    }
}

/// Overlay `user` on `base`. Deep merging recurses into objects present in
/// both; shallow merging replaces top-level keys wholesale.
#[must_use]
pub fn merge_json(
    mut base: Map<String, Value>,
    user: Map<String, Value>,
    strategy: MergeStrategy,
) -> Map<String, Value> {
    for (key, value) in user {
        let merged = match (strategy, base.remove(&key), value) {
            (MergeStrategy::Deep, Some(Value::Object(b)), Value::Object(u)) => {
                Value::Object(merge_json(b, u, strategy))
            }
            (_, _, value) => value,
        };
        base.insert(key, merged);
    }
    base
}

fn created_or_updated(existed: bool) -> SyncAction {
    if existed {
        SyncAction::Updated
    } else {
        SyncAction::Created
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

#[derive(Error, Debug, Clone)]
pub enum SyncError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("unknown sync mode: {0}")]
    UnknownMode(String),

    #[error("failed to parse JSON at {}: {source}", path.display())]
    ParseJson {
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("failed to serialize merged JSON for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error(transparent)]
    FileSystem(#[from] FileSystemError),
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;

    use super::*;
    use crate::fs::RealFileSystem;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        home: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().join("dotfiles");
            let home = dir.path().join("home");
            fs::create_dir_all(&root).unwrap();
            fs::create_dir_all(&home).unwrap();
            Self {
                _dir: dir,
                root,
                home,
            }
        }

        fn syncer(&self, dry_run: bool) -> Syncer<RealFileSystem> {
            Syncer::new(RealFileSystem, &self.root, dry_run)
        }

        fn source(&self, name: &str, content: &str) -> PathBuf {
            let path = self.root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }

        fn entry(&self, source: &str, target: &str, mode: SyncMode) -> SyncFileConfig {
            SyncFileConfig {
                source: source.to_string(),
                target: self.home.join(target).display().to_string(),
                mode,
                merge: None,
            }
        }
    }

    #[test]
    fn test_symlink_created_then_unchanged() {
        let fx = Fixture::new();
        let source = fx.source("zsh/zshrc", "export A=1\n");
        let entry = fx.entry("zsh/zshrc", ".config/zsh/.zshrc", SyncMode::Symlink);
        let target = fx.home.join(".config/zsh/.zshrc");

        let first = fx.syncer(false).sync("zsh", std::slice::from_ref(&entry));
        let second = fx.syncer(false).sync("zsh", &[entry]);

        assert_eq!(first.synced[0].action, SyncAction::Created);
        assert_eq!(fs::read_link(&target).unwrap(), source);
        assert!(second.synced.is_empty());
        assert_eq!(second.skipped[0].action, SyncAction::Unchanged);
    }

    #[test]
    fn test_symlink_backs_up_existing_file() {
        let fx = Fixture::new();
        fx.source("gitconfig", "[user]\n");
        let target = fx.home.join(".gitconfig");
        fs::write(&target, "mine").unwrap();

        let result = fx
            .syncer(false)
            .sync("git", &[fx.entry("gitconfig", ".gitconfig", SyncMode::Symlink)]);

        assert_eq!(result.synced[0].action, SyncAction::Updated);
        assert!(target.is_symlink());
        assert_eq!(
            fs::read_to_string(fx.home.join(".gitconfig.backup")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn test_symlink_replaces_wrong_link() {
        let fx = Fixture::new();
        let source = fx.source("a", "a");
        let other = fx.source("b", "b");
        let target = fx.home.join("a");
        std::os::unix::fs::symlink(&other, &target).unwrap();

        let result = fx
            .syncer(false)
            .sync("x", &[fx.entry("a", "a", SyncMode::Symlink)]);

        assert_eq!(result.synced[0].action, SyncAction::Updated);
        assert_eq!(fs::read_link(&target).unwrap(), source);
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let fx = Fixture::new();
        fx.source("a", "a");

        let result = fx.syncer(true).sync(
            "x",
            &[
                fx.entry("a", "link", SyncMode::Symlink),
                fx.entry("a", "copy", SyncMode::Copy),
            ],
        );

        assert!(result.dry_run);
        assert_eq!(result.synced.len(), 2);
        assert!(!fx.home.join("link").exists());
        assert!(!fx.home.join("copy").exists());
    }

    #[test]
    fn test_copy_directory_recursively() {
        let fx = Fixture::new();
        fx.source("nvim/init.lua", "require('x')\n");
        fx.source("nvim/lua/plugins.lua", "return {}\n");
        let entry = fx.entry("nvim", ".config/nvim", SyncMode::Copy);

        let first = fx.syncer(false).sync("nvim", std::slice::from_ref(&entry));
        let second = fx.syncer(false).sync("nvim", &[entry]);

        assert_eq!(first.synced[0].action, SyncAction::Created);
        assert_eq!(
            fs::read_to_string(fx.home.join(".config/nvim/lua/plugins.lua")).unwrap(),
            "return {}\n"
        );
        assert_eq!(second.skipped.len(), 1);
    }

    #[test]
    fn test_copy_updates_changed_file() {
        let fx = Fixture::new();
        fx.source("a", "new");
        fs::write(fx.home.join("a"), "old").unwrap();

        let result = fx
            .syncer(false)
            .sync("x", &[fx.entry("a", "a", SyncMode::Copy)]);

        assert_eq!(result.synced[0].action, SyncAction::Updated);
        assert_eq!(fs::read_to_string(fx.home.join("a")).unwrap(), "new");
    }

    #[test]
    fn test_missing_source_and_unknown_mode_are_collected() {
        let fx = Fixture::new();
        fx.source("a", "a");

        let result = fx.syncer(false).sync(
            "x",
            &[
                fx.entry("nope", "nope", SyncMode::Symlink),
                fx.entry("a", "a", SyncMode::Other("hardlink".to_string())),
                fx.entry("a", "a", SyncMode::Copy),
            ],
        );

        assert!(!result.is_success());
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.errors[0].error, SyncError::SourceNotFound(_)));
        assert_eq!(result.errors[1].error.to_string(), "unknown sync mode: hardlink");
        assert_eq!(result.synced.len(), 1);
    }

    #[test]
    fn test_merge_with_local_file() {
        let fx = Fixture::new();
        fx.source(
            "vscode/settings.json",
            r#"{"editor": {"fontSize": 13, "tabSize": 2}, "theme": "dark"}"#,
        );
        let target = fx.home.join("settings.json");
        fs::write(
            with_suffix(&target, ".local"),
            r#"{"editor": {"fontSize": 15}}"#,
        )
        .unwrap();
        fs::write(&target, r#"{"theme": "light"}"#).unwrap();
        let entry = fx.entry("vscode/settings.json", "settings.json", SyncMode::Merge);

        let result = fx.syncer(false).sync("vscode", std::slice::from_ref(&entry));
        let written: Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();

        assert_eq!(result.synced[0].action, SyncAction::Updated);
        assert_eq!(
            written,
            json!({"editor": {"fontSize": 15, "tabSize": 2}, "theme": "dark"})
        );

        let again = fx.syncer(false).sync("vscode", &[entry]);
        assert_eq!(again.skipped.len(), 1);
    }

    #[test]
    fn test_merge_preserved_keys_come_from_local_file() {
        let fx = Fixture::new();
        fx.source("app.json", r#"{"a": {"x": 1, "y": 2}, "k": "base", "n": 1}"#);
        let target = fx.home.join("app.json");
        fs::write(
            with_suffix(&target, ".local"),
            r#"{"a": {"x": 9}, "k": "user"}"#,
        )
        .unwrap();
        fs::write(&target, r#"{"k": "stale", "n": 5}"#).unwrap();
        let mut entry = fx.entry("app.json", "app.json", SyncMode::Merge);
        entry.merge = Some(MergeConfig {
            preserve_user_keys: vec!["a".to_string(), "k".to_string(), "n".to_string()],
            ..MergeConfig::default()
        });

        fx.syncer(false).sync("app", &[entry]);
        let written: Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();

        assert_eq!(written, json!({"a": {"x": 9}, "k": "user", "n": 1}));
    }

    #[test]
    fn test_merge_replaces_symlink_with_file() {
        let fx = Fixture::new();
        let source = fx.source("settings.json", r#"{"a": 1}"#);
        let target = fx.home.join("settings.json");
        std::os::unix::fs::symlink(fx.source("old.json", "{}"), &target).unwrap();

        fx.syncer(false)
            .sync("x", &[fx.entry("settings.json", "settings.json", SyncMode::Merge)]);

        assert!(!target.is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "{\n  \"a\": 1\n}\n");
        assert_eq!(fs::read_to_string(source).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_merge_rejects_non_object() {
        let fx = Fixture::new();
        fx.source("list.json", "[1, 2]");

        let result = fx
            .syncer(false)
            .sync("x", &[fx.entry("list.json", "list.json", SyncMode::Merge)]);

        assert!(matches!(result.errors[0].error, SyncError::NotAnObject(_)));
    }

    #[test]
    fn test_merge_json_strategies() {
        let base = json!({"a": {"x": 1, "y": 2}, "b": 1});
        let user = json!({"a": {"x": 9}, "c": 3});
        let object = |v: &Value| v.as_object().unwrap().clone();

        assert_eq!(
            Value::Object(merge_json(object(&base), object(&user), MergeStrategy::Deep)),
            json!({"a": {"x": 9, "y": 2}, "b": 1, "c": 3})
        );
        assert_eq!(
            Value::Object(merge_json(object(&base), object(&user), MergeStrategy::Shallow)),
            json!({"a": {"x": 9}, "b": 1, "c": 3})
        );
    }

    #[test]
    fn test_status_states() {
        let fx = Fixture::new();
        let a = fx.source("a", "a");
        let b = fx.source("b", "b");
        std::os::unix::fs::symlink(&a, fx.home.join("good")).unwrap();
        std::os::unix::fs::symlink(&b, fx.home.join("wrong")).unwrap();
        fs::write(fx.home.join("plain"), "x").unwrap();

        let states = fx
            .syncer(false)
            .status(&[
                fx.entry("a", "good", SyncMode::Symlink),
                fx.entry("a", "wrong", SyncMode::Symlink),
                fx.entry("a", "plain", SyncMode::Symlink),
                fx.entry("a", "absent", SyncMode::Symlink),
                fx.entry("a", "plain", SyncMode::Copy),
                fx.entry("a", "plain", SyncMode::Other("x".to_string())),
            ])
            .unwrap()
            .into_iter()
            .map(|s| s.state.to_string())
            .collect::<Vec<_>>();

        assert_eq!(
            states,
            [
                "synced",
                "wrong_target",
                "not_symlink",
                "missing",
                "synced",
                "unknown_mode"
            ]
        );
    }
}
