use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Environment, FileFormat};

use crate::{
    config::{AppConfig, EDITOR_DEFAULT, SHELL_DEFAULT},
    fs::FileSystem,
};

use super::{ConfigLoadError, ConfigLoader};

const ENV_PREFIX: &str = "ACORN";
const COMPONENTS_DIR: &str = "components";

/// Loads [`AppConfig`] from an optional `config.yaml`/`config.yml` in acorn's
/// config directory, layered over computed defaults and under `ACORN_*`
/// environment variables.
pub struct Yaml<'a, F: FileSystem> {
    fs: &'a F,
    env: HashMap<String, String>,
}

impl<'a, F: FileSystem> Yaml<'a, F> {
    /// Loader reading the current process environment.
    pub fn new(fs: &'a F) -> Self {
        Self {
            fs,
            env: std::env::vars().collect(),
        }
    }

    /// Replace the environment snapshot used for defaults and overrides.
    #[must_use]
    pub fn with_environment(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    fn env_or(&self, key: &str, default: &str) -> String {
        self.env
            .get(key)
            .filter(|value| !value.is_empty())
            .map_or_else(|| default.to_string(), Clone::clone)
    }

    fn expand(&self, path: &Path) -> Result<PathBuf, ConfigLoadError> {
        Ok(self.fs.expand_path(path)?)
    }
}

impl<F: FileSystem> ConfigLoader for Yaml<'_, F> {
    fn load_config(&self) -> Result<AppConfig, ConfigLoadError> {
        let config_paths = self.find_config_file_paths()?;

        if config_paths.len() > 1 {
            return Err(ConfigLoadError::MultipleFound(
                config_paths
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            ));
        }

        let config_dir = self.fs.config_dir()?;
        let home_dir = self.fs.home_dir()?;

        let mut builder = config::Config::builder()
            .set_default(
                "dotfiles_root",
                home_dir.join(".config").join("dotfiles").display().to_string(),
            )?
            .set_default(
                "override_directory",
                config_dir.join(COMPONENTS_DIR).display().to_string(),
            )?
            .set_default("editor", self.env_or("EDITOR", EDITOR_DEFAULT))?
            .set_default("shell", self.env_or("SHELL", SHELL_DEFAULT))?;

        let config_file_path = config_paths.into_iter().next();

        if let Some(path) = &config_file_path {
            tracing::debug!(path = %path.display(), "reading config file");
            let file_contents = self.fs.read_file(path)?;
            builder = builder.add_source(config::File::from_str(&file_contents, FileFormat::Yaml));
        }

        let overrides: config::Map<String, String> = self
            .env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(Some(overrides)),
        );

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        app_config.dotfiles_root = self.expand(&app_config.dotfiles_root)?;
        app_config.override_directory = self.expand(&app_config.override_directory)?;
        if let Some(dir) = app_config.generated_dir.take() {
            app_config.generated_dir = Some(self.expand(&dir)?);
        }
        app_config.config_file_path = config_file_path;

        Ok(app_config)
    }

    fn find_config_file_paths(&self) -> Result<Vec<PathBuf>, ConfigLoadError> {
        let config_dir = self.fs.config_dir()?;

        Ok(["config.yaml", "config.yml"]
            .into_iter()
            .map(|name| config_dir.join(name))
            .filter(|path| self.fs.path_exists(path))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileSystemError, MockFileSystem};
    use pretty_assertions::assert_eq;

    const CONFIG_DIR: &str = "/home/test/.config/acorn";

    fn base_fs() -> MockFileSystem {
        let mut fs = MockFileSystem::default();
        fs.mock_home_dir_ok("/home/test");
        fs.expect_expand_path()
            .returning(|p| Ok(p.to_path_buf()));
        fs
    }

    fn no_config_file(fs: &mut MockFileSystem) {
        fs.mock_config_dir_ok(CONFIG_DIR);
        fs.mock_path_exists(Path::new(CONFIG_DIR).join("config.yaml"), false);
        fs.mock_path_exists(Path::new(CONFIG_DIR).join("config.yml"), false);
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_config_file() {
        let mut fs = base_fs();
        no_config_file(&mut fs);

        let config = Yaml::new(&fs)
            .with_environment(env(&[]))
            .load_config()
            .unwrap();

        assert_eq!(
            config.dotfiles_root(),
            Path::new("/home/test/.config/dotfiles")
        );
        assert_eq!(
            config.override_directory(),
            Path::new("/home/test/.config/acorn/components")
        );
        assert_eq!(config.editor(), "vim");
        assert_eq!(config.shell(), "/bin/bash");
        assert_eq!(config.config_file_path(), None);
    }

    #[test]
    fn test_editor_and_shell_default_from_environment() {
        let mut fs = base_fs();
        no_config_file(&mut fs);

        let config = Yaml::new(&fs)
            .with_environment(env(&[("EDITOR", "hx"), ("SHELL", "/bin/zsh")]))
            .load_config()
            .unwrap();

        assert_eq!(config.editor(), "hx");
        assert_eq!(config.shell(), "/bin/zsh");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut fs = base_fs();
        fs.mock_config_file(
            Path::new(CONFIG_DIR),
            r#"
            dotfiles_root: /srv/dotfiles
            generated_dir: /srv/dotfiles/generated
            editor: nvim
            stop_on_error: true
            "#,
        );

        let config = Yaml::new(&fs)
            .with_environment(env(&[("EDITOR", "hx")]))
            .load_config()
            .unwrap();

        assert_eq!(config.dotfiles_root(), Path::new("/srv/dotfiles"));
        assert_eq!(
            config.generated_dir(),
            Some(Path::new("/srv/dotfiles/generated"))
        );
        assert_eq!(config.editor(), "nvim");
        assert!(config.stop_on_error());
        assert_eq!(
            config.config_file_path(),
            Some(Path::new(CONFIG_DIR).join("config.yaml").as_path())
        );
    }

    #[test]
    fn test_environment_overrides_config_file() {
        let mut fs = base_fs();
        fs.mock_config_file(Path::new(CONFIG_DIR), "dotfiles_root: /srv/dotfiles\n");

        let config = Yaml::new(&fs)
            .with_environment(env(&[
                ("ACORN_DOTFILES_ROOT", "/env/dotfiles"),
                ("ACORN_DRY_RUN", "true"),
                ("ACORN_COMMAND_TIMEOUT", "42"),
            ]))
            .load_config()
            .unwrap();

        assert_eq!(config.dotfiles_root(), Path::new("/env/dotfiles"));
        assert!(config.dry_run());
        assert_eq!(config.command_timeout().as_secs(), 42);
    }

    #[test]
    fn test_paths_are_expanded() {
        let mut fs = MockFileSystem::default();
        fs.mock_home_dir_ok("/home/test");
        fs.mock_config_file(Path::new(CONFIG_DIR), "dotfiles_root: ~/dotfiles\n");
        fs.expect_expand_path().returning(|p| {
            let raw = p.to_string_lossy();
            Ok(PathBuf::from(raw.replacen('~', "/home/test", 1)))
        });

        let config = Yaml::new(&fs)
            .with_environment(env(&[]))
            .load_config()
            .unwrap();

        assert_eq!(config.dotfiles_root(), Path::new("/home/test/dotfiles"));
    }

    #[test]
    fn test_multiple_config_files() {
        let mut fs = base_fs();
        fs.mock_config_dir_ok(CONFIG_DIR);
        fs.mock_path_exists(Path::new(CONFIG_DIR).join("config.yaml"), true);
        fs.mock_path_exists(Path::new(CONFIG_DIR).join("config.yml"), true);

        let err = Yaml::new(&fs)
            .with_environment(env(&[]))
            .load_config()
            .unwrap_err();

        match err {
            ConfigLoadError::MultipleFound(paths) => assert_eq!(paths.len(), 2),
            other => panic!("Expected MultipleFound, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() {
        let mut fs = base_fs();
        fs.mock_config_file(Path::new(CONFIG_DIR), "dotfiles_root: [unclosed\n");

        let err = Yaml::new(&fs)
            .with_environment(env(&[]))
            .load_config()
            .unwrap_err();

        assert!(matches!(err, ConfigLoadError::ConfigError(_)));
    }

    #[test]
    fn test_missing_config_dir() {
        let mut fs = MockFileSystem::default();
        fs.expect_config_dir()
            .returning(|| Err(FileSystemError::HomeDirNotFound));

        let err = Yaml::new(&fs).find_config_file_paths().unwrap_err();

        assert!(matches!(
            err,
            ConfigLoadError::FileSystemError(FileSystemError::HomeDirNotFound)
        ));
    }
}
