use std::path::{Path, PathBuf};

use crate::{
    component::{
        ComponentConfig, builtin,
        merge::merge,
        port::{ComponentParseError, ComponentRepoError, ComponentRepository},
    },
    fs::FileSystem,
};

/// Built-in components layered with YAML overrides from a directory
/// (`<override_dir>/<name>.yaml`).
#[derive(Debug, Clone)]
pub struct YamlComponentRepository<F: FileSystem> {
    fs: F,
    override_dir: PathBuf,
}

impl<F: FileSystem> YamlComponentRepository<F> {
    pub fn new(fs: F, override_dir: PathBuf) -> Self {
        Self { fs, override_dir }
    }

    #[must_use]
    pub fn override_dir(&self) -> &Path {
        &self.override_dir
    }

    fn override_names(&self) -> Result<Vec<String>, ComponentRepoError> {
        if !self.fs.is_dir(&self.override_dir) {
            return Ok(Vec::new());
        }

        let names = self
            .fs
            .list_directory(&self.override_dir)?
            .into_iter()
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml"))
            })
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();

        Ok(names)
    }

    fn load_override(&self, path: &Path) -> Result<ComponentConfig, ComponentParseError> {
        let content = self
            .fs
            .read_file(path)
            .map_err(|source| ComponentParseError::Read {
                component_path: path.to_path_buf(),
                source,
            })?;

        ComponentConfig::parse(&content, path)
    }
}

impl<F: FileSystem> ComponentRepository for YamlComponentRepository<F> {
    fn list_components(&self) -> Result<Vec<String>, ComponentRepoError> {
        let mut names = builtin::names();
        names.extend(self.override_names()?);
        names.sort();
        names.dedup();

        Ok(names)
    }

    fn get_component(&self, name: &str) -> Result<ComponentConfig, ComponentRepoError> {
        check_name(name)?;

        let parse_error = |source| ComponentRepoError::ParseError {
            name: name.to_string(),
            source,
        };

        let embedded = builtin::config_yaml(name)
            .map(|yaml| ComponentConfig::parse(yaml, &builtin_path(name)))
            .transpose()
            .map_err(parse_error)?;

        let user_path = self.user_config_path(name);
        let user = if self.fs.path_exists(&user_path) {
            tracing::debug!(component = name, path = %user_path.display(), "loading user override");
            Some(self.load_override(&user_path).map_err(parse_error)?)
        } else {
            None
        };

        let mut config = match (embedded, user) {
            (Some(base), Some(over)) => merge(base, over),
            (Some(config), None) | (None, Some(config)) => config,
            (None, None) => {
                return Err(ComponentRepoError::ComponentNotFound {
                    name: name.to_string(),
                    searched_paths: vec![
                        builtin_path(name).display().to_string(),
                        user_path.display().to_string(),
                    ],
                });
            }
        };

        if config.name.is_empty() {
            config.name = name.to_string();
        }

        Ok(config)
    }

    fn has_user_override(&self, name: &str) -> bool {
        builtin::is_valid_name(name) && self.fs.path_exists(&self.user_config_path(name))
    }

    fn user_config_path(&self, name: &str) -> PathBuf {
        self.override_dir.join(format!("{name}.yaml"))
    }

    fn has_embedded(&self, name: &str) -> bool {
        builtin::exists(name)
    }

    fn embedded_yaml(&self, name: &str) -> Option<String> {
        builtin::config_yaml(name).map(ToString::to_string)
    }

    fn create_user_override(&self, name: &str) -> Result<PathBuf, ComponentRepoError> {
        check_name(name)?;

        let yaml = builtin::config_yaml(name).ok_or_else(|| ComponentRepoError::NoEmbeddedDefault {
            name: name.to_string(),
        })?;

        self.fs.create_dir_all(&self.override_dir)?;

        let path = self.user_config_path(name);
        self.fs.write_file(&path, yaml.as_bytes())?;
        tracing::info!(component = name, path = %path.display(), "created user override");

        Ok(path)
    }
}

fn check_name(name: &str) -> Result<(), ComponentRepoError> {
    if builtin::is_valid_name(name) {
        Ok(())
    } else {
        Err(ComponentRepoError::InvalidName {
            name: name.to_string(),
        })
    }
}

fn builtin_path(name: &str) -> PathBuf {
    Path::new("<builtin>").join(name).join("config.yaml")
}
