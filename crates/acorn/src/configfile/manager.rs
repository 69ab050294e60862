use std::path::{Path, PathBuf};

use crate::{component::FileConfig, fs::FileSystem};

use super::{ConfigFileError, WriterRegistry};

/// A rendered config file and where it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub component: String,

    /// Where the content was (or in dry-run mode, would be) written.
    pub generated_path: PathBuf,

    /// The real target when writing into a generated dir; link
    /// `generated_path` there to activate it.
    pub symlink_target: Option<PathBuf>,

    pub format: String,

    pub content: String,

    pub written: bool,
}

/// Renders a component's `files` and writes them out.
#[derive(Debug)]
pub struct ConfigFileManager<F: FileSystem> {
    fs: F,
    registry: WriterRegistry,
    dry_run: bool,
    generated_dir: Option<PathBuf>,
}

impl<F: FileSystem> ConfigFileManager<F> {
    pub fn new(fs: F, dry_run: bool) -> Self {
        Self {
            fs,
            registry: WriterRegistry::default(),
            dry_run,
            generated_dir: None,
        }
    }

    /// Write into `<dir>/<component>/<file name>` instead of the targets.
    #[must_use]
    pub fn with_generated_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.generated_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: WriterRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &WriterRegistry {
        &self.registry
    }

    /// Render every file in order. Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigFileError`] for an unknown format, values the writer
    /// rejects, or a target that cannot be expanded or written.
    pub fn generate(
        &self,
        component: &str,
        files: &[FileConfig],
    ) -> Result<Vec<GeneratedFile>, ConfigFileError> {
        files
            .iter()
            .map(|file| self.generate_file(component, file))
            .collect()
    }

    /// Render `file` without touching the file system.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigFileError`] for an unknown format or values the writer
    /// rejects.
    pub fn preview(&self, file: &FileConfig) -> Result<Vec<u8>, ConfigFileError> {
        self.registry.get(&file.format)?.write(&file.values)
    }

    fn generate_file(
        &self,
        component: &str,
        file: &FileConfig,
    ) -> Result<GeneratedFile, ConfigFileError> {
        let target = self.fs.expand_path(Path::new(&file.target))?;
        let content = self
            .preview(file)
            .map_err(|source| ConfigFileError::Generate {
                target: target.clone(),
                source: Box::new(source),
            })?;

        let (generated_path, symlink_target) = match &self.generated_dir {
            Some(dir) => {
                let file_name = target.file_name().map_or_else(
                    || PathBuf::from(&file.format),
                    PathBuf::from,
                );
                (dir.join(component).join(file_name), Some(target))
            }
            None => (target, None),
        };

        let written = if self.dry_run {
            tracing::debug!(path = %generated_path.display(), "dry run, not writing");
            false
        } else {
            self.fs.write_file(&generated_path, &content)?;
            tracing::info!(
                component,
                path = %generated_path.display(),
                format = %file.format,
                "wrote config file"
            );
            true
        };

        Ok(GeneratedFile {
            component: component.to_string(),
            generated_path,
            symlink_target,
            format: file.format.clone(),
            content: String::from_utf8_lossy(&content).into_owned(),
            written,
        })
    }
}
