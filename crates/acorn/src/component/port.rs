//! Component repository port and error types
//!
//! [`ComponentRepository`] hides where component definitions come from: the
//! built-in set compiled into the binary, the user's override directory, or
//! both merged together.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

use crate::fs::FileSystemError;

use super::ComponentConfig;

/// Where a component's definition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentSource {
    /// Compiled into the binary only
    Builtin,

    /// Only present in the user's override directory
    Override,

    /// Built-in default with a user override merged on top
    Both,
}

impl std::fmt::Display for ComponentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => f.write_str("builtin"),
            Self::Override => f.write_str("override"),
            Self::Both => f.write_str("both"),
        }
    }
}

/// Port for component lookups.
#[cfg_attr(test, mockall::automock)]
pub trait ComponentRepository: Send + Sync {
    /// Every known component name: built-ins plus user-only overrides,
    /// sorted and without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentRepoError`] if the override directory exists but
    /// cannot be listed.
    fn list_components(&self) -> Result<Vec<String>, ComponentRepoError>;

    /// Load a component: the built-in default merged with the user override.
    /// Either one alone is enough.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentRepoError::ComponentNotFound`] if neither exists,
    /// [`ComponentRepoError::InvalidName`] if `name` is not a plain file
    /// name, or a parse/IO error for the file that could not be loaded.
    fn get_component(&self, name: &str) -> Result<ComponentConfig, ComponentRepoError>;

    fn has_user_override(&self, name: &str) -> bool;

    /// Where the user override for `name` lives, whether or not it exists.
    fn user_config_path(&self, name: &str) -> PathBuf;

    fn has_embedded(&self, name: &str) -> bool;

    /// The raw YAML of the built-in definition, if there is one.
    fn embedded_yaml(&self, name: &str) -> Option<String>;

    /// Copy the built-in definition to the user override path, creating the
    /// override directory. Replaces an existing override.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentRepoError::NoEmbeddedDefault`] for components that
    /// are not built in, or an IO error if the file cannot be written.
    fn create_user_override(&self, name: &str) -> Result<PathBuf, ComponentRepoError>;

    fn source_of(&self, name: &str) -> Option<ComponentSource> {
        match (self.has_embedded(name), self.has_user_override(name)) {
            (true, true) => Some(ComponentSource::Both),
            (true, false) => Some(ComponentSource::Builtin),
            (false, true) => Some(ComponentSource::Override),
            (false, false) => None,
        }
    }
}

/// Errors from component repository operations.
#[derive(Error, Debug, Clone)]
pub enum ComponentRepoError {
    /// Neither a built-in definition nor a user override exists
    #[error("Component `{name}` not found (looked in: {})", searched_paths.join(", "))]
    ComponentNotFound {
        name: String,
        searched_paths: Vec<String>,
    },

    #[error("Invalid component name `{name}`")]
    InvalidName { name: String },

    #[error("Component `{name}` has no built-in default to copy")]
    NoEmbeddedDefault { name: String },

    #[error("Failed to load component `{name}`")]
    ParseError {
        name: String,
        #[source]
        source: ComponentParseError,
    },

    #[error(transparent)]
    FileSystemError(#[from] FileSystemError),
}

/// Errors from reading a single component file.
#[derive(Error, Debug, Clone)]
pub enum ComponentParseError {
    #[error("YAML parsing error reading component file `{}`: {source}", component_path.display())]
    YamlParse {
        component_path: PathBuf,
        #[source]
        source: Arc<serde_yaml::Error>,
    },

    #[error("Failed to read component file `{}`: {source}", component_path.display())]
    Read {
        component_path: PathBuf,
        #[source]
        source: FileSystemError,
    },
}

impl ComponentParseError {
    #[must_use]
    pub fn component_path(&self) -> &Path {
        match self {
            Self::YamlParse { component_path, .. } | Self::Read { component_path, .. } => {
                component_path
            }
        }
    }
}
