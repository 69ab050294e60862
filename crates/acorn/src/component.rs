//! Component definitions
//!
//! A component is a named unit of dotfiles configuration ("node", "ghostty",
//! "golang", ...). Its `config.yaml` declares shell integration (env, paths,
//! aliases, wrappers, functions), config files to generate, dotfiles to sync
//! and the external tools it needs installed. Built-in components ship inside
//! the binary and can be overridden per user, see [`repository::yaml`].

pub mod builtin;
pub mod merge;
pub mod port;
pub mod validate;

pub mod repository {
    pub mod yaml;
}

use std::{collections::BTreeMap, fmt, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use self::port::ComponentParseError;

/// A component's `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComponentConfig {
    pub name: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Environment variables to export.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Entries to prepend to `PATH`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathEntry>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,

    /// Shell functions that wrap an acorn command.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wrappers: Vec<Wrapper>,

    /// Raw shell functions, name to body.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub shell_functions: BTreeMap<String, String>,

    /// Config files generated from `values` by a format writer.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileConfig>,

    /// Files from the dotfiles checkout to link, copy or merge into place.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sync_files: Vec<SyncFileConfig>,

    #[serde(skip_serializing_if = "InstallConfig::is_empty")]
    pub install: InstallConfig,
}

impl ComponentConfig {
    /// Parse a component from YAML. `path` only names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentParseError::YamlParse`] if `yaml` is not a valid
    /// component definition.
    pub fn parse(yaml: &str, path: &Path) -> Result<Self, ComponentParseError> {
        serde_yaml::from_str(yaml).map_err(|e| ComponentParseError::YamlParse {
            component_path: path.to_path_buf(),
            source: Arc::new(e),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    #[must_use]
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    #[must_use]
    pub fn shell_functions(&self) -> &BTreeMap<String, String> {
        &self.shell_functions
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolInstall] {
        &self.install.tools
    }

    /// Looks up a tool in this component's install config by name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&ToolInstall> {
        self.install.tools.iter().find(|t| t.name == name)
    }

    /// `true` if the component contributes anything to a shell init script.
    #[must_use]
    pub fn has_shell_integration(&self) -> bool {
        !(self.env.is_empty()
            && self.paths.is_empty()
            && self.aliases.is_empty()
            && self.wrappers.is_empty()
            && self.shell_functions.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathEntry {
    /// May contain shell variables; expanded by the shell at startup.
    pub path: String,

    /// `darwin`, `linux` or empty for every platform.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Wrapper {
    pub name: String,

    /// e.g. `acorn go new`
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_arg: Option<String>,

    /// Only `cd` is understood: change into the last line the command prints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_action: Option<String>,

    #[serde(default)]
    pub requires_arg: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FileConfig {
    /// Destination path; `~`, `$VAR` and `${VAR:-default}` are expanded.
    pub target: String,

    /// Writer name, see [`crate::configfile::WriterRegistry`].
    pub format: String,

    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyncFileConfig {
    /// Relative to the dotfiles root unless absolute.
    pub source: String,

    pub target: String,

    #[serde(default)]
    pub mode: SyncMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SyncMode {
    #[default]
    Symlink,
    Copy,
    Merge,
    Other(String),
}

impl From<String> for SyncMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" | "symlink" => Self::Symlink,
            "copy" => Self::Copy,
            "merge" => Self::Merge,
            _ => Self::Other(value),
        }
    }
}

impl From<SyncMode> for String {
    fn from(value: SyncMode) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symlink => f.write_str("symlink"),
            Self::Copy => f.write_str("copy"),
            Self::Merge => f.write_str("merge"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub strategy: MergeStrategy,

    /// Defaults to `<target>.local`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_file: Option<String>,

    /// Top-level keys taken whole from the user file instead of merged.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preserve_user_keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    #[default]
    Deep,
    Shallow,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InstallConfig {
    pub tools: Vec<ToolInstall>,
}

impl InstallConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// One external tool a component needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolInstall {
    pub name: String,

    pub description: String,

    /// Shell command that succeeds when the tool is present. `command -v X`
    /// is answered without spawning a shell.
    pub check: String,

    /// `cmd` or `component:cmd`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    /// Platform key (`darwin`, `linux/debian`, ...) to install method.
    pub methods: BTreeMap<String, InstallMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_install: Option<PostInstall>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstallMethod {
    #[serde(rename = "type")]
    pub method_type: MethodType,

    /// Defaults to the tool name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// npm only: install with `-g`.
    #[serde(default)]
    pub global: bool,

    /// curl only: script piped to `sh`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MethodType {
    #[default]
    Brew,
    Apt,
    Dnf,
    Pacman,
    Npm,
    Pip,
    Cargo,
    Go,
    Curl,
    /// Kept verbatim; rejected by validation and at install time.
    Other(String),
}

impl MethodType {
    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for MethodType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "brew" => Self::Brew,
            "apt" => Self::Apt,
            "dnf" => Self::Dnf,
            "pacman" => Self::Pacman,
            "npm" => Self::Npm,
            "pip" => Self::Pip,
            "cargo" => Self::Cargo,
            "go" => Self::Go,
            "curl" => Self::Curl,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for MethodType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<MethodType> for String {
    fn from(value: MethodType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brew => f.write_str("brew"),
            Self::Apt => f.write_str("apt"),
            Self::Dnf => f.write_str("dnf"),
            Self::Pacman => f.write_str("pacman"),
            Self::Npm => f.write_str("npm"),
            Self::Pip => f.write_str("pip"),
            Self::Cargo => f.write_str("cargo"),
            Self::Go => f.write_str("go"),
            Self::Curl => f.write_str("curl"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostInstall {
    #[serde(default)]
    pub message: String,
}
