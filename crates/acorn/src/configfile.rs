//! Config file generation
//!
//! A component's `files` entries pair a target path with a format name and a
//! free-form `values` map. A [`Writer`] turns the map into bytes for one
//! format; the [`WriterRegistry`] looks writers up by name and
//! [`ConfigFileManager`] renders and writes the results.

mod ini;
mod json;
mod keyvalue;
pub mod manager;
mod raw;
mod textlist;
mod xml;
mod yaml;

pub use self::{
    ini::IniWriter,
    json::{JsonArrayWriter, JsonWriter},
    keyvalue::KeyValueWriter,
    manager::{ConfigFileManager, GeneratedFile},
    raw::RawWriter,
    textlist::TextListWriter,
    xml::XmlWriter,
    yaml::YamlWriter,
};

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::fs::FileSystemError;

pub type Values = Map<String, Value>;

/// Serializes a `values` map into one file format.
pub trait Writer: Send + Sync {
    /// The name components use in `format:`.
    fn format(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns [`ConfigFileError::InvalidValues`] when `values` does not have
    /// the shape the format needs.
    fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError>;
}

/// Writers by format name.
pub struct WriterRegistry {
    writers: BTreeMap<&'static str, Box<dyn Writer>>,
}

impl WriterRegistry {
    /// A registry with no writers at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            writers: BTreeMap::new(),
        }
    }

    /// Add `writer`, replacing any writer registered for the same format.
    pub fn register(&mut self, writer: impl Writer + 'static) {
        self.writers.insert(writer.format(), Box::new(writer));
    }

    /// # Errors
    ///
    /// Returns [`ConfigFileError::UnknownFormat`] listing every registered
    /// format.
    pub fn get(&self, format: &str) -> Result<&dyn Writer, ConfigFileError> {
        self.writers
            .get(format)
            .map(AsRef::as_ref)
            .ok_or_else(|| ConfigFileError::UnknownFormat {
                format: format.to_string(),
                available: self.formats().map(ToString::to_string).collect(),
            })
    }

    #[must_use]
    pub fn contains(&self, format: &str) -> bool {
        self.writers.contains_key(format)
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.writers.keys().copied()
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(JsonWriter);
        registry.register(JsonArrayWriter);
        registry.register(YamlWriter);
        registry.register(XmlWriter);
        registry.register(TextListWriter);
        registry.register(RawWriter);
        registry.register(IniWriter);
        registry.register(KeyValueWriter);
        registry
    }
}

impl std::fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.writers.keys()).finish()
    }
}

#[derive(Error, Debug, Clone)]
pub enum ConfigFileError {
    #[error("unknown format \"{format}\" (available: {})", available.join(", "))]
    UnknownFormat {
        format: String,
        available: Vec<String>,
    },

    #[error("invalid values for {format} format: {message}")]
    InvalidValues {
        format: &'static str,
        message: String,
    },

    #[error("failed to serialize {format}: {source}")]
    Json {
        format: &'static str,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("failed to serialize yaml: {0}")]
    Yaml(#[source] Arc<serde_yaml::Error>),

    #[error("failed to generate {}", target.display())]
    Generate {
        target: PathBuf,
        #[source]
        source: Box<ConfigFileError>,
    },

    #[error(transparent)]
    FileSystem(#[from] FileSystemError),
}

impl ConfigFileError {
    pub(crate) fn invalid(format: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValues {
            format,
            message: message.into(),
        }
    }
}

/// Plain rendering of a scalar JSON value. `None` for arrays and objects.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
pub(crate) fn values(json: Value) -> Values {
    match json {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_builtin_formats() {
        let registry = WriterRegistry::default();

        assert_eq!(
            registry.formats().collect::<Vec<_>>(),
            ["ini", "json", "jsonarray", "keyvalue", "raw", "textlist", "xml", "yaml"]
        );
    }

    #[test]
    fn test_unknown_format_lists_available() {
        let mut registry = WriterRegistry::empty();
        registry.register(RawWriter);
        registry.register(JsonWriter);

        let err = registry.get("toml").err().unwrap();

        assert_eq!(
            err.to_string(),
            "unknown format \"toml\" (available: json, raw)"
        );
    }

    struct Upper;

    impl Writer for Upper {
        fn format(&self) -> &'static str {
            "upper"
        }

        fn write(&self, values: &Values) -> Result<Vec<u8>, ConfigFileError> {
            Ok(values
                .keys()
                .map(|k| k.to_uppercase())
                .collect::<Vec<_>>()
                .join(",")
                .into_bytes())
        }
    }

    #[test]
    fn test_register_custom_writer() {
        let mut registry = WriterRegistry::default();
        registry.register(Upper);

        let writer = registry.get("upper").unwrap();
        let out = writer
            .write(&values(serde_json::json!({"a": 1, "b": 2})))
            .unwrap();

        assert!(registry.contains("upper"));
        assert_eq!(out, b"A,B");
    }
}
