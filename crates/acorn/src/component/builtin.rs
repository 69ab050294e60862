//! Built-in components, compiled into the binary.
//!
//! Each lives at `components/<name>/config.yaml` in this crate.

use include_dir::{Dir, include_dir};

static BUILTIN_COMPONENTS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/components");

const CONFIG_FILE: &str = "config.yaml";

/// Names of all built-in components, sorted.
#[must_use]
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_COMPONENTS
        .dirs()
        .filter(|dir| dir.get_file(dir.path().join(CONFIG_FILE)).is_some())
        .filter_map(|dir| dir.path().file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    names.sort();

    names
}

/// The raw `config.yaml` of a built-in component.
#[must_use]
pub fn config_yaml(name: &str) -> Option<&'static str> {
    if !is_valid_name(name) {
        return None;
    }

    BUILTIN_COMPONENTS
        .get_file(format!("{name}/{CONFIG_FILE}"))
        .and_then(|file| file.contents_utf8())
}

/// Component names are single path segments with no dots.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\', '.'])
}

#[must_use]
pub fn exists(name: &str) -> bool {
    config_yaml(name).is_some()
}
