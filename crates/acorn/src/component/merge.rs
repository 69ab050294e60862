use std::collections::BTreeMap;

use super::{ComponentConfig, InstallConfig};

/// Layer a user override on top of a built-in component.
///
/// - scalars: the override wins when non-empty
/// - maps: union, override keys win
/// - `paths`, `wrappers`: replaced when the override has any
/// - `files` (by target), `sync_files` (by source), `install.tools` (by name):
///   override entries replace base entries in place, new ones are appended
#[must_use]
pub fn merge(base: ComponentConfig, over: ComponentConfig) -> ComponentConfig {
    ComponentConfig {
        name: coalesce(over.name, base.name),
        description: coalesce(over.description, base.description),
        version: over
            .version
            .filter(|v| !v.is_empty())
            .or(base.version),
        env: merge_maps(base.env, over.env),
        paths: replace_if_any(base.paths, over.paths),
        aliases: merge_maps(base.aliases, over.aliases),
        wrappers: replace_if_any(base.wrappers, over.wrappers),
        shell_functions: merge_maps(base.shell_functions, over.shell_functions),
        files: merge_by_key(base.files, over.files, |f| f.target.clone()),
        sync_files: merge_by_key(base.sync_files, over.sync_files, |f| f.source.clone()),
        install: InstallConfig {
            tools: merge_by_key(base.install.tools, over.install.tools, |t| t.name.clone()),
        },
    }
}

fn coalesce(over: String, base: String) -> String {
    if over.is_empty() { base } else { over }
}

fn merge_maps(
    mut base: BTreeMap<String, String>,
    over: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    base.extend(over);
    base
}

fn replace_if_any<T>(base: Vec<T>, over: Vec<T>) -> Vec<T> {
    if over.is_empty() { base } else { over }
}

fn merge_by_key<T, K, F>(mut base: Vec<T>, over: Vec<T>, key: F) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    for entry in over {
        let k = key(&entry);

        match base.iter_mut().find(|existing| key(existing) == k) {
            Some(existing) => *existing = entry,
            None => base.push(entry),
        }
    }

    base
}
