//! Shell integration snippets
//!
//! Turns a component's env, paths, aliases, wrappers and shell functions
//! into POSIX shell source, meant to be `eval`ed from a shell rc file.

use std::fmt::Write as _;

use crate::{
    component::{ComponentConfig, PathEntry, Wrapper},
    platform::Platform,
};

const INDENT: &str = "    ";

/// Renders shell integration for the current platform.
#[derive(Debug, Clone)]
pub struct ShellGenerator {
    platform: Platform,
}

impl ShellGenerator {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// The whole snippet for `component`. Empty sections are left out and
    /// the rest are separated by a blank line.
    #[must_use]
    pub fn generate(&self, component: &ComponentConfig) -> String {
        let mut sections = vec![banner(component)];

        sections.extend(
            [
                env_section(component),
                self.paths_section(&component.paths),
                aliases_section(component),
                wrappers_section(&component.wrappers),
                functions_section(component),
            ]
            .into_iter()
            .filter(|section| !section.is_empty()),
        );

        sections.join("\n")
    }

    fn paths_section(&self, paths: &[PathEntry]) -> String {
        let mut out = String::new();

        for entry in paths
            .iter()
            .filter(|p| p.condition.is_empty() || p.condition == self.platform.os())
        {
            let path = escape_double(&entry.path);
            let _ = writeln!(out, "case \":$PATH:\" in");
            let _ = writeln!(out, "{INDENT}*\":{path}:\"*) ;;");
            let _ = writeln!(out, "{INDENT}*) export PATH=\"{path}:$PATH\" ;;");
            out.push_str("esac\n");
        }

        out
    }
}

fn banner(component: &ComponentConfig) -> String {
    if component.description.is_empty() {
        format!("# {}\n", component.name)
    } else {
        format!("# {}: {}\n", component.name, component.description)
    }
}

fn env_section(component: &ComponentConfig) -> String {
    component
        .env
        .iter()
        .map(|(name, value)| format!("export {name}=\"{}\"\n", escape_double(value)))
        .collect()
}

fn aliases_section(component: &ComponentConfig) -> String {
    component
        .aliases
        .iter()
        .map(|(name, command)| format!("alias {name}='{}'\n", escape_single(command)))
        .collect()
}

fn wrappers_section(wrappers: &[Wrapper]) -> String {
    wrappers
        .iter()
        .map(wrapper)
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrapper(w: &Wrapper) -> String {
    let mut out = format!("# {}\n{}() {{\n", w.name, w.name);

    if w.requires_arg {
        let usage = w
            .usage
            .clone()
            .unwrap_or_else(|| format!("{} <arg>", w.name));
        let _ = writeln!(out, "{INDENT}if [ -z \"$1\" ]; then");
        let _ = writeln!(out, "{INDENT}{INDENT}echo \"Usage: {}\" >&2", escape_double(&usage));
        let _ = writeln!(out, "{INDENT}{INDENT}return 1");
        let _ = writeln!(out, "{INDENT}fi");
    }

    let invocation = match &w.default_arg {
        Some(default) => format!("{} \"${{1:-{default}}}\" \"${{@:2}}\"", w.command),
        None => format!("{} \"$@\"", w.command),
    };

    if w.post_action.as_deref() == Some("cd") {
        let _ = writeln!(out, "{INDENT}local out");
        let _ = writeln!(out, "{INDENT}out=\"$({invocation})\" || return $?");
        let _ = writeln!(out, "{INDENT}printf '%s\\n' \"$out\"");
        let _ = writeln!(
            out,
            "{INDENT}cd \"$(printf '%s\\n' \"$out\" | tail -n 1)\" || return $?"
        );
    } else {
        let _ = writeln!(out, "{INDENT}{invocation}");
    }

    out.push_str("}\n");
    out
}

fn functions_section(component: &ComponentConfig) -> String {
    component
        .shell_functions
        .iter()
        .map(|(name, body)| {
            let mut out = format!("# {name}\n{name}() {{\n");
            for line in body.trim().lines() {
                if line.trim().is_empty() {
                    out.push('\n');
                } else {
                    let _ = writeln!(out, "{INDENT}{line}");
                }
            }
            out.push_str("}\n");
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_single(value: &str) -> String {
    value.replace('\'', r"'\''")
}

/// Keeps `$VAR` live; only quotes and backslashes are escaped.
fn escape_double(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use pretty_assertions::assert_eq;

    fn component(yaml: &str) -> ComponentConfig {
        ComponentConfig::parse(yaml, Path::new("test.yaml")).unwrap()
    }

    fn generator(os: &str) -> ShellGenerator {
        ShellGenerator::new(Platform::new(os, "arm64"))
    }

    #[test]
    fn test_env_paths_and_aliases() {
        let config = component(
            r#"
name: golang
description: Go toolchain
env:
  GOPATH: ~/go
  GOFLAGS: -mod=mod
paths:
  - path: $GOPATH/bin
  - path: /opt/homebrew/opt/go/bin
    condition: darwin
  - path: /usr/local/go/bin
    condition: linux
aliases:
  gt: go test ./...
  say: echo 'hi'
"#,
        );

        let expected = r#"# golang: Go toolchain

export GOFLAGS="-mod=mod"
export GOPATH="~/go"

case ":$PATH:" in
    *":$GOPATH/bin:"*) ;;
    *) export PATH="$GOPATH/bin:$PATH" ;;
esac
case ":$PATH:" in
    *":/usr/local/go/bin:"*) ;;
    *) export PATH="/usr/local/go/bin:$PATH" ;;
esac

alias gt='go test ./...'
alias say='echo '\''hi'\'''
"#;

        assert_eq!(generator("linux").generate(&config), expected);
    }

    #[test]
    fn test_wrappers() {
        let config = component(
            r#"
name: golang
wrappers:
  - name: gonew
    command: acorn go new
    requires_arg: true
    post_action: cd
  - name: gocover
    command: acorn go cover
    default_arg: ./...
"#,
        );

        let expected = r#"# golang

# gonew
gonew() {
    if [ -z "$1" ]; then
        echo "Usage: gonew <arg>" >&2
        return 1
    fi
    local out
    out="$(acorn go new "$@")" || return $?
    printf '%s\n' "$out"
    cd "$(printf '%s\n' "$out" | tail -n 1)" || return $?
}

# gocover
gocover() {
    acorn go cover "${1:-./...}" "${@:2}"
}
"#;

        assert_eq!(generator("darwin").generate(&config), expected);
    }

    #[test]
    fn test_shell_functions_are_indented() {
        let config = component(
            "name: node\nshell_functions:\n  nclean: |\n    rm -rf node_modules\n\n    npm install\n",
        );

        assert_eq!(
            generator("darwin").generate(&config),
            "# node\n\n# nclean\nnclean() {\n    rm -rf node_modules\n\n    npm install\n}\n"
        );
    }

    #[test]
    fn test_component_without_integration_is_banner_only() {
        let config = component("name: empty\ndescription: Nothing\n");

        assert_eq!(generator("linux").generate(&config), "# empty: Nothing\n");
    }
}
