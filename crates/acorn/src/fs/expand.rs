use std::path::Path;

/// Expand `$VAR`, `${VAR:-default}` and then a leading `~` in `input`.
///
/// `lookup` resolves variables. Unset and empty variables are treated alike:
/// `${VAR:-default}` falls back to `default`, and a bare `$VAR` with no
/// value is left in place so the mistake is visible in the output path.
/// Variables expand first, so a default such as `${XDG_CONFIG_HOME:-~/.config}`
/// still gets its `~` resolved.
pub fn expand_with<L>(input: &str, home: Option<&Path>, mut lookup: L) -> String
where
    L: FnMut(&str) -> Option<String>,
{
    let expanded = shellexpand::env_with_context_no_errors(input, |name| {
        lookup(name).filter(|value| !value.is_empty())
    });

    match (&*expanded, home) {
        ("~", Some(home)) => home.display().to_string(),
        (s, Some(home)) if s.starts_with("~/") => format!("{}{}", home.display(), &s[1..]),
        (s, _) => s.to_string(),
    }
}

/// [`expand_with`] against the process environment.
pub fn expand_env(input: &str, home: Option<&Path>) -> String {
    expand_with(input, home, |name| std::env::var(name).ok())
}
