//! Platform detection
//!
//! Install methods in a component are keyed by platform: `darwin`, `linux`,
//! or `linux/<distro-or-family>`. [`Platform`] knows the current OS, CPU,
//! Linux distribution and package manager, and picks the most specific key a
//! tool provides.

use std::{collections::BTreeMap, fmt, path::Path};

use serde::Serialize;
use thiserror::Error;

use crate::{
    commands::CommandRunner,
    component::InstallMethod,
    fs::{FileSystem, FileSystemError},
};

const OS_RELEASE: &str = "/etc/os-release";

/// Checked in order; the first one on `PATH` wins.
const LINUX_PACKAGE_MANAGERS: [&str; 6] = ["apt", "dnf", "yum", "pacman", "zypper", "brew"];

/// The machine acorn is running on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    /// `darwin`, `linux` or `windows`
    pub(crate) os: String,

    /// `amd64`, `arm64`, ...
    pub(crate) arch: String,

    /// `ID` from `/etc/os-release` (linux only)
    pub(crate) distro: Option<String>,

    /// First word of `ID_LIKE`, or derived from the distro
    pub(crate) distro_family: Option<String>,

    pub(crate) package_manager: Option<String>,
}

impl Platform {
    /// A platform with no distro or package manager.
    #[must_use]
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
            distro: None,
            distro_family: None,
            package_manager: None,
        }
    }

    #[must_use]
    pub fn with_distro(mut self, distro: &str, family: Option<&str>) -> Self {
        self.distro = Some(distro.to_string());
        self.distro_family = family.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn with_package_manager(mut self, package_manager: &str) -> Self {
        self.package_manager = Some(package_manager.to_string());
        self
    }

    /// Detect the current platform.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::OsRelease`] if `/etc/os-release` exists but
    /// cannot be read.
    pub async fn detect<F, R>(fs: &F, runner: &R) -> Result<Self, PlatformError>
    where
        F: FileSystem,
        R: CommandRunner,
    {
        let mut platform = Self::new(
            normalize_os(std::env::consts::OS),
            normalize_arch(std::env::consts::ARCH),
        );

        match platform.os.as_str() {
            "darwin" => platform.package_manager = Some("brew".to_string()),
            "windows" => platform.package_manager = Some("winget".to_string()),
            "linux" => {
                let os_release = Path::new(OS_RELEASE);
                if fs.path_exists(os_release) {
                    let content = fs
                        .read_file(os_release)
                        .map_err(|source| PlatformError::OsRelease { source })?;
                    let (distro, family) = parse_os_release(&content);
                    platform.distro = distro;
                    platform.distro_family = family;
                }

                for manager in LINUX_PACKAGE_MANAGERS {
                    if command_exists(runner, manager).await {
                        platform.package_manager = Some(manager.to_string());
                        break;
                    }
                }
            }
            _ => {}
        }

        tracing::debug!(%platform, "detected platform");

        Ok(platform)
    }

    #[must_use]
    pub fn os(&self) -> &str {
        &self.os
    }

    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    #[must_use]
    pub fn distro(&self) -> Option<&str> {
        self.distro.as_deref()
    }

    #[must_use]
    pub fn distro_family(&self) -> Option<&str> {
        self.distro_family.as_deref()
    }

    #[must_use]
    pub fn package_manager(&self) -> Option<&str> {
        self.package_manager.as_deref()
    }

    /// Install-method keys to try, most specific first: `os/distro`,
    /// `os/family` (when different), `os`.
    #[must_use]
    pub fn method_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(3);

        if let Some(distro) = &self.distro {
            keys.push(format!("{}/{distro}", self.os));
        }
        if let Some(family) = &self.distro_family {
            if self.distro.as_ref() != Some(family) {
                keys.push(format!("{}/{family}", self.os));
            }
        }
        keys.push(self.os.clone());

        keys
    }

    /// The method for the most specific key present in `methods`.
    #[must_use]
    pub fn select_method<'a>(
        &self,
        methods: &'a BTreeMap<String, InstallMethod>,
    ) -> Option<(&'a str, &'a InstallMethod)> {
        self.method_keys().iter().find_map(|key| {
            methods
                .get_key_value(key)
                .map(|(key, method)| (key.as_str(), method))
        })
    }

    /// `true` when `pm` is the detected package manager.
    #[must_use]
    pub fn supports_package_manager(&self, pm: &str) -> bool {
        self.package_manager.as_deref() == Some(pm)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.os)?;
        if let Some(distro) = &self.distro {
            write!(f, " {distro}")?;
        }
        write!(f, " {}", self.arch)?;
        if let Some(pm) = &self.package_manager {
            write!(f, " ({pm})")?;
        }
        Ok(())
    }
}

/// `true` when `command` is on `PATH`.
pub async fn command_exists<R: CommandRunner>(runner: &R, command: &str) -> bool {
    runner.is_command_available(command).await
}

/// `(ID, family)` from `/etc/os-release` content. The family is the first
/// word of `ID_LIKE`, falling back to a table of well-known distros.
#[must_use]
pub fn parse_os_release(content: &str) -> (Option<String>, Option<String>) {
    let mut distro = None;
    let mut family = None;

    for line in content.lines().map(str::trim) {
        if let Some(id) = line.strip_prefix("ID=") {
            distro = Some(unquote(id).to_string()).filter(|s| !s.is_empty());
        } else if let Some(like) = line.strip_prefix("ID_LIKE=") {
            family = unquote(like)
                .split_whitespace()
                .next()
                .map(ToString::to_string);
        }
    }

    if family.is_none() {
        family = distro.as_deref().and_then(known_family).map(ToString::to_string);
    }

    (distro, family)
}

fn known_family(distro: &str) -> Option<&'static str> {
    match distro {
        "ubuntu" | "pop" | "mint" | "elementary" => Some("debian"),
        "fedora" | "centos" | "rhel" | "rocky" | "alma" => Some("rhel"),
        "arch" | "manjaro" | "endeavouros" => Some("arch"),
        _ => None,
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

fn normalize_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn normalize_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Failed to read {OS_RELEASE}")]
    OsRelease {
        #[source]
        source: FileSystemError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands::MockCommandRunner, component::MethodType, fs::MockFileSystem};
    use pretty_assertions::assert_eq;

    fn methods(keys: &[&str]) -> BTreeMap<String, InstallMethod> {
        keys.iter()
            .map(|key| {
                (
                    (*key).to_string(),
                    InstallMethod {
                        method_type: MethodType::from(*key),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_parse_os_release_with_id_like() {
        let content = r#"
NAME="Pop!_OS"
ID=pop
ID_LIKE="ubuntu debian"
VERSION_ID="22.04"
"#;

        assert_eq!(
            parse_os_release(content),
            (Some("pop".to_string()), Some("ubuntu".to_string()))
        );
    }

    #[test]
    fn test_parse_os_release_falls_back_to_known_family() {
        assert_eq!(
            parse_os_release("ID=\"fedora\"\nVERSION_ID=40\n"),
            (Some("fedora".to_string()), Some("rhel".to_string()))
        );
        assert_eq!(
            parse_os_release("ID=manjaro\n"),
            (Some("manjaro".to_string()), Some("arch".to_string()))
        );
        assert_eq!(
            parse_os_release("ID=nixos\n"),
            (Some("nixos".to_string()), None)
        );
    }

    #[test]
    fn test_parse_debian_has_no_family() {
        assert_eq!(
            parse_os_release("ID=debian\n"),
            (Some("debian".to_string()), None)
        );
    }

    #[test]
    fn test_method_keys_most_specific_first() {
        let platform = Platform::new("linux", "amd64").with_distro("ubuntu", Some("debian"));

        assert_eq!(platform.method_keys(), ["linux/ubuntu", "linux/debian", "linux"]);
    }

    #[test]
    fn test_method_keys_skip_family_equal_to_distro() {
        let platform = Platform::new("linux", "amd64").with_distro("arch", Some("arch"));

        assert_eq!(platform.method_keys(), ["linux/arch", "linux"]);
        assert_eq!(Platform::new("darwin", "arm64").method_keys(), ["darwin"]);
    }

    #[test]
    fn test_select_method_prefers_specific_key() {
        let platform = Platform::new("linux", "amd64").with_distro("ubuntu", Some("debian"));

        let available = methods(&["linux", "linux/debian", "darwin"]);
        let (key, _) = platform.select_method(&available).unwrap();
        assert_eq!(key, "linux/debian");

        let darwin_only = methods(&["darwin"]);
        assert!(platform.select_method(&darwin_only).is_none());
    }

    #[test]
    fn test_display() {
        let platform = Platform::new("linux", "amd64")
            .with_distro("ubuntu", Some("debian"))
            .with_package_manager("apt");

        assert_eq!(platform.to_string(), "linux ubuntu amd64 (apt)");
        assert_eq!(Platform::new("darwin", "arm64").to_string(), "darwin arm64");
        assert!(platform.supports_package_manager("apt"));
        assert!(!platform.supports_package_manager("dnf"));
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_os("macos"), "darwin");
        assert_eq!(normalize_arch("x86_64"), "amd64");
        assert_eq!(normalize_arch("aarch64"), "arm64");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_detect_on_linux_picks_first_available_manager() {
        let mut fs = MockFileSystem::default();
        fs.mock_path_exists(OS_RELEASE, true);
        fs.mock_read_file(OS_RELEASE, "ID=fedora\n");
        let mut runner = MockCommandRunner::new();
        runner
            .expect_is_command_available()
            .returning(|cmd| cmd == "dnf" || cmd == "yum");

        let platform = Platform::detect(&fs, &runner).await.unwrap();

        assert_eq!(platform.os(), "linux");
        assert_eq!(platform.distro(), Some("fedora"));
        assert_eq!(platform.distro_family(), Some("rhel"));
        assert_eq!(platform.package_manager(), Some("dnf"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_detect_without_os_release() {
        let mut fs = MockFileSystem::default();
        fs.mock_path_exists(OS_RELEASE, false);
        let mut runner = MockCommandRunner::new();
        runner.expect_is_command_available().returning(|_| false);

        let platform = Platform::detect(&fs, &runner).await.unwrap();

        assert_eq!(platform.distro(), None);
        assert_eq!(platform.package_manager(), None);
        assert!(!platform.supports_package_manager("apt"));
        assert_eq!(platform.method_keys(), ["linux"]);
    }
}
