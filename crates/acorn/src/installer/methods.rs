//! Shell commands for each install method.

use crate::{
    commands::quote,
    component::{InstallMethod, MethodType},
};

use super::ToolError;

/// A ready-to-run install command and the program it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Must be on `PATH` for `command` to work.
    pub program: &'static str,

    pub command: String,
}

/// The program a method shells out to. `None` for unsupported methods.
#[must_use]
pub fn required_program(method_type: &MethodType) -> Option<&'static str> {
    match method_type {
        MethodType::Brew => Some("brew"),
        MethodType::Apt => Some("apt"),
        MethodType::Dnf => Some("dnf"),
        MethodType::Pacman => Some("pacman"),
        MethodType::Npm => Some("npm"),
        MethodType::Pip => Some("pip"),
        MethodType::Cargo => Some("cargo"),
        MethodType::Go => Some("go"),
        MethodType::Curl => Some("curl"),
        MethodType::Other(_) => None,
    }
}

/// Build the command that installs `tool` with `method`.
///
/// # Errors
///
/// Returns [`ToolError::UnsupportedMethod`] for unknown method types, and
/// [`ToolError::MissingPackage`] / [`ToolError::MissingUrl`] when `go` or
/// `curl` lack the field they need.
pub fn install_command(tool: &str, method: &InstallMethod) -> Result<InstallCommand, ToolError> {
    let program = required_program(&method.method_type)
        .ok_or_else(|| ToolError::UnsupportedMethod(method.method_type.to_string()))?;
    let package = method
        .package
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(tool);

    let prefix = match &method.method_type {
        MethodType::Brew => "brew install".to_string(),
        MethodType::Apt => "sudo apt install -y".to_string(),
        MethodType::Dnf => "sudo dnf install -y".to_string(),
        MethodType::Pacman => "sudo pacman -S --noconfirm".to_string(),
        MethodType::Npm if method.global => "npm install -g".to_string(),
        MethodType::Npm => "npm install".to_string(),
        MethodType::Pip => "pip install".to_string(),
        MethodType::Cargo => "cargo install".to_string(),
        MethodType::Go => {
            let package = method
                .package
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ToolError::MissingPackage {
                    tool: tool.to_string(),
                })?;
            return Ok(InstallCommand {
                program,
                command: with_args(format!("go install {}", quote(package)), &method.args),
            });
        }
        MethodType::Curl => {
            let url = method
                .url
                .as_deref()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| ToolError::MissingUrl {
                    tool: tool.to_string(),
                })?;
            return Ok(InstallCommand {
                program,
                command: format!("curl -fsSL {} | sh", quote(url)),
            });
        }
        MethodType::Other(other) => return Err(ToolError::UnsupportedMethod(other.clone())),
    };

    Ok(InstallCommand {
        program,
        command: with_args(format!("{prefix} {}", quote(package)), &method.args),
    })
}

fn with_args(mut command: String, args: &[String]) -> String {
    for arg in args {
        command.push(' ');
        command.push_str(&quote(arg));
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn method(method_type: &str) -> InstallMethod {
        InstallMethod {
            method_type: MethodType::from(method_type),
            ..Default::default()
        }
    }

    #[test]
    fn test_package_defaults_to_tool_name() {
        let cases = [
            ("brew", "brew install jq"),
            ("apt", "sudo apt install -y jq"),
            ("dnf", "sudo dnf install -y jq"),
            ("pacman", "sudo pacman -S --noconfirm jq"),
            ("npm", "npm install jq"),
            ("pip", "pip install jq"),
            ("cargo", "cargo install jq"),
        ];

        for (method_type, expected) in cases {
            let cmd = install_command("jq", &method(method_type)).unwrap();
            assert_eq!(cmd.command, expected, "{method_type}");
            assert_eq!(Some(cmd.program), required_program(&method(method_type).method_type));
        }
    }

    #[test]
    fn test_package_and_args_are_quoted() {
        let method = InstallMethod {
            method_type: MethodType::Brew,
            package: Some("ghostty".to_string()),
            args: vec!["--cask".to_string(), "has space".to_string()],
            ..Default::default()
        };

        let cmd = install_command("ghostty", &method).unwrap();

        assert_eq!(cmd.command, "brew install ghostty --cask 'has space'");
    }

    #[test]
    fn test_npm_global() {
        let method = InstallMethod {
            method_type: MethodType::Npm,
            package: Some("wrangler".to_string()),
            global: true,
            ..Default::default()
        };

        assert_eq!(
            install_command("wrangler", &method).unwrap().command,
            "npm install -g wrangler"
        );
    }

    #[test]
    fn test_go_requires_package() {
        let err = install_command("gopls", &method("go")).unwrap_err();
        assert!(matches!(err, ToolError::MissingPackage { .. }));

        let with_package = InstallMethod {
            package: Some("golang.org/x/tools/gopls@latest".to_string()),
            ..method("go")
        };
        assert_eq!(
            install_command("gopls", &with_package).unwrap().command,
            "go install golang.org/x/tools/gopls@latest"
        );
    }

    #[test]
    fn test_curl_pipes_to_sh() {
        assert!(matches!(
            install_command("rustup", &method("curl")).unwrap_err(),
            ToolError::MissingUrl { .. }
        ));

        let with_url = InstallMethod {
            url: Some("https://sh.rustup.rs".to_string()),
            ..method("curl")
        };
        let cmd = install_command("rustup", &with_url).unwrap();

        assert_eq!(cmd.program, "curl");
        assert_eq!(cmd.command, "curl -fsSL https://sh.rustup.rs | sh");
    }

    #[test]
    fn test_unsupported_method() {
        let err = install_command("x", &method("snap")).unwrap_err();

        assert_eq!(err.to_string(), "unknown install method: snap");
        assert_eq!(required_program(&MethodType::from("snap")), None);
    }
}
