use std::sync::LazyLock;

use regex::Regex;

use crate::{
    commands::CommandRunner,
    configfile::WriterRegistry,
    installer::resolver::parse_requirement,
    validation::{ValidationErrorCategory, ValidationIssue, ValidationIssues},
};

use super::{ComponentConfig, MethodType, SyncMode, ToolInstall};

#[allow(clippy::expect_used)]
static ENV_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid env name regex"));

#[allow(clippy::expect_used)]
static PLATFORM_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(darwin|linux|windows)(/[a-z0-9][a-z0-9._-]*)?$")
        .expect("valid platform key regex")
});

/// Results of a component validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub(crate) component_name: String,

    pub(crate) issues: ValidationIssues,
}

impl ValidationResult {
    #[must_use]
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    #[must_use]
    pub fn issues(&self) -> &ValidationIssues {
        &self.issues
    }

    /// `true` when there are no errors; warnings are fine.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.issues.has_errors()
    }
}

impl ComponentConfig {
    /// Check the definition itself and whether the tools it requires are
    /// present on this machine.
    pub async fn validate<R: CommandRunner>(
        &self,
        registry: &WriterRegistry,
        runner: &R,
    ) -> ValidationResult {
        let mut issues = self.validate_definition(registry);
        issues.extend(self.validate_requirements(runner).await);

        ValidationResult {
            component_name: self.name.clone(),
            issues,
        }
    }

    /// Everything that can be checked without running commands.
    #[must_use]
    pub fn validate_definition(&self, registry: &WriterRegistry) -> ValidationIssues {
        let mut issues = ValidationIssues::default();

        issues.extend(self.validate_metadata());
        issues.extend(self.validate_env());
        for (i, tool) in self.install.tools.iter().enumerate() {
            issues.extend(validate_tool(i, tool));
        }
        issues.extend(self.validate_files(registry));
        issues.extend(self.validate_sync_files());

        issues
    }

    fn validate_metadata(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(ValidationIssue::error(
                ValidationErrorCategory::RequiredField,
                "name",
                "Component name is required",
                Some("Add `name: <component>` to the config"),
            ));
        }
        if self.description.trim().is_empty() {
            issues.push(ValidationIssue::warning(
                ValidationErrorCategory::RequiredField,
                "description",
                "No description",
                Some("Add a one-line `description`"),
            ));
        }
        if self.version.as_deref().is_none_or(str::is_empty) {
            issues.push(ValidationIssue::warning(
                ValidationErrorCategory::RequiredField,
                "version",
                "No version specified",
                Some("Add `version: 1.0.0`"),
            ));
        }

        issues
    }

    fn validate_env(&self) -> Vec<ValidationIssue> {
        self.env
            .keys()
            .filter(|name| !ENV_NAME.is_match(name))
            .map(|name| {
                ValidationIssue::error(
                    ValidationErrorCategory::InvalidValue,
                    format!("env.{name}"),
                    format!("`{name}` is not a valid environment variable name"),
                    Some("Use letters, digits and underscores, not starting with a digit"),
                )
            })
            .collect()
    }

    fn validate_files(&self, registry: &WriterRegistry) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (i, file) in self.files.iter().enumerate() {
            if file.target.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    ValidationErrorCategory::RequiredField,
                    format!("files[{i}].target"),
                    "File target is required",
                    None,
                ));
            }
            if !registry.contains(&file.format) {
                let available = registry.formats().collect::<Vec<_>>().join(", ");
                issues.push(ValidationIssue::error(
                    ValidationErrorCategory::InvalidValue,
                    format!("files[{i}].format"),
                    format!("Unknown format `{}`", file.format),
                    Some(&format!("Use one of: {available}")),
                ));
            }
        }

        issues
    }

    fn validate_sync_files(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (i, sync) in self.sync_files.iter().enumerate() {
            for (field, value) in [("source", &sync.source), ("target", &sync.target)] {
                if value.trim().is_empty() {
                    issues.push(ValidationIssue::error(
                        ValidationErrorCategory::RequiredField,
                        format!("sync_files[{i}].{field}"),
                        format!("Sync {field} is required"),
                        None,
                    ));
                }
            }
            if let SyncMode::Other(mode) = &sync.mode {
                issues.push(ValidationIssue::error(
                    ValidationErrorCategory::InvalidValue,
                    format!("sync_files[{i}].mode"),
                    format!("Unknown sync mode `{mode}`"),
                    Some("Use one of: symlink, copy, merge"),
                ));
            }
        }

        issues
    }

    async fn validate_requirements<R: CommandRunner>(&self, runner: &R) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (i, tool) in self.install.tools.iter().enumerate() {
            for requirement in &tool.requires {
                let (component, command) = parse_requirement(requirement);
                if runner.is_command_available(command).await {
                    continue;
                }

                let message = match component {
                    Some(component) => format!(
                        "`{command}` is not installed; it will be installed from component `{component}`"
                    ),
                    None => format!("`{command}` is not installed"),
                };
                issues.push(ValidationIssue::warning(
                    ValidationErrorCategory::Availability,
                    format!("install.tools[{i}].requires"),
                    message,
                    component
                        .is_none()
                        .then_some("Use `component:command` so acorn can install it"),
                ));
            }
        }

        issues
    }
}

fn validate_tool(index: usize, tool: &ToolInstall) -> Vec<ValidationIssue> {
    let field = format!("install.tools[{index}]");
    let mut issues = Vec::new();

    if tool.name.trim().is_empty() {
        issues.push(ValidationIssue::error(
            ValidationErrorCategory::RequiredField,
            format!("{field}.name"),
            "Tool name is required",
            None,
        ));
    }
    if tool.check.trim().is_empty() {
        issues.push(ValidationIssue::warning(
            ValidationErrorCategory::RequiredField,
            format!("{field}.check"),
            format!("Tool `{}` has no check command", tool.name),
            Some("Add e.g. `check: command -v <tool>` so installs can be skipped"),
        ));
    }
    if tool.methods.is_empty() {
        issues.push(ValidationIssue::warning(
            ValidationErrorCategory::InstallMethod,
            format!("{field}.methods"),
            format!("Tool `{}` has no install methods", tool.name),
            None,
        ));
    }

    for (key, method) in &tool.methods {
        let method_field = format!("{field}.methods.{key}");

        if !PLATFORM_KEY.is_match(key) {
            issues.push(ValidationIssue::warning(
                ValidationErrorCategory::Platform,
                method_field.clone(),
                format!("`{key}` is not a recognized platform key"),
                Some("Use darwin, linux, windows or <os>/<distro>, e.g. linux/debian"),
            ));
        }

        match &method.method_type {
            MethodType::Other(other) => issues.push(ValidationIssue::error(
                ValidationErrorCategory::InstallMethod,
                format!("{method_field}.type"),
                format!("Unsupported install method `{other}`"),
                Some("Use one of: brew, apt, dnf, pacman, npm, pip, cargo, go, curl"),
            )),
            MethodType::Go if method.package.as_deref().is_none_or(str::is_empty) => {
                issues.push(ValidationIssue::error(
                    ValidationErrorCategory::RequiredField,
                    format!("{method_field}.package"),
                    "go install requires a package path",
                    Some("e.g. `package: golang.org/x/tools/gopls@latest`"),
                ));
            }
            MethodType::Curl => match method.url.as_deref().filter(|u| !u.is_empty()) {
                None => issues.push(ValidationIssue::error(
                    ValidationErrorCategory::RequiredField,
                    format!("{method_field}.url"),
                    "curl install requires a url",
                    None,
                )),
                Some(url) => {
                    if let Err(e) = url::Url::parse(url) {
                        issues.push(ValidationIssue::error(
                            ValidationErrorCategory::UrlFormat,
                            format!("{method_field}.url"),
                            format!("`{url}` is not a valid URL: {e}"),
                            None,
                        ));
                    }
                }
            },
            _ => {}
        }
    }

    issues
}
