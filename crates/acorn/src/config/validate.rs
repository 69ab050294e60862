use std::path::{Path, PathBuf};

use crate::{
    fs::FileSystem,
    validation::{ValidationErrorCategory, ValidationIssue, ValidationIssues},
};

use super::AppConfig;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// The config file the validated values came from, if any
    ///
    pub(crate) config_file_path: Option<PathBuf>,

    pub(crate) issues: ValidationIssues,
}

impl ValidationResult {
    #[must_use]
    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    #[must_use]
    pub fn issues(&self) -> &ValidationIssues {
        &self.issues
    }
}

impl AppConfig {
    /// Full validation for the `AppConfig`
    ///
    #[must_use]
    pub fn validate<F: FileSystem>(&self, fs: &F) -> ValidationResult {
        let mut issues = ValidationIssues::default();

        issues.extend(validate_dotfiles_root(&self.dotfiles_root));
        issues.extend(validate_non_empty("editor", &self.editor, "editor: nvim"));
        issues.extend(validate_non_empty("shell", &self.shell, "shell: /bin/zsh"));

        if let Some(dir) = &self.generated_dir {
            if !dir.is_absolute() {
                issues.push(ValidationIssue::error(
                    ValidationErrorCategory::InvalidValue,
                    "generated_dir",
                    format!("`{}` is not an absolute path", dir.display()),
                    Some("Use an absolute path, e.g. `~/.config/dotfiles/generated`"),
                ));
            }
        }

        if fs.path_exists(&self.override_directory) && !fs.is_dir(&self.override_directory) {
            issues.push(ValidationIssue::error(
                ValidationErrorCategory::FileSystem,
                "override_directory",
                format!(
                    "`{}` exists but is not a directory",
                    self.override_directory.display()
                ),
                Some("Point `override_directory` at a directory"),
            ));
        }

        if !fs.path_exists(&self.dotfiles_root) {
            issues.push(ValidationIssue::warning(
                ValidationErrorCategory::FileSystem,
                "dotfiles_root",
                format!("`{}` does not exist", self.dotfiles_root.display()),
                Some("Clone your dotfiles there or set `dotfiles_root`"),
            ));
        }

        ValidationResult {
            config_file_path: self.config_file_path.clone(),
            issues,
        }
    }
}

fn validate_non_empty(field: &str, value: &str, example: &str) -> Option<ValidationIssue> {
    value.trim().is_empty().then(|| {
        ValidationIssue::error(
            ValidationErrorCategory::RequiredField,
            field,
            format!("The `{field}` field exists, but has no value"),
            Some(&format!("Set a value for `{field}`. Ex. `{example}`")),
        )
    })
}

fn validate_dotfiles_root(dotfiles_root: &Path) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if dotfiles_root.as_os_str().is_empty() {
        issues.push(ValidationIssue::error(
            ValidationErrorCategory::RequiredField,
            "dotfiles_root",
            "The `dotfiles_root` field exists, but has no value",
            Some("Set a value for `dotfiles_root`. Ex. `dotfiles_root: ~/.config/dotfiles`"),
        ));
        return issues;
    }

    let raw = dotfiles_root.to_string_lossy();
    let expanded = shellexpand::tilde(&raw);

    if !Path::new(expanded.as_ref()).is_absolute() {
        issues.push(ValidationIssue::error(
            ValidationErrorCategory::InvalidValue,
            "dotfiles_root",
            "The path at `dotfiles_root` is not absolute",
            Some("Provide an absolute path or one starting with `~`"),
        ));
    }

    issues
}
