use core::fmt;

/// A single validation issue (error or warning)
///
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub(crate) category: ValidationErrorCategory,

    /// The field or context where the issue was found, e.g.
    /// `install.tools[0].methods.darwin`
    ///
    pub(crate) field: String,

    pub(crate) message: String,

    pub(crate) level: ValidationLevel,

    pub(crate) suggestion: Option<String>,
}

impl ValidationIssue {
    pub(crate) fn error(
        category: ValidationErrorCategory,
        field: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) -> Self {
        Self {
            category,
            field: field.into(),
            message: message.into(),
            level: ValidationLevel::Error,
            suggestion: suggestion.map(ToString::to_string),
        }
    }

    pub(crate) fn warning(
        category: ValidationErrorCategory,
        field: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) -> Self {
        Self {
            category,
            field: field.into(),
            message: message.into(),
            level: ValidationLevel::Warning,
            suggestion: suggestion.map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn category(&self) -> ValidationErrorCategory {
        self.category
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn level(&self) -> ValidationLevel {
        self.level
    }

    #[must_use]
    pub fn suggestion(&self) -> Option<&String> {
        self.suggestion.as_ref()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == ValidationLevel::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.field, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Error,
    Warning,
}

/// Categories of validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCategory {
    /// Missing required fields
    ///
    RequiredField,

    /// Invalid field values
    ///
    InvalidValue,

    /// Platform keys and OS conditions
    ///
    Platform,

    /// Install method configuration
    ///
    InstallMethod,

    /// URL format errors
    ///
    UrlFormat,

    /// File system errors
    ///
    FileSystem,

    /// Tools that are required but not present on this machine
    ///
    Availability,
}

impl fmt::Display for ValidationErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequiredField => f.write_str("required_field"),
            Self::InvalidValue => f.write_str("invalid_value"),
            Self::Platform => f.write_str("platform"),
            Self::InstallMethod => f.write_str("install_method"),
            Self::UrlFormat => f.write_str("url_format"),
            Self::FileSystem => f.write_str("file_system"),
            Self::Availability => f.write_str("availability"),
        }
    }
}

/// An ordered collection of [`ValidationIssue`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationIssues(Vec<ValidationIssue>);

impl ValidationIssues {
    pub(crate) fn push(&mut self, issue: ValidationIssue) {
        self.0.push(issue);
    }

    #[must_use]
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.0.iter().filter(|i| i.is_error()).collect()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.0.iter().filter(|i| !i.is_error()).collect()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(ValidationIssue::is_error)
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.0.iter().any(|i| !i.is_error())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.0.iter()
    }
}

impl From<Vec<ValidationIssue>> for ValidationIssues {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        Self(issues)
    }
}

impl Extend<ValidationIssue> for ValidationIssues {
    fn extend<T: IntoIterator<Item = ValidationIssue>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
