use std::{fmt, time::Duration};

use crate::{
    component::{InstallMethod, PostInstall},
    platform::Platform,
};

use super::ToolError;

/// Why a tool is in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanReason {
    /// Listed in the component being installed
    Direct,

    /// Needed by a direct tool, pulled in from another component
    Prerequisite,
}

impl fmt::Display for PlanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Prerequisite => f.write_str("prerequisite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTool {
    pub name: String,

    pub description: String,

    /// The platform key the method was selected by, e.g. `linux/debian`.
    pub method_key: Option<String>,

    /// `None` only when the tool is already installed and has no method for
    /// this platform.
    pub method: Option<InstallMethod>,

    pub already_installed: bool,

    /// First line of the check command's output.
    pub version: Option<String>,

    pub reason: PlanReason,

    pub post_install: Option<PostInstall>,
}

/// What installing a component would do, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallPlan {
    pub component: String,

    pub platform: Platform,

    /// Installed before `tools`, in dependency order.
    pub prerequisites: Vec<PlannedTool>,

    pub tools: Vec<PlannedTool>,

    pub dry_run: bool,
}

impl InstallPlan {
    #[must_use]
    pub fn total_tools(&self) -> usize {
        self.prerequisites.len() + self.tools.len()
    }

    /// Prerequisites then direct tools.
    pub fn all_tools(&self) -> impl Iterator<Item = &PlannedTool> {
        self.prerequisites.iter().chain(&self.tools)
    }

    /// Tools that are not installed yet.
    #[must_use]
    pub fn pending_tools(&self) -> Vec<&PlannedTool> {
        self.all_tools().filter(|t| !t.already_installed).collect()
    }
}

/// Outcome for one tool.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub(crate) name: String,
    pub(crate) success: bool,
    pub(crate) skipped: bool,
    pub(crate) skip_reason: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) error: Option<ToolError>,
    pub(crate) duration: Duration,
}

impl ToolResult {
    pub(crate) fn installed(name: &str, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            skipped: false,
            skip_reason: None,
            version: None,
            error: None,
            duration,
        }
    }

    /// Skips are successes unless something earlier failed.
    pub(crate) fn skipped(name: &str, reason: &str, success: bool) -> Self {
        Self {
            name: name.to_string(),
            success,
            skipped: true,
            skip_reason: Some(reason.to_string()),
            version: None,
            error: None,
            duration: Duration::ZERO,
        }
    }

    pub(crate) fn failed(name: &str, error: ToolError, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            skipped: false,
            skip_reason: None,
            version: None,
            error: Some(error),
            duration,
        }
    }

    #[must_use]
    pub(crate) fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.success && !self.skipped
    }

    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[derive(Debug, Clone)]
pub struct InstallResult {
    pub(crate) component: String,
    pub(crate) success: bool,
    pub(crate) tools: Vec<ToolResult>,
    pub(crate) duration: Duration,
    pub(crate) dry_run: bool,
}

impl InstallResult {
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// `false` if any tool failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolResult] {
        &self.tools
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// `(installed, skipped, failed)`
    #[must_use]
    pub fn summary(&self) -> (usize, usize, usize) {
        self.tools
            .iter()
            .fold((0, 0, 0), |(installed, skipped, failed), t| {
                if t.skipped {
                    (installed, skipped + 1, failed)
                } else if t.success {
                    (installed + 1, skipped, failed)
                } else {
                    (installed, skipped, failed + 1)
                }
            })
    }
}
