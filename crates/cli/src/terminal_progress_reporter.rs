//! Terminal output formatting
//!
//! Every user-facing line acorn prints goes through
//! [`TerminalProgressReporter`], so a component's install steps, validation
//! results and sync actions get the same prefix and color everywhere.
//!
//! - Prefixes fall back to plain text (`[E]`, `[W]`, ...) on terminals
//!   without Unicode support.
//! - `--no-color` turns styling off; suggestions then read
//!   `Suggestion: ...` so they still stand out.
//! - Errors go to stderr, everything else to stdout.
//!
//! # Examples
//!
//! ```rust,ignore
//! let reporter = TerminalProgressReporter::new(config.use_colors());
//! reporter.report_progress("git (1/2)");
//! reporter.report_success("Installed git");
//! reporter.report_suggestion("Run 'acorn shell git' to load aliases");
//! ```

use std::fmt::Display;

use console::{Emoji, style};

static ERROR_EMOJI: Emoji<'_, '_> = Emoji("❌ ", "[E] ");
static INFO_EMOJI: Emoji<'_, '_> = Emoji("ℹ️ ", "[I] ");
static PROGRESS_EMOJI: Emoji<'_, '_> = Emoji("• ", " • ");
static SUGGESTION_EMOJI: Emoji<'_, '_> = Emoji("✨", "[S] ");
static SUCCESS_EMOJI: Emoji<'_, '_> = Emoji("✅ ", "OK ");
static WARN_EMOJI: Emoji<'_, '_> = Emoji("⚠️ ", "[W] ");

/// Kinds of status line, each with its own prefix and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MessageType {
    /// A failed install step, invalid component or unreadable file
    Error,
    /// Platform details and other context around a result
    Info,
    /// A tool or file being worked on
    Progress,
    /// A tool installed, a file written or synced
    Success,
    /// What the user can run next
    Suggestion,
    /// Validation warnings and skipped work
    Warning,
}

/// Prints prefixed, optionally colored status lines.
///
/// The reporter is `Copy`, so command handlers take it by value and hand it
/// on to tables and the event processor.
#[derive(Debug, Clone, Copy)]
pub struct TerminalProgressReporter {
    /// Off with `--no-color` or `use_colors: false` in `config.yaml`
    use_colors: bool,
}

impl TerminalProgressReporter {
    /// A reporter that styles its output when `use_colors` is set.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Whether output is styled. Formatters outside the reporter use this to
    /// match it.
    #[must_use]
    pub fn use_colors(self) -> bool {
        self.use_colors
    }

    /// A status line with the prefix and color for `message_type`.
    pub(crate) fn status_line(self, message_type: MessageType, message: impl Display) -> String {
        let prefix = match message_type {
            MessageType::Error => ERROR_EMOJI,
            MessageType::Info => INFO_EMOJI,
            MessageType::Progress => PROGRESS_EMOJI,
            MessageType::Success => SUCCESS_EMOJI,
            MessageType::Suggestion => SUGGESTION_EMOJI,
            MessageType::Warning => WARN_EMOJI,
        };

        let formatted_message = if self.use_colors {
            match message_type {
                MessageType::Error => style(message).for_stderr().red().bold().to_string(),
                MessageType::Info => style(message).blue().to_string(),
                MessageType::Progress => style(message).dim().to_string(),
                MessageType::Success => style(message).green().to_string(),
                MessageType::Suggestion => {
                    return format!(
                        "{prefix} {}: {}",
                        style("Suggestion").yellow().bold(),
                        &message
                    );
                }
                MessageType::Warning => style(message).for_stderr().yellow().bold().to_string(),
            }
        } else if message_type == MessageType::Suggestion {
            format!("Suggestion: {message}")
        } else {
            message.to_string()
        };

        format!("{prefix}{formatted_message}")
    }

    /// `message` indented by `indent` spaces.
    pub(crate) fn format(indent: usize, message: impl Display) -> String {
        format!("{:indent$}{}", "", message, indent = indent)
    }

    /// Red and bold when colored.
    pub(crate) fn format_error(self, message: impl Display) -> String {
        self.status_line(MessageType::Error, message)
    }

    pub(crate) fn format_info(self, message: impl Display) -> String {
        self.status_line(MessageType::Info, message)
    }

    /// Dimmed when colored; used for per-tool step lines.
    pub(crate) fn format_progress(self, message: impl Display) -> String {
        self.status_line(MessageType::Progress, message)
    }

    /// A `Suggestion:` label followed by the message.
    pub(crate) fn format_suggestion(self, message: impl Display) -> String {
        self.status_line(MessageType::Suggestion, message)
    }

    pub(crate) fn format_success(self, message: impl Display) -> String {
        self.status_line(MessageType::Success, message)
    }

    pub(crate) fn format_warning(self, message: impl Display) -> String {
        self.status_line(MessageType::Warning, message)
    }

    /// Print an unstyled, indented line to stdout.
    pub(crate) fn report(indent: usize, message: impl Display) {
        println!("{}", Self::format(indent, message));
    }

    /// Print a step line, such as `node (2/3)`, to stdout.
    pub(crate) fn report_progress(self, message: impl Display) {
        println!("{}", self.format_progress(message));
    }

    pub(crate) fn report_success(self, message: impl Display) {
        println!("{}", self.format_success(message));
    }

    pub(crate) fn report_suggestion(self, message: impl Display) {
        println!("{}", self.format_suggestion(message));
    }

    pub(crate) fn report_info(self, message: impl Display) {
        println!("{}", self.format_info(message));
    }

    /// Warnings go to stdout: they never mean the command failed.
    pub(crate) fn report_warning(self, message: impl Display) {
        println!("{}", self.format_warning(message));
    }

    /// Errors go to stderr so they survive `acorn shell node > init.sh`.
    pub(crate) fn report_error(self, message: impl Display) {
        eprintln!("{}", self.format_error(message));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_terminal_reporter_formatting() {
        let reporter = TerminalProgressReporter::new(true);

        let success_msg = reporter.format_success("Component installed");
        let error_msg = reporter.format_error("Install failed");
        let info_msg = reporter.format_info("Platform: linux amd64");

        assert!(success_msg.contains("Component installed"));
        assert!(error_msg.contains("Install failed"));
        assert!(info_msg.contains("Platform: linux amd64"));

        assert!(success_msg.contains("✅") || success_msg.contains("OK"));
        assert!(error_msg.contains("❌") || error_msg.contains("[E]"));
        assert!(info_msg.contains("ℹ️") || info_msg.contains("[I]"));
    }

    #[test]
    fn test_terminal_reporter_without_colors() {
        let reporter = TerminalProgressReporter::new(false);

        assert!(!reporter.format_success("done").contains("\x1b["));
        assert!(reporter.format_suggestion("run it").contains("Suggestion: run it"));
    }

    #[test]
    fn test_format_indents() {
        assert_eq!(TerminalProgressReporter::format(4, "x"), "    x");
    }
}
