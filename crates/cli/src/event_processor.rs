//! Turns an install [`EventStream`] into terminal output
//!
//! Commands hand the stream to [`EventProcessor::process_events_with_handler`]
//! and may intercept individual events:
//!
//! ```rust,ignore
//! let exit_code = EventProcessor::new(reporter)
//!     .process_events_with_handler(stream, |event, reporter| match event {
//!         InstallEvent::Warning { message, .. } => {
//!             reporter.report_error(message);
//!             Some(false)
//!         }
//!         _ => None,
//!     })
//!     .await;
//! ```
//!
//! The handler returns `Some(true)` to continue after handling an event,
//! `Some(false)` to stop, or `None` for the default handling.

use acorn::{
    commands::OutputChunk,
    installer::{EventStream, InstallEvent, InstallResult, ToolResult},
};
use futures::StreamExt;

use crate::{formatters::format_duration, terminal_progress_reporter::TerminalProgressReporter};

/// Default presentation of install events.
#[derive(Debug)]
pub struct EventProcessor {
    reporter: TerminalProgressReporter,
}

impl EventProcessor {
    pub fn new(reporter: TerminalProgressReporter) -> Self {
        Self { reporter }
    }

    /// Drain `stream`, returning the exit code: 1 if any error was reported
    /// or the final result was a failure.
    pub async fn process_events_with_handler<F>(
        self,
        mut stream: EventStream,
        mut custom_handler: F,
    ) -> i32
    where
        F: FnMut(&InstallEvent, &TerminalProgressReporter) -> Option<bool>,
    {
        let mut exit_code = 0;

        while let Some(event) = stream.next().await {
            if let Some(should_continue) = custom_handler(&event, &self.reporter) {
                if !should_continue {
                    break;
                }
                continue;
            }

            self.handle_event(event, &mut exit_code);
        }

        exit_code
    }

    fn handle_event(&self, event: InstallEvent, exit_code: &mut i32) {
        match event {
            InstallEvent::Started { metadata } => {
                self.reporter
                    .report_info(format!("Installing component '{}'", metadata.component()));
            }

            InstallEvent::Progress { message, .. } => self.reporter.report_progress(message),

            InstallEvent::Output { output, .. } => Self::handle_output(&output),

            InstallEvent::Info { message, .. } => self.reporter.report_info(message),

            InstallEvent::Warning { message, .. } => self.reporter.report_warning(message),

            InstallEvent::Error { message, error, .. } => {
                self.reporter.report_error(format!("{message}: {error}"));
                *exit_code = 1;
            }

            InstallEvent::ToolFinished { result, .. } => self.report_tool(&result),

            InstallEvent::Completed { result, .. } => match result {
                Ok(result) => {
                    if !self.report_summary(&result) {
                        *exit_code = 1;
                    }
                }
                Err(message) => {
                    self.reporter.report_error(message);
                    *exit_code = 1;
                }
            },
        }
    }

    fn handle_output(output: &OutputChunk) {
        match output {
            OutputChunk::Stdout(line) => {
                TerminalProgressReporter::report(4, line.trim_end());
            }
            OutputChunk::Stderr(line) => {
                eprintln!("{}", TerminalProgressReporter::format(4, line.trim_end()));
            }
        }
    }

    fn report_tool(&self, result: &ToolResult) {
        if result.is_skipped() {
            let reason = result.skip_reason().unwrap_or("skipped");
            let line = match result.version() {
                Some(version) => format!("{}: {reason} ({version})", result.name()),
                None => format!("{}: {reason}", result.name()),
            };
            if result.is_success() {
                TerminalProgressReporter::report(2, line);
            } else {
                self.reporter.report_warning(line);
            }
        } else if result.is_success() {
            self.reporter.report_success(format!(
                "{} installed in {}",
                result.name(),
                format_duration(result.duration())
            ));
        }
    }

    /// Print the summary line; `true` when the install succeeded.
    fn report_summary(&self, result: &InstallResult) -> bool {
        let (installed, skipped, failed) = result.summary();
        let summary = format!(
            "{}: {installed} installed, {skipped} skipped, {failed} failed ({})",
            result.component(),
            format_duration(result.duration())
        );

        if result.is_success() {
            if result.is_dry_run() {
                self.reporter.report_success(format!("Dry run {summary}"));
            } else {
                self.reporter.report_success(summary);
            }
            true
        } else {
            self.reporter.report_error(summary);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acorn::{installer::InstallService, platform::Platform};
    use futures::stream;
    use test_common::{TempDir, create_dry_run_install_service, create_test_component_file};

    fn linux() -> Platform {
        Platform::new("linux", "amd64")
    }

    #[tokio::test]
    async fn test_process_empty_stream() {
        let processor = EventProcessor::new(TerminalProgressReporter::new(false));

        let events: Vec<InstallEvent> = vec![];
        let exit_code = processor
            .process_events_with_handler(Box::pin(stream::iter(events)), |_event, _reporter| None)
            .await;

        assert_eq!(exit_code, 0);
    }

    #[tokio::test]
    async fn test_dry_run_install_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        create_test_component_file(&temp_dir);
        let service = create_dry_run_install_service(&temp_dir, linux());
        let processor = EventProcessor::new(TerminalProgressReporter::new(false));

        let mut finished = 0;
        let exit_code = processor
            .process_events_with_handler(service.install("test-tool").await, |event, _| {
                if matches!(event, InstallEvent::ToolFinished { .. }) {
                    finished += 1;
                }
                None
            })
            .await;

        assert_eq!(exit_code, 0);
        assert_eq!(finished, 2);
    }

    #[tokio::test]
    async fn test_unknown_component_fails() {
        let temp_dir = TempDir::new().unwrap();
        let service = create_dry_run_install_service(&temp_dir, linux());
        let processor = EventProcessor::new(TerminalProgressReporter::new(false));

        let exit_code = processor
            .process_events_with_handler(service.install("nonexistent").await, |_, _| None)
            .await;

        assert_eq!(exit_code, 1);
    }

    #[tokio::test]
    async fn test_custom_handler_early_termination() {
        let temp_dir = TempDir::new().unwrap();
        let service = create_dry_run_install_service(&temp_dir, linux());
        let processor = EventProcessor::new(TerminalProgressReporter::new(false));

        let mut events_after_started = 0;
        let exit_code = processor
            .process_events_with_handler(service.install("nonexistent").await, |event, _| {
                if let InstallEvent::Started { .. } = event {
                    Some(false)
                } else {
                    events_after_started += 1;
                    None
                }
            })
            .await;

        assert_eq!(events_after_started, 0);
        assert_eq!(exit_code, 0);
    }
}
