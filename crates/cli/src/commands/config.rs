use acorn::{config::AppConfig, fs::RealFileSystem};
use tracing::info;

use crate::{tables::ValidationTableReporter, terminal_progress_reporter::TerminalProgressReporter};

pub(crate) fn handle_validate(original_config: &AppConfig, reporter: TerminalProgressReporter) -> i32 {
    info!("Validating configuration");

    let result = original_config.validate(&RealFileSystem);
    let issues = result.issues();

    if let Some(path) = result.config_file_path() {
        reporter.report_info(format!("Config file: {}", path.display()));
    }

    if issues.has_errors() {
        reporter.report_error("Validation failed.");

        ValidationTableReporter::from_issues(issues, reporter).print();
        1
    } else if issues.has_warnings() {
        ValidationTableReporter::from_issues(issues, reporter).print();
        0
    } else {
        reporter.report_success("Configuration is valid.");

        0
    }
}
