use acorn::validation::{ValidationIssue, ValidationIssues};
use comfy_table::{
    ContentArrangement, Row, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL_CONDENSED,
};

use crate::terminal_progress_reporter::TerminalProgressReporter;

const VALIDATION_HEADER: [&str; 4] = ["Category", "Field", "Message", "Suggestion"];

fn styled_table<const N: usize>(header: [&'static str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Validation issues of a component or of `config.yaml`, errors first.
/// Printed to stderr.
pub(crate) struct ValidationTableReporter {
    table: Table,
}

impl ValidationTableReporter {
    pub(crate) fn from_issues(issues: &ValidationIssues, reporter: TerminalProgressReporter) -> Self {
        let mut table = styled_table(VALIDATION_HEADER);

        for error in issues.errors() {
            table.add_row(issue_row(error, reporter.format_error(error.category())));
        }
        for warning in issues.warnings() {
            table.add_row(issue_row(warning, reporter.format_warning(warning.category())));
        }

        Self { table }
    }

    #[cfg(test)]
    pub(crate) fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub(crate) fn print(&self) {
        eprintln!("{}", self.table);
    }
}

fn issue_row(issue: &ValidationIssue, category: String) -> [String; 4] {
    [
        category,
        issue.field().to_string(),
        issue.message().to_string(),
        issue.suggestion().cloned().unwrap_or_default(),
    ]
}

/// Components, plan entries and sync states, printed to stdout.
pub(crate) struct ListTableReporter {
    table: Table,
}

impl ListTableReporter {
    pub(crate) fn new<const N: usize>(header: [&'static str; N]) -> Self {
        Self {
            table: styled_table(header),
        }
    }

    pub(crate) fn add_row<T: Into<Row>>(&mut self, row: T) -> &mut Self {
        self.table.add_row(row);
        self
    }

    pub(crate) fn print(&self) {
        println!("{}", self.table);
    }
}

impl std::fmt::Display for ListTableReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table)
    }
}
