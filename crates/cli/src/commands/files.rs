use std::path::Path;

use acorn::{
    config::AppConfig,
    configfile::ConfigFileManager,
    filesync::{SyncState, Syncer},
    fs::RealFileSystem,
};
use tracing::info;

use crate::{
    commands::{load_component, repository},
    tables::ListTableReporter,
    terminal_progress_reporter::TerminalProgressReporter,
};

/// Render a component's `files`. `generated_dir` wins over the configured one.
pub(crate) fn handle_generate(
    component: &str,
    generated_dir: Option<&Path>,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    info!(component, dry_run = config.dry_run(), "Generating config files");

    let repo = repository(config);
    let Some(component) = load_component(component, &repo, reporter) else {
        return 1;
    };
    if component.files.is_empty() {
        reporter.report_info(format!("{} has no config files", component.name()));
        return 0;
    }

    let mut manager = ConfigFileManager::new(RealFileSystem, config.dry_run());
    if let Some(dir) = generated_dir.or(config.generated_dir()) {
        manager = manager.with_generated_dir(dir);
    }

    let generated = match manager.generate(component.name(), &component.files) {
        Ok(generated) => generated,
        Err(e) => {
            reporter.report_error(format!("Failed to generate {}: {e}", component.name()));
            return 1;
        }
    };

    for file in &generated {
        if file.written {
            reporter.report_success(format!(
                "Wrote {} ({})",
                file.generated_path.display(),
                file.format
            ));
        } else {
            reporter.report_info(format!(
                "Would write {} ({})",
                file.generated_path.display(),
                file.format
            ));
            TerminalProgressReporter::report(0, file.content.trim_end());
        }

        if let Some(target) = &file.symlink_target {
            reporter.report_suggestion(format!(
                "ln -sf {} {}",
                file.generated_path.display(),
                target.display()
            ));
        }
    }

    0
}

pub(crate) fn handle_sync(component: &str, config: &AppConfig, reporter: TerminalProgressReporter) -> i32 {
    info!(component, dry_run = config.dry_run(), "Syncing files");

    let repo = repository(config);
    let Some(component) = load_component(component, &repo, reporter) else {
        return 1;
    };
    if component.sync_files.is_empty() {
        reporter.report_info(format!("{} has no files to sync", component.name()));
        return 0;
    }

    let result = Syncer::new(RealFileSystem, config.dotfiles_root(), config.dry_run())
        .sync(component.name(), &component.sync_files);

    let verb = if result.dry_run { "Would sync" } else { "Synced" };
    for file in &result.synced {
        reporter.report_success(format!(
            "{verb} {} -> {} ({}, {})",
            file.source,
            file.target.display(),
            file.mode,
            file.action
        ));
    }
    for file in &result.skipped {
        TerminalProgressReporter::report(2, format!("{}: unchanged", file.target.display()));
    }
    for failure in &result.errors {
        reporter.report_error(format!(
            "{} -> {}: {}",
            failure.source,
            failure.target.display(),
            failure.error
        ));
    }

    if result.is_success() { 0 } else { 1 }
}

pub(crate) fn handle_sync_status(
    component: &str,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    let repo = repository(config);
    let Some(component) = load_component(component, &repo, reporter) else {
        return 1;
    };

    let statuses = match Syncer::new(RealFileSystem, config.dotfiles_root(), false)
        .status(&component.sync_files)
    {
        Ok(statuses) => statuses,
        Err(e) => {
            reporter.report_error(format!("Cannot check {}: {e}", component.name()));
            return 1;
        }
    };

    let mut table = ListTableReporter::new(["Source", "Target", "Mode", "State"]);
    for status in &statuses {
        let state = match status.state {
            SyncState::Synced => reporter.format_success(status.state),
            _ => reporter.format_warning(status.state),
        };
        table.add_row(vec![
            status.source.clone(),
            status.target.display().to_string(),
            status.mode.to_string(),
            state,
        ]);
    }
    table.print();

    0
}
