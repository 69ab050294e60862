use acorn::{
    component::{ComponentConfig, port::ComponentRepository},
    config::AppConfig,
    configfile::WriterRegistry,
    fs::RealFileSystem,
};
use dialoguer::Confirm;
use tracing::info;

use crate::{
    commands::{handle_component_repo_error, load_component, repository, runner},
    formatters::format_key,
    tables::{ListTableReporter, ValidationTableReporter},
    terminal_progress_reporter::TerminalProgressReporter,
};

pub(crate) fn handle_list(config: &AppConfig, reporter: TerminalProgressReporter) -> i32 {
    info!("Listing components");

    let repo = repository(config);
    let names = match repo.list_components() {
        Ok(names) => names,
        Err(e) => {
            handle_component_repo_error(&e, &repo, reporter);
            return 1;
        }
    };

    let mut exit_code = 0;
    let mut table = ListTableReporter::new(["Name", "Source", "Description", "Tools"]);

    for name in &names {
        let source = repo
            .source_of(name)
            .map(|s| s.to_string())
            .unwrap_or_default();

        match repo.get_component(name) {
            Ok(component) => {
                table.add_row(vec![
                    name.clone(),
                    source,
                    component.description().to_string(),
                    component.tools().len().to_string(),
                ]);
            }
            Err(e) => {
                table.add_row(vec![
                    name.clone(),
                    source,
                    reporter.format_error("failed to load"),
                    String::new(),
                ]);
                tracing::warn!(component = %name, error = %e, "failed to load component");
                exit_code = 1;
            }
        }
    }

    table.print();
    reporter.report_info(format!("{} components", names.len()));

    exit_code
}

pub(crate) fn handle_info(name: &str, config: &AppConfig, reporter: TerminalProgressReporter) -> i32 {
    info!(component = name, "Showing component info");

    let repo = repository(config);
    let Some(component) = load_component(name, &repo, reporter) else {
        return 1;
    };

    let colors = reporter.use_colors();
    let key = |k: &str| format_key(k, colors);

    TerminalProgressReporter::report(0, format!("{}: {}", key("Name"), component.name()));
    if !component.description().is_empty() {
        TerminalProgressReporter::report(
            0,
            format!("{}: {}", key("Description"), component.description()),
        );
    }
    if let Some(version) = &component.version {
        TerminalProgressReporter::report(0, format!("{}: {version}", key("Version")));
    }
    if let Some(source) = repo.source_of(name) {
        TerminalProgressReporter::report(0, format!("{}: {source}", key("Source")));
    }
    TerminalProgressReporter::report(
        0,
        format!("{}: {}", key("Override"), repo.user_config_path(name).display()),
    );

    report_shell_integration(&component, &key);
    report_files(&component, &key);
    report_tools(&component, &key);

    0
}

fn report_shell_integration(component: &ComponentConfig, key: &dyn Fn(&str) -> String) {
    if !component.env().is_empty() {
        TerminalProgressReporter::report(0, key("Environment"));
        for (name, value) in component.env() {
            TerminalProgressReporter::report(2, format!("{name}={value}"));
        }
    }
    if !component.paths.is_empty() {
        TerminalProgressReporter::report(0, key("Paths"));
        for entry in &component.paths {
            if entry.condition.is_empty() {
                TerminalProgressReporter::report(2, &entry.path);
            } else {
                TerminalProgressReporter::report(2, format!("{} ({})", entry.path, entry.condition));
            }
        }
    }
    if !component.aliases().is_empty() {
        TerminalProgressReporter::report(0, key("Aliases"));
        for (name, command) in component.aliases() {
            TerminalProgressReporter::report(2, format!("{name} = {command}"));
        }
    }
    if !component.wrappers.is_empty() {
        TerminalProgressReporter::report(0, key("Wrappers"));
        for wrapper in &component.wrappers {
            TerminalProgressReporter::report(2, format!("{} -> {}", wrapper.name, wrapper.command));
        }
    }
    if !component.shell_functions().is_empty() {
        TerminalProgressReporter::report(0, key("Functions"));
        for name in component.shell_functions().keys() {
            TerminalProgressReporter::report(2, name);
        }
    }
}

fn report_files(component: &ComponentConfig, key: &dyn Fn(&str) -> String) {
    if !component.files.is_empty() {
        TerminalProgressReporter::report(0, key("Files"));
        for file in &component.files {
            TerminalProgressReporter::report(2, format!("{} ({})", file.target, file.format));
        }
    }
    if !component.sync_files.is_empty() {
        TerminalProgressReporter::report(0, key("Sync files"));
        for file in &component.sync_files {
            TerminalProgressReporter::report(
                2,
                format!("{} -> {} ({})", file.source, file.target, file.mode),
            );
        }
    }
}

fn report_tools(component: &ComponentConfig, key: &dyn Fn(&str) -> String) {
    if component.tools().is_empty() {
        return;
    }

    TerminalProgressReporter::report(0, key("Tools"));
    for tool in component.tools() {
        TerminalProgressReporter::report(2, &tool.name);
        if !tool.check.is_empty() {
            TerminalProgressReporter::report(4, format!("check: {}", tool.check));
        }
        if !tool.requires.is_empty() {
            TerminalProgressReporter::report(4, format!("requires: {}", tool.requires.join(", ")));
        }
        for (platform, method) in &tool.methods {
            TerminalProgressReporter::report(4, format!("{platform}: {}", method.method_type));
        }
    }
}

/// Validate one component, or every known component when `name` is `None`.
pub(crate) async fn handle_validate(
    name: Option<&str>,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    let repo = repository(config);
    let names = match name {
        Some(name) => vec![name.to_string()],
        None => match repo.list_components() {
            Ok(names) => names,
            Err(e) => {
                handle_component_repo_error(&e, &repo, reporter);
                return 1;
            }
        },
    };

    let registry = WriterRegistry::default();
    let runner = runner(config);
    let mut exit_code = 0;

    for name in &names {
        info!(component = %name, "Validating component");

        let Some(component) = load_component(name, &repo, reporter) else {
            exit_code = 1;
            continue;
        };

        let result = component.validate(&registry, &runner).await;
        let issues = result.issues();

        if issues.has_errors() {
            reporter.report_error(format!("{name}: validation failed"));
            ValidationTableReporter::from_issues(issues, reporter).print();
            exit_code = 1;
        } else if issues.has_warnings() {
            reporter.report_warning(format!("{name}: valid with warnings"));
            ValidationTableReporter::from_issues(issues, reporter).print();
        } else {
            reporter.report_success(format!("{name}: valid"));
        }
    }

    exit_code
}

pub(crate) fn handle_override(
    name: &str,
    force: bool,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    let repo = repository(config);
    let path = repo.user_config_path(name);

    if repo.has_user_override(name) && !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", path.display()))
            .default(false)
            .interact();

        match confirmed {
            Ok(true) => {}
            Ok(false) => {
                reporter.report_info("Left the existing override alone");
                return 0;
            }
            Err(e) => {
                reporter.report_error(format!("Override already exists: {}", path.display()));
                reporter.report_info(format!("Could not ask for confirmation: {e}"));
                reporter.report_suggestion("Pass --force to replace it");
                return 1;
            }
        }
    }

    if let Err(e) = config.ensure_dirs(&RealFileSystem) {
        reporter.report_error(format!("Could not create acorn directories: {e}"));
        return 1;
    }

    match repo.create_user_override(name) {
        Ok(path) => {
            reporter.report_success(format!("Created {}", path.display()));
            0
        }
        Err(e) => {
            handle_component_repo_error(&e, &repo, reporter);
            1
        }
    }
}
