pub(crate) mod component;
pub(crate) mod config;
pub(crate) mod files;
pub(crate) mod install;
pub(crate) mod platform;
pub(crate) mod shell;

use acorn::{
    commands::ShellCommandRunner,
    component::{
        ComponentConfig,
        port::{ComponentRepoError, ComponentRepository},
        repository::yaml::YamlComponentRepository,
    },
    config::AppConfig,
    fs::RealFileSystem,
    platform::Platform,
};
use tracing::debug;

use crate::{
    cli::{ClapCommands, ComponentSubcommands, ConfigSubcommands},
    terminal_progress_reporter::TerminalProgressReporter,
};

pub(crate) type Repository = YamlComponentRepository<RealFileSystem>;

/// Primary command dispatcher that routes to the appropriate command handler
pub(crate) async fn dispatch_command(
    command: &ClapCommands,
    config: &AppConfig,
    original_config: AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    debug!(?command, "dispatching command");

    match command {
        ClapCommands::Component(component_cmd) => {
            dispatch_component_command(&component_cmd.command, config, reporter).await
        }
        ClapCommands::Plan { component } => install::handle_plan(component, config, reporter).await,
        ClapCommands::Install { component } => {
            install::handle_install(component, config, reporter).await
        }
        ClapCommands::Generate {
            component,
            generated_dir,
        } => files::handle_generate(component, generated_dir.as_deref(), config, reporter),
        ClapCommands::Sync { component } => files::handle_sync(component, config, reporter),
        ClapCommands::SyncStatus { component } => {
            files::handle_sync_status(component, config, reporter)
        }
        ClapCommands::Shell { component } => shell::handle_shell(component, config, reporter).await,
        ClapCommands::Platform => platform::handle_platform(config, reporter).await,
        ClapCommands::Config(config_cmd) => match config_cmd.command {
            ConfigSubcommands::Validate => config::handle_validate(&original_config, reporter),
        },
    }
}

async fn dispatch_component_command(
    command: &ComponentSubcommands,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    debug!(?command, "handling component command");

    match command {
        ComponentSubcommands::List => component::handle_list(config, reporter),
        ComponentSubcommands::Info { name } => component::handle_info(name, config, reporter),
        ComponentSubcommands::Validate { name } => {
            component::handle_validate(name.as_deref(), config, reporter).await
        }
        ComponentSubcommands::Override { name, force } => {
            component::handle_override(name, *force, config, reporter)
        }
    }
}

pub(crate) fn repository(config: &AppConfig) -> Repository {
    YamlComponentRepository::new(RealFileSystem, config.override_directory().to_path_buf())
}

pub(crate) fn runner(config: &AppConfig) -> ShellCommandRunner {
    ShellCommandRunner::new(acorn::commands::DEFAULT_SHELL, config.command_timeout())
}

pub(crate) async fn detect_platform(
    runner: &ShellCommandRunner,
    reporter: TerminalProgressReporter,
) -> Option<Platform> {
    match Platform::detect(&RealFileSystem, runner).await {
        Ok(platform) => Some(platform),
        Err(e) => {
            reporter.report_error(format!("Could not detect platform: {e}"));
            None
        }
    }
}

/// Load `name`, reporting any failure.
pub(crate) fn load_component(
    name: &str,
    repo: &Repository,
    reporter: TerminalProgressReporter,
) -> Option<ComponentConfig> {
    match repo.get_component(name) {
        Ok(component) => Some(component),
        Err(e) => {
            handle_component_repo_error(&e, repo, reporter);
            None
        }
    }
}

pub(crate) fn handle_component_repo_error(
    e: &ComponentRepoError,
    repo: &Repository,
    reporter: TerminalProgressReporter,
) {
    match e {
        ComponentRepoError::ComponentNotFound {
            name,
            searched_paths,
        } => {
            reporter.report_error(format!("Component Not Found: {name}"));
            reporter.report_info(format!("Searched in: {}", searched_paths.join(", ")));

            if let Ok(available) = repo.list_components() {
                if !available.is_empty() {
                    let msg = if available.len() <= 5 {
                        format!("Available components: {}", available.join(", "))
                    } else {
                        format!(
                            "Available components: {}, and {} more...",
                            available[..5].join(", "),
                            available.len() - 5
                        )
                    };
                    reporter.report_info(msg);
                }
            }

            reporter.report_suggestion("Run 'acorn component list' to see all available components");
        }
        ComponentRepoError::InvalidName { name } => {
            reporter.report_error(format!("Invalid component name: {name}"));
            reporter.report_suggestion("Component names cannot contain '/', '\\' or '.'");
        }
        ComponentRepoError::NoEmbeddedDefault { name } => {
            reporter.report_error(format!("Component '{name}' is not built in"));
            reporter.report_info(format!(
                "Edit {} directly instead",
                repo.user_config_path(name).display()
            ));
        }
        ComponentRepoError::ParseError { name, source } => {
            reporter.report_error("Component Parse Error");
            reporter.report_info(format!("Failed to parse component '{name}'"));
            reporter.report_info(format!("Error: {source}"));
            reporter.report_info(format!("Location: {}", source.component_path().display()));

            reporter.report_suggestion(
                "Check the format of your component file and make sure it's valid YAML",
            );
        }
        ComponentRepoError::FileSystemError(error) => {
            reporter.report_error("I/O Error");
            reporter.report_info(format!("{error}"));

            reporter.report_suggestion(
                "Check if the file system is accessible and you have proper permissions",
            );
        }
    }
}
