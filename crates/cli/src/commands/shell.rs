use acorn::{config::AppConfig, shell::ShellGenerator};

use crate::{
    commands::{detect_platform, load_component, repository, runner},
    terminal_progress_reporter::TerminalProgressReporter,
};

/// Print the snippet on stdout so it can be `eval`ed.
pub(crate) async fn handle_shell(
    component: &str,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    let repo = repository(config);
    let Some(component) = load_component(component, &repo, reporter) else {
        return 1;
    };
    let Some(platform) = detect_platform(&runner(config), reporter).await else {
        return 1;
    };

    print!("{}", ShellGenerator::new(platform).generate(&component));

    0
}
