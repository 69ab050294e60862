use acorn::config::AppConfig;

use crate::{
    commands::{detect_platform, runner},
    formatters::format_key,
    terminal_progress_reporter::TerminalProgressReporter,
};

pub(crate) async fn handle_platform(config: &AppConfig, reporter: TerminalProgressReporter) -> i32 {
    let Some(platform) = detect_platform(&runner(config), reporter).await else {
        return 1;
    };

    let colors = reporter.use_colors();
    let line = |k: &str, v: &str| {
        TerminalProgressReporter::report(0, format!("{}: {v}", format_key(k, colors)));
    };

    line("OS", platform.os());
    line("Arch", platform.arch());
    if let Some(distro) = platform.distro() {
        line("Distro", distro);
    }
    if let Some(family) = platform.distro_family() {
        line("Family", family);
    }
    line("Package manager", platform.package_manager().unwrap_or("none"));
    line("Method keys", &platform.method_keys().join(", "));

    0
}
