use acorn::{
    config::AppConfig,
    installer::{InstallService, InstallServiceImpl, PlannedTool},
};
use tracing::info;

use crate::{
    commands::{detect_platform, repository, runner},
    event_processor::EventProcessor,
    tables::ListTableReporter,
    terminal_progress_reporter::TerminalProgressReporter,
};

pub(crate) async fn handle_plan(
    component: &str,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    info!(component, "Planning install");

    let runner = runner(config);
    let Some(platform) = detect_platform(&runner, reporter).await else {
        return 1;
    };
    let service = InstallServiceImpl::from_config(repository(config), runner, platform, config);

    let plan = match service.plan(component).await {
        Ok(plan) => plan,
        Err(e) => {
            reporter.report_error(format!("Cannot plan {component}: {e}"));
            return 1;
        }
    };

    reporter.report_info(format!("Platform: {}", plan.platform));

    let mut table = ListTableReporter::new(["Tool", "Reason", "Status", "Method"]);
    for tool in plan.all_tools() {
        table.add_row(plan_row(tool));
    }
    table.print();

    let pending = plan.pending_tools().len();
    if pending == 0 {
        reporter.report_success("Everything is already installed");
    } else {
        reporter.report_info(format!(
            "{pending} of {} tools would be installed",
            plan.total_tools()
        ));
    }

    0
}

fn plan_row(tool: &PlannedTool) -> Vec<String> {
    let status = match (tool.already_installed, &tool.version) {
        (true, Some(version)) => format!("installed ({version})"),
        (true, None) => "installed".to_string(),
        (false, _) => "will install".to_string(),
    };
    let method = match (&tool.method_key, &tool.method) {
        (Some(key), Some(method)) => format!("{key}: {}", method.method_type),
        _ => String::new(),
    };

    vec![tool.name.clone(), tool.reason.to_string(), status, method]
}

pub(crate) async fn handle_install(
    component: &str,
    config: &AppConfig,
    reporter: TerminalProgressReporter,
) -> i32 {
    info!(component, dry_run = config.dry_run(), "Installing component");

    let runner = runner(config);
    let Some(platform) = detect_platform(&runner, reporter).await else {
        return 1;
    };
    let service = InstallServiceImpl::from_config(repository(config), runner, platform, config);

    EventProcessor::new(reporter)
        .process_events_with_handler(service.install(component).await, |_, _| None)
        .await
}
