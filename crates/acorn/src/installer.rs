//! Component installation
//!
//! Installing a component is two phases. The [`resolver`] checks each tool,
//! follows `requires` into other components and picks the install method for
//! the current [`Platform`], producing an [`InstallPlan`]. The [`Installer`]
//! then runs the plan: prerequisites first, each tool through the
//! [`CommandRunner`] with its output streamed as [`InstallEvent`]s.

pub mod event;
pub mod methods;
pub mod plan;
pub mod resolver;
pub mod service;


pub use self::{
    event::{EventSender, EventStream, InstallEvent},
    plan::{InstallPlan, InstallResult, PlanReason, PlannedTool, ToolResult},
    resolver::Resolver,
    service::{InstallService, InstallServiceImpl},
};

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    commands::{CommandError, CommandRunner, OutputCallback},
    component::port::{ComponentRepoError, ComponentRepository},
    platform::Platform,
};

use self::{methods::install_command, service::ProgressTracker};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Plans and runs component installs.
#[derive(Debug, Clone)]
pub struct Installer<C, R> {
    repository: C,
    runner: R,
    platform: Platform,
    dry_run: bool,
    stop_on_error: bool,
    timeout: Duration,
}

impl<C, R> Installer<C, R>
where
    C: ComponentRepository,
    R: CommandRunner,
{
    pub fn new(repository: C, runner: R, platform: Platform) -> Self {
        Self {
            repository,
            runner,
            platform,
            dry_run: false,
            stop_on_error: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Skip the remaining tools once one fails.
    #[must_use]
    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Per-command timeout for install commands.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Resolve what installing `component` would do.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError`] if the component cannot be loaded, has no
    /// tools, or its requirements cannot be resolved.
    pub async fn plan(&self, component: &str) -> Result<InstallPlan, InstallError> {
        let config = self
            .repository
            .get_component(component)
            .map_err(|source| InstallError::Component {
                component: component.to_string(),
                source,
            })?;

        if config.install.is_empty() {
            return Err(InstallError::NoInstallConfig(component.to_string()));
        }

        let mut plan = Resolver::new(&self.repository, &self.runner, &self.platform)
            .build_plan(component, &config.install)
            .await?;
        plan.dry_run = self.dry_run;

        Ok(plan)
    }

    /// Plan and install `component`.
    ///
    /// # Errors
    ///
    /// Only planning errors are returned; per-tool failures are reported in
    /// the [`InstallResult`].
    pub async fn install(
        &self,
        component: &str,
        sender: &EventSender,
    ) -> Result<InstallResult, InstallError> {
        let plan = self.plan(component).await?;
        Ok(self.install_plan(&plan, sender).await)
    }

    /// Run an already resolved plan.
    pub async fn install_plan(&self, plan: &InstallPlan, sender: &EventSender) -> InstallResult {
        let start = Instant::now();
        let mut result = InstallResult {
            component: plan.component.clone(),
            success: true,
            tools: Vec::with_capacity(plan.total_tools()),
            duration: Duration::ZERO,
            dry_run: self.dry_run,
        };

        let mut progress = ProgressTracker::new(u32::try_from(plan.total_tools()).unwrap_or(u32::MAX));

        for tool in plan.all_tools() {
            progress.next(sender, &tool.name).await;
            let tool_result = if self.stop_on_error && !result.success {
                ToolResult::skipped(&tool.name, "previous failure", false)
            } else {
                self.install_tool(tool, sender).await
            };

            if let Some(error) = tool_result.error() {
                sender
                    .send_error(error.clone(), format!("Failed to install {}", tool.name))
                    .await;
            }
            if tool_result.is_failure() {
                result.success = false;
            }

            sender.send_tool_finished(tool_result.clone()).await;
            result.tools.push(tool_result);
        }

        result.duration = start.elapsed();
        result
    }

    async fn install_tool(&self, tool: &PlannedTool, sender: &EventSender) -> ToolResult {
        if tool.already_installed {
            return ToolResult::skipped(&tool.name, "already installed", true)
                .with_version(tool.version.clone());
        }
        if self.dry_run {
            return ToolResult::skipped(&tool.name, "dry run", true);
        }

        let start = Instant::now();
        let Some(method) = &tool.method else {
            return ToolResult::failed(
                &tool.name,
                ToolError::NoMethod {
                    tool: tool.name.clone(),
                },
                start.elapsed(),
            );
        };

        let command = match install_command(&tool.name, method) {
            Ok(command) => command,
            Err(e) => return ToolResult::failed(&tool.name, e, start.elapsed()),
        };
        if !self.runner.is_command_available(command.program).await {
            return ToolResult::failed(
                &tool.name,
                ToolError::Unavailable {
                    method: method.method_type.to_string(),
                },
                start.elapsed(),
            );
        }

        sender
            .send_info(format!("Installing {} via {}", tool.name, method.method_type))
            .await;
        tracing::debug!(tool = %tool.name, command = %command.command, "running install command");

        match self.run_streaming(&tool.name, &command.command, sender).await {
            Ok(output) if output.is_success() => {
                if let Some(post) = tool.post_install.as_ref().filter(|p| !p.message.is_empty()) {
                    sender.send_info(&post.message).await;
                }
                ToolResult::installed(&tool.name, start.elapsed())
            }
            Ok(output) => ToolResult::failed(
                &tool.name,
                ToolError::Failed {
                    program: command.program.to_string(),
                    exit_code: output.exit_code(),
                    stderr: output.stderr_str().trim().to_string(),
                },
                start.elapsed(),
            ),
            Err(e) => ToolResult::failed(&tool.name, e.into(), start.elapsed()),
        }
    }

    /// Run `command`, forwarding its output as events while it runs.
    async fn run_streaming(
        &self,
        tool: &str,
        command: &str,
        sender: &EventSender,
    ) -> Result<crate::commands::CommandOutput, CommandError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let callback: OutputCallback = Box::new(move |chunk| {
            let _ = tx.send(chunk);
        });

        let run = self
            .runner
            .execute_streaming(command, self.timeout, callback);
        let forward = async {
            while let Some(chunk) = rx.recv().await {
                sender.send_output(tool, chunk).await;
            }
        };

        let (output, ()) = tokio::join!(run, forward);
        output
    }
}

#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("prerequisite {requirement}: {source}")]
    Prerequisite {
        requirement: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error("{command} not found and no component specified (use component:command format)")]
    UnqualifiedRequirement { command: String },

    #[error("cannot load {component} config: {source}")]
    Component {
        component: String,
        #[source]
        source: ComponentRepoError,
    },

    #[error("tool {tool} not found in {component} install config")]
    ToolNotFound { tool: String, component: String },

    #[error("no install method for {tool} on {os}")]
    NoMethod { tool: String, os: String },
}

#[derive(Error, Debug, Clone)]
pub enum InstallError {
    #[error("failed to load config for {component}: {source}")]
    Component {
        component: String,
        #[source]
        source: ComponentRepoError,
    },

    #[error("component {0} has no install configuration")]
    NoInstallConfig(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Why a single tool failed to install.
#[derive(Error, Debug, Clone)]
pub enum ToolError {
    #[error("unknown install method: {0}")]
    UnsupportedMethod(String),

    #[error("go install requires package path for {tool}")]
    MissingPackage { tool: String },

    #[error("curl install requires URL for {tool}")]
    MissingUrl { tool: String },

    #[error("no install method for {tool} on this platform")]
    NoMethod { tool: String },

    #[error("{method} not available on this system")]
    Unavailable { method: String },

    #[error("{program} failed with exit code {exit_code}: {stderr}")]
    Failed {
        program: String,
        exit_code: i32,
        stderr: String,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}
