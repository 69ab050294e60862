//! Builds an [`InstallPlan`] by resolving `requires` across components.

use std::collections::HashSet;

use futures::future::BoxFuture;

use crate::{
    commands::CommandRunner,
    component::{InstallConfig, ToolInstall, port::ComponentRepository},
    platform::Platform,
};

use super::{
    ResolveError,
    plan::{InstallPlan, PlanReason, PlannedTool},
};

/// Split `component:command` on the first colon. A bare command has no
/// component.
#[must_use]
pub fn parse_requirement(requirement: &str) -> (Option<&str>, &str) {
    match requirement.split_once(':') {
        Some((component, command)) if !component.is_empty() => (Some(component), command),
        _ => (None, requirement),
    }
}

/// Depth-first resolver. Each tool is visited once per plan, so cyclic
/// `requires` terminate.
pub struct Resolver<'a, C, R> {
    repository: &'a C,
    runner: &'a R,
    platform: &'a Platform,
    visited: HashSet<String>,
    resolved: Vec<PlannedTool>,
}

impl<'a, C, R> Resolver<'a, C, R>
where
    C: ComponentRepository,
    R: CommandRunner,
{
    pub fn new(repository: &'a C, runner: &'a R, platform: &'a Platform) -> Self {
        Self {
            repository,
            runner,
            platform,
            visited: HashSet::new(),
            resolved: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ResolveError`] for a requirement that cannot be satisfied or
    /// a missing tool with no install method for this platform.
    pub async fn build_plan(
        &mut self,
        component: &str,
        install: &InstallConfig,
    ) -> Result<InstallPlan, ResolveError> {
        self.visited.clear();
        self.resolved.clear();

        for tool in &install.tools {
            self.resolve_tool(tool.clone(), PlanReason::Direct).await?;
        }

        let (prerequisites, tools) = self
            .resolved
            .drain(..)
            .partition(|t| t.reason == PlanReason::Prerequisite);

        Ok(InstallPlan {
            component: component.to_string(),
            platform: self.platform.clone(),
            prerequisites,
            tools,
            dry_run: false,
        })
    }

    fn resolve_tool(
        &mut self,
        tool: ToolInstall,
        reason: PlanReason,
    ) -> BoxFuture<'_, Result<(), ResolveError>> {
        Box::pin(async move {
            if !self.visited.insert(tool.name.clone()) {
                return Ok(());
            }

            let (installed, version) = self.check_installed(&tool.check).await;

            for requirement in &tool.requires {
                self.resolve_requirement(requirement).await.map_err(|source| {
                    ResolveError::Prerequisite {
                        requirement: requirement.clone(),
                        source: Box::new(source),
                    }
                })?;
            }

            let selected = self
                .platform
                .select_method(&tool.methods)
                .map(|(key, method)| (key.to_string(), method.clone()));
            if selected.is_none() && !installed {
                return Err(ResolveError::NoMethod {
                    tool: tool.name,
                    os: self.platform.os().to_string(),
                });
            }
            let (method_key, method) = selected.unzip();

            tracing::debug!(tool = %tool.name, %reason, installed, ?method_key, "resolved tool");

            self.resolved.push(PlannedTool {
                name: tool.name,
                description: tool.description,
                method_key,
                method,
                already_installed: installed,
                version,
                reason,
                post_install: tool.post_install,
            });

            Ok(())
        })
    }

    async fn resolve_requirement(&mut self, requirement: &str) -> Result<(), ResolveError> {
        let (component, command) = parse_requirement(requirement);

        if self.runner.is_command_available(command).await {
            return Ok(());
        }

        let Some(component) = component else {
            return Err(ResolveError::UnqualifiedRequirement {
                command: command.to_string(),
            });
        };

        let config = self
            .repository
            .get_component(component)
            .map_err(|source| ResolveError::Component {
                component: component.to_string(),
                source,
            })?;
        let tool = config
            .tool(command)
            .cloned()
            .ok_or_else(|| ResolveError::ToolNotFound {
                tool: command.to_string(),
                component: component.to_string(),
            })?;

        self.resolve_tool(tool, PlanReason::Prerequisite).await
    }

    /// `(installed, version)`. `command -v X` is answered from `PATH`; any
    /// other check runs in the shell and its first output line is the
    /// version.
    async fn check_installed(&self, check: &str) -> (bool, Option<String>) {
        let parts = check.split_whitespace().collect::<Vec<_>>();

        match parts.as_slice() {
            [] => (false, None),
            ["command", "-v", name, ..] => (self.runner.is_command_available(name).await, None),
            _ => match self.runner.execute(check).await {
                Ok(output) if output.is_success() => (true, output.first_stdout_line()),
                Ok(_) => (false, None),
                Err(e) => {
                    tracing::debug!(check, error = %e, "check command could not run");
                    (false, None)
                }
            },
        }
    }
}
