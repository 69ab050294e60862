use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::instrument;

use crate::{
    commands::CommandRunner, component::port::ComponentRepository, config::AppConfig,
    platform::Platform,
};

use super::{
    EventSender, EventStream, InstallError, InstallEvent, InstallPlan, Installer,
    event::metadata::OperationType,
};

/// Helper for tracking progress through operation steps
#[derive(Debug, Clone)]
pub(crate) struct ProgressTracker {
    current_step: u32,
    total_steps: u32,
}

impl ProgressTracker {
    pub(crate) fn new(total_steps: u32) -> Self {
        Self {
            current_step: 0,
            total_steps,
        }
    }

    pub(crate) async fn next(&mut self, sender: &EventSender, message: impl std::fmt::Display) {
        self.current_step += 1;
        let enhanced_message = format!("{} ({}/{})", message, self.current_step, self.total_steps);
        sender
            .send_progress(self.current_step, self.total_steps, enhanced_message)
            .await;
    }
}

/// Primary port for install operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstallService: Send + Sync {
    /// Resolve the install plan for a component
    async fn plan(&self, component: &str) -> Result<InstallPlan, InstallError>;

    /// Install a component. The stream always ends with
    /// [`InstallEvent::Completed`].
    async fn install(&self, component: &str) -> EventStream;
}

#[derive(Debug)]
pub struct InstallServiceImpl<C, R> {
    installer: Arc<Installer<C, R>>,
}

impl<C, R> InstallServiceImpl<C, R>
where
    C: ComponentRepository + 'static,
    R: CommandRunner + 'static,
{
    pub fn new(installer: Installer<C, R>) -> Self {
        Self {
            installer: Arc::new(installer),
        }
    }

    /// An installer configured from the app config's dry-run, stop-on-error
    /// and timeout settings.
    pub fn from_config(repository: C, runner: R, platform: Platform, config: &AppConfig) -> Self {
        Self::new(
            Installer::new(repository, runner, platform)
                .with_dry_run(config.dry_run())
                .with_stop_on_error(config.stop_on_error())
                .with_timeout(config.command_timeout()),
        )
    }

    fn create_event_stream<F, Fut>(f: F) -> EventStream
    where
        F: FnOnce(mpsc::Sender<InstallEvent>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send,
    {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            f(tx).await;
        });

        Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        }))
    }
}

#[async_trait]
impl<C, R> InstallService for InstallServiceImpl<C, R>
where
    C: ComponentRepository + 'static,
    R: CommandRunner + 'static,
{
    #[instrument(skip(self))]
    async fn plan(&self, component: &str) -> Result<InstallPlan, InstallError> {
        self.installer.plan(component).await
    }

    #[instrument(skip(self))]
    async fn install(&self, component: &str) -> EventStream {
        let installer = Arc::clone(&self.installer);
        let component = component.to_string();

        Self::create_event_stream(move |tx| async move {
            let sender = EventSender::new(tx, OperationType::ComponentInstall, &component);
            sender.send_started().await;
            sender
                .send_info(format!("Platform: {}", installer.platform()))
                .await;

            let result = match installer.install(&component, &sender).await {
                Ok(result) => Ok(result),
                Err(e) => {
                    let message = format!("Failed to plan install of {component}: {e}");
                    sender.send_error(e, &message).await;
                    Err(message)
                }
            };

            sender.send_completed(result).await;
        })
    }
}
