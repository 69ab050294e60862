//! Events streamed while an install runs.

pub mod error;
pub mod metadata;

use std::{fmt, pin::Pin};

use futures::Stream;
use tokio::sync::mpsc;

use crate::commands::OutputChunk;

use self::{
    error::StreamedError,
    metadata::{EventMetadata, OperationType},
};

use super::{InstallResult, ToolResult};

pub type EventStream = Pin<Box<dyn Stream<Item = InstallEvent> + Send>>;

/// Sends [`InstallEvent`]s for one operation and logs each one.
#[derive(Debug, Clone)]
pub struct EventSender {
    metadata: EventMetadata,
    tx: mpsc::Sender<InstallEvent>,
}

impl EventSender {
    pub(crate) fn new(
        tx: mpsc::Sender<InstallEvent>,
        operation_type: OperationType,
        component: impl Into<String>,
    ) -> Self {
        Self {
            tx,
            metadata: EventMetadata::new(operation_type, component),
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    pub(crate) async fn send_started(&self) {
        let metadata = self.metadata.touch_and_clone();

        tracing::debug!(
            operation_id = %metadata.operation_id(),
            operation_type = %metadata.operation_type(),
            component = metadata.component(),
            "operation started",
        );
        let _ = self.tx.send(InstallEvent::Started { metadata }).await;
    }

    pub(crate) async fn send_progress(
        &self,
        step: u32,
        total_steps: u32,
        message: impl fmt::Display,
    ) {
        let metadata = self.metadata.touch_and_clone();
        let msg = message.to_string();
        tracing::info!(
            operation_id = %metadata.operation_id(),
            operation_type = %metadata.operation_type(),
            component = metadata.component(),
            message = &msg,
        );
        let _ = self
            .tx
            .send(InstallEvent::Progress {
                metadata,
                step,
                total_steps,
                percent_complete: step as f32 / total_steps.max(1) as f32,
                message: msg,
            })
            .await;
    }

    pub(crate) async fn send_output(&self, tool: &str, output: OutputChunk) {
        let metadata = self.metadata.touch_and_clone();

        tracing::trace!(
            operation_id = %metadata.operation_id(),
            component = metadata.component(),
            tool,
            output = ?output,
        );
        let _ = self
            .tx
            .send(InstallEvent::Output {
                metadata,
                tool: tool.to_string(),
                output,
            })
            .await;
    }

    pub(crate) async fn send_info(&self, message: impl fmt::Display) {
        let metadata = self.metadata.touch_and_clone();
        let message = message.to_string();

        tracing::info!(
            operation_id = %metadata.operation_id(),
            operation_type = %metadata.operation_type(),
            component = metadata.component(),
            message = &message,
        );
        let _ = self.tx.send(InstallEvent::Info { metadata, message }).await;
    }

    pub(crate) async fn send_warning(&self, message: impl fmt::Display) {
        let metadata = self.metadata.touch_and_clone();
        let message = message.to_string();

        tracing::warn!(
            operation_id = %metadata.operation_id(),
            operation_type = %metadata.operation_type(),
            component = metadata.component(),
            message = &message,
        );
        let _ = self
            .tx
            .send(InstallEvent::Warning { metadata, message })
            .await;
    }

    pub(crate) async fn send_error<E>(&self, error: E, message: impl fmt::Display)
    where
        StreamedError: From<E>,
    {
        let metadata = self.metadata.touch_and_clone();
        let message = message.to_string();
        let error = StreamedError::from(error);

        tracing::error!(
            operation_id = %metadata.operation_id(),
            operation_type = %metadata.operation_type(),
            component = metadata.component(),
            error = %error,
            message = &message,
        );
        let _ = self
            .tx
            .send(InstallEvent::Error {
                metadata,
                error,
                message,
            })
            .await;
    }

    pub(crate) async fn send_tool_finished(&self, result: ToolResult) {
        let metadata = self.metadata.touch_and_clone();

        tracing::debug!(
            operation_id = %metadata.operation_id(),
            component = metadata.component(),
            tool = result.name(),
            success = result.is_success(),
            skipped = result.is_skipped(),
            "tool finished",
        );
        let _ = self
            .tx
            .send(InstallEvent::ToolFinished { metadata, result })
            .await;
    }

    pub(crate) async fn send_completed(&self, result: Result<InstallResult, String>) {
        let metadata = self.metadata.touch_and_clone();

        tracing::info!(
            operation_id = %metadata.operation_id(),
            operation_type = %metadata.operation_type(),
            component = metadata.component(),
            success = result.as_ref().is_ok_and(InstallResult::is_success),
            "operation completed",
        );
        let _ = self
            .tx
            .send(InstallEvent::Completed { metadata, result })
            .await;
    }
}

/// Events emitted during an install
#[derive(Debug, Clone)]
pub enum InstallEvent {
    /// Operation has started
    Started { metadata: EventMetadata },

    /// Progress update
    Progress {
        metadata: EventMetadata,
        step: u32,
        total_steps: u32,
        percent_complete: f32,
        message: String,
    },

    /// A line of output from an install command
    Output {
        metadata: EventMetadata,
        tool: String,
        output: OutputChunk,
    },

    /// Informational message
    Info {
        metadata: EventMetadata,
        message: String,
    },

    Warning {
        metadata: EventMetadata,
        message: String,
    },

    /// Error occurred but operation continues
    Error {
        metadata: EventMetadata,
        error: StreamedError,
        message: String,
    },

    /// One tool was installed, skipped or failed
    ToolFinished {
        metadata: EventMetadata,
        result: ToolResult,
    },

    /// Always the last event. `Err` when no install could be attempted at
    /// all, e.g. the plan could not be resolved.
    Completed {
        metadata: EventMetadata,
        result: Result<InstallResult, String>,
    },
}

impl InstallEvent {
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            Self::Started { metadata }
            | Self::Progress { metadata, .. }
            | Self::Output { metadata, .. }
            | Self::Info { metadata, .. }
            | Self::Warning { metadata, .. }
            | Self::Error { metadata, .. }
            | Self::ToolFinished { metadata, .. }
            | Self::Completed { metadata, .. } => metadata,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_sender(buffer: usize) -> (EventSender, mpsc::Receiver<InstallEvent>) {
    let (tx, rx) = mpsc::channel(buffer);
    (
        EventSender::new(tx, OperationType::ComponentInstall, "test"),
        rx,
    )
}
