//! The command-runner port.
//!
//! Everything acorn does to the host machine (probing for tools, running
//! `check` commands, invoking package managers) goes through [`CommandRunner`],
//! so the installer can be exercised against a mock.

use std::{borrow::Cow, fmt, path::PathBuf, process::Output, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

/// A piece of output captured while a command runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputChunk {
    Stdout(String),
    Stderr(String),
}

impl fmt::Display for OutputChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout(s) | Self::Stderr(s) => f.write_str(s),
        }
    }
}

/// Boxed output callback.
///
/// Callers hand this to [`CommandRunner::execute_streaming`] rather than a bare
/// closure so the generic parameter has a nameable type in mock expectations.
pub type OutputCallback = Box<dyn FnMut(OutputChunk) + Send + 'static>;

/// Port for running shell commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns `true` when `command` resolves to something executable on `PATH`.
    ///
    async fn is_command_available(&self, command: &str) -> bool;

    /// Run `command` with the runner's default timeout and collect its output.
    ///
    /// A non-zero exit is *not* an error here; inspect
    /// [`CommandOutput::is_success`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command cannot be spawned or times out.
    async fn execute(&self, command: &str) -> Result<CommandOutput, CommandError>;

    /// Like [`execute`](CommandRunner::execute) with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command cannot be spawned or times out.
    async fn execute_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError>;

    /// Run `command`, passing stdout/stderr to `output_callback` as it arrives.
    ///
    /// The complete output is still returned once the command exits.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command cannot be spawned, its pipes
    /// cannot be captured, or it times out.
    async fn execute_streaming<F>(
        &self,
        command: &str,
        timeout: Duration,
        output_callback: F,
    ) -> Result<CommandOutput, CommandError>
    where
        F: FnMut(OutputChunk) + Send + 'static;
}

/// The result of a finished command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub(crate) output: Output,
    pub(crate) duration: Duration,
}

impl CommandOutput {
    /// Exit status code, or -1 when the process was killed by a signal.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.output.status.code().unwrap_or(-1)
    }

    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.output.stdout
    }

    #[must_use]
    pub fn stdout_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output.stdout)
    }

    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.output.stderr
    }

    #[must_use]
    pub fn stderr_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output.stderr)
    }

    /// The first non-blank line of stdout, trimmed.
    ///
    /// This is what acorn reports as a tool's version after a `check` command
    /// succeeds.
    #[must_use]
    pub fn first_stdout_line(&self) -> Option<String> {
        self.stdout_str()
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(ToString::to_string)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.output.status.success()
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Turn a failed run into [`CommandError::NonZeroExit`]; successful runs
    /// pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NonZeroExit`] when the command did not exit 0.
    pub fn into_result(self, command: &str) -> Result<Self, CommandError> {
        if self.is_success() {
            return Ok(self);
        }

        Err(CommandError::NonZeroExit {
            command: command.to_string(),
            exit_code: self.exit_code(),
            stdout: self.stdout_str().into_owned(),
            stderr: self.stderr_str().into_owned(),
            working_directory: current_dir(),
            execution_duration: self.duration,
        })
    }
}

pub(crate) fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Errors from running a command.
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    #[error("Command timed out after {timeout:?}: {command}")]
    Timeout {
        command: String,
        timeout: Duration,
        working_directory: PathBuf,
    },

    #[error("IO error executing command '{command}': {source}")]
    IoError {
        command: String,
        working_directory: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Command failed with exit code {exit_code}: {command}")]
    NonZeroExit {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
        working_directory: PathBuf,
        execution_duration: Duration,
    },

    #[error("Failed capturing stdout of command: {0}")]
    StdoutSpawn(String),

    #[error("Failed capturing stderr of command: {0}")]
    StderrSpawn(String),
}
