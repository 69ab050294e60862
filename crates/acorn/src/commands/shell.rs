//! `sh -c` adapter for [`CommandRunner`].

use std::{
    borrow::Cow,
    process::{Output, Stdio},
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
};

use super::runner::{CommandError, CommandOutput, CommandRunner, OutputChunk, current_dir};

pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs commands through a POSIX shell.
#[derive(Clone, Debug)]
pub struct ShellCommandRunner {
    shell: String,
    default_timeout: Duration,
}

impl ShellCommandRunner {
    #[must_use]
    pub fn new(shell: &str, default_timeout: Duration) -> Self {
        Self {
            shell: shell.to_string(),
            default_timeout,
        }
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command).stdin(Stdio::null());
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn is_command_available(&self, command: &str) -> bool {
        let probe = format!("command -v {} >/dev/null 2>&1", quote(command));

        self.execute(&probe)
            .await
            .is_ok_and(|output| output.is_success())
    }

    async fn execute(&self, command: &str) -> Result<CommandOutput, CommandError> {
        self.execute_with_timeout(command, self.default_timeout)
            .await
    }

    async fn execute_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        let start_time = Instant::now();
        let mut cmd = self.command(command);
        cmd.kill_on_drop(true);

        tracing::trace!(command, ?timeout, "executing command");

        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| CommandError::Timeout {
                command: command.to_string(),
                timeout,
                working_directory: current_dir(),
            })?
            .map_err(|e| CommandError::IoError {
                command: command.to_string(),
                working_directory: current_dir(),
                source: Arc::new(e),
            })?;

        Ok(CommandOutput {
            output,
            duration: start_time.elapsed(),
        })
    }

    async fn execute_streaming<F>(
        &self,
        command: &str,
        timeout: Duration,
        mut callback: F,
    ) -> Result<CommandOutput, CommandError>
    where
        F: FnMut(OutputChunk) + Send + 'static,
    {
        let start_time = Instant::now();
        let mut cmd = self.command(command);
        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::trace!(command, ?timeout, "executing streaming command");

        let io_error = |e: std::io::Error| CommandError::IoError {
            command: command.to_string(),
            working_directory: current_dir(),
            source: Arc::new(e),
        };

        let mut child = cmd.spawn().map_err(io_error)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CommandError::StdoutSpawn(command.to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CommandError::StderrSpawn(command.to_string()))?;

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();

        let run = async {
            let mut full_stdout = Vec::new();
            let mut full_stderr = Vec::new();
            let mut stdout_open = true;
            let mut stderr_open = true;

            while stdout_open || stderr_open {
                tokio::select! {
                    line = stdout_lines.next_line(), if stdout_open => {
                        match line.map_err(io_error)? {
                            Some(line) => {
                                push_line(&mut full_stdout, &line);
                                callback(OutputChunk::Stdout(line));
                            }
                            None => stdout_open = false,
                        }
                    }
                    line = stderr_lines.next_line(), if stderr_open => {
                        match line.map_err(io_error)? {
                            Some(line) => {
                                push_line(&mut full_stderr, &line);
                                callback(OutputChunk::Stderr(line));
                            }
                            None => stderr_open = false,
                        }
                    }
                }
            }

            let status = child.wait().await.map_err(io_error)?;

            Ok::<_, CommandError>(CommandOutput {
                output: Output {
                    status,
                    stdout: full_stdout,
                    stderr: full_stderr,
                },
                duration: start_time.elapsed(),
            })
        };

        tokio::time::timeout(timeout, run)
            .await
            .unwrap_or_else(|_| {
                Err(CommandError::Timeout {
                    command: command.to_string(),
                    timeout,
                    working_directory: current_dir(),
                })
            })
    }
}

fn push_line(buffer: &mut Vec<u8>, line: &str) {
    buffer.extend_from_slice(line.as_bytes());
    buffer.push(b'\n');
}

/// Quote `arg` for inclusion in a POSIX shell command line.
///
/// Arguments made only of characters the shell never interprets are returned
/// as-is so generated commands stay readable.
#[must_use]
pub fn quote(arg: &str) -> Cow<'_, str> {
    let is_plain = !arg.is_empty()
        && arg.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '%' | '+' | '=' | ',')
        });

    if is_plain {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}
