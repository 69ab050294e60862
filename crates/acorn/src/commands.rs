//! Command execution port and its shell adapter

pub mod runner;
pub mod shell;


pub use runner::{CommandError, CommandOutput, CommandRunner, OutputCallback, OutputChunk};
pub use shell::{DEFAULT_SHELL, ShellCommandRunner, quote};

#[cfg(test)]
pub use runner::MockCommandRunner;
#[cfg(test)]
pub(crate) use tests::fake_output;
