mod cli;
mod commands;
mod config;
mod event_processor;
mod formatters;
mod tables;
mod terminal_progress_reporter;

use std::process;

use acorn::{
    config::{ApplyToConfig, ConfigLoader, YamlLoader},
    fs::RealFileSystem,
};
use clap::Parser;
use terminal_progress_reporter::TerminalProgressReporter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{cli::ClapCli, commands::dispatch_command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ClapCli::parse();
    init_tracing(args.verbose);
    debug!("CLI arguments: {:#?}", &args);

    let fs = RealFileSystem;

    // `config` commands work on the loaded config without CLI overrides.
    let (config, original_config) = {
        let config = YamlLoader::new(&fs).load_config()?;

        (args.apply_to_config(config.clone()), config)
    };

    debug!("Final config: {:#?}", &config);

    let reporter = TerminalProgressReporter::new(config.use_colors());

    let exit_code = dispatch_command(&args.command, &config, original_config, reporter).await;

    process::exit(exit_code)
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
