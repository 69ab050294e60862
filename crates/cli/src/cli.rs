use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Acorn - declarative development-environment components
///
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct ClapCli {
    /// Override the dotfiles root from config
    ///
    #[clap(long, global = true)]
    pub(crate) dotfiles_root: Option<PathBuf>,

    /// Show what would change without touching anything
    ///
    #[clap(long, global = true, default_value_t = false)]
    pub(crate) dry_run: bool,

    /// Show detailed output
    ///
    #[clap(long, short = 'v', global = true, default_value_t = false)]
    pub(crate) verbose: bool,

    /// Disable colored output
    ///
    #[clap(long, global = true, default_value_t = false)]
    pub(crate) no_color: bool,

    /// Subcommand to execute
    ///
    #[clap(subcommand)]
    pub(crate) command: ClapCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum ClapCommands {
    /// Component definition commands
    ///
    Component(ComponentCommands),

    /// Show what installing a component would do
    Plan {
        /// Name of the component
        component: String,
    },

    /// Install the tools a component needs
    Install {
        /// Name of the component
        component: String,
    },

    /// Generate a component's config files
    Generate {
        /// Name of the component
        component: String,

        /// Write into this directory instead of the real targets
        #[clap(long)]
        generated_dir: Option<PathBuf>,
    },

    /// Link, copy or merge a component's dotfiles into place
    Sync {
        /// Name of the component
        component: String,
    },

    /// Show whether a component's dotfiles are in place
    SyncStatus {
        /// Name of the component
        component: String,
    },

    /// Print shell integration for a component
    Shell {
        /// Name of the component
        component: String,
    },

    /// Show the detected platform
    Platform,

    /// Configuration management commands
    ///
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ComponentCommands {
    #[clap(subcommand)]
    pub(crate) command: ComponentSubcommands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum ComponentSubcommands {
    /// List available components
    List,

    /// Show information about a component
    Info {
        /// Name of the component to get information about
        name: String,
    },

    /// Validate one component, or all of them
    Validate {
        /// Name of the component to validate
        name: Option<String>,
    },

    /// Copy a built-in component into the override directory for editing
    Override {
        /// Name of the built-in component
        name: String,

        /// Replace an existing override without asking
        #[clap(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ConfigCommands {
    #[clap(subcommand)]
    pub(crate) command: ConfigSubcommands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum ConfigSubcommands {
    /// Validate the acorn configuration
    Validate,
}
