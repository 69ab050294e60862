//! Common test utilities shared across all acorn crates.
//!
//! This crate provides standardized test helpers to eliminate code duplication
//! while maintaining test clarity and ergonomics.

pub mod config;
pub mod constants;
pub mod events;
pub mod fixtures;
pub mod service;

// Re-export the most commonly used items for convenience
pub use config::{
    test_config, test_config_dry_run_with_dir, test_config_verbose, test_config_with_dir,
    test_config_with_dirs,
};
pub use constants::*;
pub use events::{
    assert_failed_install, assert_has_progress_steps, assert_no_errors,
    assert_successful_install, collect_events, get_install_result,
};
pub use fixtures::{
    create_component_file, create_dotfile, create_invalid_component_file,
    create_test_component_file,
};
pub use service::{
    create_dry_run_install_service, create_install_service_with_config, create_test_repository,
    create_test_runner,
};

// Re-export commonly used external dependencies for convenience
pub use acorn::{config::AppConfigBuilder, platform::Platform};
pub use tempfile::TempDir;
