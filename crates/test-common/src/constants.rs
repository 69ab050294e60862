//! Common test constants used across multiple test files.

/// Default dotfiles checkout used when a test never touches it
pub const TEST_DOTFILES_ROOT: &str = "/tmp/test-dotfiles";

/// Default override directory used when a test never touches it
pub const TEST_OVERRIDE_DIR: &str = "/tmp/test-acorn/components";

/// Name of the component written by [`crate::fixtures::create_test_component_file`]
pub const TEST_COMPONENT: &str = "test-tool";

/// Default test component version
pub const TEST_VERSION: &str = "1.0.0";

/// Default timeout for test commands (in seconds)
pub const TEST_COMMAND_TIMEOUT_SECS: u64 = 30;
