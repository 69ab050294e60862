//! File system port, `std::fs` adapter and path expansion

pub mod expand;
pub mod filesystem;
pub mod real;

pub use expand::{expand_env, expand_with};
pub use filesystem::{FileSystem, FileSystemError};
pub use real::{CONFIG_DIR_ENV, RealFileSystem};

#[cfg(test)]
pub use filesystem::MockFileSystem;
