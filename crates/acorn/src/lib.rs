//! Acorn - declarative development-environment components
//!
//! The `acorn` library loads component definitions (built in, or overridden
//! per user), installs the tools they need with the platform's package
//! managers, generates their config files and syncs dotfiles into place.
//!
//! # Architecture
//!
//! Side effects go through ports so the domain logic can be tested against
//! mocks: [`commands::CommandRunner`] for running programs,
//! [`fs::FileSystem`] for files and [`component::port::ComponentRepository`]
//! for component lookups.
//!
//! # Main Components
//!
//! - [`component`] - Component definitions, built-ins, overrides and validation
//! - [`installer`] - Install planning, prerequisite resolution and execution
//! - [`configfile`] - Format writers and config file generation
//! - [`filesync`] - Symlink, copy and JSON-merge syncing of dotfiles
//! - [`shell`] - Shell integration snippets
//! - [`platform`] - OS, distro and package manager detection
//! - [`config`] - Application configuration management
//! - [`commands`] - Command execution abstractions
//! - [`fs`] - File system abstractions
//! - [`validation`] - Validation types and utilities

pub mod commands;
pub mod component;
pub mod config;
pub mod configfile;
pub mod filesync;
pub mod fs;
pub mod installer;
pub mod platform;
pub mod shell;
pub mod validation;
