//! Jar installer library.
//!
//! This crate scans a directory tree laid out as
//! `<group>/<artifact>-<version>.<ext>` and registers every archive in the
//! local Maven repository with `mvn install:install-file`. It is used by the
//! `jar-installer` CLI binary and can be consumed programmatically for testing
//! or custom installation workflows.
//!
//! # Modules
//!
//! - [`artifact_name`] - Decomposition of archive filenames into artifact id and version
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - External command execution seam
//! - [`config`] - Layered configuration (defaults, TOML file, environment, flags)
//! - [`error`] - Semantic error types
//! - [`group_id`] - Semantic wrapper for group identifiers
//! - [`install_command`] - Rendering of the Maven install invocation
//! - [`installer`] - Batch orchestration
//! - [`report`] - Human-readable and JSON output
//! - [`scanner`] - Repository scanner for discovering archives

pub mod artifact_name;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod group_id;
pub mod install_command;
pub mod installer;
pub mod report;
pub mod scanner;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
