//! Domain-specific error types for the devsetup engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`TaskError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError       - manifest parsing and root resolution
//! PreconditionError - checks that must pass before anything is mutated
//! TaskError         - task scheduling issues
//! ResourceError     - failing commands, checksums, invalid resource state
//! ```

use thiserror::Error;

pub use crate::resources::error::ResourceError;

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A manifest file contains a TOML syntax or schema error.
    #[error("invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path of the offending file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// A manifest section is not a table of the expected shape.
    #[error("invalid section [{section}] in {file}: {message}")]
    InvalidSection {
        /// Path of the offending file.
        file: String,
        /// Section name as written in the file.
        section: String,
        /// Deserializer message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// No candidate directory contains a `conf/` directory.
    #[error("cannot determine devsetup root: pass --root or set DEVSETUP_ROOT")]
    RootNotFound,

    /// `$HOME` is unset or empty.
    #[error("HOME is not set")]
    HomeNotSet,
}

/// Checks that must pass before any filesystem mutation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PreconditionError {
    /// The process runs with an effective UID of 0.
    #[error("do not run devsetup as root; it invokes sudo where elevation is needed")]
    RunningAsRoot,
}

/// Errors that arise during task scheduling.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The task dependency graph contains a cycle.
    #[error("task dependency cycle detected: {0}")]
    DependencyCycle(String),
}

/// Map an error chain onto a process exit code.
///
/// The first [`ResourceError::ExecutionFailed`] found in the chain decides
/// the code, so the process exits the way the failing command did. Anything
/// else exits with 1.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ResourceError>())
        .find_map(ResourceError::exit_code)
        .filter(|code| *code > 0)
        .unwrap_or(1)
}
