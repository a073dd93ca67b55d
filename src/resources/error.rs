//! Typed error variants for resource operations.
//!
//! Resource code returns these variants where the caller needs to inspect
//! the failure (the process exit code is derived from
//! [`ResourceError::ExecutionFailed`]); everything else converts to
//! [`anyhow::Error`] via `?`.

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command invoked by a resource failed with a non-zero exit code.
    #[error("command '{program}' failed (exit {exit_code}): {stderr}")]
    ExecutionFailed {
        /// Name of the program that was invoked.
        program: String,
        /// Exit code returned by the process (`-1` when killed by a signal).
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// A program the install strategy relies on is not on `PATH`.
    #[error("required program not found on PATH: {program}")]
    MissingPrerequisite {
        /// Name of the missing program.
        program: String,
    },

    /// A downloaded file did not match the checksum pinned in the manifest.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// URL the file was fetched from.
        url: String,
        /// Digest recorded in the manifest.
        expected: String,
        /// Digest of the downloaded file.
        actual: String,
    },

    /// A resource exists but is in an unexpected or inconsistent state.
    #[error("invalid state for '{resource}': {reason}")]
    InvalidState {
        /// Name or description of the resource in the invalid state.
        resource: String,
        /// Human-readable explanation of why the state is invalid.
        reason: String,
    },
}

impl ResourceError {
    /// Exit code this error should surface as, if it carries one.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExecutionFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}
