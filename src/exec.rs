//! External command execution behind an injectable [`Executor`] trait.
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::resources::error::ResourceError;

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs and probes `PATH`.
///
/// Resources and tasks only ever reach the OS through this trait so that
/// unit tests can substitute a recording or scripted implementation.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and return its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ExecutionFailed`] on a non-zero exit, or an
    /// I/O error if the program cannot be spawned.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command, allowing failure (returns result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Resolve `program` on `PATH`, the equivalent of `command -v`.
    fn resolve(&self, program: &str) -> Option<PathBuf>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool {
        self.resolve(program).is_some()
    }
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            return Err(ResourceError::ExecutionFailed {
                program: command_label(program, args),
                exit_code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Short human-readable label for a command line, used in error messages.
///
/// `sudo` is looked through so the label names the program doing the work.
fn command_label(program: &str, args: &[&str]) -> String {
    match (program, args.first()) {
        ("sudo", Some(inner)) => format!("sudo {inner}"),
        _ => program.to_string(),
    }
}
