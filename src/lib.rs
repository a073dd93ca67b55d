//! Development environment bootstrap engine.
//!
//! Brings a fresh Ubuntu workstation to a known state: installs command-line
//! tools through apt, release downloads, vendor scripts or npm, injects a
//! versioned block into the shell profile, and links configuration files into
//! `$HOME`. Everything is driven by TOML manifests in `conf/` and filtered by
//! the install mode.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse and validate the TOML manifests
//! - **[`resources`]**: idempotent `check + apply` primitives (tools, symlinks, profile block)
//! - **[`tasks`]**: named, dependency-ordered units of work wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `link`, `status`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
