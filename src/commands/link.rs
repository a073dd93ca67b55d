//! Command: link configuration files into `$HOME`.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks};
use crate::cli::GlobalOpts;
use crate::config::modes::InstallMode;
use crate::logging::Logger;
use crate::platform::Platform;
use crate::tasks::{self, Task};

/// Run the link command: install symlinks only.
///
/// Symlinks are loaded for the full mode so every section is linked.
///
/// # Errors
///
/// Returns an error if configuration loading fails or a link cannot be made.
pub fn run(global: &GlobalOpts, platform: Platform, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, InstallMode::Full, platform, log)?;
    let ctx = setup.into_context(global, log)?;

    let link_tasks = tasks::link_tasks();
    let selected: Vec<&dyn Task> = link_tasks.iter().map(AsRef::as_ref).collect();
    run_tasks(&selected, &ctx, log)
}
