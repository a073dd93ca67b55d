//! Command: install tools, the shell profile block and symlinks.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks};
use crate::cli::{GlobalOpts, InstallOpts};
use crate::logging::Logger;
use crate::platform::Platform;
use crate::tasks::{self, Task};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(
    global: &GlobalOpts,
    opts: &InstallOpts,
    platform: Platform,
    log: &Arc<Logger>,
) -> Result<()> {
    let mode = opts.mode.mode();
    log.info(&format!("devsetup {} ({mode} mode)", super::version::VERSION));

    let setup = CommandSetup::init(global, mode, platform, log)?;
    let ctx = setup.into_context(global, log)?;

    let all_tasks = tasks::all_install_tasks();
    let selected = select_tasks(&all_tasks, &opts.skip, &opts.only);
    run_tasks(&selected, &ctx, log)
}

/// Filter tasks by `--skip` and `--only` (case-insensitive name substrings).
///
/// `--only` wins when both are given.
#[must_use]
pub fn select_tasks<'a>(
    all_tasks: &'a [Box<dyn Task>],
    skip: &[String],
    only: &[String],
) -> Vec<&'a dyn Task> {
    let contains_any = |name: &str, needles: &[String]| {
        needles
            .iter()
            .any(|needle| name.contains(&needle.to_lowercase()))
    };
    all_tasks
        .iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !only.is_empty() {
                return contains_any(&name, only);
            }
            !contains_any(&name, skip)
        })
        .map(AsRef::as_ref)
        .collect()
}
