//! Task: link configuration files into `$HOME`.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::symlink::SymlinkResource;

/// Link configuration sources from `symlinks/` into `$HOME`.
#[derive(Debug)]
pub struct InstallSymlinks;

impl Task for InstallSymlinks {
    fn name(&self) -> &'static str {
        "Install symlinks"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.mode.configures_home() && !ctx.config.symlinks.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resources = ctx.config.symlinks.iter().map(|symlink| {
            SymlinkResource::new(
                symlink.source_path(ctx.root()),
                symlink.target_path(&ctx.home),
            )
        });
        process_resources(ctx, resources, &ProcessOpts::apply_all("link"))
    }
}
