//! Task: install every tool in the active categories.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources, task_deps};
use crate::resources::tool::ToolResource;

/// Ensure every active tool record resolves on `PATH`.
#[derive(Debug)]
pub struct InstallTools;

impl Task for InstallTools {
    fn name(&self) -> &'static str {
        "Install tools"
    }

    task_deps![super::packages::RefreshPackageIndex];

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.tools.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.debug(&format!(
            "{} tools active in {} mode",
            ctx.config.tools.len(),
            ctx.config.mode
        ));
        let resources = ctx
            .config
            .tools
            .iter()
            .map(|spec| ToolResource::new(spec, &ctx.platform, ctx.executor.as_ref()));
        process_resources(
            ctx,
            resources,
            &ProcessOpts::apply_all("install").report_correct("already installed"),
        )
    }
}
