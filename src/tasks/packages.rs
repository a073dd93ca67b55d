//! Task: refresh the apt package index.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::tools::{InstallStrategy, ToolSpec};

/// Whether `tool` is installed with apt and none of its probes resolve.
fn is_missing_apt_tool(ctx: &Context, tool: &ToolSpec) -> bool {
    matches!(tool.install, InstallStrategy::Apt { .. })
        && !tool.probes().into_iter().any(|p| ctx.executor.which(p))
}

/// Refresh the apt package index before any apt install.
#[derive(Debug)]
pub struct RefreshPackageIndex;

impl Task for RefreshPackageIndex {
    fn name(&self) -> &'static str {
        "Refresh package index"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.uses_apt
            && ctx
                .config
                .tools
                .iter()
                .any(|tool| is_missing_apt_tool(ctx, tool))
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let missing: Vec<&str> = ctx
            .config
            .tools
            .iter()
            .filter(|tool| is_missing_apt_tool(ctx, tool))
            .map(|tool| tool.name.as_str())
            .collect();
        ctx.log
            .debug(&format!("apt tools missing: {}", missing.join(", ")));

        if ctx.dry_run {
            ctx.log.dry_run("would run: sudo apt-get update");
            return Ok(TaskResult::DryRun);
        }

        ctx.executor.run("sudo", &["apt-get", "update"])?;
        ctx.log.info("package index refreshed");
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::tools::ToolSpec;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{empty_config, make_context_with};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn apt_tool(name: &str) -> ToolSpec {
        ToolSpec {
            name: name.to_string(),
            probe: None,
            install: InstallStrategy::Apt {
                packages: vec![name.to_string()],
            },
        }
    }

    fn context(tools: Vec<ToolSpec>, mock: &Arc<MockExecutor>) -> Context {
        let mut config = empty_config(PathBuf::from("/tmp"));
        config.tools = tools;
        make_context_with(config, Arc::clone(mock) as _, PathBuf::from("/home/test"))
    }

    #[test]
    fn runs_when_an_apt_tool_is_missing() {
        let mock = Arc::new(MockExecutor::permissive().with_on_path(&["jq"]));
        let ctx = context(vec![apt_tool("jq"), apt_tool("tmux")], &mock);

        assert!(RefreshPackageIndex.should_run(&ctx));
        RefreshPackageIndex.run(&ctx).unwrap();
        assert_eq!(mock.calls(), vec!["sudo apt-get update"]);
    }

    #[test]
    fn skipped_when_all_apt_tools_present() {
        let mock = Arc::new(MockExecutor::permissive().with_on_path(&["jq", "tmux"]));
        let ctx = context(vec![apt_tool("jq"), apt_tool("tmux")], &mock);
        assert!(!RefreshPackageIndex.should_run(&ctx));
    }

    #[test]
    fn skipped_without_apt_tools() {
        let mock = Arc::new(MockExecutor::permissive());
        let npm = ToolSpec {
            name: "claude".to_string(),
            probe: None,
            install: InstallStrategy::Npm {
                package: "@anthropic-ai/claude-code".to_string(),
            },
        };
        let ctx = context(vec![npm], &mock);
        assert!(!RefreshPackageIndex.should_run(&ctx));
    }

    #[test]
    fn dry_run_does_not_execute() {
        let mock = Arc::new(MockExecutor::permissive());
        let mut ctx = context(vec![apt_tool("jq")], &mock);
        ctx.dry_run = true;

        assert!(matches!(
            RefreshPackageIndex.run(&ctx).unwrap(),
            TaskResult::DryRun
        ));
        assert_eq!(mock.call_count(), 0);
    }
}
