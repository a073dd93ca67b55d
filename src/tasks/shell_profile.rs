//! Task: inject the shell profile block.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources, task_deps};
use crate::resources::profile_block::ProfileBlockResource;

/// Inject or upgrade the devsetup block in the shell profile.
#[derive(Debug)]
pub struct ConfigureShellProfile;

impl Task for ConfigureShellProfile {
    fn name(&self) -> &'static str {
        "Configure shell profile"
    }

    task_deps![super::tools::InstallTools];

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.mode.configures_home()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let profile = &ctx.config.profile;
        let Some(resource) = ProfileBlockResource::from_config(profile, &ctx.home) else {
            return Ok(TaskResult::Skipped(format!(
                "block source conf/{} not found",
                profile.source
            )));
        };
        ctx.log.debug(&format!(
            "profile block v{} -> {}",
            profile.version,
            resource.path.display()
        ));
        process_resources(ctx, [resource], &ProcessOpts::apply_all("update"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::modes::InstallMode;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{empty_config, make_context_with};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    fn context(home: &Path, body: Option<&str>, mode: InstallMode) -> Context {
        let mut config = empty_config(PathBuf::from("/tmp"));
        config.mode = mode;
        config.profile.body = body.map(String::from);
        make_context_with(
            config,
            Arc::new(MockExecutor::default()),
            home.to_path_buf(),
        )
    }

    #[test]
    fn injects_block_once() {
        let home = tempfile::tempdir().unwrap();
        let ctx = context(home.path(), Some("alias ll='eza -l'\n"), InstallMode::Full);

        ConfigureShellProfile.run(&ctx).unwrap();
        ConfigureShellProfile.run(&ctx).unwrap();

        let content = std::fs::read_to_string(home.path().join(".bashrc")).unwrap();
        assert_eq!(content.matches("# >>> devsetup profile").count(), 1);
        assert!(content.contains("alias ll='eza -l'"));
    }

    #[test]
    fn skipped_without_block_source() {
        let home = tempfile::tempdir().unwrap();
        let ctx = context(home.path(), None, InstallMode::Full);

        let result = ConfigureShellProfile.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(_)));
        assert!(!home.path().join(".bashrc").exists());
    }

    #[test]
    fn not_applicable_in_docker_only_mode() {
        let home = tempfile::tempdir().unwrap();
        let ctx = context(home.path(), Some("x\n"), InstallMode::DockerOnly);
        assert!(!ConfigureShellProfile.should_run(&ctx));

        let ctx = context(home.path(), Some("x\n"), InstallMode::Minimal);
        assert!(ConfigureShellProfile.should_run(&ctx));
    }

    #[test]
    fn dry_run_leaves_profile_untouched() {
        let home = tempfile::tempdir().unwrap();
        let mut ctx = context(home.path(), Some("x\n"), InstallMode::Full);
        ctx.dry_run = true;

        assert!(matches!(
            ConfigureShellProfile.run(&ctx).unwrap(),
            TaskResult::DryRun
        ));
        assert!(!home.path().join(".bashrc").exists());
    }
}
