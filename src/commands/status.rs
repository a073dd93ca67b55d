//! Command: report what `install` would change.
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use super::CommandSetup;
use crate::cli::{GlobalOpts, StatusOpts};
use crate::logging::Logger;
use crate::platform::Platform;
use crate::resources::profile_block::ProfileBlockResource;
use crate::resources::symlink::SymlinkResource;
use crate::resources::tool::ToolResource;
use crate::resources::{Resource, ResourceState};
use crate::tasks::Context;

/// Snapshot of every resource `install` manages in the selected mode.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Install mode the report was built for.
    pub mode: String,
    /// Tool presence, in manifest order.
    pub tools: Vec<ToolStatus>,
    /// Symlink states, in manifest order.
    pub symlinks: Vec<SymlinkStatus>,
    /// Profile block state; absent when the mode leaves `$HOME` alone or the
    /// block body is missing.
    pub profile: Option<ProfileStatus>,
}

/// Presence of a single tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    /// Tool name.
    pub name: String,
    /// Install method that would be used.
    pub method: String,
    /// What the installer would run.
    pub plan: String,
    /// Whether any probe resolved on `PATH`.
    pub installed: bool,
    /// Resolved location of the first matching probe.
    pub path: Option<String>,
}

/// State of a single managed symlink.
#[derive(Debug, Clone, Serialize)]
pub struct SymlinkStatus {
    /// File under `symlinks/`.
    pub source: String,
    /// Link location under `$HOME`.
    pub target: String,
    /// One of `ok`, `missing`, `conflict: ...` or `invalid: ...`.
    pub state: String,
}

/// State of the shell-profile block.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileStatus {
    /// Shell profile path.
    pub path: String,
    /// One of `ok`, `missing`, `outdated: ...` or `invalid: ...`.
    pub state: String,
}

impl StatusReport {
    /// Number of resources `install` would change.
    #[must_use]
    pub fn pending(&self) -> usize {
        let tools = self.tools.iter().filter(|t| !t.installed).count();
        let links = self.symlinks.iter().filter(|s| s.state != "ok").count();
        let profile = usize::from(self.profile.as_ref().is_some_and(|p| p.state != "ok"));
        tools + links + profile
    }
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or a resource state cannot
/// be read.
#[allow(clippy::print_stdout)]
pub fn run(
    global: &GlobalOpts,
    opts: &StatusOpts,
    platform: Platform,
    log: &Arc<Logger>,
) -> Result<()> {
    let setup = CommandSetup::init(global, opts.mode.mode(), platform, log)?;
    let ctx = setup.into_context(global, log)?;
    let report = build_report(&ctx)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    log.stage("Tools");
    for tool in &report.tools {
        match &tool.path {
            Some(path) => log.info(&format!("{}: installed ({path})", tool.name)),
            None => log.warn(&format!("{}: missing, would run {}", tool.name, tool.plan)),
        }
    }

    if !report.symlinks.is_empty() {
        log.stage("Symlinks");
        for link in &report.symlinks {
            log.info(&format!("{} -> {}: {}", link.target, link.source, link.state));
        }
    }

    if let Some(profile) = &report.profile {
        log.stage("Shell profile");
        log.info(&format!("{}: {}", profile.path, profile.state));
    }

    log.info(&format!("{} change(s) pending", report.pending()));
    Ok(())
}

/// Inspect every managed resource without changing anything.
///
/// # Errors
///
/// Returns an error if a symlink or profile state cannot be read.
pub fn build_report(ctx: &Context) -> Result<StatusReport> {
    let config = &ctx.config;

    let tools = config
        .tools
        .iter()
        .map(|spec| {
            let resource = ToolResource::new(spec, &ctx.platform, ctx.executor.as_ref());
            let found = resource.found_at();
            ToolStatus {
                name: spec.name.clone(),
                method: spec.install.method().to_string(),
                plan: resource.plan(),
                installed: found.is_some(),
                path: found.map(|(_, path)| path.display().to_string()),
            }
        })
        .collect();

    if !config.mode.configures_home() {
        return Ok(StatusReport {
            mode: config.mode.to_string(),
            tools,
            symlinks: Vec::new(),
            profile: None,
        });
    }

    let symlinks = config
        .symlinks
        .iter()
        .map(|symlink| {
            let resource = SymlinkResource::new(
                symlink.source_path(ctx.root()),
                symlink.target_path(&ctx.home),
            );
            Ok(SymlinkStatus {
                source: symlink.source.clone(),
                target: resource.target.display().to_string(),
                state: state_label(&resource.current_state()?, "conflict"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let profile = ProfileBlockResource::from_config(&config.profile, &ctx.home)
        .map(|block| -> Result<ProfileStatus> {
            Ok(ProfileStatus {
                path: block.path.display().to_string(),
                state: state_label(&block.current_state()?, "outdated"),
            })
        })
        .transpose()?;

    Ok(StatusReport {
        mode: config.mode.to_string(),
        tools,
        symlinks,
        profile,
    })
}

fn state_label(state: &ResourceState, mismatch: &str) -> String {
    match state {
        ResourceState::Correct => "ok".to_string(),
        ResourceState::Missing => "missing".to_string(),
        ResourceState::Incorrect { current } => format!("{mismatch}: {current}"),
        ResourceState::Invalid { reason } => format!("invalid: {reason}"),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::modes::InstallMode;
    use crate::config::symlinks::Symlink;
    use crate::config::tools::{InstallStrategy, ToolSpec};
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{empty_config, make_context_with};

    fn apt_tool(name: &str) -> ToolSpec {
        ToolSpec {
            name: name.to_string(),
            probe: None,
            install: InstallStrategy::Apt {
                packages: vec![name.to_string()],
            },
        }
    }

    #[test]
    fn reports_tool_presence() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let mut config = empty_config(root.path().to_path_buf());
        config.tools = vec![apt_tool("jq"), apt_tool("tmux")];
        let executor = Arc::new(MockExecutor::default().with_on_path(&["jq"]));
        let ctx = make_context_with(config, executor, home.path().to_path_buf());

        let report = build_report(&ctx).unwrap();

        assert!(report.tools[0].installed);
        assert!(report.tools[0].path.is_some());
        assert!(!report.tools[1].installed);
        assert_eq!(report.tools[1].method, "apt");
        assert_eq!(report.tools[1].plan, "apt-get install -y tmux");
        assert!(report.profile.is_none(), "no body means no profile entry");
        assert_eq!(report.pending(), 1);
    }

    #[test]
    fn reports_symlink_and_profile_states() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("symlinks")).unwrap();
        std::fs::write(root.path().join("symlinks/tmux.conf"), "set -g mouse on\n").unwrap();

        let mut config = empty_config(root.path().to_path_buf());
        config.symlinks = vec![Symlink {
            source: "tmux.conf".to_string(),
            target: Some(".tmux.conf".to_string()),
        }];
        config.profile.body = Some("export EDITOR=nvim\n".to_string());
        let ctx = make_context_with(
            config,
            Arc::new(MockExecutor::default()),
            home.path().to_path_buf(),
        );

        let report = build_report(&ctx).unwrap();

        assert_eq!(report.symlinks[0].state, "missing");
        assert_eq!(report.profile.as_ref().unwrap().state, "missing");
        assert_eq!(report.pending(), 2);
    }

    #[test]
    fn docker_only_reports_tools_only() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let mut config = empty_config(root.path().to_path_buf());
        config.mode = InstallMode::DockerOnly;
        config.symlinks = vec![Symlink {
            source: "tmux.conf".to_string(),
            target: None,
        }];
        config.profile.body = Some("export EDITOR=nvim\n".to_string());
        let ctx = make_context_with(
            config,
            Arc::new(MockExecutor::default()),
            home.path().to_path_buf(),
        );

        let report = build_report(&ctx).unwrap();

        assert!(report.symlinks.is_empty());
        assert!(report.profile.is_none());
        assert_eq!(report.mode, InstallMode::DockerOnly.to_string());
    }

    #[test]
    fn report_serializes_to_json() {
        let report = StatusReport {
            mode: "full".to_string(),
            tools: vec![ToolStatus {
                name: "jq".to_string(),
                method: "apt".to_string(),
                plan: "apt-get install -y jq".to_string(),
                installed: false,
                path: None,
            }],
            symlinks: vec![],
            profile: None,
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        assert_eq!(value["tools"][0]["name"], "jq");
        assert_eq!(value["tools"][0]["installed"], false);
        assert!(value["profile"].is_null());
    }

    #[test]
    fn state_labels() {
        assert_eq!(state_label(&ResourceState::Correct, "conflict"), "ok");
        assert_eq!(
            state_label(
                &ResourceState::Incorrect {
                    current: "/etc/x".to_string()
                },
                "conflict"
            ),
            "conflict: /etc/x"
        );
    }
}
