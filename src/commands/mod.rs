//! Subcommand implementations and the setup they share.
pub mod completions;
pub mod install;
pub mod link;
pub mod status;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Config;
use crate::config::modes::InstallMode;
use crate::error::{ConfigError, PreconditionError, exit_code};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger, init_subscriber};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task, graph};

/// Environment variable overriding the root directory.
pub const ROOT_ENV: &str = "DEVSETUP_ROOT";

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Detected platform.
    pub platform: Platform,
    /// Configuration filtered for the requested mode.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the root and load all configuration for `platform`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined or any
    /// manifest fails to parse.
    pub fn init(
        global: &GlobalOpts,
        mode: InstallMode,
        platform: Platform,
        log: &Logger,
    ) -> Result<Self> {
        let root = resolve_root(global)?;
        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("platform: {} (apt: {})", platform.arch, platform.uses_apt));

        log.stage("Loading configuration");
        let config = Config::load(&root, mode)?;
        log.info(&format!(
            "{mode} mode: {} tools, {} symlinks",
            config.tools.len(),
            config.symlinks.len()
        ));

        let warnings = config.validate(&platform);
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { platform, config })
    }

    /// Build the task context, running commands on the real system.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is not set.
    pub fn into_context(self, global: &GlobalOpts, log: &Arc<Logger>) -> Result<Context> {
        Context::new(
            Arc::new(self.config),
            Arc::new(self.platform),
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            Arc::new(SystemExecutor),
        )
    }
}

/// Run the command selected by `cli` on `platform` and return the process
/// exit code.
///
/// The root check happens before logging is initialised, so a refused run
/// leaves no log file behind.
#[allow(clippy::print_stderr)]
#[must_use]
pub fn run(cli: &Cli, platform: Platform) -> u8 {
    let command = match cli.resolved_command() {
        Ok(command) => command,
        Err(e) => {
            let _ = e.print();
            return u8::try_from(e.exit_code()).unwrap_or(2);
        }
    };

    if command.mutates()
        && let Err(e) = ensure_not_root(&platform)
    {
        eprintln!("error: {e}");
        return 1;
    }

    let json_status = matches!(&command, Command::Status(opts) if opts.json);
    let console = matches!(
        command,
        Command::Install(_) | Command::Link | Command::Status(_)
    );
    if console && !json_status {
        init_subscriber(cli.verbose, command.log_name());
    }
    let log = Arc::new(Logger::new(command.log_name()));

    let result = match &command {
        Command::Install(opts) => install::run(&cli.global, opts, platform, &log),
        Command::Link => link::run(&cli.global, platform, &log),
        Command::Status(opts) => status::run(&cli.global, opts, platform, &log),
        Command::Completions(opts) => {
            completions::run(opts.shell);
            Ok(())
        }
        Command::Version => {
            version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e:#}");
            u8::try_from(exit_code(&e)).unwrap_or(1)
        }
    }
}

/// Refuse to run as root.
///
/// # Errors
///
/// Returns [`PreconditionError::RunningAsRoot`] when the effective UID is 0.
pub const fn ensure_not_root(platform: &Platform) -> Result<(), PreconditionError> {
    if platform.is_root {
        return Err(PreconditionError::RunningAsRoot);
    }
    Ok(())
}

/// Execute `tasks` in dependency order, stopping at the first failure, then
/// print the summary.
///
/// # Errors
///
/// Returns the first task failure, or a dependency-cycle error.
pub fn run_tasks(task_list: &[&dyn Task], ctx: &Context, log: &Logger) -> Result<()> {
    let ordered = graph::execution_order(task_list)?;
    let outcome = ordered
        .into_iter()
        .try_for_each(|task| tasks::execute(task, ctx));
    log.print_summary();
    outcome
}

/// Resolve the root directory holding `conf/` and `symlinks/`.
///
/// Checks `--root`, then `DEVSETUP_ROOT`, then the directories around the
/// running binary, then the current directory. The result is always absolute
/// so symlinks created from it resolve regardless of where they live.
///
/// # Errors
///
/// Returns [`ConfigError::RootNotFound`] if no candidate contains `conf/`,
/// or if an explicit root does not exist or lacks `conf/`.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return canonical_root(root);
    }

    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return canonical_root(Path::new(&root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        // target/release/ → repo root, or bin/ → install prefix
        let candidates = [parent.join("../.."), parent.join("..")];
        if let Some(root) = candidates.iter().find(|c| is_root(c)) {
            return Ok(dunce::canonicalize(root)?);
        }
    }

    let cwd = std::env::current_dir()?;
    if is_root(&cwd) {
        return Ok(cwd);
    }

    Err(ConfigError::RootNotFound.into())
}

fn canonical_root(dir: &Path) -> Result<PathBuf> {
    let root = dunce::canonicalize(dir).map_err(|_| ConfigError::RootNotFound)?;
    if !is_root(&root) {
        return Err(ConfigError::RootNotFound.into());
    }
    Ok(root)
}

fn is_root(dir: &Path) -> bool {
    dir.join("conf").is_dir()
}
