//! Command-line interface definitions.
use clap::error::ErrorKind;
use clap::{Args, CommandFactory as _, Parser, Subcommand};

use std::path::PathBuf;

use crate::config::modes::InstallMode;

/// Top-level CLI entry point for the development environment bootstrap.
#[derive(Parser, Debug)]
#[command(
    name = "devsetup",
    about = "Idempotent development environment bootstrap for Ubuntu",
    version = crate::commands::version::VERSION
)]
pub struct Cli {
    /// Subcommand to run; `install` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install options used when no subcommand is given.
    #[command(flatten)]
    pub install: InstallOpts,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The command to run: the subcommand, or `install` with the top-level
    /// flags when none is given.
    ///
    /// # Errors
    ///
    /// Returns a usage error when install flags precede a subcommand.
    pub fn resolved_command(&self) -> Result<Command, clap::Error> {
        match &self.command {
            None => Ok(Command::Install(self.install.clone())),
            Some(_) if self.install != InstallOpts::default() => Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "install options must follow the subcommand they apply to",
            )),
            Some(command) => Ok(command.clone()),
        }
    }
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the devsetup root directory (holds conf/ and symlinks/)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install tools, configure the shell profile and link config files
    Install(InstallOpts),
    /// Only link configuration files into $HOME
    Link,
    /// Report what install would change, without changing anything
    Status(StatusOpts),
    /// Print shell completions to stdout
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Link => "link",
            Self::Status(_) => "status",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }

    /// Whether the command changes the system and must not run as root.
    #[must_use]
    pub const fn mutates(&self) -> bool {
        matches!(self, Self::Install(_) | Self::Link)
    }
}

/// Flags selecting which tool categories are active.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeOpts {
    /// Install only the core tools and language runtimes
    #[arg(long)]
    pub minimal: bool,

    /// Skip optional tools
    #[arg(long)]
    pub skip_optional: bool,

    /// Install only container tooling; leaves the shell profile and symlinks alone
    #[arg(long, conflicts_with_all = ["minimal", "skip_optional"])]
    pub docker_only: bool,
}

impl ModeOpts {
    /// Resolve the flags into an [`InstallMode`].
    #[must_use]
    pub const fn mode(&self) -> InstallMode {
        InstallMode::from_flags(self.minimal, self.skip_optional, self.docker_only)
    }
}

/// Options for the `install` subcommand.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOpts {
    /// Category selection.
    #[command(flatten)]
    pub mode: ModeOpts,

    /// Skip tasks whose name contains any of these (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only tasks whose name contains any of these (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Options for the `status` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct StatusOpts {
    /// Category selection.
    #[command(flatten)]
    pub mode: ModeOpts,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for the `completions` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
