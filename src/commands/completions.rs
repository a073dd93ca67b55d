//! Command: print shell completions.
use clap::CommandFactory as _;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write the completion script for `shell` to stdout.
pub fn run(shell: Shell) {
    clap_complete::generate(shell, &mut Cli::command(), "devsetup", &mut std::io::stdout());
}
