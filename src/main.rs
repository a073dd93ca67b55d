//! `devsetup` binary entry point.
use std::process::ExitCode;

use clap::Parser as _;
use devsetup_cli::cli::Cli;
use devsetup_cli::commands;
use devsetup_cli::platform::Platform;

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if let Err(e) = ctrlc::set_handler(|| std::process::exit(130)) {
        eprintln!("warning: cannot install interrupt handler: {e}");
    }

    ExitCode::from(commands::run(&args, Platform::detect()))
}
