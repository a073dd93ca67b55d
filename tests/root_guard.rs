#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for refusing to run as root.

mod common;

use clap::Parser as _;
use devsetup_cli::cli::Cli;
use devsetup_cli::commands;
use devsetup_cli::platform::{Arch, Platform};

use common::TestContextBuilder;

const SYMLINKS_TOML: &str = "[core]\nsymlinks = [\"tmux.conf\"]\n";

fn as_root() -> Platform {
    Platform::new(Arch::X86_64, true, true)
}

#[test]
#[allow(unsafe_code)]
fn root_runs_stop_before_touching_anything() {
    let ctx = TestContextBuilder::new()
        .with_config_file("symlinks.toml", SYMLINKS_TOML)
        .with_symlink_source("tmux.conf")
        .build();
    let cache = tempfile::tempdir().unwrap();
    // SAFETY: this is the only test in this binary, so no other thread reads
    // the environment while it is modified.
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", cache.path());
        std::env::set_var("HOME", ctx.home_path());
    }
    let root: &str = ctx.root_path().to_str().unwrap();

    for args in [
        vec!["devsetup", "--root", root],
        vec!["devsetup", "install", "--root", root],
        vec!["devsetup", "--minimal", "--root", root],
        vec!["devsetup", "link", "--root", root],
    ] {
        let code = commands::run(&Cli::parse_from(args.iter().copied()), as_root());
        assert_eq!(code, 1, "{args:?}");
    }

    assert_eq!(
        std::fs::read_dir(cache.path()).unwrap().count(),
        0,
        "no log directory or file is created"
    );
    assert!(!ctx.home_path().join(".bashrc").exists());
    assert!(ctx.home_path().join(".tmux.conf").symlink_metadata().is_err());

    // Read-only commands still work as root.
    let code = commands::run(&Cli::parse_from(["devsetup", "version"]), as_root());
    assert_eq!(code, 0);
}
