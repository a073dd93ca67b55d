// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed repository, a fake home directory and
// an executor that simulates apt and npm, so each integration test can run
// real tasks without touching the host.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use devsetup_cli::config::Config;
use devsetup_cli::config::modes::InstallMode;
use devsetup_cli::exec::{ExecResult, Executor};
use devsetup_cli::logging::{Log, Logger};
use devsetup_cli::platform::{Arch, Platform};
use devsetup_cli::tasks::Context;

/// Write the minimal set of files required by the engine into `root`.
///
/// Creates:
/// - `conf/tools.toml`    : empty tool manifest
/// - `conf/symlinks.toml` : empty symlink manifest
/// - `conf/profile.toml`  : profile block targeting `.bashrc`
/// - `conf/profile.sh`    : profile block body
/// - `symlinks/`          : directory holding link sources
pub fn setup_minimal_repo(root: &Path) {
    let conf = root.join("conf");
    std::fs::create_dir_all(&conf).expect("create conf dir");
    std::fs::create_dir_all(root.join("symlinks")).expect("create symlinks dir");

    std::fs::write(conf.join("tools.toml"), "").expect("write tools.toml");
    std::fs::write(conf.join("symlinks.toml"), "").expect("write symlinks.toml");
    std::fs::write(
        conf.join("profile.toml"),
        "target = \".bashrc\"\nname = \"devsetup\"\nversion = 1\nsource = \"profile.sh\"\n",
    )
    .expect("write profile.toml");
    std::fs::write(
        conf.join("profile.sh"),
        "export PATH=\"$HOME/.local/bin:$PATH\"\n",
    )
    .expect("write profile.sh");
}

/// Executor that records every command and simulates package managers.
///
/// `sudo apt-get install -y <pkgs>` and `sudo npm install -g <pkg>` put the
/// installed names on the fake `PATH`; everything else succeeds silently.
#[derive(Debug, Default)]
pub struct FakeSystem {
    on_path: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSystem {
    /// A fake system where `programs` are already installed.
    pub fn with_installed(programs: &[&str]) -> Self {
        let system = Self::default();
        system
            .on_path
            .lock()
            .unwrap()
            .extend(programs.iter().map(ToString::to_string));
        system
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls, keeping installed programs.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, program: &str, args: &[&str]) {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line);

        let installed: Vec<&str> = match (program, args) {
            ("sudo", ["apt-get", "install", "-y", packages @ ..]) => packages.to_vec(),
            ("sudo", ["npm", "install", "-g", package]) => vec![*package],
            _ => vec![],
        };
        self.on_path
            .lock()
            .unwrap()
            .extend(installed.into_iter().map(ToString::to_string));
    }
}

impl Executor for FakeSystem {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.run_unchecked(program, args)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.record(program, args);
        Ok(ExecResult {
            success: true,
            code: Some(0),
            ..ExecResult::default()
        })
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.on_path
            .lock()
            .unwrap()
            .contains(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// An isolated repository and home directory backed by temp dirs.
///
/// Both directories are deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory containing the test repository.
    pub root: tempfile::TempDir,
    /// Temporary directory standing in for `$HOME`.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with a minimal but valid repository structure.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let home = tempfile::tempdir().expect("create home dir");
        setup_minimal_repo(root.path());
        Self { root, home }
    }

    /// Path to the repository root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the fake home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Load configuration for `mode`.
    pub fn load_config(&self, mode: InstallMode) -> Config {
        Config::load(self.root.path(), mode).expect("load config")
    }

    /// Build a task context for `mode` that runs commands on `executor`.
    pub fn task_context(
        &self,
        mode: InstallMode,
        executor: Arc<dyn Executor>,
    ) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new("test"));
        let ctx = Context {
            config: Arc::new(self.load_config(mode)),
            platform: Arc::new(Platform::new(Arch::X86_64, true, false)),
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run: false,
            home: self.home.path().to_path_buf(),
            executor,
        };
        (ctx, log)
    }

    /// Read a file under the fake home directory.
    pub fn read_home_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.home.path().join(relative)).expect("read home file")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to customise the repository before the context
/// is finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by a minimal repository.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `conf/<filename>` in the test repository,
    /// overwriting any file written by [`setup_minimal_repo`].
    pub fn with_config_file(self, filename: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join("conf").join(filename);
        std::fs::write(path, content).expect("write config file");
        self
    }

    /// Create a source file inside the `symlinks/` directory.
    pub fn with_symlink_source(self, source: &str) -> Self {
        let path = self.ctx.root.path().join("symlinks").join(source);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create symlink source parent");
        }
        std::fs::write(&path, format!("# {source}\n")).expect("write symlink source file");
        self
    }

    /// Write `content` to `<home>/<relative>` before the run.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.home.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home file parent");
        }
        std::fs::write(&path, content).expect("write home file");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
