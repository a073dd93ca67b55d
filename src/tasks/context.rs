//! Shared state handed to every task.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::error::ConfigError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;

/// Shared context for task execution.
pub struct Context {
    /// Configuration loaded from the TOML manifests.
    pub config: Arc<Config>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// User's home directory path.
    pub home: PathBuf,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("executor", &self.executor)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution, reading `$HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeNotSet`] if `HOME` is not set.
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::HomeNotSet)?;

        Ok(Self {
            config,
            platform,
            log,
            dry_run,
            home: PathBuf::from(home),
            executor,
        })
    }

    /// Root directory holding `conf/` and `symlinks/`.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.config.root
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            platform: Arc::clone(&self.platform),
            log,
            dry_run: self.dry_run,
            home: self.home.clone(),
            executor: Arc::clone(&self.executor),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use crate::tasks::test_helpers::{empty_config, make_context};
    use std::path::Path;

    #[test]
    fn root_returns_config_root() {
        let ctx = make_context(empty_config(PathBuf::from("/devsetup")));
        assert_eq!(ctx.root(), Path::new("/devsetup"));
    }

    #[test]
    fn with_log_preserves_other_fields() {
        let ctx = make_context(empty_config(PathBuf::from("/devsetup")));
        let new_log: Arc<dyn Log> = Arc::new(Logger::new("new"));
        let ctx2 = ctx.with_log(new_log);
        assert_eq!(ctx2.root(), ctx.root());
        assert_eq!(ctx2.dry_run, ctx.dry_run);
        assert_eq!(ctx2.home, ctx.home);
    }

    #[test]
    fn debug_format_includes_key_fields() {
        let ctx = make_context(empty_config(PathBuf::from("/devsetup")));
        let debug = format!("{ctx:?}");
        assert!(debug.contains("Context"));
        assert!(debug.contains("dry_run"));
        assert!(debug.contains("home"));
    }
}
