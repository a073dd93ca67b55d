//! Manifest loading for the tool, symlink and profile-block configuration.
pub mod category_matcher;
pub mod modes;
pub mod profile_block;
pub mod symlinks;
pub mod toml_loader;
pub mod tools;
pub mod validation;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::platform::Platform;
use modes::InstallMode;

/// All loaded configuration for one run.
#[derive(Debug)]
pub struct Config {
    /// Repository root containing `conf/` and `symlinks/`.
    pub root: PathBuf,
    /// Mode the configuration was filtered for.
    pub mode: InstallMode,
    /// Tool records active in `mode`, in manifest order.
    pub tools: Vec<tools::ToolSpec>,
    /// Symlinks active in `mode`.
    pub symlinks: Vec<symlinks::Symlink>,
    /// Shell-profile block settings.
    pub profile: profile_block::ProfileBlockConfig,
}

impl Config {
    /// Load all configuration for `mode` from the `conf/` directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any manifest fails to parse.
    pub fn load(root: &Path, mode: InstallMode) -> Result<Self> {
        let conf = root.join("conf");
        let active_categories = mode.active_categories();

        let tools = tools::load(&conf.join("tools.toml"), &active_categories)
            .context("loading tools.toml")?;

        let symlinks = symlinks::load(&conf.join("symlinks.toml"), &active_categories)
            .context("loading symlinks.toml")?;

        let profile = profile_block::load(&conf).context("loading profile.toml")?;

        Ok(Self {
            root: root.to_path_buf(),
            mode,
            tools,
            symlinks,
            profile,
        })
    }

    /// Validate the loaded configuration and return any warnings.
    #[must_use]
    pub fn validate(&self, platform: &Platform) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self, platform)
    }
}

/// Shared fixtures for config unit tests.
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub mod test_helpers {
    use super::category_matcher::Category;
    use std::fmt::Debug;
    use std::path::{Path, PathBuf};

    /// Write `content` to a `config.toml` inside a fresh temp directory.
    pub fn write_temp_toml(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    /// Assert that `load` returns no items for a file that does not exist.
    pub fn assert_load_missing_returns_empty<T: Debug>(
        load: impl Fn(&Path, &[Category]) -> anyhow::Result<Vec<T>>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let items = load(&dir.path().join("missing.toml"), &Category::ALL).unwrap();
        assert!(items.is_empty(), "expected no items, got {items:?}");
    }
}
