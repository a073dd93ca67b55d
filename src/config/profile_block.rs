//! Shell-profile block configuration.
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::toml_loader;

/// Settings from `profile.toml` plus the block body it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBlockConfig {
    /// Profile path relative to `$HOME`.
    pub target: String,
    /// Name written into the begin/end markers.
    pub name: String,
    /// Version written into the begin marker.
    pub version: u32,
    /// Body file, relative to `conf/`.
    pub source: String,
    /// Body text; `None` when the source file does not exist.
    pub body: Option<String>,
}

impl ProfileBlockConfig {
    /// Absolute path of the shell profile.
    #[must_use]
    pub fn target_path(&self, home: &Path) -> PathBuf {
        home.join(&self.target)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProfileFile {
    target: String,
    name: String,
    version: u32,
    source: String,
}

impl Default for ProfileFile {
    fn default() -> Self {
        Self {
            target: ".bashrc".to_string(),
            name: "devsetup".to_string(),
            version: 1,
            source: "profile.sh".to_string(),
        }
    }
}

/// Load `profile.toml` from `conf_dir` and read the block body.
///
/// # Errors
///
/// Returns an error if `profile.toml` cannot be parsed or the body file
/// exists but cannot be read.
pub fn load(conf_dir: &Path) -> Result<ProfileBlockConfig> {
    let file: ProfileFile = toml_loader::load_config(&conf_dir.join("profile.toml"))?;
    let body_path = conf_dir.join(&file.source);
    let body = if body_path.exists() {
        Some(
            std::fs::read_to_string(&body_path)
                .with_context(|| format!("reading profile block: {}", body_path.display()))?,
        )
    } else {
        None
    };
    Ok(ProfileBlockConfig {
        target: file.target,
        name: file.name,
        version: file.version,
        source: file.source,
        body,
    })
}
