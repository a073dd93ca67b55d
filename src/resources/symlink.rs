//! Symlink resource with backup-on-conflict.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_parent_dir, entry_exists, move_to_backup};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A symlink resource that can be checked and applied.
///
/// Anything already at `target` that is not the desired link is renamed to
/// `<target>.backup` before the link is created.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.source.exists() {
            return Ok(ResourceChange::Skipped {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }
        if self.current_state()? == ResourceState::Correct {
            return Ok(ResourceChange::AlreadyCorrect);
        }

        ensure_parent_dir(&self.target)?;
        move_to_backup(&self.target)
            .with_context(|| format!("back up existing: {}", self.target.display()))?;
        create_symlink(&self.source, &self.target)?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        if let Ok(existing) = std::fs::read_link(&self.target) {
            return Ok(if existing == self.source {
                ResourceState::Correct
            } else {
                ResourceState::Incorrect {
                    current: format!("points to {}", existing.display()),
                }
            });
        }

        if self.target.is_dir() {
            Ok(ResourceState::Incorrect {
                current: "existing directory".to_string(),
            })
        } else if entry_exists(&self.target) {
            Ok(ResourceState::Incorrect {
                current: "existing file".to_string(),
            })
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })
}
