//! Symlink configuration loading.
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::category_matcher::Category;
use super::toml_loader;

/// A symlink to create: source (in symlinks/) → target (in $HOME).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symlink {
    /// Relative path under symlinks/ directory.
    pub source: String,
    /// Explicit target path relative to `$HOME`; derived by convention when absent.
    pub target: Option<String>,
}

impl Symlink {
    /// Where the link is created.
    ///
    /// Without an explicit target the source path is dotted under `$HOME`:
    /// `config/nvim` becomes `~/.config/nvim`.
    #[must_use]
    pub fn target_path(&self, home: &Path) -> PathBuf {
        self.target.as_ref().map_or_else(
            || home.join(format!(".{}", self.source)),
            |target| home.join(target),
        )
    }

    /// Absolute path of the link source.
    #[must_use]
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join("symlinks").join(&self.source)
    }
}

/// A single entry in a symlinks section: a plain source path, or a
/// `{ source, target }` pair with an explicit target.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SymlinkEntry {
    /// `"config/nvim"`; the target is derived by convention.
    Simple(String),
    /// `{ source = "foo", target = ".bar" }`.
    WithTarget { source: String, target: String },
}

/// TOML section containing symlinks.
#[derive(Debug, Deserialize)]
struct SymlinkSection {
    symlinks: Vec<SymlinkEntry>,
}

/// Load symlinks from symlinks.toml, filtered by active categories.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path, active_categories: &[Category]) -> Result<Vec<Symlink>> {
    let items = toml_loader::load_section_items(path, |s: SymlinkSection| s.symlinks)?;

    let entries: Vec<SymlinkEntry> = toml_loader::filter_by_categories(items, active_categories);

    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            SymlinkEntry::Simple(source) => Symlink {
                source,
                target: None,
            },
            SymlinkEntry::WithTarget { source, target } => Symlink {
                source,
                target: Some(target),
            },
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::{assert_load_missing_returns_empty, write_temp_toml};

    #[test]
    fn load_core_symlinks() {
        let (_dir, path) = write_temp_toml(
            r#"[core]
symlinks = ["config/nvim", "config/tmux"]

[optional]
symlinks = ["config/lazygit"]
"#,
        );
        let symlinks: Vec<Symlink> = load(&path, &[Category::Core]).unwrap();
        assert_eq!(symlinks.len(), 2);
        assert_eq!(symlinks[0].source, "config/nvim");
        assert_eq!(symlinks[1].source, "config/tmux");
    }

    #[test]
    fn load_multi_category() {
        let (_dir, path) = write_temp_toml(
            r#"[core]
symlinks = ["config/nvim"]

["docker-optional"]
symlinks = ["config/lazydocker"]
"#,
        );
        let symlinks: Vec<Symlink> =
            load(&path, &[Category::Core, Category::Docker, Category::Optional]).unwrap();
        assert_eq!(symlinks.len(), 2);
        let symlinks: Vec<Symlink> = load(&path, &[Category::Core, Category::Docker]).unwrap();
        assert_eq!(symlinks.len(), 1);
    }

    #[test]
    fn load_explicit_target_override() {
        let (_dir, path) = write_temp_toml(
            r#"[core]
symlinks = [
  "config/nvim",
  { source = "starship.toml", target = ".config/starship.toml" },
]
"#,
        );
        let symlinks: Vec<Symlink> = load(&path, &[Category::Core]).unwrap();
        assert_eq!(symlinks.len(), 2);
        assert!(symlinks[0].target.is_none());
        assert_eq!(symlinks[1].source, "starship.toml");
        assert_eq!(symlinks[1].target.as_deref(), Some(".config/starship.toml"));
    }

    #[test]
    fn target_path_convention_and_override() {
        let home = Path::new("/home/dev");
        let plain = Symlink {
            source: "config/nvim".to_string(),
            target: None,
        };
        assert_eq!(plain.target_path(home), PathBuf::from("/home/dev/.config/nvim"));

        let explicit = Symlink {
            source: "starship.toml".to_string(),
            target: Some(".config/starship.toml".to_string()),
        };
        assert_eq!(
            explicit.target_path(home),
            PathBuf::from("/home/dev/.config/starship.toml")
        );
        assert_eq!(
            explicit.source_path(Path::new("/repo")),
            PathBuf::from("/repo/symlinks/starship.toml")
        );
    }

    #[test]
    fn load_missing_file_returns_empty() {
        assert_load_missing_returns_empty(load);
    }
}
