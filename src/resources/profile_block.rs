//! Marker-delimited block in a shell profile.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::{copy_to_timestamped_backup, ensure_parent_dir};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::profile_block::ProfileBlockConfig;

/// A block of shell text kept between a begin and an end marker.
///
/// The begin marker carries the block version; it is matched by its
/// version-less prefix so that an older block is found and replaced.
#[derive(Debug, Clone)]
pub struct ProfileBlockResource {
    /// Profile file the block lives in.
    pub path: PathBuf,
    name: String,
    version: u32,
    body: String,
}

/// Line span of an existing block, end inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockSpan {
    Absent,
    Unterminated,
    Found { begin: usize, end: usize },
}

impl ProfileBlockResource {
    /// Create a profile block resource.
    #[must_use]
    pub fn new(path: PathBuf, name: &str, version: u32, body: &str) -> Self {
        Self {
            path,
            name: name.to_string(),
            version,
            body: body.to_string(),
        }
    }

    /// Build from configuration; `None` when the block body is missing.
    #[must_use]
    pub fn from_config(config: &ProfileBlockConfig, home: &std::path::Path) -> Option<Self> {
        config.body.as_deref().map(|body| {
            Self::new(
                config.target_path(home),
                &config.name,
                config.version,
                body,
            )
        })
    }

    fn begin_prefix(&self) -> String {
        format!("# >>> {} profile", self.name)
    }

    /// The begin marker line, without a trailing newline.
    #[must_use]
    pub fn begin_marker(&self) -> String {
        format!("{} (v{}) >>>", self.begin_prefix(), self.version)
    }

    /// The end marker line, without a trailing newline.
    #[must_use]
    pub fn end_marker(&self) -> String {
        format!("# <<< {} profile <<<", self.name)
    }

    /// The full block as written to the profile.
    #[must_use]
    pub fn render(&self) -> String {
        let body = self.body.trim_end_matches('\n');
        if body.is_empty() {
            format!("{}\n{}\n", self.begin_marker(), self.end_marker())
        } else {
            format!("{}\n{body}\n{}\n", self.begin_marker(), self.end_marker())
        }
    }

    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path)
            .map(Some)
            .with_context(|| format!("read profile: {}", self.path.display()))
    }

    fn locate(&self, lines: &[&str]) -> BlockSpan {
        let prefix = self.begin_prefix();
        let end_marker = self.end_marker();
        let Some(begin) = lines.iter().position(|l| l.trim_end().starts_with(&prefix)) else {
            return BlockSpan::Absent;
        };
        lines
            .iter()
            .enumerate()
            .skip(begin + 1)
            .find(|(_, l)| l.trim_end() == end_marker)
            .map_or(BlockSpan::Unterminated, |(end, _)| BlockSpan::Found {
                begin,
                end,
            })
    }

    fn stamp() -> String {
        chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
    }

    fn write(&self, content: &str) -> Result<()> {
        std::fs::write(&self.path, content)
            .with_context(|| format!("write profile: {}", self.path.display()))
    }
}

impl Applicable for ProfileBlockResource {
    fn description(&self) -> String {
        format!("{} block in {}", self.name, self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let block = self.render();
        let Some(content) = self.read()? else {
            ensure_parent_dir(&self.path)?;
            self.write(&block)?;
            return Ok(ResourceChange::Applied);
        };

        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let updated = match self.locate(&lines) {
            BlockSpan::Unterminated => {
                return Ok(ResourceChange::Skipped {
                    reason: format!(
                        "begin marker without '{}' in {}",
                        self.end_marker(),
                        self.path.display()
                    ),
                });
            }
            BlockSpan::Found { begin, end } => {
                let current = region(&lines, begin, end);
                if current.trim_end() == block.trim_end() {
                    return Ok(ResourceChange::AlreadyCorrect);
                }
                let mut out: String = lines.iter().take(begin).copied().collect();
                out.push_str(&block);
                out.extend(lines.iter().skip(end + 1).copied());
                out
            }
            BlockSpan::Absent => {
                let mut out = content.clone();
                if !out.is_empty() {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push('\n');
                }
                out.push_str(&block);
                out
            }
        };

        copy_to_timestamped_backup(&self.path, &Self::stamp())
            .context("back up shell profile")?;
        self.write(&updated)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ProfileBlockResource {
    fn current_state(&self) -> Result<ResourceState> {
        let Some(content) = self.read()? else {
            return Ok(ResourceState::Missing);
        };
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        Ok(match self.locate(&lines) {
            BlockSpan::Absent => ResourceState::Missing,
            BlockSpan::Unterminated => ResourceState::Invalid {
                reason: format!("begin marker without '{}'", self.end_marker()),
            },
            BlockSpan::Found { begin, end } => {
                let current = region(&lines, begin, end);
                if current.trim_end() == self.render().trim_end() {
                    ResourceState::Correct
                } else {
                    ResourceState::Incorrect {
                        current: lines
                            .get(begin)
                            .map_or_else(String::new, |l| l.trim_end().to_string()),
                    }
                }
            }
        })
    }
}

fn region(lines: &[&str], begin: usize, end: usize) -> String {
    lines
        .iter()
        .skip(begin)
        .take(end.saturating_sub(begin) + 1)
        .copied()
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    fn block(path: PathBuf, version: u32, body: &str) -> ProfileBlockResource {
        ProfileBlockResource::new(path, "devsetup", version, body)
    }

    fn backups(dir: &std::path::Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .contains(".backup.")
            })
            .count()
    }

    #[test]
    fn render_wraps_body_in_markers() {
        let r = block(PathBuf::from("/tmp/x"), 2, "alias ll='eza -l'\n");
        assert_eq!(
            r.render(),
            "# >>> devsetup profile (v2) >>>\nalias ll='eza -l'\n# <<< devsetup profile <<<\n"
        );
    }

    #[test]
    fn missing_profile_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        let r = block(path.clone(), 1, "export EDITOR=nvim");

        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(fs::read_to_string(&path).unwrap(), r.render());
        assert_eq!(backups(dir.path()), 0);
    }

    #[test]
    fn appends_once_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        fs::write(&path, "# existing\nset -o vi").unwrap();
        let r = block(path.clone(), 1, "export EDITOR=nvim\n");

        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(r.apply().unwrap(), ResourceChange::AlreadyCorrect);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# existing\nset -o vi\n\n# >>> devsetup profile"));
        assert_eq!(content.matches("# >>> devsetup profile").count(), 1);
        assert_eq!(backups(dir.path()), 1);
    }

    #[test]
    fn older_version_is_replaced_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        fs::write(
            &path,
            "before\n# >>> devsetup profile (v1) >>>\nalias old=1\n# <<< devsetup profile <<<\nafter\n",
        )
        .unwrap();
        let r = block(path.clone(), 2, "alias new=1\n");

        assert_eq!(
            r.current_state().unwrap(),
            ResourceState::Incorrect {
                current: "# >>> devsetup profile (v1) >>>".to_string()
            }
        );
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "before\n# >>> devsetup profile (v2) >>>\nalias new=1\n# <<< devsetup profile <<<\nafter\n"
        );
    }

    #[test]
    fn edited_body_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        let r = block(path.clone(), 1, "alias g=git\n");
        r.apply().unwrap();
        let edited = fs::read_to_string(&path)
            .unwrap()
            .replace("alias g=git", "alias g=gitx");
        fs::write(&path, edited).unwrap();

        assert!(r.needs_change().unwrap());
        r.apply().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r.render());
    }

    #[test]
    fn unterminated_block_is_invalid_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        let original = "# >>> devsetup profile (v1) >>>\nalias x=1\n";
        fs::write(&path, original).unwrap();
        let r = block(path.clone(), 1, "alias x=1\n");

        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
        assert!(matches!(
            r.apply().unwrap(),
            ResourceChange::Skipped { .. }
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(backups(dir.path()), 0);
    }

    #[test]
    fn other_named_blocks_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        fs::write(
            &path,
            "# >>> conda initialize >>>\nconda stuff\n# <<< conda initialize <<<\n",
        )
        .unwrap();
        let r = block(path.clone(), 1, "alias x=1\n");

        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        r.apply().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# >>> conda initialize >>>"));
        assert!(content.ends_with(&r.render()));
    }

    #[test]
    fn from_config_requires_body() {
        let mut config = ProfileBlockConfig {
            target: ".zshrc".to_string(),
            name: "devsetup".to_string(),
            version: 3,
            source: "profile.sh".to_string(),
            body: None,
        };
        let home = std::path::Path::new("/home/dev");
        assert!(ProfileBlockResource::from_config(&config, home).is_none());

        config.body = Some("alias x=1\n".to_string());
        let r = ProfileBlockResource::from_config(&config, home).unwrap();
        assert_eq!(r.path, PathBuf::from("/home/dev/.zshrc"));
        assert_eq!(r.begin_marker(), "# >>> devsetup profile (v3) >>>");
    }
}
