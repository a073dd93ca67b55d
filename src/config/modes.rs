//! Install modes selected by the `--minimal`, `--skip-optional` and
//! `--docker-only` flags.
use std::fmt;

use super::category_matcher::Category;

/// Which slice of the manifest a run installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Every category.
    #[default]
    Full,
    /// Core tools and language runtimes only.
    Minimal,
    /// Everything except the `optional` category.
    SkipOptional,
    /// Container tooling only; profile and symlinks are left alone.
    DockerOnly,
}

impl InstallMode {
    /// Resolve the mode from the command-line flags.
    ///
    /// `--docker-only` wins over the others (clap rejects the combination
    /// before this is reached). `--minimal` already excludes `optional`, so
    /// adding `--skip-optional` to it changes nothing.
    #[must_use]
    pub const fn from_flags(minimal: bool, skip_optional: bool, docker_only: bool) -> Self {
        if docker_only {
            Self::DockerOnly
        } else if minimal {
            Self::Minimal
        } else if skip_optional {
            Self::SkipOptional
        } else {
            Self::Full
        }
    }

    /// Categories whose manifest sections are active in this mode.
    #[must_use]
    pub fn active_categories(self) -> Vec<Category> {
        match self {
            Self::Full => Category::ALL.to_vec(),
            Self::Minimal => vec![Category::Core, Category::Runtimes],
            Self::SkipOptional => Category::ALL
                .into_iter()
                .filter(|c| *c != Category::Optional)
                .collect(),
            Self::DockerOnly => vec![Category::Docker],
        }
    }

    /// Whether the shell profile and symlink steps run in this mode.
    #[must_use]
    pub const fn configures_home(self) -> bool {
        !matches!(self, Self::DockerOnly)
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Minimal => write!(f, "minimal"),
            Self::SkipOptional => write!(f, "skip-optional"),
            Self::DockerOnly => write!(f, "docker-only"),
        }
    }
}
