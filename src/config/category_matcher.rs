//! Category tags used to gate manifest sections.
use std::fmt;

/// A category tag from a manifest section name.
///
/// Section names combine tags with `-` (e.g. `["docker-optional"]`); a
/// section is active only when every one of its tags is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Shell essentials and modern CLI replacements.
    Core,
    /// Language runtimes and their package managers.
    Runtimes,
    /// Nice-to-have tools dropped by `--skip-optional`.
    Optional,
    /// Container engine and tooling.
    Docker,
    /// Database clients and servers.
    Database,
    /// Benchmarking and profiling tools.
    Benchmark,
    /// A tag this version does not recognise; never active.
    Unknown(String),
}

impl Category {
    /// Every known category, in manifest order.
    pub const ALL: [Self; 6] = [
        Self::Core,
        Self::Runtimes,
        Self::Optional,
        Self::Docker,
        Self::Database,
        Self::Benchmark,
    ];

    /// Parse a single section tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use devsetup_cli::config::category_matcher::Category;
    ///
    /// assert_eq!(Category::from_tag("docker"), Category::Docker);
    /// assert_eq!(Category::from_tag("Core"), Category::Core);
    /// assert!(matches!(Category::from_tag("gaming"), Category::Unknown(_)));
    /// ```
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "core" => Self::Core,
            "runtimes" => Self::Runtimes,
            "optional" => Self::Optional,
            "docker" => Self::Docker,
            "database" => Self::Database,
            "benchmark" => Self::Benchmark,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Split a section name into its category tags.
    #[must_use]
    pub fn parse_section(section: &str) -> Vec<Self> {
        section.split('-').map(Self::from_tag).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Runtimes => write!(f, "runtimes"),
            Self::Optional => write!(f, "optional"),
            Self::Docker => write!(f, "docker"),
            Self::Database => write!(f, "database"),
            Self::Benchmark => write!(f, "benchmark"),
            Self::Unknown(tag) => write!(f, "{tag}"),
        }
    }
}

/// Check if a section's categories are all active.
///
/// # Examples
///
/// ```
/// use devsetup_cli::config::category_matcher::{Category, matches};
///
/// let section = vec![Category::Docker, Category::Optional];
/// let active = vec![Category::Core, Category::Docker];
///
/// assert!(!matches(&section, &active));
/// assert!(matches(&[Category::Docker], &active));
/// ```
#[must_use]
pub fn matches(section_categories: &[Category], active_categories: &[Category]) -> bool {
    section_categories
        .iter()
        .all(|cat| active_categories.contains(cat))
}
