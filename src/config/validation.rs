//! Manifest validation: warnings for records that load but cannot work.
use std::collections::HashSet;
use std::path::Path;

use super::profile_block::ProfileBlockConfig;
use super::symlinks::Symlink;
use super::tools::{self, InstallStrategy, ToolSpec, URL_PLACEHOLDERS};
use crate::platform::Platform;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "tools.toml", "symlinks.toml").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item` in `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
///
/// Implementations check configuration for common issues that do not stop
/// loading but would make a run misbehave.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, root: &Path, platform: &Platform) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator (e.g., "tools").
    fn name(&self) -> &'static str;
}

/// Validator for tool records.
#[derive(Debug)]
pub struct ToolValidator<'a> {
    tools: &'a [ToolSpec],
}

impl<'a> ToolValidator<'a> {
    /// Validate `tools`.
    #[must_use]
    pub const fn new(tools: &'a [ToolSpec]) -> Self {
        Self { tools }
    }
}

impl ConfigValidator for ToolValidator<'_> {
    fn validate(&self, _root: &Path, platform: &Platform) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        let mut warned_apt = false;

        for tool in self.tools {
            if !seen.insert(tool.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "tools.toml",
                    &tool.name,
                    "duplicate tool name",
                ));
            }

            if tool.probe.as_ref().is_some_and(Vec::is_empty) {
                warnings.push(ValidationWarning::new(
                    "tools.toml",
                    &tool.name,
                    "empty probe list; falling back to the tool name",
                ));
            }

            match &tool.install {
                InstallStrategy::Apt { packages } => {
                    if packages.is_empty() {
                        warnings.push(ValidationWarning::new(
                            "tools.toml",
                            &tool.name,
                            "apt strategy lists no packages",
                        ));
                    }
                    if !platform.uses_apt && !warned_apt {
                        warned_apt = true;
                        warnings.push(ValidationWarning::new(
                            "tools.toml",
                            &tool.name,
                            "apt tools configured but this system does not look Debian-based",
                        ));
                    }
                }
                InstallStrategy::Release { .. } | InstallStrategy::Script { .. } => {
                    if let InstallStrategy::Release {
                        prefix: Some(prefix),
                        archive,
                        ..
                    } = &tool.install
                    {
                        let dir = Path::new(prefix);
                        if !dir.is_absolute() || dir.parent().is_none() {
                            warnings.push(ValidationWarning::new(
                                "tools.toml",
                                &tool.name,
                                format!("install prefix '{prefix}' must be an absolute directory"),
                            ));
                        }
                        if *archive == tools::ArchiveKind::Raw {
                            warnings.push(ValidationWarning::new(
                                "tools.toml",
                                &tool.name,
                                "install prefix is ignored for raw assets",
                            ));
                        }
                    }
                    let has_repo = matches!(
                        tool.install,
                        InstallStrategy::Release { repo: Some(_), .. }
                    );
                    let url = tool.install.url().unwrap_or_default();
                    for name in tools::placeholders(url) {
                        if !URL_PLACEHOLDERS.contains(&name) {
                            warnings.push(ValidationWarning::new(
                                "tools.toml",
                                &tool.name,
                                format!("unknown URL placeholder {{{name}}}"),
                            ));
                        } else if matches!(name, "tag" | "version") && !has_repo {
                            warnings.push(ValidationWarning::new(
                                "tools.toml",
                                &tool.name,
                                format!("{{{name}}} requires a release repo"),
                            ));
                        }
                    }
                }
                InstallStrategy::Npm { package } => {
                    if package.trim().is_empty() {
                        warnings.push(ValidationWarning::new(
                            "tools.toml",
                            &tool.name,
                            "npm strategy has an empty package name",
                        ));
                    }
                }
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "tools"
    }
}

/// Validator for symlink configurations.
#[derive(Debug)]
pub struct SymlinkValidator<'a> {
    symlinks: &'a [Symlink],
}

impl<'a> SymlinkValidator<'a> {
    /// Validate `symlinks`.
    #[must_use]
    pub const fn new(symlinks: &'a [Symlink]) -> Self {
        Self { symlinks }
    }
}

impl ConfigValidator for SymlinkValidator<'_> {
    fn validate(&self, root: &Path, _platform: &Platform) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for symlink in self.symlinks {
            if Path::new(&symlink.source).is_absolute() {
                warnings.push(ValidationWarning::new(
                    "symlinks.toml",
                    &symlink.source,
                    "source path should be relative to symlinks/ directory",
                ));
                continue;
            }

            let source_path = symlink.source_path(root);
            if !source_path.exists() {
                warnings.push(ValidationWarning::new(
                    "symlinks.toml",
                    &symlink.source,
                    format!("source file does not exist: {}", source_path.display()),
                ));
            }

            if symlink
                .target
                .as_deref()
                .is_some_and(|t| Path::new(t).is_absolute())
            {
                warnings.push(ValidationWarning::new(
                    "symlinks.toml",
                    &symlink.source,
                    "target should be relative to $HOME",
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "symlinks"
    }
}

/// Validator for the profile block settings.
#[derive(Debug)]
pub struct ProfileBlockValidator<'a> {
    profile: &'a ProfileBlockConfig,
}

impl<'a> ProfileBlockValidator<'a> {
    /// Validate `profile`.
    #[must_use]
    pub const fn new(profile: &'a ProfileBlockConfig) -> Self {
        Self { profile }
    }
}

impl ConfigValidator for ProfileBlockValidator<'_> {
    fn validate(&self, _root: &Path, _platform: &Platform) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        if self.profile.body.is_none() {
            warnings.push(ValidationWarning::new(
                "profile.toml",
                &self.profile.source,
                "profile block source does not exist",
            ));
        }
        if Path::new(&self.profile.target).is_absolute() {
            warnings.push(ValidationWarning::new(
                "profile.toml",
                &self.profile.target,
                "target should be relative to $HOME",
            ));
        }
        if self.profile.name.contains(char::is_whitespace) {
            warnings.push(ValidationWarning::new(
                "profile.toml",
                &self.profile.name,
                "marker name should not contain whitespace",
            ));
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "profile"
    }
}

/// Run every validator over the loaded configuration.
#[must_use]
pub fn validate_all(config: &super::Config, platform: &Platform) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator>> = vec![
        Box::new(ToolValidator::new(&config.tools)),
        Box::new(SymlinkValidator::new(&config.symlinks)),
        Box::new(ProfileBlockValidator::new(&config.profile)),
    ];

    let mut all_warnings = Vec::new();
    for validator in validators {
        all_warnings.extend(validator.validate(&config.root, platform));
    }

    all_warnings
}
