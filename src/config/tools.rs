//! Tool manifest loading.
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use super::category_matcher::Category;
use super::toml_loader;

/// Placeholders understood by release and script URL templates.
pub const URL_PLACEHOLDERS: &[&str] = &["tag", "version", "arch", "deb_arch", "triple_arch"];

/// A declarative tool record: what to probe for and how to install it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolSpec {
    /// Unique name used in log output.
    pub name: String,
    /// Commands that indicate the tool is present; any match is enough.
    #[serde(default)]
    pub probe: Option<Vec<String>>,
    /// How to install the tool when no probe resolves.
    pub install: InstallStrategy,
}

impl ToolSpec {
    /// Commands to look up on `PATH`, defaulting to the tool's name.
    #[must_use]
    pub fn probes(&self) -> Vec<&str> {
        match &self.probe {
            Some(names) if !names.is_empty() => names.iter().map(String::as_str).collect(),
            _ => vec![self.name.as_str()],
        }
    }
}

/// One installation strategy per tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum InstallStrategy {
    /// `sudo apt-get install -y <packages>`.
    Apt {
        /// Debian package names.
        packages: Vec<String>,
    },
    /// Download a release asset and install one binary from it.
    Release {
        /// Asset URL template.
        url: String,
        /// Name of the installed binary under the bin directory.
        binary: String,
        /// Asset format.
        #[serde(default)]
        archive: ArchiveKind,
        /// Path of the binary inside the archive; defaults to `binary`.
        #[serde(default)]
        member: Option<String>,
        /// `owner/name` of the GitHub repository, required for `{tag}` and
        /// `{version}`.
        #[serde(default)]
        repo: Option<String>,
        /// Expected SHA-256 of the downloaded asset.
        #[serde(default)]
        sha256: Option<String>,
        /// Absolute directory that receives the whole unpacked tree; the
        /// binary is then linked into the bin directory. Without it only the
        /// binary is copied.
        #[serde(default)]
        prefix: Option<String>,
    },
    /// Download a vendor installer script and run it.
    Script {
        /// Installer URL template.
        url: String,
        /// Interpreter used to run the script.
        #[serde(default = "default_shell")]
        shell: String,
        /// Arguments passed to the script.
        #[serde(default)]
        args: Vec<String>,
        /// Whether the script must run under `sudo`.
        #[serde(default)]
        sudo: bool,
    },
    /// `sudo npm install -g <package>`.
    Npm {
        /// npm package name.
        package: String,
    },
}

impl InstallStrategy {
    /// Short name of the strategy, as written in the manifest.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Apt { .. } => "apt",
            Self::Release { .. } => "release",
            Self::Script { .. } => "script",
            Self::Npm { .. } => "npm",
        }
    }

    /// URL template, for strategies that download something.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Release { url, .. } | Self::Script { url, .. } => Some(url),
            Self::Apt { .. } | Self::Npm { .. } => None,
        }
    }
}

/// Format of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveKind {
    /// Gzip-compressed tarball.
    #[default]
    TarGz,
    /// Zip archive.
    Zip,
    /// The asset is the binary itself.
    Raw,
}

fn default_shell() -> String {
    "sh".to_string()
}

#[derive(Debug, Deserialize)]
struct ToolSection {
    #[serde(default)]
    tools: Vec<ToolSpec>,
}

/// Load tool records from tools.toml, filtered by active categories, in
/// manifest order.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load(path: &Path, active_categories: &[Category]) -> Result<Vec<ToolSpec>> {
    let items = toml_loader::load_section_items(path, |s: ToolSection| s.tools)?;
    Ok(toml_loader::filter_by_categories(items, active_categories))
}

/// Names of the `{...}` placeholders used in `template`.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = rest.get(start + 1..).unwrap_or_default();
        let Some(end) = after.find('}') else {
            break;
        };
        found.push(after.get(..end).unwrap_or_default());
        rest = after.get(end + 1..).unwrap_or_default();
    }
    found
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::{assert_load_missing_returns_empty, write_temp_toml};

    const MANIFEST: &str = r#"
[core]
tools = [
  { name = "ripgrep", probe = ["rg"], install = { method = "apt", packages = ["ripgrep"] } },
  { name = "bat", probe = ["bat", "batcat"], install = { method = "apt", packages = ["bat"] } },
  { name = "jq", install = { method = "apt", packages = ["jq"] } },
]

[optional]
tools = [
  { name = "lazygit", install = { method = "release", repo = "jesseduffield/lazygit", url = "https://github.com/jesseduffield/lazygit/releases/download/{tag}/lazygit_{version}_Linux_{arch}.tar.gz", binary = "lazygit" } },
]

[docker]
tools = [
  { name = "docker", install = { method = "script", url = "https://get.docker.com", sudo = true } },
]

[runtimes]
tools = [
  { name = "claude", install = { method = "npm", package = "@anthropic-ai/claude-code" } },
]
"#;

    #[test]
    fn load_filters_by_category_in_order() {
        let (_dir, path) = write_temp_toml(MANIFEST);
        let tools = load(&path, &[Category::Core, Category::Runtimes]).unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["ripgrep", "bat", "jq", "claude"]);
    }

    #[test]
    fn probe_defaults_to_name() {
        let (_dir, path) = write_temp_toml(MANIFEST);
        let tools = load(&path, &[Category::Core]).unwrap();
        assert_eq!(tools[0].probes(), vec!["rg"]);
        assert_eq!(tools[1].probes(), vec!["bat", "batcat"]);
        assert_eq!(tools[2].probes(), vec!["jq"]);
    }

    #[test]
    fn strategy_defaults() {
        let (_dir, path) = write_temp_toml(MANIFEST);
        let tools = load(&path, &Category::ALL).unwrap();
        let lazygit = tools.iter().find(|t| t.name == "lazygit").unwrap();
        assert!(matches!(
            lazygit.install,
            InstallStrategy::Release {
                archive: ArchiveKind::TarGz,
                member: None,
                sha256: None,
                prefix: None,
                ..
            }
        ));
        let docker = tools.iter().find(|t| t.name == "docker").unwrap();
        assert_eq!(
            docker.install,
            InstallStrategy::Script {
                url: "https://get.docker.com".to_string(),
                shell: "sh".to_string(),
                args: vec![],
                sudo: true,
            }
        );
        assert_eq!(docker.install.method(), "script");
    }

    #[test]
    fn unknown_method_is_rejected() {
        let (_dir, path) = write_temp_toml(
            "[core]\ntools = [{ name = \"x\", install = { method = \"snap\", package = \"x\" } }]\n",
        );
        assert!(load(&path, &[Category::Core]).is_err());
    }

    #[test]
    fn zip_archive_kind() {
        let (_dir, path) = write_temp_toml(
            "[core]\ntools = [{ name = \"x\", install = { method = \"release\", url = \"u\", binary = \"x\", archive = \"zip\" } }]\n",
        );
        let tools = load(&path, &[Category::Core]).unwrap();
        assert!(matches!(
            tools[0].install,
            InstallStrategy::Release {
                archive: ArchiveKind::Zip,
                ..
            }
        ));
    }

    #[test]
    fn release_prefix_is_parsed() {
        let (_dir, path) = write_temp_toml(
            "[core]\ntools = [{ name = \"nvim\", install = { method = \"release\", url = \"u\", binary = \"nvim\", prefix = \"/opt/nvim\" } }]\n",
        );
        let tools = load(&path, &[Category::Core]).unwrap();
        assert!(matches!(
            &tools[0].install,
            InstallStrategy::Release { prefix: Some(p), .. } if p == "/opt/nvim"
        ));
    }

    #[test]
    fn placeholders_are_extracted() {
        assert_eq!(
            placeholders("https://x/{tag}/tool_{version}_{arch}.tgz"),
            vec!["tag", "version", "arch"]
        );
        assert!(placeholders("https://get.docker.com").is_empty());
        assert_eq!(placeholders("broken {tag"), Vec::<&str>::new());
    }

    #[test]
    fn load_missing_file_returns_empty() {
        assert_load_missing_returns_empty(load);
    }
}
