//! Tool resource: probe `PATH`, install with one strategy when absent.
use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};

use super::download::{Downloader, verify_sha256};
use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::tools::{self, ArchiveKind, InstallStrategy, ToolSpec};
use crate::exec::Executor;
use crate::platform::Platform;

/// Directory release binaries are installed into.
pub const BIN_DIR: &str = "/usr/local/bin";

/// A tool that should resolve on `PATH`.
#[derive(Debug)]
pub struct ToolResource<'a> {
    spec: &'a ToolSpec,
    platform: &'a Platform,
    executor: &'a dyn Executor,
    bin_dir: PathBuf,
}

impl<'a> ToolResource<'a> {
    /// Create a tool resource installing into [`BIN_DIR`].
    #[must_use]
    pub fn new(spec: &'a ToolSpec, platform: &'a Platform, executor: &'a dyn Executor) -> Self {
        Self {
            spec,
            platform,
            executor,
            bin_dir: PathBuf::from(BIN_DIR),
        }
    }

    /// Install release binaries into `bin_dir` instead of [`BIN_DIR`].
    #[must_use]
    pub fn with_bin_dir(mut self, bin_dir: PathBuf) -> Self {
        self.bin_dir = bin_dir;
        self
    }

    /// The tool record.
    #[must_use]
    pub const fn spec(&self) -> &ToolSpec {
        self.spec
    }

    /// First probe that resolves on `PATH`, with its location.
    #[must_use]
    pub fn found_at(&self) -> Option<(&str, PathBuf)> {
        self.spec
            .probes()
            .into_iter()
            .find_map(|probe| self.executor.resolve(probe).map(|path| (probe, path)))
    }

    /// One-line description of what [`apply`](Applicable::apply) would run.
    #[must_use]
    pub fn plan(&self) -> String {
        match &self.spec.install {
            InstallStrategy::Apt { packages } => {
                format!("apt-get install -y {}", packages.join(" "))
            }
            InstallStrategy::Release {
                url,
                binary,
                prefix: Some(prefix),
                ..
            } => format!(
                "download {url} -> {prefix}, link {}",
                self.bin_dir.join(binary).display()
            ),
            InstallStrategy::Release { url, binary, .. } => {
                format!("download {url} -> {}", self.bin_dir.join(binary).display())
            }
            InstallStrategy::Script {
                url, shell, sudo, ..
            } => {
                let runner = if *sudo { "sudo " } else { "" };
                format!("{runner}{shell} <installer from {url}>")
            }
            InstallStrategy::Npm { package } => format!("npm install -g {package}"),
        }
    }

    fn install_apt(&self, packages: &[String]) -> Result<()> {
        let mut args = vec!["apt-get", "install", "-y"];
        args.extend(packages.iter().map(String::as_str));
        self.executor.run("sudo", &args)?;
        Ok(())
    }

    fn install_npm(&self, package: &str) -> Result<()> {
        if !self.executor.which("npm") {
            return Err(ResourceError::MissingPrerequisite {
                program: "npm".to_string(),
            }
            .into());
        }
        self.executor
            .run("sudo", &["npm", "install", "-g", package])?;
        Ok(())
    }

    fn install_script(&self, url: &str, shell: &str, args: &[String], sudo: bool) -> Result<()> {
        let url = expand_url(url, None, self.platform);
        let work = work_dir(&self.spec.name)?;
        let script = work.path().join("install.sh");
        Downloader::new(self.executor).fetch_to(&url, &script)?;
        let script_str = path_str(&script)?;

        let mut argv: Vec<&str> = vec![shell, script_str];
        argv.extend(args.iter().map(String::as_str));
        if sudo {
            self.executor.run("sudo", &argv)?;
        } else {
            self.executor.run(shell, argv.get(1..).unwrap_or_default())?;
        }
        Ok(())
    }

    fn install_release(&self, release: Release<'_>) -> Result<()> {
        let downloader = Downloader::new(self.executor);
        let tag = if needs_tag(release.url) {
            let repo = release.repo.with_context(|| {
                format!(
                    "'{}' uses {{tag}} or {{version}} but has no release repo",
                    self.spec.name
                )
            })?;
            Some(downloader.latest_release_tag(repo)?)
        } else {
            None
        };
        let url = expand_url(release.url, tag.as_deref(), self.platform);

        let work = work_dir(&self.spec.name)?;
        let asset = work.path().join(asset_file_name(&url));
        downloader.fetch_to(&url, &asset)?;
        if let Some(expected) = release.sha256 {
            verify_sha256(&asset, expected, &url)?;
        }

        let dest = self.bin_dir.join(release.binary);
        if release.archive == ArchiveKind::Raw {
            return self.install_binary(&asset, &dest);
        }

        let out = work.path().join("extract");
        std::fs::create_dir_all(&out).with_context(|| format!("create {}", out.display()))?;
        self.extract(release.archive, &asset, &out)?;
        let member = release.member.unwrap_or(release.binary);
        let binary_path = locate_binary(&out, member)
            .with_context(|| format!("'{member}' not found in release archive {url}"))?;
        match release.prefix {
            Some(prefix) => self.install_tree(&out, &binary_path, Path::new(prefix), &dest),
            None => self.install_binary(&binary_path, &dest),
        }
    }

    fn install_binary(&self, binary: &Path, dest: &Path) -> Result<()> {
        self.executor.run(
            "sudo",
            &["install", "-m", "755", path_str(binary)?, path_str(dest)?],
        )?;
        Ok(())
    }

    /// Copy the unpacked release tree to `prefix` and link `binary` from it
    /// to `dest`. A previous copy at `prefix` is replaced.
    fn install_tree(&self, out: &Path, binary: &Path, prefix: &Path, dest: &Path) -> Result<()> {
        let Some(parent) = prefix.parent().filter(|_| prefix.is_absolute()) else {
            bail!("install prefix must be an absolute directory: {}", prefix.display());
        };
        let tree = archive_root(out);
        let relative = binary
            .strip_prefix(&tree)
            .with_context(|| format!("{} is outside {}", binary.display(), tree.display()))?;
        let prefix_str = path_str(prefix)?;

        self.executor.run("sudo", &["rm", "-rf", prefix_str])?;
        self.executor.run("sudo", &["mkdir", "-p", path_str(parent)?])?;
        self.executor
            .run("sudo", &["cp", "-r", path_str(&tree)?, prefix_str])?;
        self.executor.run(
            "sudo",
            &["ln", "-sf", path_str(&prefix.join(relative))?, path_str(dest)?],
        )?;
        Ok(())
    }

    fn extract(&self, kind: ArchiveKind, archive: &Path, out: &Path) -> Result<()> {
        let archive = path_str(archive)?;
        let out = path_str(out)?;
        match kind {
            ArchiveKind::TarGz => self.executor.run("tar", &["-xzf", archive, "-C", out])?,
            ArchiveKind::Zip => self.executor.run("unzip", &["-o", "-q", archive, "-d", out])?,
            ArchiveKind::Raw => return Ok(()),
        };
        Ok(())
    }
}

/// Borrowed fields of a release strategy.
#[derive(Debug, Clone, Copy)]
struct Release<'a> {
    url: &'a str,
    binary: &'a str,
    archive: ArchiveKind,
    member: Option<&'a str>,
    repo: Option<&'a str>,
    sha256: Option<&'a str>,
    prefix: Option<&'a str>,
}

impl Applicable for ToolResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.spec.name, self.spec.install.method())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.found_at().is_some() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        match &self.spec.install {
            InstallStrategy::Apt { packages } => self.install_apt(packages),
            InstallStrategy::Release {
                url,
                binary,
                archive,
                member,
                repo,
                sha256,
                prefix,
            } => self.install_release(Release {
                url,
                binary,
                archive: *archive,
                member: member.as_deref(),
                repo: repo.as_deref(),
                sha256: sha256.as_deref(),
                prefix: prefix.as_deref(),
            }),
            InstallStrategy::Script {
                url,
                shell,
                args,
                sudo,
            } => self.install_script(url, shell, args, *sudo),
            InstallStrategy::Npm { package } => self.install_npm(package),
        }
        .with_context(|| format!("install {}", self.spec.name))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ToolResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(if self.found_at().is_some() {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        })
    }
}

/// Whether `template` needs the latest release tag.
fn needs_tag(template: &str) -> bool {
    tools::placeholders(template)
        .iter()
        .any(|p| matches!(*p, "tag" | "version"))
}

/// Substitute the release placeholders in `template`.
///
/// `{arch}` is the release spelling (`x86_64` / `arm64`), `{deb_arch}` the
/// Debian one and `{triple_arch}` the Rust target-triple one (`x86_64` /
/// `aarch64`). `{version}` is the tag without a leading `v`.
#[must_use]
pub fn expand_url(template: &str, tag: Option<&str>, platform: &Platform) -> String {
    let mut url = template
        .replace("{arch}", platform.arch.release_name())
        .replace("{deb_arch}", platform.arch.deb_name())
        .replace("{triple_arch}", platform.arch.triple_name());
    if let Some(tag) = tag {
        let version = tag.strip_prefix('v').unwrap_or(tag);
        url = url.replace("{tag}", tag).replace("{version}", version);
    }
    url
}

/// File name for a downloaded asset: the last URL path segment.
fn asset_file_name(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("asset")
        .to_string()
}

/// Find `member` under `dir`: first as a relative path, then by file name
/// anywhere in the tree (release tarballs often nest a versioned directory).
fn locate_binary(dir: &Path, member: &str) -> Option<PathBuf> {
    let direct = dir.join(member);
    if direct.is_file() {
        return Some(direct);
    }
    let name = Path::new(member).file_name()?;
    find_file(dir, name)
}

fn find_file(dir: &Path, name: &std::ffi::OsStr) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if entry.file_name() == name {
            return Some(path);
        }
    }
    subdirs.iter().find_map(|sub| find_file(sub, name))
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))
}

/// Private scratch directory for one install, removed on drop.
fn work_dir(tool: &str) -> Result<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix(&format!("devsetup-{tool}-"))
        .tempdir()
        .with_context(|| format!("create work dir for {tool}"))
}

/// Top of an unpacked archive: its single top-level directory when there is
/// exactly one, otherwise `out` itself.
fn archive_root(out: &Path) -> PathBuf {
    let mut entries = std::fs::read_dir(out)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path());
    match (entries.next(), entries.next()) {
        (Some(only), None) if only.is_dir() => only,
        _ => out.to_path_buf(),
    }
}
