//! HTTP downloads through `curl` or `wget`, plus release-tag lookup and
//! checksum verification.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::error::ResourceError;
use crate::exec::Executor;

/// TCP connect timeout in seconds.
const CONNECT_TIMEOUT: u64 = 10;

/// Total transfer timeout in seconds.
const TRANSFER_TIMEOUT: u64 = 300;

/// Fetches URLs with whichever of `curl` / `wget` is on `PATH`.
#[derive(Debug, Clone, Copy)]
pub struct Downloader<'a> {
    executor: &'a dyn Executor,
}

impl<'a> Downloader<'a> {
    /// Create a downloader that runs through `executor`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }

    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingPrerequisite`] when neither `curl` nor
    /// `wget` is installed, or [`ResourceError::ExecutionFailed`] when the
    /// transfer fails.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let connect_timeout = CONNECT_TIMEOUT.to_string();
        let transfer_timeout = TRANSFER_TIMEOUT.to_string();
        let result = if self.executor.which("curl") {
            self.executor.run(
                "curl",
                &[
                    "-fsSL",
                    "--connect-timeout",
                    &connect_timeout,
                    "--max-time",
                    &transfer_timeout,
                    url,
                ],
            )?
        } else if self.executor.which("wget") {
            self.executor.run(
                "wget",
                &[
                    "-qO-",
                    &format!("--connect-timeout={connect_timeout}"),
                    &format!("--timeout={transfer_timeout}"),
                    url,
                ],
            )?
        } else {
            return Err(ResourceError::MissingPrerequisite {
                program: "curl".to_string(),
            }
            .into());
        };
        Ok(result.stdout)
    }

    /// Download `url` into the file at `dest`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`fetch_text`](Self::fetch_text), plus a non-UTF-8
    /// destination path.
    pub fn fetch_to(&self, url: &str, dest: &Path) -> Result<()> {
        let dest_str = dest
            .to_str()
            .with_context(|| format!("download path is not valid UTF-8: {}", dest.display()))?;
        let connect_timeout = CONNECT_TIMEOUT.to_string();
        let transfer_timeout = TRANSFER_TIMEOUT.to_string();
        if self.executor.which("curl") {
            self.executor.run(
                "curl",
                &[
                    "-fsSL",
                    "--connect-timeout",
                    &connect_timeout,
                    "--max-time",
                    &transfer_timeout,
                    "-o",
                    dest_str,
                    url,
                ],
            )?;
        } else if self.executor.which("wget") {
            self.executor.run(
                "wget",
                &[
                    "-qO",
                    dest_str,
                    &format!("--connect-timeout={connect_timeout}"),
                    &format!("--timeout={transfer_timeout}"),
                    url,
                ],
            )?;
        } else {
            return Err(ResourceError::MissingPrerequisite {
                program: "curl".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Look up the tag of the latest GitHub release of `repo` (`owner/name`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response carries no
    /// `tag_name`.
    pub fn latest_release_tag(&self, repo: &str) -> Result<String> {
        let url = format!("https://api.github.com/repos/{repo}/releases/latest");
        let body = self
            .fetch_text(&url)
            .with_context(|| format!("query latest release of {repo}"))?;
        parse_tag_name(&body).with_context(|| format!("no tag_name in release metadata for {repo}"))
    }
}

/// Extract the `tag_name` value from a GitHub releases API JSON response.
#[must_use]
pub fn parse_tag_name(json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    value
        .get("tag_name")
        .and_then(serde_json::Value::as_str)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
}

/// Compute the lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {} for checksum verification", path.display()))?;
    let digest = Sha256::digest(&bytes);
    let mut hex = String::with_capacity(64);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(hex)
}

/// Verify that the file at `path` has SHA-256 digest `expected`.
///
/// # Errors
///
/// Returns [`ResourceError::ChecksumMismatch`] when the digests differ.
pub fn verify_sha256(path: &Path, expected: &str, url: &str) -> Result<()> {
    let actual = compute_sha256(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ResourceError::ChecksumMismatch {
            url: url.to_string(),
            expected: expected.trim().to_lowercase(),
            actual,
        }
        .into());
    }
    Ok(())
}
