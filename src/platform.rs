//! Host platform detection.
use std::fmt;
use std::path::Path;

/// CPU architecture of the host, as it appears in release asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 64-bit x86.
    X86_64,
    /// 64-bit ARM.
    Aarch64,
}

impl Arch {
    /// Name used by most GitHub release assets (`x86_64` / `arm64`).
    #[must_use]
    pub const fn release_name(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "arm64",
        }
    }

    /// Rust target-triple architecture (`x86_64` / `aarch64`), used by
    /// assets named like `tool-x86_64-unknown-linux-musl.tar.gz`.
    #[must_use]
    pub const fn triple_name(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }

    /// Debian architecture name (`amd64` / `arm64`).
    #[must_use]
    pub const fn deb_name(self) -> &'static str {
        match self {
            Self::X86_64 => "amd64",
            Self::Aarch64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.triple_name())
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Host CPU architecture.
    pub arch: Arch,
    /// Whether apt is the system package manager (Ubuntu / Debian family).
    pub uses_apt: bool,
    /// Whether the process runs with an effective UID of 0.
    pub is_root: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            arch: Self::detect_arch(),
            uses_apt: Self::detect_apt(Path::new("/etc/os-release")),
            is_root: nix::unistd::Uid::effective().is_root(),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(arch: Arch, uses_apt: bool, is_root: bool) -> Self {
        Self {
            arch,
            uses_apt,
            is_root,
        }
    }

    const fn detect_arch() -> Arch {
        if cfg!(target_arch = "aarch64") {
            Arch::Aarch64
        } else {
            Arch::X86_64
        }
    }

    fn detect_apt(os_release: &Path) -> bool {
        std::fs::read_to_string(os_release).is_ok_and(|content| is_debian_family(&content))
    }
}

/// Whether an `/etc/os-release` body describes a Debian-family distribution.
fn is_debian_family(os_release: &str) -> bool {
    os_release.lines().any(|line| {
        let Some((key, value)) = line.split_once('=') else {
            return false;
        };
        let value = value.trim_matches('"');
        match key.trim() {
            "ID" => matches!(value, "ubuntu" | "debian"),
            "ID_LIKE" => value
                .split_whitespace()
                .any(|v| v == "debian" || v == "ubuntu"),
            _ => false,
        }
    })
}
