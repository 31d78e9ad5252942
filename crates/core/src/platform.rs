//! Host operating system detection and installation layout classification.

use std::fmt::{Display, Formatter};
use std::path::Path;

/// Extension of a macOS application bundle directory.
const APP_BUNDLE_EXTENSION: &str = "app";

/// Operating system the host process runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    MacOs,
    Windows,
    Linux,
    /// Any OS the companion application has no launch convention for.
    Other(String),
}

impl HostOs {
    /// Detects the OS this binary was compiled for.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` style name to a [`HostOs`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for HostOs {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HostOs::MacOs => formatter.write_str("macOS"),
            HostOs::Windows => formatter.write_str("Windows"),
            HostOs::Linux => formatter.write_str("Linux"),
            HostOs::Other(name) => formatter.write_str(name),
        }
    }
}

/// Installation layout, derived from the host OS plus the shape of the configured path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    MacAppBundle,
    MacBinary,
    Windows,
    Linux,
}

impl PlatformKind {
    /// Classifies `installation_path` for `host`.
    ///
    /// Returns `None` for hosts without a known launch convention.
    pub fn detect(host: &HostOs, installation_path: &Path) -> Option<Self> {
        match host {
            HostOs::MacOs if is_app_bundle(installation_path) => Some(Self::MacAppBundle),
            HostOs::MacOs => Some(Self::MacBinary),
            HostOs::Windows => Some(Self::Windows),
            HostOs::Linux => Some(Self::Linux),
            HostOs::Other(_) => None,
        }
    }

    /// Name of the executable looked up inside an installation directory.
    pub fn executable_name(self) -> Option<&'static str> {
        match self {
            PlatformKind::Windows => Some("colt.exe"),
            PlatformKind::Linux => Some("colt"),
            PlatformKind::MacAppBundle | PlatformKind::MacBinary => None,
        }
    }

    /// Whether `installation_path` has the shape this layout expects.
    pub fn accepts(self, installation_path: &Path) -> bool {
        match self {
            PlatformKind::MacAppBundle => installation_path.is_dir(),
            PlatformKind::MacBinary => installation_path.is_file(),
            PlatformKind::Windows | PlatformKind::Linux => installation_path.exists(),
        }
    }
}

/// A bundle is recognised by its `.app` extension.
pub fn is_app_bundle(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(APP_BUNDLE_EXTENSION))
}
