//! Resolution of the companion application's executable from an installation path.
//!
//! Resolution is recomputed on every launch and only performs existence checks,
//! so it is safe to call repeatedly and from several threads.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::platform::{HostOs, PlatformKind};

/// Returns the candidate path for `installation_path` on `host`, whether or not it exists.
///
/// # Errors
///
/// Returns [`Error::UnsupportedPlatform`] when `host` has no known launch convention.
pub fn candidate(installation_path: &Path, host: &HostOs) -> Result<PathBuf> {
    let kind = PlatformKind::detect(host, installation_path)
        .ok_or_else(|| Error::unsupported_platform(host.to_string()))?;

    let candidate = match kind.executable_name() {
        Some(name) if !installation_path.is_file() => installation_path.join(name),
        _ => installation_path.to_path_buf(),
    };

    Ok(candidate)
}

/// Determines the executable (or macOS bundle) to start.
///
/// # Errors
///
/// - [`Error::UnsupportedPlatform`] for hosts other than macOS, Windows and Linux
/// - [`Error::ExecutableNotFound`] when the candidate path does not exist
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use colt_bridge_core::platform::HostOs;
/// use colt_bridge_core::resolver::resolve;
///
/// let executable = resolve(Path::new("/opt/colt"), &HostOs::Linux)?;
/// assert!(executable.ends_with("colt"));
/// # Ok::<(), colt_bridge_core::error::Error>(())
/// ```
pub fn resolve(installation_path: &Path, host: &HostOs) -> Result<PathBuf> {
    let candidate = candidate(installation_path, host)?;
    debug!("Resolving COLT executable candidate `{}`", candidate.display());

    if candidate.exists() {
        Ok(candidate)
    } else {
        Err(Error::executable_not_found(
            candidate.to_string_lossy().to_string(),
        ))
    }
}
