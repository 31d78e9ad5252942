//! Persisted settings model and configuration path utilities.
//!
//! This module provides the serialized [`Settings`] structure and functions for
//! resolving the settings file path, expanding shell variables like `~`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default path for the settings file
const DEFAULT_SETTINGS_PATH: &str = "~/.colt-bridge/settings.yml";

/// Default host the companion application listens on for remote control
pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
/// Default remote-control port of the companion application
pub const DEFAULT_RPC_PORT: u16 = 8092;
/// Default delay before the first remote call of a background run
pub const DEFAULT_START_DELAY_MS: u64 = 200;
/// Default number of automatic re-authorizations after a rejected token
pub const DEFAULT_TOKEN_REFRESH_LIMIT: u32 = 3;

fn default_rpc_host() -> String {
    DEFAULT_RPC_HOST.to_string()
}

fn default_rpc_port() -> u16 {
    DEFAULT_RPC_PORT
}

fn default_start_delay_ms() -> u64 {
    DEFAULT_START_DELAY_MS
}

fn default_token_refresh_limit() -> u32 {
    DEFAULT_TOKEN_REFRESH_LIMIT
}

/// Everything persisted between runs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub installation_path: Option<String>,
    pub security_token: Option<String>,
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
    #[serde(default = "default_token_refresh_limit")]
    pub token_refresh_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            installation_path: None,
            security_token: None,
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            start_delay_ms: default_start_delay_ms(),
            token_refresh_limit: default_token_refresh_limit(),
        }
    }
}

impl Settings {
    /// The configured installation path with `~` expanded, if any.
    pub fn expanded_installation_path(&self) -> Option<PathBuf> {
        self.installation_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(|path| PathBuf::from(shellexpand::tilde(path).to_string()))
    }

    pub fn rpc_address(&self) -> String {
        format!("{}:{}", self.rpc_host, self.rpc_port)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

/// Resolves the settings file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// settings path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use colt_bridge_core::config::get_settings_path;
///
/// // Use default path
/// let default_path = get_settings_path(&None);
///
/// // Use custom path
/// let custom_path = get_settings_path(&Some("/path/to/settings.yml".to_string()));
/// ```
pub fn get_settings_path(settings_path_arg: &Option<String>) -> String {
    let settings_path = match settings_path_arg {
        Some(settings_path) => settings_path,
        None => DEFAULT_SETTINGS_PATH,
    };

    shellexpand::tilde(settings_path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_settings_path_with_custom_path() {
        let custom_path = Some("/custom/path/settings.yml".to_string());
        let result = get_settings_path(&custom_path);
        assert_eq!(result, "/custom/path/settings.yml");
    }

    #[test]
    fn test_get_settings_path_with_none() {
        let result = get_settings_path(&None);
        // Should expand the tilde in the default path
        assert!(result.ends_with("settings.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let settings: Settings = serde_yaml::from_str("installation_path: /opt/colt\n").unwrap();

        assert_eq!(settings.installation_path.as_deref(), Some("/opt/colt"));
        assert_eq!(settings.security_token, None);
        assert_eq!(settings.rpc_address(), "127.0.0.1:8092");
        assert_eq!(settings.start_delay(), Duration::from_millis(200));
        assert_eq!(settings.token_refresh_limit, 3);
    }

    #[test]
    fn test_expanded_installation_path() {
        let mut settings = Settings::default();
        assert!(settings.expanded_installation_path().is_none());

        settings.installation_path = Some("   ".to_string());
        assert!(settings.expanded_installation_path().is_none());

        settings.installation_path = Some("~/Applications/COLT.app".to_string());
        let expanded = settings.expanded_installation_path().unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("Applications/COLT.app"));
    }
}
