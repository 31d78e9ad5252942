//! Persisted settings consumed by the launcher and the remote-action executor.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use log::{debug, info};

use crate::config::Settings;
use crate::error::Result;
use crate::file_handling::{read_settings, write_settings};
use crate::platform::{HostOs, PlatformKind};

/// Access to the installation path and the security token.
///
/// Implementations must give at least last-write-wins consistency, as the token
/// is read from background tasks while the caller thread may invalidate it.
pub trait SettingsStore: Send + Sync {
    /// Whether the configured installation path exists and has the shape the host OS expects.
    fn is_installation_path_valid(&self) -> bool;

    fn installation_path(&self) -> Option<PathBuf>;

    fn security_token(&self) -> Option<String>;

    /// Forgets the stored token after the companion application rejected it.
    fn invalidate_token(&self) -> Result<()>;

    fn set_security_token(&self, token: String) -> Result<()>;
}

/// Checks `installation_path` against the layout expected on `host`.
pub fn is_valid_installation(installation_path: Option<&PathBuf>, host: &HostOs) -> bool {
    let Some(installation_path) = installation_path else {
        return false;
    };

    PlatformKind::detect(host, installation_path)
        .is_some_and(|kind| kind.accepts(installation_path))
}

/// Settings store backed by the YAML settings file, written through on every change.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: String,
    host: HostOs,
    settings: RwLock<Settings>,
}

impl FileSettingsStore {
    /// Loads the store from `path`, falling back to defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<String>, host: HostOs) -> Result<Self> {
        let path = path.into();
        let settings = read_settings(&path)?;
        debug!("Loaded settings from `{path}`");

        Ok(Self {
            path,
            host,
            settings: RwLock::new(settings),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// A copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.read().clone()
    }

    /// Applies `change` and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be written.
    pub fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        change(&mut settings);
        write_settings(&self.path, &settings)
    }

    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for FileSettingsStore {
    fn is_installation_path_valid(&self) -> bool {
        is_valid_installation(self.installation_path().as_ref(), &self.host)
    }

    fn installation_path(&self) -> Option<PathBuf> {
        self.read().expanded_installation_path()
    }

    fn security_token(&self) -> Option<String> {
        self.read()
            .security_token
            .clone()
            .filter(|token| !token.is_empty())
    }

    fn invalidate_token(&self) -> Result<()> {
        info!("Invalidating the stored COLT security token");
        self.update(|settings| settings.security_token = None)
    }

    fn set_security_token(&self, token: String) -> Result<()> {
        self.update(|settings| settings.security_token = Some(token))
    }
}
