//! Reading and writing of the YAML settings file.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::config::Settings;
use crate::error::{Error, Result};

const SETTINGS_FILE_DESCRIPTION: &str = "settings";

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

/// Reads the settings from disk.
///
/// A missing or empty file is not an error: the defaults are returned instead.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file contains invalid YAML
/// - The YAML doesn't match the expected structure
pub fn read_settings(settings_path: &str) -> Result<Settings> {
    if !Path::new(settings_path).exists() {
        debug!("No settings file at `{settings_path}`, using defaults");
        return Ok(Settings::default());
    }

    let mut reader = get_reader(SETTINGS_FILE_DESCRIPTION, settings_path)?;
    let mut contents = String::new();
    reader.read_to_string(&mut contents).map_err(|e| {
        Error::io_error(
            SETTINGS_FILE_DESCRIPTION.to_string(),
            settings_path.to_string(),
            e,
        )
    })?;

    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(&contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            SETTINGS_FILE_DESCRIPTION.to_string(),
            settings_path.to_string(),
            e,
        )
    })
}

/// Writes the settings to disk, creating the parent directory when needed.
///
/// # Errors
///
/// Returns an error if:
/// - The file or its parent directory cannot be created
/// - Serialization to YAML fails
pub fn write_settings(settings_path: &str, settings: &Settings) -> Result<()> {
    if let Some(parent) = Path::new(settings_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io_error(
                    SETTINGS_FILE_DESCRIPTION.to_string(),
                    settings_path.to_string(),
                    e,
                )
            })?;
        }
    }

    let f = File::create(settings_path).map_err(|e| {
        Error::io_error(
            SETTINGS_FILE_DESCRIPTION.to_string(),
            settings_path.to_string(),
            e,
        )
    })?;

    serde_yaml::to_writer(f, settings).map_err(|e| {
        Error::yaml_error(
            "writing".to_string(),
            SETTINGS_FILE_DESCRIPTION.to_string(),
            settings_path.to_string(),
            e,
        )
    })
}
