//! Viewer configuration file.
//!
//! One JSON document per viewer, stamped with [`CONFIG_VERSION`]. A file
//! written by another version is deleted on load and the viewer starts from
//! its defaults.

use super::{ConfigError, ConfigResult, ConfigTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Version written to and expected in the configuration file.
pub const CONFIG_VERSION: i64 = 1;

/// Attribute holding the file version.
pub const VERSION_KEY: &str = "version";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "DETVIEW_CONFIG";

/// Default configuration file location.
///
/// `$DETVIEW_CONFIG` if set, otherwise `<data dir>/detview/viewer.json`.
pub fn default_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let base = dirs::data_local_dir().or_else(dirs::home_dir)?;
    Some(base.join("detview").join("viewer.json"))
}

/// Load a configuration file and check its version.
pub fn load(path: &Path) -> ConfigResult<ConfigTable> {
    if !path.exists() {
        return Err(ConfigError::NoFile(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    let table = ConfigTable::from_json(&json)?;
    let found = table.get_i(VERSION_KEY).ok();
    if found != Some(CONFIG_VERSION) {
        return Err(ConfigError::VersionMismatch {
            found,
            expected: CONFIG_VERSION,
        });
    }
    Ok(table)
}

/// Write a configuration file, creating parent directories as needed.
pub fn save(path: &Path, table: &ConfigTable) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, table.to_json()?)?;
    log::debug!("Saved configuration to {}", path.display());
    Ok(())
}

/// Load a configuration file, or `None` if the viewer should use defaults.
///
/// A stale file (wrong or missing version) is deleted. Unreadable files are
/// left in place.
pub fn load_or_discard(path: &Path) -> Option<ConfigTable> {
    match load(path) {
        Ok(table) => Some(table),
        Err(ConfigError::NoFile(_)) => {
            log::debug!("No configuration at {}, using defaults", path.display());
            None
        }
        Err(e @ ConfigError::VersionMismatch { .. }) => {
            log::warn!("{}, deleting {}", e, path.display());
            if let Err(e) = fs::remove_file(path) {
                log::warn!("Failed to delete {}: {}", path.display(), e);
            }
            None
        }
        Err(e) => {
            log::warn!("Ignoring configuration {}: {}", path.display(), e);
            None
        }
    }
}
