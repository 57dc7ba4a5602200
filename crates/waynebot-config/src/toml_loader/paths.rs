//! Where the config file lives.

use std::path::{Path, PathBuf};
use tracing::info;
use waynebot_common::ConfigError;

use super::template::default_config_toml;

/// Location used when `--config` is not given: `waynebot/config.toml` under
/// the user's config directory (`~/.config` on Linux,
/// `~/Library/Application Support` on macOS).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("waynebot").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no per-user config directory on this platform".into()))
}

/// Write the commented template to `path`, creating missing parent
/// directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |what: &str, at: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {what} {}: {e}", at.display()))
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_error("create", dir, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("write", path, e))?;

    info!(path = %path.display(), "Wrote config template");
    Ok(())
}
