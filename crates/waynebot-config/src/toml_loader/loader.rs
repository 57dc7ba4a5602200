//! Reading `config.toml` from disk.

use crate::schema::WaynebotConfig;
use crate::validation;
use std::path::Path;
use tracing::{info, warn};
use waynebot_common::ConfigError;

use super::paths::{create_default_config, default_config_path};

/// Read and parse one config file.
///
/// Keys the file leaves out keep their defaults. Validation problems are
/// only logged here; callers that need a usable config validate again
/// after applying their overrides.
pub fn load_from_path(path: &Path) -> Result<WaynebotConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("cannot read {}: {e}", path.display())))?;

    let config: WaynebotConfig = toml::from_str(&raw).map_err(|e| {
        ConfigError::ParseError(format!("{} is not valid config TOML: {e}", path.display()))
    })?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "Config file has invalid values");
    }

    info!(path = %path.display(), "Config file read");
    Ok(config)
}

/// Read the per-user config file, seeding it with the commented template on
/// first run. A missing file yields the built-in defaults.
pub fn load_default() -> Result<WaynebotConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "No config file yet, writing template");
            create_default_config(&path)?;
            Ok(WaynebotConfig::default())
        }
        other => other,
    }
}
