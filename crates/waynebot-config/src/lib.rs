//! waynebot client configuration.
//!
//! TOML-based configuration with validation. All sections use defaults so
//! partial configs work out of the box.
//!
//! ```rust,no_run
//! use waynebot_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AuthConfig, LogLevel, LoggingConfig, RealtimeSchemaConfig, ServerConfig, WaynebotConfig,
    CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use waynebot_common::ConfigError;

/// Load config from `path`, or from the platform default location when `None`.
///
/// Unlike the lower-level loaders, the result must pass validation.
pub fn load_config(path: Option<&Path>) -> Result<WaynebotConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
///
/// The auth token is blanked out.
pub fn config_to_json(config: &WaynebotConfig) -> String {
    let mut redacted = config.clone();
    if redacted.auth.token.is_some() {
        redacted.auth.token = Some("[REDACTED]".into());
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
