//! Configuration schema types for waynebot.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the web client ships with.

mod auth;
mod realtime;
mod server;
mod system;

pub use auth::*;
pub use realtime::*;
pub use server::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for waynebot clients.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WaynebotConfig {
    pub server: ServerConfig,
    pub realtime: RealtimeSchemaConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}
