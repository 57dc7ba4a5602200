pub mod errors;
pub mod events;

pub use errors::{ConfigError, WaynebotError};
pub use events::EventBus;

pub type Result<T> = std::result::Result<T, WaynebotError>;
