pub mod config;
pub mod error;

pub use config::MovementConfig;
pub use error::{ConfigError, MovementError, Result};
