//! Layered configuration for the ShareIt server.
//!
//! Precedence, lowest first: built-in defaults, `default.toml`,
//! `{environment}.toml`, `local.toml`, an explicit file, then `SHAREIT_*`
//! environment variables. See [`ConfigLoader`].

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, DatabaseConfig, LoggerSettings, ServerConfig, Settings, StorageBackend,
};
