//! Resolves the cache configuration from, in order of precedence, command-line
//! flags (or their environment variables), a TOML configuration file, and the
//! platform default configuration file location.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
