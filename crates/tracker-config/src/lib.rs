//! Configuration management for the issue tracker.
//!
//! Settings are layered with figment: built-in defaults, then an optional
//! YAML or TOML file, then `TRACKER_*` environment variables. Command-line
//! overrides are applied on top by the binary.

pub mod config;

pub use config::{
    ConfigError, DatabaseConfig, ENV_PREFIX, LogConfig, Result, ServerConfig, TrackerConfig,
    load_config, providers,
};
