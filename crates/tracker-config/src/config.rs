//! Configuration types and loading.
//!
//! The main entry point is [`TrackerConfig`], loaded with [`load_config`].

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides, e.g. `TRACKER_SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "TRACKER_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file extension is neither YAML nor TOML.
    #[error("unsupported config format for {} (expected .yaml, .yml or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A provider could not be read or did not match the schema.
    #[error("failed to load configuration: {0}")]
    Extract(#[from] figment::Error),

    /// Serializing the resolved configuration failed.
    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_yaml::Error),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port; `0` picks any free port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Document store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file. `None` keeps everything in memory for the process
    /// lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins if set.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "tracker=info,tower_http=info".to_string()
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// The fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl TrackerConfig {
    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "log.filter".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Renders the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Builds the provider stack without extracting it.
///
/// # Errors
///
/// Returns [`ConfigError::FileNotFound`] if `path` is given but missing, or
/// [`ConfigError::UnsupportedFormat`] for an unknown extension.
pub fn providers(path: Option<&Path>) -> Result<Figment> {
    let mut fig = Figment::from(Serialized::defaults(TrackerConfig::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        fig = match ext.as_deref() {
            Some("yaml" | "yml") => fig.merge(Yaml::file(path)),
            Some("toml") => fig.merge(Toml::file(path)),
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
    }

    Ok(fig.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Loads and validates configuration.
///
/// # Errors
///
/// Propagates provider errors from [`providers`] and validation failures.
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let config: TrackerConfig = providers(path)?.extract()?;
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
