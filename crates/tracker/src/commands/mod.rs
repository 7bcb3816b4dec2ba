//! Command handlers for the `tracker` CLI.

pub mod config_cmd;
pub mod serve;

use anyhow::Context;

use tracker_config::{TrackerConfig, load_config};

use crate::cli::{GlobalArgs, ServerArgs};

/// Loads configuration from file and environment, then applies CLI
/// overrides.
pub fn resolve_config(global: &GlobalArgs, args: &ServerArgs) -> anyhow::Result<TrackerConfig> {
    let mut config = load_config(global.config.as_deref()).context("loading configuration")?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}
