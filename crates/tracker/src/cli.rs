//! Clap CLI definitions for the `tracker` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tracker_config::TrackerConfig;

/// tracker -- Issue tracker REST API server.
#[derive(Parser, Debug)]
#[command(
    name = "tracker",
    about = "Issue tracker REST API server",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file (.yaml, .yml or .toml).
    #[arg(short = 'c', long, global = true, env = "TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server.
    Serve(ServerArgs),

    /// Print the resolved configuration as YAML.
    Config(ServerArgs),
}

/// Overrides applied on top of the loaded configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// Interface to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (0 picks a free port).
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// SQLite database file.
    #[arg(long, conflicts_with = "in_memory")]
    pub db: Option<PathBuf>,

    /// Keep issues in memory only, ignoring any configured database.
    #[arg(long)]
    pub in_memory: bool,
}

impl ServerArgs {
    pub fn apply(&self, config: &mut TrackerConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db) = &self.db {
            config.database.path = Some(db.clone());
        }
        if self.in_memory {
            config.database.path = None;
        }
    }
}
