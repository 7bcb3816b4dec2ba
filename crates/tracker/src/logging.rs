//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use tracker_config::LogConfig;

/// Installs the global subscriber, writing to stderr.
///
/// `-v` forces debug output; otherwise `RUST_LOG` wins over the configured
/// filter.
pub fn init(config: &LogConfig, verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("tracker=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
