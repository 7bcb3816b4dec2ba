//! `tracker serve` -- run the HTTP API.

use anyhow::Context;
use tokio::net::TcpListener;

use tracker::{AppState, open_store, serve, shutdown_signal};

use crate::cli::{GlobalArgs, ServerArgs};
use crate::logging;

pub fn run(global: &GlobalArgs, args: &ServerArgs) -> anyhow::Result<()> {
    let config = super::resolve_config(global, args)?;
    logging::init(&config.log, global.verbose)?;
    tracing::debug!(?config, "resolved configuration");

    let store = open_store(&config.database).context("opening document store")?;
    let state = AppState::new(store);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(async move {
        let addr = config.server.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        serve(listener, state, shutdown_signal()).await
    })
}
