//! Server wiring: shared state, store selection and the serve loop.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info};

use tracker_config::DatabaseConfig;
use tracker_storage::{DocumentStore, MemoryStore, SqliteStore, StorageError};

use crate::routes;
use crate::service::IssueService;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: IssueService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            service: IssueService::new(store),
        }
    }
}

/// Opens the configured store: SQLite when a path is set, otherwise an
/// in-process store that lives as long as the server.
pub fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, StorageError> {
    match &config.path {
        Some(path) => Ok(Arc::new(SqliteStore::open(path)?)),
        None => {
            info!("no database path configured, keeping issues in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Serves the API on `listener` until `shutdown` resolves, then closes the
/// store.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = Arc::clone(state.service.store());
    let projects = store.project_names()?;
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, projects = projects.len(), "listening");
    }
    debug!(?projects, "known projects");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    store.close()?;
    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => tracing::error!("failed to listen for Ctrl+C: {e}"),
    }
}
