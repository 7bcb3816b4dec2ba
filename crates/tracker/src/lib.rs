//! Issue tracker REST API.
//!
//! [`routes::router`] exposes one resource, `/api/issues/{project}`, backed
//! by an [`IssueService`](service::IssueService) over any
//! [`DocumentStore`](tracker_storage::DocumentStore).

pub mod app;
pub mod payload;
pub mod routes;
pub mod service;

pub use app::{AppState, open_store, serve, shutdown_signal};
pub use service::{IssueService, ServiceError};
