//! SQLite-backed storage implementation.

mod projects;
pub mod schema;
mod store;

pub use store::SqliteStore;
