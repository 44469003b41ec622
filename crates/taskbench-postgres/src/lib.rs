pub mod config;
pub mod models;
pub mod repository;
pub mod backend;
pub mod error;

// Re-exports
pub use config::PgConfig;
pub use models::{StatusCount, TaskRow, TransactionOutcome};
pub use repository::{PgStore, TABLES};
pub use backend::PostgresBackend;
pub use error::{Error, Result};
