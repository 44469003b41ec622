pub mod config;
pub mod models;
pub mod pipeline;
pub mod repository;
pub mod backend;
pub mod error;

// Re-exports
pub use config::MongoConfig;
pub use models::{ReferenceMode, TaskDocument};
pub use repository::MongoStore;
pub use backend::MongoBackend;
pub use error::{Error, Result};
