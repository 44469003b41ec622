pub mod model;
pub mod seed;
pub mod backend;
pub mod runner;
pub mod error;

// Re-exports
pub use model::{LookupKind, NewTask, StatusName};
pub use backend::{Backend, Step, StepOutput};
pub use runner::{run, PhaseReport, RunReport};
pub use error::{Error, Result};
