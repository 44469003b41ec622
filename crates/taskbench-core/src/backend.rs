use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Scenario steps a backend runs after seeding, in the order it lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    ComplexQuery,
    Update,
    Delete,
    Transaction,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::ComplexQuery => write!(f, "Complex Query"),
            Step::Update => write!(f, "Update"),
            Step::Delete => write!(f, "Delete"),
            Step::Transaction => write!(f, "Transaction"),
        }
    }
}

/// What a step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutput {
    Rows { rows: Vec<serde_json::Value> },
    Affected { count: u64 },
    Committed,
    RolledBack { reason: String },
}

impl StepOutput {
    pub fn rows(&self) -> Option<&[serde_json::Value]> {
        match self {
            StepOutput::Rows { rows } => Some(rows),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Backend: Send {
    /// Display name, used as the prefix of every phase label
    fn name(&self) -> &'static str;

    /// Steps run after seeding, in order
    fn scenario(&self) -> &'static [Step];

    /// Acquire the primary connection
    async fn connect(&mut self) -> Result<()>;

    /// Insert the lookup records and the tasks
    async fn seed(&mut self) -> Result<()>;

    /// Run one scenario step
    async fn run_step(&mut self, step: Step) -> Result<StepOutput>;

    /// Remove every record the run may have left behind
    async fn cleanup(&mut self) -> Result<()>;

    /// Whether `cleanup` opens its own connection, so it can still run when
    /// `connect` failed
    fn cleanup_is_independent(&self) -> bool {
        false
    }

    /// Release the primary connection
    async fn disconnect(&mut self) -> Result<()>;
}
