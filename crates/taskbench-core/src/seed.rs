//! Hardcoded records inserted at the start of every run.
//!
//! The two stores are seeded with slightly different sets: the relational
//! store gets two task types and three tasks, the document store three task
//! types and a single task.

use crate::model::{LookupKind, NewTask, StatusName};

pub const PROJECT_ID: i32 = 1;

/// Status reference written by the document-store update step.
pub const UPDATED_STATUS_REF: i32 = 2;

/// Literal reference value the document-store task carries for all three lookups.
pub const PLACEHOLDER_REF: i32 = 1;

/// Assignee whose completed tasks the relational delete step removes.
pub const DELETE_ASSIGNEE: i32 = 2;

/// Assignee set inside the relational transaction step.
pub const REASSIGN_TO: i32 = 3;

const PRIORITIES: &[&str] = &["High", "Medium", "Low"];
const STATUSES: &[&str] = &[StatusName::TODO, StatusName::IN_PROGRESS, StatusName::COMPLETED];

pub mod relational {
    use super::*;

    pub fn lookups(kind: LookupKind) -> &'static [&'static str] {
        match kind {
            LookupKind::Priority => PRIORITIES,
            LookupKind::Type => &["Bug", "Feature"],
            LookupKind::Status => STATUSES,
        }
    }

    pub fn tasks() -> Vec<NewTask> {
        vec![
            login_bug(),
            NewTask::new(PROJECT_ID, "Add Logout Button", "Logout button does not work")
                .with_priority("Medium")
                .with_type("Feature")
                .assigned_to(2),
            NewTask::new(PROJECT_ID, "Update User Profile", "Profile page does not save changes")
                .with_priority("Low")
                .with_type("Bug")
                .assigned_to(3),
        ]
    }
}

pub mod document {
    use super::*;

    pub fn lookups(kind: LookupKind) -> &'static [&'static str] {
        match kind {
            LookupKind::Priority => PRIORITIES,
            LookupKind::Type => &["Bug", "Feature", "Improvement"],
            LookupKind::Status => STATUSES,
        }
    }

    pub fn task() -> NewTask {
        login_bug()
    }
}

fn login_bug() -> NewTask {
    NewTask::new(PROJECT_ID, "Fix Login Bug", "Login button is unresponsive")
        .with_priority("High")
        .with_type("Bug")
        .assigned_to(2)
}
