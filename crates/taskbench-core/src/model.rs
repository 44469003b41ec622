use serde::{Deserialize, Serialize};

/// The three small reference sets a task points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    Priority,
    Type,
    Status,
}

impl LookupKind {
    pub const ALL: [LookupKind; 3] = [LookupKind::Priority, LookupKind::Type, LookupKind::Status];

    /// Table name in the relational store, collection name in the document store.
    pub fn collection(&self) -> &'static str {
        match self {
            LookupKind::Priority => "taskPriorities",
            LookupKind::Type => "taskTypes",
            LookupKind::Status => "taskStatuses",
        }
    }

    /// Column / field holding the display name.
    pub fn name_field(&self) -> &'static str {
        match self {
            LookupKind::Priority => "priority_name",
            LookupKind::Type => "type_name",
            LookupKind::Status => "status_name",
        }
    }

    /// Foreign-key column / field on the task.
    pub fn reference_field(&self) -> &'static str {
        match self {
            LookupKind::Priority => "priority_id",
            LookupKind::Type => "type_id",
            LookupKind::Status => "status_id",
        }
    }

    /// Field the joined lookup lands in after the aggregation.
    pub fn joined_field(&self) -> &'static str {
        match self {
            LookupKind::Priority => "priority",
            LookupKind::Type => "type",
            LookupKind::Status => "status",
        }
    }
}

pub struct StatusName;

impl StatusName {
    pub const TODO: &'static str = "To Do";
    pub const IN_PROGRESS: &'static str = "In Progress";
    pub const COMPLETED: &'static str = "Completed";
}

/// A task as seeded, with its references expressed by lookup name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub project_id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub task_type: String,
    pub assigned_to: i32,
}

impl NewTask {
    pub fn new(project_id: i32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: description.into(),
            status: StatusName::TODO.to_string(),
            priority: String::new(),
            task_type: String::new(),
            assigned_to: 0,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    pub fn assigned_to(mut self, assignee: i32) -> Self {
        self.assigned_to = assignee;
        self
    }

    /// Lookup name this task refers to for the given kind.
    pub fn reference(&self, kind: LookupKind) -> &str {
        match kind {
            LookupKind::Priority => &self.priority,
            LookupKind::Type => &self.task_type,
            LookupKind::Status => &self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = NewTask::new(1, "Title", "Description")
            .with_priority("High")
            .with_type("Bug")
            .assigned_to(2);

        assert_eq!(task.status, StatusName::TODO);
        assert_eq!(task.reference(LookupKind::Priority), "High");
        assert_eq!(task.reference(LookupKind::Type), "Bug");
        assert_eq!(task.reference(LookupKind::Status), "To Do");
        assert_eq!(task.assigned_to, 2);
    }

    #[test]
    fn test_lookup_names() {
        assert_eq!(LookupKind::Priority.collection(), "taskPriorities");
        assert_eq!(LookupKind::Type.name_field(), "type_name");
        assert_eq!(LookupKind::Status.reference_field(), "status_id");
        assert_eq!(LookupKind::Status.joined_field(), "status");
    }
}
