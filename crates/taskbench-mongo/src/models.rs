use bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use taskbench_core::NewTask;

/// How the seeded task refers to its lookup documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceMode {
    /// Literal integer references that never match a generated `_id`
    #[default]
    Placeholder,
    /// The `_id`s returned when the lookups were inserted
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_id: i32,
    pub title: String,
    pub description: String,
    pub status_id: Bson,
    pub priority_id: Bson,
    pub type_id: Bson,
    pub assigned_to: i32,
}

impl TaskDocument {
    pub fn new(task: &NewTask, status_id: Bson, priority_id: Bson, type_id: Bson) -> Self {
        Self {
            id: None,
            project_id: task.project_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status_id,
            priority_id,
            type_id,
            assigned_to: task.assigned_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskbench_core::seed;

    #[test]
    fn test_task_document_fields() {
        let task = seed::document::task();
        let doc = TaskDocument::new(&task, Bson::Int32(1), Bson::Int32(1), Bson::Int32(1));

        let serialized = bson::to_document(&doc).unwrap();
        assert!(!serialized.contains_key("_id"));
        assert_eq!(serialized.get_i32("project_id").unwrap(), 1);
        assert_eq!(serialized.get_str("title").unwrap(), "Fix Login Bug");
        assert_eq!(serialized.get_i32("status_id").unwrap(), 1);
        assert_eq!(serialized.get_i32("assigned_to").unwrap(), 2);
    }
}
