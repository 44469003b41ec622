//! Query and update documents for the task collection.

use bson::{doc, Bson, Document};
use taskbench_core::LookupKind;

/// Join each task with its priority, type and status, keeping tasks whose
/// references match nothing, and reduce them to title, description and the
/// three joined names.
pub fn join_pipeline() -> Vec<Document> {
    let mut stages = Vec::with_capacity(7);

    for kind in LookupKind::ALL {
        stages.push(doc! {
            "$lookup": {
                "from": kind.collection(),
                "localField": kind.reference_field(),
                "foreignField": "_id",
                "as": kind.joined_field()
            }
        });
    }

    // An empty join result drops the field instead of the task
    for kind in LookupKind::ALL {
        stages.push(doc! {
            "$unwind": {
                "path": format!("${}", kind.joined_field()),
                "preserveNullAndEmptyArrays": true
            }
        });
    }

    let mut projection = doc! { "title": 1, "description": 1 };
    for kind in LookupKind::ALL {
        projection.insert(format!("{}.{}", kind.joined_field(), kind.name_field()), 1);
    }
    stages.push(doc! { "$project": projection });

    stages
}

pub fn task_filter(project_id: i32, title: &str) -> Document {
    doc! { "project_id": project_id, "title": title }
}

pub fn set_status(status_id: impl Into<Bson>) -> Document {
    doc! { "$set": { "status_id": status_id.into() } }
}

pub fn lookup_document(kind: LookupKind, name: &str) -> Document {
    let mut document = Document::new();
    document.insert(kind.name_field(), name);
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage<'a>(stage: &'a Document, op: &str) -> &'a Document {
        stage.get_document(op).unwrap()
    }

    #[test]
    fn test_pipeline_shape() {
        let stages = join_pipeline();
        assert_eq!(stages.len(), 7);

        let ops: Vec<&str> = stages.iter().map(|s| s.keys().next().unwrap().as_str()).collect();
        assert_eq!(
            ops,
            vec!["$lookup", "$lookup", "$lookup", "$unwind", "$unwind", "$unwind", "$project"]
        );
    }

    #[test]
    fn test_lookup_stages() {
        let stages = join_pipeline();

        let priority = stage(&stages[0], "$lookup");
        assert_eq!(priority.get_str("from").unwrap(), "taskPriorities");
        assert_eq!(priority.get_str("localField").unwrap(), "priority_id");
        assert_eq!(priority.get_str("foreignField").unwrap(), "_id");
        assert_eq!(priority.get_str("as").unwrap(), "priority");

        let status = stage(&stages[2], "$lookup");
        assert_eq!(status.get_str("from").unwrap(), "taskStatuses");
    }

    #[test]
    fn test_unwind_preserves_unmatched_tasks() {
        let stages = join_pipeline();

        for (stage_doc, field) in stages[3..6].iter().zip(["$priority", "$type", "$status"]) {
            let unwind = stage(stage_doc, "$unwind");
            assert_eq!(unwind.get_str("path").unwrap(), field);
            assert!(unwind.get_bool("preserveNullAndEmptyArrays").unwrap());
        }
    }

    #[test]
    fn test_projection() {
        let stages = join_pipeline();
        let projection = stage(&stages[6], "$project");

        let keys: Vec<&str> = projection.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "title",
                "description",
                "priority.priority_name",
                "type.type_name",
                "status.status_name"
            ]
        );
    }

    #[test]
    fn test_filters() {
        assert_eq!(
            task_filter(1, "Fix Login Bug"),
            doc! { "project_id": 1, "title": "Fix Login Bug" }
        );
        assert_eq!(set_status(2), doc! { "$set": { "status_id": 2 } });
        assert_eq!(
            lookup_document(LookupKind::Type, "Bug"),
            doc! { "type_name": "Bug" }
        );
    }
}
