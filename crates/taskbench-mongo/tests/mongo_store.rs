//! These tests need a reachable MongoDB server named by `MONGODB_URI` and
//! return early when it is not set. They share one database, so they take a lock.

use bson::Bson;
use taskbench_core::{seed, LookupKind};
use taskbench_mongo::{repository::TASKS, MongoBackend, MongoConfig, MongoStore, ReferenceMode, TaskDocument};
use tokio::sync::{Mutex, MutexGuard};

const TEST_DATABASE: &str = "taskbench_test";

static DB_LOCK: Mutex<()> = Mutex::const_new(());

async fn setup() -> Option<(MutexGuard<'static, ()>, MongoConfig, MongoStore)> {
    let Ok(uri) = std::env::var(taskbench_mongo::config::ENV_URI) else {
        eprintln!("skipping: MONGODB_URI not set");
        return None;
    };
    let guard = DB_LOCK.lock().await;

    let config = MongoConfig::new(uri, TEST_DATABASE);
    let store = MongoStore::connect(&config).await.unwrap();
    store.wipe().await.unwrap();

    Some((guard, config, store))
}

#[tokio::test]
async fn test_unmatched_references_keep_task() {
    let Some((_guard, _config, store)) = setup().await else {
        return;
    };

    for kind in LookupKind::ALL {
        store
            .insert_lookups(kind, seed::document::lookups(kind))
            .await
            .unwrap();
    }
    let placeholder = Bson::Int32(seed::PLACEHOLDER_REF);
    let task = TaskDocument::new(
        &seed::document::task(),
        placeholder.clone(),
        placeholder.clone(),
        placeholder,
    );
    store.insert_task(&task).await.unwrap();

    let joined = store.joined_tasks().await.unwrap();
    assert_eq!(joined.len(), 1);

    let row = &joined[0];
    assert_eq!(row.get_str("title").unwrap(), "Fix Login Bug");
    assert_eq!(row.get_str("description").unwrap(), "Login button is unresponsive");
    assert!(!row.contains_key("priority"));
    assert!(!row.contains_key("type"));
    assert!(!row.contains_key("status"));

    store.wipe().await.unwrap();
    store.shutdown().await;
}

#[tokio::test]
async fn test_delete_one_then_none() {
    let Some((_guard, _config, store)) = setup().await else {
        return;
    };

    let task = TaskDocument::new(&seed::document::task(), Bson::Null, Bson::Null, Bson::Null);
    store.insert_task(&task).await.unwrap();

    assert_eq!(store.update_status(1, "Fix Login Bug", 2).await.unwrap(), 1);
    assert_eq!(store.delete_task(1, "Fix Login Bug").await.unwrap(), 1);
    assert_eq!(store.delete_task(1, "Fix Login Bug").await.unwrap(), 0);
    assert_eq!(store.update_status(1, "Fix Login Bug", 2).await.unwrap(), 0);

    store.wipe().await.unwrap();
    store.shutdown().await;
}

#[tokio::test]
async fn test_full_run_leaves_database_empty() {
    let Some((_guard, config, store)) = setup().await else {
        return;
    };

    let mut backend = MongoBackend::new(config).with_reference_mode(ReferenceMode::Resolved);
    let report = taskbench_core::run(&mut backend).await;

    assert!(report.is_success(), "{:?}", report);
    assert!(report.cleaned);

    let query = report.phase("MongoDB Complex Query").unwrap();
    let rows = query.output.as_ref().and_then(|o| o.rows()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["priority"]["priority_name"], "High");
    assert_eq!(rows[0]["status"]["status_name"], "To Do");

    for kind in LookupKind::ALL {
        assert_eq!(store.count_documents(kind.collection()).await.unwrap(), 0);
    }
    assert_eq!(store.count_documents(TASKS).await.unwrap(), 0);

    store.shutdown().await;
}
