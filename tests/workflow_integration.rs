use std::fs;

use tempfile::tempdir;

use taskman::manager::{NewTask, TaskManager, TaskUpdate};
use taskman::model::{Priority, Status, Task};
use taskman::query::{ListQuery, SearchMode, SearchQuery, SortField, SortOrder, TagMatch, TaskFilter};
use taskman::store::{ImportMode, JsonStorage};

#[test]
fn test_full_workflow_survives_reload() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();
    let mut manager = TaskManager::open(storage.clone()).unwrap();
    assert!(manager.is_empty());

    let write = manager
        .create(
            NewTask::new("Write report")
                .description("quarterly numbers")
                .priority(Priority::High)
                .tags(["work", "writing"]),
        )
        .unwrap();
    let shop = manager
        .create(NewTask::new("  Buy milk  ").tags(["home"]))
        .unwrap();
    assert_eq!(shop.title, "Buy milk");
    assert_eq!(shop.priority, Priority::Medium);
    assert_eq!(shop.status, Status::Todo);

    manager.mark_done(&shop.id).unwrap();
    manager
        .update(
            write.short_id(),
            TaskUpdate::new().status(Status::InProgress),
        )
        .unwrap();

    let reloaded = TaskManager::open(storage).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get(&write.id).unwrap().status, Status::InProgress);
    assert_eq!(reloaded.get(&shop.id).unwrap().status, Status::Done);
    assert_eq!(reloaded.tasks(), manager.tasks());
}

#[test]
fn test_filter_sort_and_search_through_manager() {
    let mut manager = TaskManager::new();
    manager
        .create(NewTask::new("Fix login bug").priority(Priority::Urgent).tags(["bug"]))
        .unwrap();
    manager
        .create(NewTask::new("Write docs").priority(Priority::Low).tags(["docs"]))
        .unwrap();
    manager
        .create(NewTask::new("Triage bug reports").priority(Priority::High).tags(["bug"]))
        .unwrap();

    let bugs = manager.list(
        &ListQuery::new(TaskFilter::new().tags(["bug"], TagMatch::Any))
            .sorted(SortField::Priority, SortOrder::Desc),
    );
    let titles: Vec<&str> = bugs.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Fix login bug", "Triage bug reports"]);

    let hits = manager.search(&SearchQuery::new("BUG"));
    assert_eq!(hits.len(), 2);

    let strict = manager.search(&SearchQuery::new("BUG").mode(SearchMode::plain().case_sensitive(true)));
    assert!(strict.is_empty());

    let pattern = manager.search(&SearchQuery::new(r"^(fix|write)\b").mode(SearchMode::regex()));
    assert_eq!(pattern.len(), 2);
}

#[test]
fn test_export_then_merge_import() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("a")).unwrap();
    let mut source = TaskManager::open(storage.clone()).unwrap();
    source.create(NewTask::new("One")).unwrap();
    source.create(NewTask::new("Two")).unwrap();

    let export = dir.path().join("export.json");
    storage.export(source.tasks(), &export).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(doc["metadata"]["task_count"], 2);

    let other = JsonStorage::open(dir.path().join("b")).unwrap();
    let mut target = TaskManager::open(other.clone()).unwrap();
    target.create(NewTask::new("Local")).unwrap();

    let added = other.import_into(&mut target, &export, ImportMode::Merge).unwrap();
    assert_eq!(added, 2);
    let again = other.import_into(&mut target, &export, ImportMode::Merge).unwrap();
    assert_eq!(again, 0);
    target.save().unwrap();

    let reloaded = TaskManager::open(other).unwrap();
    assert_eq!(reloaded.len(), 3);
}

#[test]
fn test_corrupt_tasks_file_is_a_storage_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tasks.json"), "{ not json").unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();

    let err = TaskManager::open(storage).unwrap_err();
    assert_eq!(err.code(), "storage_error");
    assert!(err.to_string().contains("invalid JSON"));
}

#[test]
fn test_failed_validation_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();
    let mut manager = TaskManager::open(storage.clone()).unwrap();
    let task = manager.create(NewTask::new("Keep me")).unwrap();
    let before = fs::read_to_string(storage.tasks_file()).unwrap();

    let err = manager
        .update(&task.id, TaskUpdate::new().title("new").priority_str("critical"))
        .unwrap_err();
    assert_eq!(err.code(), "validation_error");
    assert_eq!(manager.get(&task.id).unwrap().title, "Keep me");
    assert_eq!(fs::read_to_string(storage.tasks_file()).unwrap(), before);
}

#[test]
fn test_merge_import_keeps_local_version_on_collision() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();
    let mut manager = TaskManager::open(storage.clone()).unwrap();
    let shared = manager.create(NewTask::new("Shared")).unwrap();
    let mut incoming = vec![shared.clone(), Task::new("Fresh")];
    incoming[0].title = "Changed elsewhere".into();
    let export = dir.path().join("incoming.json");
    storage.export(&incoming, &export).unwrap();

    manager
        .update(&shared.id, TaskUpdate::new().title("Changed here"))
        .unwrap();
    let added = storage.import_into(&mut manager, &export, ImportMode::Merge).unwrap();

    assert_eq!(added, 1);
    assert_eq!(manager.len(), 2);
    assert_eq!(manager.get(&shared.id).unwrap().title, "Changed here");
}
