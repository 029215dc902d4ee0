use super::*;
use crate::sqlite::normalize_database_url;

fn item(name: &str) -> TodoItem {
    TodoItem::new(name)
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/todos.db"),
        "sqlite://./data/todos.db"
    );
}

#[test]
fn normalizes_single_colon_sqlite_path() {
    assert_eq!(
        normalize_database_url("sqlite:C:\\Users\\alice\\todos.db"),
        "sqlite://C:/Users/alice/todos.db"
    );
}

#[test]
fn blank_database_url_falls_back_to_memory() {
    assert_eq!(normalize_database_url("   "), "sqlite::memory:");
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
}

#[tokio::test]
async fn in_memory_repository_keeps_insertion_order() {
    let repository = InMemoryTodoRepository::new();
    for name in ["a", "b", "c"] {
        repository.insert(&item(name)).await.expect("insert");
    }

    let names: Vec<_> = repository
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn in_memory_repository_rejects_duplicate_ids() {
    let repository = InMemoryTodoRepository::new();
    let todo = item("a");
    repository.insert(&todo).await.expect("first insert");
    assert!(repository.insert(&todo).await.is_err());
}

#[tokio::test]
async fn in_memory_repository_reports_misses() {
    let repository = InMemoryTodoRepository::with_items(vec![item("a")]);
    let missing = TodoId::generate();

    assert!(!repository.set_completed(missing, true).await.expect("update"));
    assert!(!repository.remove(missing).await.expect("remove"));
    assert_eq!(repository.remove_completed().await.expect("clear"), 0);
}

#[tokio::test]
async fn sqlite_health_check_succeeds_for_memory_pool() {
    let repository = SqliteTodoRepository::new("sqlite::memory:")
        .await
        .expect("db");
    repository.health_check().await.expect("health check");
}

#[tokio::test]
async fn sqlite_memory_pool_keeps_rows_between_calls() {
    let repository = SqliteTodoRepository::new("sqlite::memory:")
        .await
        .expect("db");
    let todo = item("buy milk");
    repository.insert(&todo).await.expect("insert");
    assert!(repository.set_completed(todo.id, true).await.expect("update"));

    let items = repository.list().await.expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, todo.id);
    assert!(items[0].completed);
}

#[tokio::test]
async fn sqlite_creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("todos.db");

    let database_url = prepare_database_url(db_path.to_string_lossy().as_ref());
    assert!(!db_path.parent().expect("parent").exists());

    let repository = SqliteTodoRepository::new(&database_url).await.expect("db");
    repository.insert(&item("persisted")).await.expect("insert");
    drop(repository);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}
