use shared::domain::{TodoId, TodoItem};
use storage::{
    prepare_database_url, InMemoryTodoRepository, SqliteTodoRepository, TodoRepository,
};

async fn exercise_contract(repository: &dyn TodoRepository) {
    let a = TodoItem::new("a");
    let b = TodoItem::new("b");
    let c = TodoItem::new("c");
    for todo in [&a, &b, &c] {
        repository.insert(todo).await.expect("insert");
    }

    assert!(repository.set_completed(b.id, true).await.expect("complete b"));
    assert!(repository.set_completed(c.id, true).await.expect("complete c"));
    assert!(repository.set_completed(c.id, false).await.expect("reopen c"));
    assert!(!repository
        .set_completed(TodoId::generate(), true)
        .await
        .expect("unknown id"));

    let items = repository.list().await.expect("list");
    let flags: Vec<_> = items
        .iter()
        .map(|item| (item.name.as_str(), item.completed))
        .collect();
    assert_eq!(flags, vec![("a", false), ("b", true), ("c", false)]);

    assert_eq!(repository.remove_completed().await.expect("clear"), 1);
    assert!(repository.remove(a.id).await.expect("remove a"));
    assert!(!repository.remove(a.id).await.expect("remove a again"));

    let remaining = repository.list().await.expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, c.id);
}

#[tokio::test]
async fn in_memory_repository_satisfies_contract() {
    exercise_contract(&InMemoryTodoRepository::new()).await;
}

#[tokio::test]
async fn sqlite_repository_satisfies_contract() {
    let repository = SqliteTodoRepository::new("sqlite::memory:")
        .await
        .expect("db");
    exercise_contract(&repository).await;
}

#[tokio::test]
async fn sqlite_repository_preserves_order_across_reopen() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let database_url = prepare_database_url(
        temp_root
            .path()
            .join("todos.db")
            .to_string_lossy()
            .as_ref(),
    );

    let first = SqliteTodoRepository::new(&database_url).await.expect("open");
    for name in ["first", "second", "third"] {
        first.insert(&TodoItem::new(name)).await.expect("insert");
    }
    first.pool().close().await;

    let reopened = SqliteTodoRepository::new(&database_url)
        .await
        .expect("reopen");
    let names: Vec<_> = reopened
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}
