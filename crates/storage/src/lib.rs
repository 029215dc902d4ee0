//! Storage collaborators behind the todo presenter.

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{TodoId, TodoItem};

mod memory;
mod sqlite;

pub use memory::InMemoryTodoRepository;
pub use sqlite::{prepare_database_url, SqliteTodoRepository};

/// Authoritative store of todo items, in insertion order.
///
/// Id-based operations report whether a row was touched instead of failing
/// on unknown ids; callers decide whether a miss matters.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<TodoItem>>;
    async fn insert(&self, item: &TodoItem) -> Result<()>;
    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<bool>;
    async fn remove(&self, id: TodoId) -> Result<bool>;
    /// Returns the number of removed items.
    async fn remove_completed(&self) -> Result<u64>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
