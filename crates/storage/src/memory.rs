use anyhow::{bail, Result};
use async_trait::async_trait;
use shared::domain::{TodoId, TodoItem};
use tokio::sync::RwLock;

use crate::TodoRepository;

#[derive(Default)]
pub struct InMemoryTodoRepository {
    items: RwLock<Vec<TodoItem>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<TodoItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<TodoItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn insert(&self, item: &TodoItem) -> Result<()> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id) {
            bail!("todo {} already exists", item.id);
        }
        items.push(item.clone());
        Ok(())
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<bool> {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(false);
        };
        item.completed = completed;
        Ok(true)
    }

    async fn remove(&self, id: TodoId) -> Result<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() != before)
    }

    async fn remove_completed(&self) -> Result<u64> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| !item.completed);
        Ok((before - items.len()) as u64)
    }
}
