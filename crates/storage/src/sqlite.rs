use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use shared::domain::{TodoId, TodoItem};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use tracing::debug;

use crate::TodoRepository;

const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Pool<Sqlite>,
}

impl SqliteTodoRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);

        // Every connection to an in-memory database opens a fresh database,
        // so the pool must hold exactly one connection for its whole life.
        let pool_options = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(Option::<Duration>::None)
                .max_lifetime(Option::<Duration>::None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;

        let repository = Self { pool };
        repository.ensure_schema().await?;
        debug!(database_url, "sqlite todo repository ready");
        Ok(repository)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                position   INTEGER PRIMARY KEY AUTOINCREMENT,
                id         TEXT NOT NULL UNIQUE,
                name       TEXT NOT NULL,
                completed  INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure todos table exists")?;
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn list(&self) -> Result<Vec<TodoItem>> {
        let rows = sqlx::query("SELECT id, name, completed FROM todos ORDER BY position ASC")
            .fetch_all(&self.pool)
            .await
            .context("failed to list todos")?;

        rows.into_iter()
            .map(|row| -> Result<TodoItem> {
                let raw_id: String = row.try_get("id")?;
                let id = raw_id
                    .parse::<TodoId>()
                    .with_context(|| format!("corrupt todo id '{raw_id}'"))?;
                Ok(TodoItem {
                    id,
                    name: row.try_get("name")?,
                    completed: row.try_get("completed")?,
                })
            })
            .collect()
    }

    async fn insert(&self, item: &TodoItem) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO todos (id, name, completed, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(item.completed)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert todo {}", item.id))?;
        Ok(())
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE todos SET completed = ?, updated_at = ? WHERE id = ?")
            .bind(completed)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to update todo {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete todo {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_completed(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE completed = 1")
            .execute(&self.pool)
            .await
            .context("failed to delete completed todos")?;
        Ok(result.rows_affected())
    }
}

/// Normalizes a user supplied database location into a sqlite url. The parent
/// directory is created when the repository opens it.
pub fn prepare_database_url(raw_database_url: &str) -> String {
    normalize_database_url(raw_database_url)
}

pub(crate) fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return MEMORY_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with(MEMORY_DATABASE_URL)
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with(MEMORY_DATABASE_URL) || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}
