//! Reactive todo presenter: the single owner of todo state that views read
//! from and send intents to.
//!
//! The live collection is published three ways: synchronous callbacks
//! ([`TodoPresenter::subscribe`]), an async broadcast stream
//! ([`TodoPresenter::todos`]) and a latest-value cell
//! ([`TodoPresenter::watch`] / [`TodoPresenter::current`]). All three carry the
//! collection under the currently selected filter.

use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{TodoCounts, TodoFilter, TodoId, TodoVm};
use tokio::sync::watch;

mod listeners;
mod presenter;
mod stream;

pub use listeners::{Listener, Subscription};
pub use presenter::{PresenterOptions, TodoListPresenter};
pub use stream::TodoStream;

#[async_trait]
pub trait TodoPresenter: Send + Sync {
    /// Selects [`TodoFilter::All`], emits, and returns the emitted snapshot.
    async fn get_all_todos(&self) -> Vec<TodoVm>;
    /// Selects [`TodoFilter::Active`], emits, and returns the emitted snapshot.
    async fn get_active_todos(&self) -> Vec<TodoVm>;
    /// Selects [`TodoFilter::Completed`], emits, and returns the emitted snapshot.
    async fn get_completed_todos(&self) -> Vec<TodoVm>;

    fn subscribe(&self, listener: Listener) -> Subscription;
    fn todos(&self) -> TodoStream;
    fn watch(&self) -> watch::Receiver<Vec<TodoVm>>;
    /// Last emitted collection.
    fn current(&self) -> Vec<TodoVm>;
    fn filter(&self) -> TodoFilter;
    /// Counts over the whole collection, ignoring the selected filter.
    async fn counts(&self) -> TodoCounts;

    /// Blank names are ignored without an emission.
    async fn add_todo(&self, name: &str);
    async fn mark_todo_as_completed(&self, id: TodoId);
    async fn mark_todo_as_active(&self, id: TodoId);
    async fn remove_todo(&self, id: TodoId);
    /// Emits even when nothing was completed.
    async fn remove_completed_todos(&self);
}

/// Wraps a closure as a [`Listener`].
pub fn listener<F>(callback: F) -> Listener
where
    F: Fn(&[TodoVm]) + Send + Sync + 'static,
{
    Arc::new(callback)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
