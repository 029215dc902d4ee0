use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{TodoCounts, TodoFilter, TodoId, TodoItem, TodoVm},
    error::CommandError,
};
use storage::TodoRepository;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};

use crate::{
    listeners::{Listener, ListenerRegistry, Subscription},
    stream::TodoStream,
    TodoPresenter,
};

const DEFAULT_EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterOptions {
    /// Snapshots buffered per [`TodoStream`] before the oldest are dropped.
    pub event_buffer: usize,
    pub initial_filter: TodoFilter,
}

impl Default for PresenterOptions {
    fn default() -> Self {
        Self {
            event_buffer: DEFAULT_EVENT_BUFFER,
            initial_filter: TodoFilter::All,
        }
    }
}

struct PresenterState {
    filter: TodoFilter,
    /// Last collection read from the repository, in insertion order.
    items: Vec<TodoItem>,
}

/// Presenter over a [`TodoRepository`].
///
/// Commands serialize on one state lock and emit while still holding it, so
/// every consumer observes emissions in command order.
pub struct TodoListPresenter {
    repository: Arc<dyn TodoRepository>,
    state: Mutex<PresenterState>,
    listeners: Arc<ListenerRegistry>,
    updates: broadcast::Sender<Vec<TodoVm>>,
    latest: watch::Sender<Vec<TodoVm>>,
    selected: watch::Sender<TodoFilter>,
}

impl TodoListPresenter {
    pub fn new(repository: Arc<dyn TodoRepository>, options: PresenterOptions) -> Arc<Self> {
        let (updates, _) = broadcast::channel(options.event_buffer.max(1));
        let (latest, _) = watch::channel(Vec::new());
        let (selected, _) = watch::channel(options.initial_filter);
        Arc::new(Self {
            repository,
            state: Mutex::new(PresenterState {
                filter: options.initial_filter,
                items: Vec::new(),
            }),
            listeners: Arc::new(ListenerRegistry::default()),
            updates,
            latest,
            selected,
        })
    }

    /// Builds a presenter and primes its snapshot from the repository
    /// without emitting.
    pub async fn open(
        repository: Arc<dyn TodoRepository>,
        options: PresenterOptions,
    ) -> Arc<Self> {
        let presenter = Self::new(repository, options);
        {
            let mut state = presenter.state.lock().await;
            presenter.reload(&mut state).await;
            let todos = state.filter.project(&state.items);
            presenter.latest.send_replace(todos);
            info!(
                items = state.items.len(),
                filter = %state.filter,
                "todo: presenter ready"
            );
        }
        presenter
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    async fn select(&self, filter: TodoFilter) -> Vec<TodoVm> {
        let mut state = self.state.lock().await;
        state.filter = filter;
        self.selected.send_replace(filter);
        self.reload(&mut state).await;
        debug!(%filter, "todo: filter selected");
        self.emit(&state)
    }

    async fn set_completed(&self, command: &'static str, id: TodoId, completed: bool) {
        let mut state = self.state.lock().await;
        let outcome = match self.repository.set_completed(id, completed).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CommandError::NotFound(id)),
            Err(err) => Err(CommandError::storage(format!("{err:#}"))),
        };
        self.settle(&mut state, command, outcome).await;
    }

    /// Logs the outcome of a command and emits the resulting collection.
    ///
    /// A storage failure skips the reload and re-emits the last known
    /// collection, which is stale but never absent.
    async fn settle(
        &self,
        state: &mut PresenterState,
        command: &'static str,
        outcome: Result<(), CommandError>,
    ) {
        match &outcome {
            Ok(()) => debug!(command, "todo: command applied"),
            Err(err @ CommandError::Storage(_)) => {
                warn!(command, code = ?err.code(), error = %err, "todo: command dropped; emitting last known todos");
            }
            Err(err) => debug!(command, code = ?err.code(), error = %err, "todo: command ignored"),
        }

        if !matches!(outcome, Err(CommandError::Storage(_))) {
            self.reload(state).await;
        }
        self.emit(state);
    }

    async fn reload(&self, state: &mut PresenterState) {
        match self.repository.list().await {
            Ok(items) => state.items = items,
            Err(err) => warn!(
                error = %format!("{err:#}"),
                cached = state.items.len(),
                "todo: reload failed; keeping last known todos"
            ),
        }
    }

    fn emit(&self, state: &PresenterState) -> Vec<TodoVm> {
        let todos = state.filter.project(&state.items);
        self.latest.send_replace(todos.clone());
        // No receivers is fine; callbacks and the watch still see it.
        let _ = self.updates.send(todos.clone());
        self.listeners.dispatch(&todos);
        todos
    }
}

#[async_trait]
impl TodoPresenter for TodoListPresenter {
    async fn get_all_todos(&self) -> Vec<TodoVm> {
        self.select(TodoFilter::All).await
    }

    async fn get_active_todos(&self) -> Vec<TodoVm> {
        self.select(TodoFilter::Active).await
    }

    async fn get_completed_todos(&self) -> Vec<TodoVm> {
        self.select(TodoFilter::Completed).await
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.register(listener)
    }

    fn todos(&self) -> TodoStream {
        TodoStream::new(self.updates.subscribe())
    }

    fn watch(&self) -> watch::Receiver<Vec<TodoVm>> {
        self.latest.subscribe()
    }

    fn current(&self) -> Vec<TodoVm> {
        self.latest.borrow().clone()
    }

    fn filter(&self) -> TodoFilter {
        *self.selected.borrow()
    }

    async fn counts(&self) -> TodoCounts {
        let state = self.state.lock().await;
        TodoCounts::of_items(&state.items)
    }

    async fn add_todo(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            debug!(
                command = "add_todo",
                code = ?CommandError::InvalidInput.code(),
                "todo: command ignored"
            );
            return;
        }

        let mut state = self.state.lock().await;
        let item = TodoItem::new(name);
        let outcome = self
            .repository
            .insert(&item)
            .await
            .map_err(|err| CommandError::storage(format!("{err:#}")));
        if outcome.is_ok() {
            info!(id = %item.id, "todo: added");
        }
        self.settle(&mut state, "add_todo", outcome).await;
    }

    async fn mark_todo_as_completed(&self, id: TodoId) {
        self.set_completed("mark_todo_as_completed", id, true).await;
    }

    async fn mark_todo_as_active(&self, id: TodoId) {
        self.set_completed("mark_todo_as_active", id, false).await;
    }

    async fn remove_todo(&self, id: TodoId) {
        let mut state = self.state.lock().await;
        let outcome = match self.repository.remove(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CommandError::NotFound(id)),
            Err(err) => Err(CommandError::storage(format!("{err:#}"))),
        };
        self.settle(&mut state, "remove_todo", outcome).await;
    }

    async fn remove_completed_todos(&self) {
        let mut state = self.state.lock().await;
        let outcome = match self.repository.remove_completed().await {
            Ok(removed) => {
                debug!(removed, "todo: completed todos cleared");
                Ok(())
            }
            Err(err) => Err(CommandError::storage(format!("{err:#}"))),
        };
        self.settle(&mut state, "remove_completed_todos", outcome).await;
    }
}
