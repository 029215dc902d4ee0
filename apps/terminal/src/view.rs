//! Line-oriented terminal view over a [`TodoPresenter`].

use std::{
    fmt::Write as _,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use presenter::{listener, Subscription, TodoPresenter};
use shared::domain::{TodoCounts, TodoFilter, TodoVm};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::intent::{parse_line, ViewIntent, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Holds only ephemeral state: the input text, the selected filter toggle and
/// the last collection pushed by the presenter.
pub struct TodoView {
    presenter: Arc<dyn TodoPresenter>,
    input: String,
    selected: TodoFilter,
    rendered: Arc<Mutex<Vec<TodoVm>>>,
    subscription: Option<Subscription>,
    notice: Option<String>,
}

fn lock(rendered: &Mutex<Vec<TodoVm>>) -> MutexGuard<'_, Vec<TodoVm>> {
    rendered.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TodoView {
    /// Renders the presenter's current collection under its selected filter
    /// right away, then follows its live emissions.
    pub async fn mount(presenter: Arc<dyn TodoPresenter>) -> Self {
        let selected = presenter.filter();
        let initial = show(presenter.as_ref(), selected).await;
        let rendered = Arc::new(Mutex::new(initial));

        let sink = Arc::clone(&rendered);
        let subscription = presenter.subscribe(listener(move |todos| {
            *lock(&sink) = todos.to_vec();
        }));
        debug!(subscription = subscription.id(), filter = %selected, "view: mounted");

        Self {
            presenter,
            input: String::new(),
            selected,
            rendered,
            subscription: Some(subscription),
            notice: None,
        }
    }

    pub fn unmount(mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!(subscription = subscription.id(), "view: unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selected(&self) -> TodoFilter {
        self.selected
    }

    pub fn todos(&self) -> Vec<TodoVm> {
        lock(&self.rendered).clone()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub async fn handle(&mut self, intent: ViewIntent) -> Flow {
        debug!(intent = intent.name(), "view: handling intent");
        match intent {
            ViewIntent::Input(text) => self.input = text,
            ViewIntent::Submit => {
                let name = std::mem::take(&mut self.input);
                self.presenter.add_todo(&name).await;
            }
            ViewIntent::Check { row, checked } => {
                if let Some(todo) = self.row(row) {
                    self.set_checked(&todo, checked).await;
                }
            }
            ViewIntent::Toggle { row } => {
                if let Some(todo) = self.row(row) {
                    self.set_checked(&todo, !todo.completed).await;
                }
            }
            ViewIntent::Remove { row } => {
                if let Some(todo) = self.row(row) {
                    self.presenter.remove_todo(todo.id).await;
                }
            }
            ViewIntent::Show(filter) => {
                self.selected = filter;
                show(self.presenter.as_ref(), filter).await;
            }
            ViewIntent::ClearCompleted => self.presenter.remove_completed_todos().await,
            ViewIntent::Help => self.notice = Some(HELP.to_string()),
            ViewIntent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    async fn set_checked(&self, todo: &TodoVm, checked: bool) {
        if checked {
            self.presenter.mark_todo_as_completed(todo.id).await;
        } else {
            self.presenter.mark_todo_as_active(todo.id).await;
        }
    }

    fn row(&mut self, row: usize) -> Option<TodoVm> {
        let todo = row
            .checked_sub(1)
            .and_then(|index| lock(&self.rendered).get(index).cloned());
        if todo.is_none() {
            debug!(row, "view: intent for a row that is not rendered");
            self.notice = Some(format!("no row {row}"));
        }
        todo
    }

    /// Text for the current frame. Takes any pending notice.
    pub fn render(&mut self) -> String {
        let todos = lock(&self.rendered);
        let mut out = String::new();

        let _ = writeln!(out, "todos ({})", self.selected);
        if todos.is_empty() {
            let _ = writeln!(out, "  (nothing here)");
        }
        for (index, todo) in todos.iter().enumerate() {
            let mark = if todo.completed { 'x' } else { ' ' };
            let _ = writeln!(out, "  {:>2}. [{mark}] {}", index + 1, todo.name);
        }

        let left = TodoCounts::of_view_models(todos.iter()).active;
        let noun = if left == 1 { "item" } else { "items" };
        let _ = writeln!(out, "{left} {noun} left");
        drop(todos);

        if let Some(notice) = self.notice.take() {
            let _ = writeln!(out, "{notice}");
        }
        out
    }
}

async fn show(presenter: &dyn TodoPresenter, filter: TodoFilter) -> Vec<TodoVm> {
    match filter {
        TodoFilter::All => presenter.get_all_todos().await,
        TodoFilter::Active => presenter.get_active_todos().await,
        TodoFilter::Completed => presenter.get_completed_todos().await,
    }
}

/// Drives a mounted view from `reader` until EOF or `:quit`.
///
/// The view, and with it the subscription, is dropped on every exit path.
pub async fn run<R, W>(presenter: Arc<dyn TodoPresenter>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut view = TodoView::mount(presenter).await;
    writer.write_all(view.render().as_bytes()).await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    'session: while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(intents) => {
                for intent in intents {
                    if view.handle(intent).await == Flow::Quit {
                        break 'session;
                    }
                }
            }
            Err(err) => view.set_notice(err.to_string()),
        }
        writer.write_all(view.render().as_bytes()).await?;
        writer.flush().await?;
    }

    view.unmount();
    Ok(())
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
