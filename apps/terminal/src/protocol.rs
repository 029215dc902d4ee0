//! JSON-lines transport for the presenter contract.
//!
//! Each input line is a [`PresenterRequest`]; each output line is a
//! [`PresenterEvent`]. Live emissions are written as `update` events ahead of
//! the reply to the request that caused them.

use std::sync::Arc;

use presenter::{listener, TodoPresenter};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{PresenterEvent, PresenterRequest},
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};
use tracing::{debug, warn};

pub async fn serve<R, W>(presenter: Arc<dyn TodoPresenter>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<PresenterEvent>();

    let updates_tx = outbound_tx.clone();
    let _subscription = presenter.subscribe(listener(move |todos| {
        let _ = updates_tx.send(PresenterEvent::Update {
            todos: todos.to_vec(),
        });
    }));

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<PresenterRequest>(&line) {
            Ok(request) => dispatch(presenter.as_ref(), request).await,
            Err(err) => {
                warn!(error = %err, "protocol: malformed request");
                PresenterEvent::Error(ApiError::new(ErrorCode::Malformed, err.to_string()))
            }
        };
        let _ = outbound_tx.send(reply);

        while let Ok(event) = outbound_rx.try_recv() {
            write_event(&mut writer, &event).await?;
        }
        writer.flush().await?;
    }

    Ok(())
}

pub async fn dispatch(presenter: &dyn TodoPresenter, request: PresenterRequest) -> PresenterEvent {
    let request_name = request.name();
    debug!(request = request_name, "protocol: dispatching request");

    match request {
        PresenterRequest::GetAllTodos => snapshot(presenter, presenter.get_all_todos().await),
        PresenterRequest::GetActiveTodos => {
            snapshot(presenter, presenter.get_active_todos().await)
        }
        PresenterRequest::GetCompletedTodos => {
            snapshot(presenter, presenter.get_completed_todos().await)
        }
        PresenterRequest::AddTodo { name } => {
            presenter.add_todo(&name).await;
            ack(request_name)
        }
        PresenterRequest::MarkTodoAsCompleted { id } => {
            presenter.mark_todo_as_completed(id).await;
            ack(request_name)
        }
        PresenterRequest::MarkTodoAsActive { id } => {
            presenter.mark_todo_as_active(id).await;
            ack(request_name)
        }
        PresenterRequest::RemoveTodo { id } => {
            presenter.remove_todo(id).await;
            ack(request_name)
        }
        PresenterRequest::RemoveCompletedTodos => {
            presenter.remove_completed_todos().await;
            ack(request_name)
        }
        PresenterRequest::Counts => PresenterEvent::Counts(presenter.counts().await),
    }
}

fn snapshot(presenter: &dyn TodoPresenter, todos: Vec<shared::domain::TodoVm>) -> PresenterEvent {
    PresenterEvent::Snapshot {
        filter: presenter.filter(),
        todos,
    }
}

fn ack(request: &str) -> PresenterEvent {
    PresenterEvent::Ack {
        request: request.to_string(),
    }
}

async fn write_event<W>(writer: &mut W, event: &PresenterEvent) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(event)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
