use serde::{Deserialize, Serialize};

use crate::{
    domain::{TodoCounts, TodoFilter, TodoId, TodoVm},
    error::ApiError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PresenterRequest {
    GetAllTodos,
    GetActiveTodos,
    GetCompletedTodos,
    AddTodo { name: String },
    MarkTodoAsCompleted { id: TodoId },
    MarkTodoAsActive { id: TodoId },
    RemoveTodo { id: TodoId },
    RemoveCompletedTodos,
    Counts,
}

impl PresenterRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAllTodos => "get_all_todos",
            Self::GetActiveTodos => "get_active_todos",
            Self::GetCompletedTodos => "get_completed_todos",
            Self::AddTodo { .. } => "add_todo",
            Self::MarkTodoAsCompleted { .. } => "mark_todo_as_completed",
            Self::MarkTodoAsActive { .. } => "mark_todo_as_active",
            Self::RemoveTodo { .. } => "remove_todo",
            Self::RemoveCompletedTodos => "remove_completed_todos",
            Self::Counts => "counts",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PresenterEvent {
    /// Reply to one of the filter getters.
    Snapshot {
        filter: TodoFilter,
        todos: Vec<TodoVm>,
    },
    /// Live emission of the presenter's todo stream.
    Update {
        todos: Vec<TodoVm>,
    },
    Ack {
        request: String,
    },
    Counts(TodoCounts),
    Error(ApiError),
}
