use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TodoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    Storage,
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Why a presenter command was dropped. Recovered inside the presenter and
/// never returned through the presenter contract.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("todo name is empty")]
    InvalidInput,
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl CommandError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput => ErrorCode::InvalidInput,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Storage(_) => ErrorCode::Storage,
        }
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<CommandError> for ApiError {
    fn from(value: CommandError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
