use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskmanError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl TaskmanError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap an I/O or codec failure with the action and file it concerned.
    pub(crate) fn storage(
        action: &str,
        path: &Path,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::Storage(format!("{action} {}: {err}", path.display()))
    }
}

pub type Result<T> = std::result::Result<T, TaskmanError>;
