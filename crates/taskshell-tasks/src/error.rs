//! Task error types

use thiserror::Error;

use crate::task::TaskId;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Tab error: {0}")]
    Tab(#[from] taskshell_tabs::TabError),

    #[error("No selected task")]
    NoSelectedTask,
}
