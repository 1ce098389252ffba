//! Core error types

use thiserror::Error;

use taskshell_tabs::TabId;
use taskshell_tasks::TaskId;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Tab error: {0}")]
    Tab(#[from] taskshell_tabs::TabError),

    #[error("Task error: {0}")]
    Task(#[from] taskshell_tasks::TaskError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] taskshell_navigation::NavigationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tab not found: {0}")]
    TabNotFound(TabId),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
}
