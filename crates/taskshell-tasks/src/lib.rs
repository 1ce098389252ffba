//! taskshell Task Management
//!
//! - A Task is a named, ordered group of tabs (a workspace)
//! - Each task owns its tabs and remembers which of them is selected
//! - Exactly one task is selected at a time

mod error;
mod store;
mod task;

pub use error::TaskError;
pub use store::TaskStore;
pub use task::{Task, TaskId};

pub type Result<T> = std::result::Result<T, TaskError>;
