//! taskshell Tab Management
//!
//! A tab is one browsing context. Tabs live in an ordered [`TabStore`] owned by
//! their task; the store carries the task's selected-tab pointer.

mod error;
mod recency;
mod store;
mod tab;

pub use error::TabError;
pub use recency::most_recent;
pub use store::TabStore;
pub use tab::{Tab, TabDraft, TabId};

pub type Result<T> = std::result::Result<T, TabError>;
