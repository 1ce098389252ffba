//! taskshell Core
//!
//! Keeps the tab strip, the content views and the task/tab stores consistent
//! while tabs and tasks are created, closed, switched and duplicated.
//! The stores are owned here; the UI and the content host only receive commands.

mod config;
mod content;
mod controller;
mod duplicate;
mod error;
mod events;
mod focus;
mod strip;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use content::{ContentError, ContentHost, Script, ScriptFuture};
pub use controller::{AddTabOptions, Collaborators, LifecycleController, SwitchOptions};
pub use error::CoreError;
pub use events::{
    Disposition, EventHub, EventKind, Listen, SubscriptionId, ViewEvent, CLOSE_WINDOW_CHANNEL,
};
pub use focus::{FocusMode, FocusPolicy};
pub use strip::TabStrip;

// Re-export the stores and records the controller works on
pub use taskshell_navigation::{NavigationError, UrlParse, UrlParser};
pub use taskshell_tabs::{Tab, TabDraft, TabError, TabId, TabStore};
pub use taskshell_tasks::{Task, TaskError, TaskId, TaskStore};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
