//! Content view host contract
//!
//! One content view exists per tab id. The host loads pages and runs scripts;
//! the controller only issues lifecycle commands and one-shot script calls.

use futures_util::future::BoxFuture;
use thiserror::Error;

use taskshell_tabs::TabId;

/// Result of a script executed inside a content view
pub type ScriptFuture = BoxFuture<'static, Result<serde_json::Value, ContentError>>;

#[derive(Error, Debug, Clone)]
pub enum ContentError {
    #[error("No content view for tab {0}")]
    ViewGone(TabId),

    #[error("Script failed: {0}")]
    Script(String),
}

/// Scripts the controller runs inside content views
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    /// Read the vertical scroll offset
    ReadScrollY,
    /// Scroll to a vertical offset
    ScrollTo { y: f64 },
}

impl Script {
    /// JavaScript source for the host to evaluate
    pub fn source(&self) -> String {
        match self {
            Script::ReadScrollY => "(function() {return window.scrollY})()".to_string(),
            Script::ScrollTo { y } => format!("window.scrollTo(0, {})", y),
        }
    }
}

pub trait ContentHost: Send + Sync {
    /// Create the content view for a tab
    fn add(&self, tab_id: &TabId);

    fn destroy(&self, tab_id: &TabId);

    /// Load a url in the tab's view
    fn update(&self, tab_id: &TabId, url: &str);

    /// Present the tab's view, optionally giving it keyboard focus
    fn set_selected(&self, tab_id: &TabId, focus: bool);

    /// Run a script in the tab's view
    fn call_async(&self, tab_id: &TabId, script: Script) -> ScriptFuture;
}
