//! Tab data structure
//!
//! A tab with no url (or an empty one) is "empty": a fresh new-tab page that
//! the user has not navigated anywhere yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TabError;

/// Unique identifier for a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TabId {
    type Err = TabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TabError::InvalidId(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier, minted by the store
    pub id: TabId,
    /// Current URL, absent for a new-tab page
    pub url: Option<String>,
    /// Private tabs keep no history
    pub private: bool,
    /// Last time the tab was selected
    pub last_activity: DateTime<Utc>,
}

impl Tab {
    pub(crate) fn from_draft(draft: TabDraft) -> Self {
        Self {
            id: TabId::new(),
            url: draft.url,
            private: draft.private,
            last_activity: Utc::now(),
        }
    }

    /// True when the tab has not been navigated anywhere
    pub fn is_empty(&self) -> bool {
        self.url.as_deref().map_or(true, str::is_empty)
    }

    /// Copy the tab's attributes without its identity
    pub fn to_draft(&self) -> TabDraft {
        TabDraft {
            url: self.url.clone(),
            private: self.private,
        }
    }

    /// Mark the tab as just used
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

/// A tab record that has not been assigned an id yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDraft {
    pub url: Option<String>,
    pub private: bool,
}

impl TabDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }
}
