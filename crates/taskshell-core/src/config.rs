//! Lifecycle configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use taskshell_navigation::{UrlParser, DEFAULT_SEARCH_ENGINE};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delays after a duplicate's first load at which its scroll offset is
    /// written. Pages may ignore scrolling until some time after load.
    pub scroll_restore_delays_ms: Vec<u64>,
    /// How long a duplicate waits for its first load before the listener is
    /// released. `None` keeps it bound until the load happens.
    pub duplicate_listener_timeout_ms: Option<u64>,
    /// Search engine URL template
    pub search_engine: String,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn scroll_restore_delays(&self) -> Vec<Duration> {
        self.scroll_restore_delays_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }

    pub fn duplicate_listener_timeout(&self) -> Option<Duration> {
        self.duplicate_listener_timeout_ms.map(Duration::from_millis)
    }

    /// Address parser using the configured search engine
    pub fn url_parser(&self) -> Result<UrlParser> {
        Ok(UrlParser::with_search_engine(self.search_engine.clone())?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_restore_delays_ms: vec![0, 750, 1500],
            duplicate_listener_timeout_ms: Some(30_000),
            search_engine: DEFAULT_SEARCH_ENGINE.to_string(),
        }
    }
}
