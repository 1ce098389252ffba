//! taskshell Navigation
//!
//! Turns whatever the user typed into the address bar into a url:
//! 1. Explicit url → kept as typed
//! 2. Host-like input → `https://` prepended
//! 3. Anything else → search url

mod error;
mod parser;

pub use error::NavigationError;
pub use parser::{UrlParse, UrlParser, DEFAULT_SEARCH_ENGINE};

pub type Result<T> = std::result::Result<T, NavigationError>;
