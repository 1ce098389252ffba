//! Address input normalisation

use std::net::IpAddr;

use url::form_urlencoded;
use url::Url;

use crate::error::NavigationError;
use crate::Result;

pub const DEFAULT_SEARCH_ENGINE: &str = "https://duckduckgo.com/?q=%s";

/// Schemes that are passed through untouched
const OPAQUE_SCHEMES: &[&str] = &["file://", "about:", "data:", "view-source:"];

/// Normalises raw address-bar input into a loadable url
pub trait UrlParse: Send + Sync {
    fn parse(&self, input: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct UrlParser {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
}

impl UrlParser {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_ENGINE.to_string(),
        }
    }

    pub fn with_search_engine(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains("%s") {
            return Err(NavigationError::InvalidSearchTemplate(template));
        }
        Ok(Self {
            search_template: template,
        })
    }

    fn explicit_url(input: &str) -> Option<String> {
        let lower = input.to_ascii_lowercase();

        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Url::parse(input).ok().map(|_| input.to_string());
        }

        OPAQUE_SCHEMES
            .iter()
            .any(|scheme| lower.starts_with(scheme))
            .then(|| input.to_string())
    }

    fn host_url(input: &str) -> Option<String> {
        if input.chars().any(char::is_whitespace) {
            return None;
        }

        let (host, rest) = split_host(input);
        let candidate = match parse_ip_host(host) {
            Some(IpAddr::V6(_)) if !host.starts_with('[') => format!("https://[{host}]{rest}"),
            Some(_) => format!("https://{host}{rest}"),
            None if is_localhost(host) || looks_like_domain(host) => {
                format!("https://{host}{rest}")
            }
            None => return None,
        };

        Url::parse(&candidate).ok().map(|_| candidate)
    }

    fn search_url(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.search_template.replace("%s", &encoded)
    }
}

impl Default for UrlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlParse for UrlParser {
    fn parse(&self, input: &str) -> String {
        let input = input.trim();

        if input.is_empty() {
            return "about:blank".to_string();
        }

        Self::explicit_url(input)
            .or_else(|| Self::host_url(input))
            .unwrap_or_else(|| {
                tracing::trace!(query = %input, "Treating address input as search");
                self.search_url(input)
            })
    }
}

/// Split `host[:port]` from the path/query/fragment that follows it
fn split_host(input: &str) -> (&str, &str) {
    let cut = input.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(input.len());
    input.split_at(cut)
}

fn parse_ip_host(host: &str) -> Option<IpAddr> {
    let bare = if let Some(bracketed) = host.strip_prefix('[') {
        bracketed.split(']').next()?
    } else if host.matches(':').count() == 1 {
        // IPv4 with a port
        host.split(':').next()?
    } else {
        host
    };

    bare.parse().ok()
}

fn is_localhost(host: &str) -> bool {
    host == "localhost" || host.starts_with("localhost:")
}

fn looks_like_domain(host: &str) -> bool {
    let name = host.split(':').next().unwrap_or(host);
    let labels: Vec<&str> = name.split('.').collect();

    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }

    labels
        .last()
        .map(|tld| (2..=24).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false)
}
