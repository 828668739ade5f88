//! Runtime configuration
//!
//! Plain data with sensible defaults. The binary fills these from command line
//! flags (with environment fallbacks); library users construct them directly.

use std::fmt;
use std::str::FromStr;

/// Base URL of the public TVMaze API
pub const DEFAULT_BASE_URL: &str = "http://api.tvmaze.com";

/// Poster shown for shows that have no image upstream
pub const DEFAULT_MISSING_IMAGE_URL: &str = "https://tinyurl.com/tv-missing";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the catalog HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Root URL the search and show endpoints are appended to
    pub base_url: String,
    /// Image URL substituted when a show has no poster
    pub missing_image_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            missing_image_url: DEFAULT_MISSING_IMAGE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("show-finder/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// How overlapping requests for the same display region are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestOrdering {
    /// Every completed response renders, in completion order. A slow response
    /// to an older request can overwrite content from a newer one.
    #[default]
    LastResponseWins,
    /// Only the most recently issued request for a region may render.
    /// Responses to superseded requests are dropped.
    LatestRequestWins,
}

impl fmt::Display for RequestOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestOrdering::LastResponseWins => f.write_str("last-response-wins"),
            RequestOrdering::LatestRequestWins => f.write_str("latest-request-wins"),
        }
    }
}

impl FromStr for RequestOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-response-wins" => Ok(RequestOrdering::LastResponseWins),
            "latest-request-wins" => Ok(RequestOrdering::LatestRequestWins),
            other => Err(format!(
                "unknown request ordering '{}' (expected last-response-wins or latest-request-wins)",
                other
            )),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub ordering: RequestOrdering,
}
