//! Show catalog access
//!
//! This module provides the records a show search produces (shows and their
//! episodes), the error type for catalog requests, and the [`ShowCatalog`]
//! trait that the interaction controller talks to.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::TvMazeCatalog;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur while talking to the show catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The catalog answered with a non-success status
    #[error("HTTP {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// The catalog's JSON response did not have the expected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Opaque, service-assigned identifier of a show.
///
/// TVMaze sends numeric ids, but nothing here relies on that: the id is kept
/// as text so it can travel through a `data-show-id` attribute and come back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct ShowId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for ShowId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => ShowId(n.to_string()),
            RawId::Text(s) => ShowId(s),
        }
    }
}

impl From<ShowId> for String {
    fn from(id: ShowId) -> Self {
        id.0
    }
}

impl ShowId {
    pub fn new(id: impl Into<String>) -> Self {
        ShowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShowId {
    fn from(id: &str) -> Self {
        ShowId(id.to_string())
    }
}

impl From<u64> for ShowId {
    fn from(id: u64) -> Self {
        ShowId(id.to_string())
    }
}

/// Opaque, service-assigned identifier of an episode.
///
/// Accepts numeric and string ids, like [`ShowId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct EpisodeId(String);

impl From<RawId> for EpisodeId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => EpisodeId(n.to_string()),
            RawId::Text(s) => EpisodeId(s),
        }
    }
}

impl From<EpisodeId> for String {
    fn from(id: EpisodeId) -> Self {
        id.0
    }
}

impl From<u64> for EpisodeId {
    fn from(id: u64) -> Self {
        EpisodeId(id.to_string())
    }
}

impl EpisodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single search hit from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Identifier used later to fetch this show's episodes
    pub id: ShowId,
    /// The show title
    pub name: String,
    /// Summary as delivered by the catalog, usually HTML
    pub summary: Option<String>,
    /// Original-resolution poster, or the configured placeholder
    pub image: String,
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    /// The episode title (absent for episodes without a title)
    pub name: Option<String>,
    /// The season number this episode belongs to
    pub season: u32,
    /// The episode number within the season (absent for specials)
    pub number: Option<u32>,
}

/// Trait for catalogs that can search shows and list their episodes.
///
/// Both operations suspend for one network round-trip and report every
/// failure to the caller. Implementations do not retry, cache or page.
pub trait ShowCatalog {
    /// Searches the catalog for shows matching a free-text query.
    ///
    /// # Arguments
    ///
    /// * `query` - The search text, passed upstream as-is
    ///
    /// # Returns
    ///
    /// The matching shows in the order the catalog ranked them; empty when
    /// nothing matched.
    fn search_shows(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Show>, CatalogError>> + Send;

    /// Fetches the full episode list of a show.
    ///
    /// # Arguments
    ///
    /// * `show_id` - Identifier taken from a previous search result
    fn get_episodes(
        &self,
        show_id: &ShowId,
    ) -> impl Future<Output = Result<Vec<Episode>, CatalogError>> + Send;
}
