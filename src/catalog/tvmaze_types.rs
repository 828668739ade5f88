/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
/// Only the fields this crate reads are declared; everything else is ignored.
use super::{EpisodeId, ShowId};
use serde::Deserialize;

/// One hit from the `/search/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchHit {
    /// The matched show
    pub show: TvMazeShow,
}

/// Show object nested inside a search hit.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: ShowId,
    /// The name of the TV show
    pub name: String,
    /// Show summary in HTML format (may be null)
    pub summary: Option<String>,
    /// Poster images (null when TVMaze has none)
    pub image: Option<TvMazeImage>,
}

/// Poster URLs; only the original resolution is used.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    /// Full-resolution poster URL
    pub original: String,
}

/// A single episode from the `/shows/<id>/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: EpisodeId,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Season number (0 for specials on some shows)
    pub season: u32,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
}
