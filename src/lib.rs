//! show_finder - Search a TV show catalog and browse episode lists
//!
//! This library provides a catalog client for the TVMaze API, view models
//! and render targets for the show grid and episode panel, an in-memory
//! page that implements those targets, and the controller that wires user
//! interaction to catalog requests.

mod catalog;
mod config;
mod controller;
mod page;
mod view;

pub use catalog::{
    CatalogError, Episode, EpisodeId, Show, ShowCatalog, ShowId, TvMazeCatalog,
};
pub use config::{
    AppConfig, CatalogConfig, DEFAULT_BASE_URL, DEFAULT_MISSING_IMAGE_URL, DEFAULT_TIMEOUT_SECS,
    RequestOrdering,
};
pub use controller::{Controller, DispatchOutcome, EpisodesOutcome, PageEvent, SearchOutcome};
pub use page::{EPISODES_BUTTON_CLASS, NodeId, Page, SHOW_CLASS, SHOW_ID_ATTR};
pub use view::{
    EpisodeLine, EpisodePanel, RawMarkup, ShowCard, ShowGrid, populate_episodes, populate_shows,
};

use thiserror::Error;

/// Top-level error type for show_finder operations
#[derive(Debug, Error)]
pub enum ShowFinderError {
    /// Error while talking to the show catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// An "Episodes" button was activated on a card without a show id
    #[error("Clicked show card carries no show id")]
    ShowIdMissing,
}

/// Builds a controller for the TVMaze catalog rendering into a fresh page.
///
/// # Examples
///
/// ```no_run
/// use show_finder::{AppConfig, page_controller};
///
/// # async fn run() -> Result<(), show_finder::ShowFinderError> {
/// let controller = page_controller(&AppConfig::default())?;
/// controller.handle_search("joker").await?;
/// let html = controller.with_view(|page| page.to_html());
/// println!("{}", html);
/// # Ok(())
/// # }
/// ```
pub fn page_controller(
    config: &AppConfig,
) -> Result<Controller<TvMazeCatalog, Page>, ShowFinderError> {
    let catalog = TvMazeCatalog::new(&config.catalog)?;
    Ok(Controller::new(catalog, Page::new(), config.ordering))
}
