//! Interaction controller
//!
//! Two independent request/render cycles: a submitted query is searched and
//! rendered into the show grid, and an "Episodes" activation fetches and
//! renders the episode list of one show. Each cycle suspends only while the
//! catalog request is in flight, and always replaces the region it renders
//! into wholesale.
//!
//! Overlapping cycles are resolved according to [`RequestOrdering`]. With the
//! default `LastResponseWins`, whichever response arrives last is what stays
//! on screen, even if it answers an older request.

use crate::ShowFinderError;
use crate::catalog::{ShowCatalog, ShowId};
use crate::config::RequestOrdering;
use crate::page::{NodeId, Page};
use crate::view::{EpisodePanel, ShowGrid, populate_episodes, populate_shows};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Result of handling a search submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was empty; nothing was requested or rendered
    Skipped,
    /// The grid now shows this many cards
    Rendered { shows: usize },
    /// A newer request owns the grid; the response was dropped
    Superseded,
}

/// Result of handling an episode list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodesOutcome {
    /// The panel is visible and lists this many episodes
    Rendered { episodes: usize },
    /// A newer request owns the panel; the response was dropped
    Superseded,
}

/// User interaction on a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The search form was submitted
    Submit,
    /// Something on the page was clicked
    Click(NodeId),
}

/// Result of dispatching a [`PageEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Search(SearchOutcome),
    Episodes(EpisodesOutcome),
    /// The event has no handler (e.g. a click outside any "Episodes" button)
    Ignored,
}

/// Couples a show catalog with the display regions it renders into.
pub struct Controller<C, V> {
    catalog: C,
    view: Mutex<V>,
    ordering: RequestOrdering,
    /// Bumped for every search issued
    search_generation: AtomicU64,
    /// Bumped for every episode fetch issued, and for every search
    episodes_generation: AtomicU64,
}

impl<C, V> Controller<C, V>
where
    C: ShowCatalog,
    V: ShowGrid + EpisodePanel,
{
    pub fn new(catalog: C, view: V, ordering: RequestOrdering) -> Self {
        Self {
            catalog,
            view: Mutex::new(view),
            ordering,
            search_generation: AtomicU64::new(0),
            episodes_generation: AtomicU64::new(0),
        }
    }

    /// Runs `f` against the current state of the display.
    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&*self.lock_view())
    }

    /// Runs `f` with mutable access to the display, e.g. to fill in the query.
    pub fn with_view_mut<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut *self.lock_view())
    }

    /// Consumes the controller and returns the display.
    pub fn into_view(self) -> V {
        self.view.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handles a search submission.
    ///
    /// An empty query is ignored without touching the display. Otherwise the
    /// episode panel is hidden right away, before the request goes out, and
    /// the grid is repainted once the results arrive.
    ///
    /// # Errors
    ///
    /// Catalog failures are returned as-is. The panel stays hidden and the
    /// grid keeps its previous content.
    pub async fn handle_search(&self, query: &str) -> Result<SearchOutcome, ShowFinderError> {
        if query.is_empty() {
            debug!("empty query, skipping search");
            return Ok(SearchOutcome::Skipped);
        }

        let ticket = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        // A new search also owns the episode panel it is about to hide
        self.episodes_generation.fetch_add(1, Ordering::SeqCst);

        self.lock_view().conceal();

        let shows = self.catalog.search_shows(query).await?;

        if !self.is_current(&self.search_generation, ticket) {
            debug!(query, "discarding superseded search response");
            return Ok(SearchOutcome::Superseded);
        }

        populate_shows(&mut *self.lock_view(), &shows);
        Ok(SearchOutcome::Rendered { shows: shows.len() })
    }

    /// Fetches and renders the episode list of a show, revealing the panel.
    ///
    /// # Errors
    ///
    /// Catalog failures are returned as-is; the panel is left untouched.
    pub async fn handle_episodes(
        &self,
        show_id: &ShowId,
    ) -> Result<EpisodesOutcome, ShowFinderError> {
        let ticket = self.episodes_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let episodes = self.catalog.get_episodes(show_id).await?;

        if !self.is_current(&self.episodes_generation, ticket) {
            debug!(%show_id, "discarding superseded episode response");
            return Ok(EpisodesOutcome::Superseded);
        }

        populate_episodes(&mut *self.lock_view(), &episodes);
        Ok(EpisodesOutcome::Rendered {
            episodes: episodes.len(),
        })
    }

    fn is_current(&self, generation: &AtomicU64, ticket: u64) -> bool {
        match self.ordering {
            RequestOrdering::LastResponseWins => true,
            RequestOrdering::LatestRequestWins => generation.load(Ordering::SeqCst) == ticket,
        }
    }

    fn lock_view(&self) -> MutexGuard<'_, V> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C> Controller<C, Page>
where
    C: ShowCatalog,
{
    /// Routes a page event to its handler.
    ///
    /// `Submit` reads the search input and runs [`Self::handle_search`].
    /// `Click` is delegated from the show grid: only clicks on (or inside) an
    /// "Episodes" button are handled, and the show id is taken from the card
    /// that encloses that button.
    ///
    /// # Errors
    ///
    /// Handler errors are passed through. A handled click whose card has no
    /// identifier yields [`ShowFinderError::ShowIdMissing`].
    pub async fn dispatch(&self, event: PageEvent) -> Result<DispatchOutcome, ShowFinderError> {
        match event {
            PageEvent::Submit => {
                let query = self.with_view(|page| page.query().to_string());
                let outcome = self.handle_search(&query).await?;
                Ok(DispatchOutcome::Search(outcome))
            }
            PageEvent::Click(target) => {
                let show_id = {
                    let page = self.lock_view();
                    let Some(button) = page.episodes_trigger(target) else {
                        return Ok(DispatchOutcome::Ignored);
                    };
                    page.show_id_for(button)
                };
                let show_id = show_id.ok_or(ShowFinderError::ShowIdMissing)?;
                let outcome = self.handle_episodes(&show_id).await?;
                Ok(DispatchOutcome::Episodes(outcome))
            }
        }
    }
}
