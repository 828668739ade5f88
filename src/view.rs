//! View models and render targets
//!
//! Catalog records are first turned into small display records (cards and
//! episode lines), then handed to a render target. Targets are traits so the
//! renderers can run against the in-memory page, a terminal, or a test double.
//!
//! Text taken from the catalog is carried as [`RawMarkup`] and inserted into
//! the output verbatim. Nothing is escaped: summaries arrive as HTML and are
//! meant to render as HTML, and names are treated the same way.

use crate::catalog::{Episode, Show, ShowId};
use std::fmt;

/// Markup inserted into the display without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawMarkup(String);

impl RawMarkup {
    pub fn new(markup: impl Into<String>) -> Self {
        RawMarkup(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display record for one show in the show grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCard {
    /// Identifier attached to the rendered card
    pub show_id: ShowId,
    pub image_src: String,
    pub title: RawMarkup,
    pub body: RawMarkup,
}

impl From<&Show> for ShowCard {
    fn from(show: &Show) -> Self {
        ShowCard {
            show_id: show.id.clone(),
            image_src: show.image.clone(),
            title: RawMarkup::new(show.name.as_str()),
            body: RawMarkup::new(show.summary.as_deref().unwrap_or_default()),
        }
    }
}

/// Shown in place of the title for episodes the catalog left unnamed.
pub const UNTITLED_EPISODE: &str = "Unknown";

/// Display record for one entry in the episode list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLine {
    pub text: RawMarkup,
}

impl From<&Episode> for EpisodeLine {
    fn from(episode: &Episode) -> Self {
        let number = episode
            .number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        let name = episode.name.as_deref().unwrap_or(UNTITLED_EPISODE);
        EpisodeLine {
            text: RawMarkup::new(format!(
                "{} (season {}, number {})",
                name, episode.season, number
            )),
        }
    }
}

/// Display region holding one card per show.
pub trait ShowGrid {
    /// Removes every card currently in the region
    fn clear_shows(&mut self);

    /// Appends a card after the existing ones
    fn append_card(&mut self, card: ShowCard);
}

/// Display region holding the episode list and the panel around it.
pub trait EpisodePanel {
    /// Removes every line currently in the list
    fn clear_episodes(&mut self);

    /// Appends a line after the existing ones
    fn append_line(&mut self, line: EpisodeLine);

    /// Makes the panel visible
    fn reveal(&mut self);

    /// Hides the panel without touching its content
    fn conceal(&mut self);
}

/// Replaces the contents of the show grid with one card per show.
///
/// The grid is cleared even when `shows` is empty, so an empty result leaves
/// an empty grid. Cards are appended in input order.
pub fn populate_shows<G>(grid: &mut G, shows: &[Show])
where
    G: ShowGrid + ?Sized,
{
    grid.clear_shows();
    for show in shows {
        grid.append_card(ShowCard::from(show));
    }
}

/// Replaces the episode list with one line per episode, then reveals the
/// panel. The panel is revealed even when `episodes` is empty.
pub fn populate_episodes<P>(panel: &mut P, episodes: &[Episode])
where
    P: EpisodePanel + ?Sized,
{
    panel.clear_episodes();
    for episode in episodes {
        panel.append_line(EpisodeLine::from(episode));
    }
    panel.reveal();
}
