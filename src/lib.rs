//! ShowScout - Search TV shows and browse their episodes
//!
//! This library searches the TVMaze show directory, shapes the responses into
//! small display records and renders them onto an in-memory page that toggles
//! between a show list and an episode list.

mod metadata_retrieval;
mod page;
mod widget;

// Re-export show directory types
pub use metadata_retrieval::{
    ClientConfig, DEFAULT_API_BASE, Episode, MISSING_IMAGE_URL, MetadataRetrievalError, Show,
    ShowDirectory, ShowId, TvMazeProvider,
};

// Re-export page types and renderers
pub use page::{
    Control, EpisodeLine, GET_EPISODES_CLASS, Page, SearchForm, Section, ShowCard, Visibility,
    render_episodes, render_shows, render_text,
};

// Re-export event wiring
pub use widget::{
    ClickTarget, ProgressEvent, RequestSequencer, RequestTicket, SearchSubmit, ShowWidget,
};

use thiserror::Error;

/// Top-level error type for ShowScout operations
#[derive(Debug, Error)]
pub enum ShowScoutError {
    /// Error while querying the show directory
    #[error("Show directory error: {0}")]
    MetadataRetrieval(#[from] MetadataRetrievalError),

    /// A click target did not belong to any rendered show card
    #[error("No show card at position {0}")]
    MissingShowCard(usize),

    /// Reading user input failed
    #[error("Prompt error: {0}")]
    Prompt(String),
}
