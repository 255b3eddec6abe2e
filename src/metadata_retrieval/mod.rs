/// Data structures and traits for TV show directory lookups.
///
/// This module provides the display records for shows and episodes, as well
/// as the trait that show directory providers implement.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{MISSING_IMAGE_URL, TvMazeProvider};

use std::fmt;
use thiserror::Error;

/// Default base URL of the TVMaze API
pub const DEFAULT_API_BASE: &str = "https://api.tvmaze.com";

/// Errors that can occur while querying the show directory.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// Request to the show directory failed before a response arrived
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The show directory answered with a non-success status
    #[error("HTTP {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Identifier of a show in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShowId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A TV show as shown on a search result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    /// Directory identifier of the show
    pub id: ShowId,
    /// Display name
    pub name: String,
    /// HTML summary as delivered by the directory (empty if none)
    pub summary: String,
    /// Poster URL, or [`MISSING_IMAGE_URL`] when the directory has none
    pub image: String,
}

/// A single episode line of a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Directory identifier of the episode
    pub id: u64,
    /// The episode title
    pub name: String,
    /// Season label
    pub season: String,
    /// Episode number label within the season
    pub number: String,
}

/// Connection settings for a show directory client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without trailing slash
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Trait for show directories that can search shows and list episodes.
///
/// Implementors of this trait can retrieve show metadata from TVMaze or any
/// other source; the widget only depends on this trait.
pub trait ShowDirectory {
    /// Searches the directory for shows matching a free-text term.
    ///
    /// The term is passed through unvalidated, an empty term included.
    ///
    /// # Returns
    ///
    /// One [`Show`] per search hit, in the order the directory returned them
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, MetadataRetrievalError>;

    /// Fetches the episode list of a single show.
    ///
    /// # Arguments
    ///
    /// * `show_id` - The identifier of the show, as carried on its card
    fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, MetadataRetrievalError>;
}
