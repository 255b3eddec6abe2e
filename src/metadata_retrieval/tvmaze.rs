/// TVMaze show directory implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchResult, TvMazeShow};
use super::{ClientConfig, Episode, MetadataRetrievalError, Show, ShowDirectory, ShowId};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Poster shown for shows that have no image in the directory
pub const MISSING_IMAGE_URL: &str = "https://tinyurl.com/tv-missing";

/// Show directory backed by the TVMaze API.
///
/// This provider searches shows through https://api.tvmaze.com/search/shows
/// and lists episodes through https://api.tvmaze.com/shows/{id}/episodes.
pub struct TvMazeProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeProvider {
    /// Creates a new TVMaze provider instance with the default configuration.
    pub fn new() -> Result<Self, MetadataRetrievalError> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a TVMaze provider talking to `config.api_base`.
    pub fn with_config(config: &ClientConfig) -> Result<Self, MetadataRetrievalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MetadataRetrievalError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Converts a TVMaze show to our display record.
    ///
    /// Substitutes [`MISSING_IMAGE_URL`] when the show has no medium image.
    fn convert_show(tvmaze_show: TvMazeShow) -> Show {
        Show {
            id: ShowId(tvmaze_show.id),
            name: tvmaze_show.name,
            summary: tvmaze_show.summary.unwrap_or_default(),
            image: tvmaze_show
                .image
                .and_then(|image| image.medium)
                .unwrap_or_else(|| MISSING_IMAGE_URL.to_string()),
        }
    }

    /// Converts a TVMaze episode to our display record.
    fn convert_episode(tvmaze_episode: TvMazeEpisode) -> Episode {
        Episode {
            id: tvmaze_episode.id,
            name: tvmaze_episode.name,
            season: tvmaze_episode.season,
            number: tvmaze_episode.number,
        }
    }

    /// Sends a GET request and decodes the JSON body.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MetadataRetrievalError> {
        // Make the HTTP request with query parameters
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        // Ensure request was successful
        let status = response.status();
        if !status.is_success() {
            return Err(MetadataRetrievalError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        // Parse the JSON response
        response
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))
    }
}

impl ShowDirectory for TvMazeProvider {
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, MetadataRetrievalError> {
        let url = format!("{}/search/shows", self.base_url);
        let results: Vec<TvMazeSearchResult> = self.get_json(&url, &[("q", term)])?;

        Ok(results
            .into_iter()
            .map(|result| Self::convert_show(result.show))
            .collect())
    }

    fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, MetadataRetrievalError> {
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);
        let episodes: Vec<TvMazeEpisode> = self.get_json(&url, &[])?;

        Ok(episodes.into_iter().map(Self::convert_episode).collect())
    }
}
