/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
use serde::{Deserialize, Deserializer};

/// One hit from the `/search/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// The matched show, nested under `show`
    pub show: TvMazeShow,
}

/// A show as returned inside a search result.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    /// TVMaze show identifier
    pub id: u64,
    /// The name of the TV show (may be null)
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// Show summary in HTML format (may be null)
    #[serde(default)]
    pub summary: Option<String>,
    /// Poster images (null when the show has no artwork)
    #[serde(default)]
    pub image: Option<TvMazeImage>,
}

/// Image URLs attached to a show.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    /// Medium sized poster URL
    pub medium: Option<String>,
}

/// A single episode from the `/shows/{id}/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    /// TVMaze episode identifier
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// Season label
    #[serde(default, deserialize_with = "label")]
    pub season: String,
    /// Episode number label (null for specials)
    #[serde(default, deserialize_with = "label")]
    pub number: String,
}

/// Season and episode numbers arrive as JSON numbers from TVMaze, but
/// string labels are accepted as well and kept verbatim.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawLabel>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawLabel::Integer(value)) => value.to_string(),
        Some(RawLabel::Float(value)) => value.to_string(),
        Some(RawLabel::Text(text)) => text,
        None => String::new(),
    })
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
