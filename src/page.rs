//! Page model and view rendering
//!
//! This module holds the in-memory page the widget renders into: the search
//! form, the list of show cards and the episode area. Renderers receive the
//! page explicitly and replace container contents wholesale.

use crate::metadata_retrieval::{Episode, Show, ShowId};
use htmlescape::encode_minimal;

/// Class of the control on a show card that requests its episodes
pub const GET_EPISODES_CLASS: &str = "Show-getEpisodes";

/// Whether a page element is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// The search form and its text input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    /// Current value of the search term input
    pub term: String,
}

/// A clickable control embedded in a show card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// CSS class used for click delegation
    pub class: String,
    /// Button label
    pub label: String,
}

/// A rendered show card
///
/// The card carries the show's identifier so that a click on one of its
/// controls can recover which show was meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCard {
    /// The `data-show-id` attribute
    pub show_id: ShowId,
    pub name: String,
    pub summary: String,
    pub image: String,
    pub controls: Vec<Control>,
}

impl ShowCard {
    fn from_show(show: &Show) -> Self {
        Self {
            show_id: show.id,
            name: show.name.clone(),
            summary: show.summary.clone(),
            image: show.image.clone(),
            controls: vec![Control {
                class: GET_EPISODES_CLASS.to_string(),
                label: "Episodes".to_string(),
            }],
        }
    }

    /// Returns the HTML markup of this card.
    ///
    /// Name and image URL are escaped; the summary is HTML delivered by the
    /// directory and is inserted as-is.
    pub fn markup(&self) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            "<div data-show-id=\"{}\" class=\"Show col-md-12 col-lg-6 mb-4\">\n",
            self.show_id
        ));
        html.push_str("  <div class=\"media\">\n");
        html.push_str(&format!(
            "    <img src=\"{}\" alt=\"{}\" class=\"w-25 mr-3\">\n",
            encode_minimal(&self.image),
            encode_minimal(&self.name)
        ));
        html.push_str("    <div class=\"media-body\">\n");
        html.push_str(&format!(
            "      <h5 class=\"text-primary\">{}</h5>\n",
            encode_minimal(&self.name)
        ));
        html.push_str(&format!("      <div><small>{}</small></div>\n", self.summary));

        for control in &self.controls {
            html.push_str(&format!(
                "      <button class=\"btn btn-outline-light btn-sm {}\">{}</button>\n",
                encode_minimal(&control.class),
                encode_minimal(&control.label)
            ));
        }

        html.push_str("    </div>\n");
        html.push_str("  </div>\n");
        html.push_str("</div>\n");

        html
    }
}

/// A rendered line of the episode list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLine {
    pub episode_id: u64,
    /// Display text, e.g. "Pilot (season 1, episode 1)"
    pub text: String,
}

impl EpisodeLine {
    fn from_episode(episode: &Episode) -> Self {
        Self {
            episode_id: episode.id,
            text: format!(
                "{} (season {}, episode {})",
                episode.name, episode.season, episode.number
            ),
        }
    }

    /// Returns the HTML list item for this line
    pub fn markup(&self) -> String {
        format!("<li>{}</li>\n", encode_minimal(&self.text))
    }
}

/// A container of rendered items together with its visibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<T> {
    pub items: Vec<T>,
    pub visibility: Visibility,
}

impl<T> Section<T> {
    fn new(visibility: Visibility) -> Self {
        Self {
            items: Vec::new(),
            visibility,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }
}

/// The page the widget renders into
///
/// A fresh page shows the (empty) show list and hides the episode area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub search_form: SearchForm,
    /// Container of show cards
    pub shows_list: Section<ShowCard>,
    /// Container of episode lines, wrapped by `episodes_area`
    pub episodes_list: Vec<EpisodeLine>,
    /// Area whose visibility reveals or hides the episode list
    pub episodes_area: Visibility,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            search_form: SearchForm::default(),
            shows_list: Section::new(Visibility::Visible),
            episodes_list: Vec::new(),
            episodes_area: Visibility::Hidden,
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the card index of a click to the rendered card carrying the
    /// show identifier
    pub fn closest_show_card(&self, card_index: usize) -> Option<&ShowCard> {
        self.shows_list.items.get(card_index)
    }

    pub fn shows_visible(&self) -> bool {
        self.shows_list.is_visible()
    }

    pub fn episodes_visible(&self) -> bool {
        self.episodes_area.is_visible()
    }

    /// Returns the markup of the shows container
    pub fn shows_markup(&self) -> String {
        self.shows_list.items.iter().map(ShowCard::markup).collect()
    }

    /// Returns the markup of the episodes container
    pub fn episodes_markup(&self) -> String {
        let mut html = String::from("<ul>\n");
        for line in &self.episodes_list {
            html.push_str(&line.markup());
        }
        html.push_str("</ul>\n");
        html
    }
}

/// Replaces the show list with one card per show and reveals it.
///
/// The episode area is hidden afterwards.
pub fn render_shows(page: &mut Page, shows: &[Show]) {
    page.shows_list.items.clear();
    page.shows_list
        .items
        .extend(shows.iter().map(ShowCard::from_show));

    page.episodes_area = Visibility::Hidden;
    page.shows_list.visibility = Visibility::Visible;
}

/// Replaces the episode list with one line per episode and reveals it.
///
/// The show list is hidden afterwards.
pub fn render_episodes(page: &mut Page, episodes: &[Episode]) {
    page.episodes_list.clear();
    page.episodes_list
        .extend(episodes.iter().map(EpisodeLine::from_episode));

    page.shows_list.visibility = Visibility::Hidden;
    page.episodes_area = Visibility::Visible;
}

/// Renders the visible part of the page as plain text for a terminal.
pub fn render_text(page: &Page) -> String {
    let mut text = String::new();

    if page.shows_visible() {
        if page.shows_list.items.is_empty() {
            text.push_str("No shows.\n");
        }

        for (index, card) in page.shows_list.items.iter().enumerate() {
            text.push_str(&format!("[{}] {} (#{})\n", index + 1, card.name, card.show_id));
            text.push_str(&format!("    Image: {}\n", card.image));

            let summary = nanohtml2text::html2text(&card.summary);
            let summary = summary.trim();
            if !summary.is_empty() {
                for line in summary.lines() {
                    text.push_str(&format!("    {}\n", line));
                }
            }
        }
    }

    if page.episodes_visible() {
        if page.episodes_list.is_empty() {
            text.push_str("No episodes.\n");
        }

        for line in &page.episodes_list {
            text.push_str(&format!("  - {}\n", line.text));
        }
    }

    text
}
