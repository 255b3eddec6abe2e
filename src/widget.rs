//! Event wiring between the page and the show directory
//!
//! `ShowWidget` binds the two user actions, submitting the search form and
//! clicking an "Episodes" control, to a fetch followed by a render. Every
//! action takes a ticket from a `RequestSequencer`; a response whose ticket
//! is no longer the latest is discarded instead of rendered.

use crate::ShowScoutError;
use crate::metadata_retrieval::{Episode, Show, ShowDirectory, ShowId};
use crate::page::{GET_EPISODES_CLASS, Page, render_episodes, render_shows};

/// Progress event emitted by the widget
///
/// These events allow hosts to log what the widget is doing, or to stay
/// silent by passing an empty callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A show search was sent to the directory
    SearchStarted { term: String },

    /// Search results were rendered
    ShowsFound { count: usize },

    /// An episode list was requested
    FetchingEpisodes { show_id: ShowId },

    /// An episode list was rendered
    EpisodesFound { show_id: ShowId, count: usize },

    /// A response arrived after a newer request was issued and was dropped
    StaleResponseDiscarded { ticket: RequestTicket },

    /// A directory request failed; the page was left unchanged
    RequestFailed { message: String },
}

impl ProgressEvent {
    /// Returns true for events a host must show even when running quietly
    pub fn is_failure(&self) -> bool {
        matches!(self, ProgressEvent::RequestFailed { .. })
    }
}

/// Sequence number of one user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tickets and remembers the latest one
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// Returns true if no newer ticket has been issued since `ticket`
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// A submission of the search form
#[derive(Debug, Default)]
pub struct SearchSubmit {
    default_prevented: bool,
}

impl SearchSubmit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the host's default handling of the submission
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// The element a click landed on inside the show list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    /// Index of the card the clicked element belongs to
    pub card_index: usize,
    /// Class of the clicked control
    pub class: String,
}

impl ClickTarget {
    /// A click on the "Episodes" control of the card at `card_index`
    pub fn episodes_button(card_index: usize) -> Self {
        Self {
            card_index,
            class: GET_EPISODES_CLASS.to_string(),
        }
    }
}

/// The show finder widget
///
/// Owns the page it renders into and the directory it queries. Handlers run
/// fetch, transform and render in sequence; the page is only touched after
/// the fetch has succeeded.
pub struct ShowWidget<D, F>
where
    D: ShowDirectory,
    F: FnMut(ProgressEvent),
{
    page: Page,
    directory: D,
    sequencer: RequestSequencer,
    progress_callback: F,
}

impl<D, F> ShowWidget<D, F>
where
    D: ShowDirectory,
    F: FnMut(ProgressEvent),
{
    /// Creates a widget rendering into `page` and querying `directory`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use show_scout::{Page, SearchSubmit, ShowWidget, TvMazeProvider};
    ///
    /// let provider = TvMazeProvider::new().unwrap();
    /// let mut widget = ShowWidget::new(Page::new(), provider, |_| {});
    /// widget.page_mut().search_form.term = "batman".to_string();
    /// widget.on_search_submit(&mut SearchSubmit::new()).unwrap();
    /// ```
    pub fn new(page: Page, directory: D, progress_callback: F) -> Self {
        Self {
            page,
            directory,
            sequencer: RequestSequencer::new(),
            progress_callback,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Issues a ticket for a request the host performs itself
    pub fn issue_ticket(&mut self) -> RequestTicket {
        self.sequencer.issue()
    }

    /// Handles a submission of the search form.
    ///
    /// Reads the term from the form input, searches the directory and renders
    /// the result. Returns whether the result was rendered.
    ///
    /// # Errors
    ///
    /// Returns the directory error if the search fails. The page is left
    /// unchanged in that case.
    pub fn on_search_submit(&mut self, event: &mut SearchSubmit) -> Result<bool, ShowScoutError> {
        event.prevent_default();

        let term = self.page.search_form.term.clone();
        let ticket = self.sequencer.issue();

        (self.progress_callback)(ProgressEvent::SearchStarted { term: term.clone() });

        let shows = match self.directory.search_shows(&term) {
            Ok(shows) => shows,
            Err(e) => return Err(self.report_failure(e.into())),
        };

        Ok(self.complete_shows(ticket, &shows))
    }

    /// Handles a click delegated from the show list.
    ///
    /// Clicks on anything other than an "Episodes" control are ignored and
    /// return `Ok(false)`. Otherwise the show identifier is read from the
    /// enclosing card, its episodes are fetched and rendered.
    ///
    /// # Errors
    ///
    /// Returns `MissingShowCard` if the target is not inside a card, or the
    /// directory error if the fetch fails. The page is left unchanged.
    pub fn on_click(&mut self, target: &ClickTarget) -> Result<bool, ShowScoutError> {
        if target.class != GET_EPISODES_CLASS {
            return Ok(false);
        }

        let show_id = self
            .page
            .closest_show_card(target.card_index)
            .map(|card| card.show_id)
            .ok_or(ShowScoutError::MissingShowCard(target.card_index))?;

        self.show_episodes(show_id)
    }

    /// Fetches and renders the episode list of `show_id`.
    ///
    /// Returns whether the list was rendered.
    ///
    /// # Errors
    ///
    /// Returns the directory error if the fetch fails. The failure is also
    /// reported as `RequestFailed` and the page is left unchanged.
    pub fn show_episodes(&mut self, show_id: ShowId) -> Result<bool, ShowScoutError> {
        let ticket = self.sequencer.issue();

        (self.progress_callback)(ProgressEvent::FetchingEpisodes { show_id });

        let episodes = match self.directory.fetch_episodes(show_id) {
            Ok(episodes) => episodes,
            Err(e) => return Err(self.report_failure(e.into())),
        };

        Ok(self.complete_episodes(ticket, show_id, &episodes))
    }

    /// Renders search results if `ticket` is still the latest request.
    pub fn complete_shows(&mut self, ticket: RequestTicket, shows: &[Show]) -> bool {
        if !self.accept(ticket) {
            return false;
        }

        render_shows(&mut self.page, shows);
        (self.progress_callback)(ProgressEvent::ShowsFound { count: shows.len() });
        true
    }

    /// Renders an episode list if `ticket` is still the latest request.
    pub fn complete_episodes(
        &mut self,
        ticket: RequestTicket,
        show_id: ShowId,
        episodes: &[Episode],
    ) -> bool {
        if !self.accept(ticket) {
            return false;
        }

        render_episodes(&mut self.page, episodes);
        (self.progress_callback)(ProgressEvent::EpisodesFound {
            show_id,
            count: episodes.len(),
        });
        true
    }

    fn accept(&mut self, ticket: RequestTicket) -> bool {
        if self.sequencer.is_current(ticket) {
            return true;
        }

        (self.progress_callback)(ProgressEvent::StaleResponseDiscarded { ticket });
        false
    }

    fn report_failure(&mut self, error: ShowScoutError) -> ShowScoutError {
        (self.progress_callback)(ProgressEvent::RequestFailed {
            message: error.to_string(),
        });
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata_retrieval::{MISSING_IMAGE_URL, MetadataRetrievalError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory directory serving canned responses
    #[derive(Default)]
    struct FakeDirectory {
        shows: HashMap<String, Vec<Show>>,
        episodes: HashMap<ShowId, Vec<Episode>>,
        fail: bool,
        requested_episodes: RefCell<Vec<ShowId>>,
    }

    impl ShowDirectory for FakeDirectory {
        fn search_shows(&self, term: &str) -> Result<Vec<Show>, MetadataRetrievalError> {
            if self.fail {
                return Err(MetadataRetrievalError::RequestError(
                    "connection refused".to_string(),
                ));
            }
            Ok(self.shows.get(term).cloned().unwrap_or_default())
        }

        fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, MetadataRetrievalError> {
            self.requested_episodes.borrow_mut().push(show_id);
            if self.fail {
                return Err(MetadataRetrievalError::HttpStatus {
                    status: 500,
                    reason: "Internal Server Error".to_string(),
                });
            }
            Ok(self.episodes.get(&show_id).cloned().unwrap_or_default())
        }
    }

    fn batman() -> Show {
        Show {
            id: ShowId(975),
            name: "Batman".to_string(),
            summary: "<p>Dark knight</p>".to_string(),
            image: MISSING_IMAGE_URL.to_string(),
        }
    }

    fn pilot() -> Episode {
        Episode {
            id: 1,
            name: "Pilot".to_string(),
            season: "1".to_string(),
            number: "1".to_string(),
        }
    }

    fn directory() -> FakeDirectory {
        let mut directory = FakeDirectory::default();
        directory.shows.insert("batman".to_string(), vec![batman()]);
        directory.episodes.insert(ShowId(975), vec![pilot()]);
        directory
    }

    #[test]
    fn test_sequencer_only_latest_is_current() {
        let mut sequencer = RequestSequencer::new();
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(first < second);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn test_search_submit_renders_batman_card() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});
        widget.page_mut().search_form.term = "batman".to_string();

        let mut event = SearchSubmit::new();
        assert!(widget.on_search_submit(&mut event).unwrap());
        assert!(event.default_prevented());

        let cards = &widget.page().shows_list.items;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Batman");
        assert_eq!(cards[0].image, MISSING_IMAGE_URL);
        assert_eq!(cards[0].show_id, ShowId(975));
        assert!(widget.page().shows_visible());
    }

    #[test]
    fn test_empty_term_is_passed_through() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});

        assert!(widget.on_search_submit(&mut SearchSubmit::new()).unwrap());
        assert!(widget.page().shows_list.items.is_empty());
    }

    #[test]
    fn test_episodes_click_swaps_view() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});
        widget.page_mut().search_form.term = "batman".to_string();
        widget.on_search_submit(&mut SearchSubmit::new()).unwrap();

        assert!(widget.on_click(&ClickTarget::episodes_button(0)).unwrap());

        let page = widget.page();
        assert_eq!(page.episodes_list.len(), 1);
        assert_eq!(page.episodes_list[0].text, "Pilot (season 1, episode 1)");
        assert!(!page.shows_visible());
        assert!(page.episodes_visible());
        assert_eq!(*widget.directory().requested_episodes.borrow(), vec![ShowId(975)]);
    }

    #[test]
    fn test_click_on_other_control_is_ignored() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});
        widget.page_mut().search_form.term = "batman".to_string();
        widget.on_search_submit(&mut SearchSubmit::new()).unwrap();

        let target = ClickTarget {
            card_index: 0,
            class: "media-body".to_string(),
        };
        assert!(!widget.on_click(&target).unwrap());
        assert!(widget.page().shows_visible());
        assert!(widget.directory().requested_episodes.borrow().is_empty());
    }

    #[test]
    fn test_click_outside_card_is_an_error() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});

        let result = widget.on_click(&ClickTarget::episodes_button(3));
        assert!(matches!(result, Err(ShowScoutError::MissingShowCard(3))));
    }

    #[test]
    fn test_failed_search_leaves_page_unchanged() {
        let mut events = Vec::new();
        let mut failing = directory();
        failing.fail = true;

        let mut widget = ShowWidget::new(Page::new(), failing, |event| events.push(event));
        render_shows(widget.page_mut(), &[batman()]);
        let before = widget.page().clone();

        let result = widget.on_search_submit(&mut SearchSubmit::new());
        assert!(matches!(result, Err(ShowScoutError::MetadataRetrieval(_))));
        assert_eq!(*widget.page(), before);

        drop(widget);
        assert!(matches!(events.last(), Some(ProgressEvent::RequestFailed { .. })));
    }

    #[test]
    fn test_failed_episode_fetch_leaves_page_unchanged() {
        let mut failing = directory();
        failing.fail = true;

        let mut widget = ShowWidget::new(Page::new(), failing, |_| {});
        render_shows(widget.page_mut(), &[batman()]);
        let before = widget.page().clone();

        assert!(widget.on_click(&ClickTarget::episodes_button(0)).is_err());
        assert_eq!(*widget.page(), before);
    }

    #[test]
    fn test_stale_episode_response_is_discarded() {
        let mut events = Vec::new();
        let mut widget = ShowWidget::new(Page::new(), directory(), |event| events.push(event));

        let older = widget.issue_ticket();
        let newer = widget.issue_ticket();

        let fresh = vec![pilot()];
        let mut stale_episode = pilot();
        stale_episode.name = "Stale".to_string();

        assert!(widget.complete_episodes(newer, ShowId(975), &fresh));
        assert!(!widget.complete_episodes(older, ShowId(1), &[stale_episode]));
        assert_eq!(widget.page().episodes_list[0].text, "Pilot (season 1, episode 1)");

        drop(widget);
        assert!(events.contains(&ProgressEvent::StaleResponseDiscarded { ticket: older }));
    }

    #[test]
    fn test_stale_search_response_is_discarded() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});

        let older = widget.issue_ticket();
        let newer = widget.issue_ticket();

        assert!(widget.complete_shows(newer, &[batman()]));
        let before = widget.page().clone();

        let mut other = batman();
        other.id = ShowId(1);
        other.name = "Stale".to_string();
        assert!(!widget.complete_shows(older, &[other]));

        assert_eq!(*widget.page(), before);
        assert_eq!(widget.page().shows_list.items[0].show_id, ShowId(975));
        assert!(widget.page().shows_visible());
    }

    #[test]
    fn test_late_search_does_not_hide_newer_episode_list() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});

        let search = widget.issue_ticket();
        let episodes = widget.issue_ticket();

        assert!(widget.complete_episodes(episodes, ShowId(975), &[pilot()]));
        assert!(!widget.complete_shows(search, &[batman()]));

        assert!(widget.page().episodes_visible());
        assert!(!widget.page().shows_visible());
        assert!(widget.page().shows_list.items.is_empty());
    }

    #[test]
    fn test_show_episodes_by_id() {
        let mut widget = ShowWidget::new(Page::new(), directory(), |_| {});

        assert!(widget.show_episodes(ShowId(975)).unwrap());
        assert_eq!(widget.page().episodes_list[0].text, "Pilot (season 1, episode 1)");
        assert!(widget.page().episodes_visible());
    }

    #[test]
    fn test_show_episodes_failure_is_reported() {
        let mut events = Vec::new();
        let mut failing = directory();
        failing.fail = true;

        let mut widget = ShowWidget::new(Page::new(), failing, |event| events.push(event));
        let before = widget.page().clone();

        assert!(widget.show_episodes(ShowId(975)).is_err());
        assert_eq!(*widget.page(), before);

        drop(widget);
        let failures: Vec<_> = events.iter().filter(|event| event.is_failure()).collect();
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn test_only_request_failures_are_failure_events() {
        let failed = ProgressEvent::RequestFailed {
            message: "HTTP 500".to_string(),
        };
        assert!(failed.is_failure());
        assert!(!ProgressEvent::ShowsFound { count: 0 }.is_failure());
        assert!(
            !ProgressEvent::FetchingEpisodes {
                show_id: ShowId(975)
            }
            .is_failure()
        );
    }

    #[test]
    fn test_progress_events_for_search_and_episodes() {
        let mut events = Vec::new();
        let mut widget = ShowWidget::new(Page::new(), directory(), |event| events.push(event));
        widget.page_mut().search_form.term = "batman".to_string();
        widget.on_search_submit(&mut SearchSubmit::new()).unwrap();
        widget.on_click(&ClickTarget::episodes_button(0)).unwrap();
        drop(widget);

        assert_eq!(
            events,
            vec![
                ProgressEvent::SearchStarted {
                    term: "batman".to_string()
                },
                ProgressEvent::ShowsFound { count: 1 },
                ProgressEvent::FetchingEpisodes {
                    show_id: ShowId(975)
                },
                ProgressEvent::EpisodesFound {
                    show_id: ShowId(975),
                    count: 1
                },
            ]
        );
    }
}
