//! What the results area should show for a given session state.
//!
//! This is the presentation decision, not the rendering: the CLI turns a
//! `ResultsView` into terminal lines, a web front end would turn it into
//! markup. Keeping the branch here means "request failed" and "nothing
//! matched" are decided once, from `SessionStatus`, instead of being inferred
//! from an empty list.

use chrono::{DateTime, NaiveDate};

use crate::error::ErrorKind;
use crate::highlight::{self, FieldHighlights, SanitizePolicy};
use crate::session::SessionState;
use crate::types::{ResultEntry, SessionStatus};

pub const PROMPT_MESSAGE: &str = "Enter a search term to find episodes.";
pub const NO_RESULTS_MESSAGE: &str = "No episodes found.";
pub const LOADING_MESSAGE: &str = "Loading episodes...";
pub const LOAD_MORE_LABEL: &str = "Load More Results";
pub const LOAD_MORE_BUSY_LABEL: &str = "Loading...";

/// The load-more affordance under the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMoreButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// One result, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeCard {
    pub id: String,
    pub title: String,
    /// `"{air date} | {duration}"`.
    pub subtitle: String,
    pub link: String,
    pub highlights: Vec<FieldHighlights>,
}

impl EpisodeCard {
    pub fn from_entry(entry: &ResultEntry, policy: SanitizePolicy) -> Self {
        let episode = &entry.episode;
        Self {
            id: episode.id.clone(),
            title: episode.title.clone(),
            subtitle: format!("{} | {}", format_air_date(&episode.air_date), episode.duration),
            link: episode.link.clone(),
            highlights: highlight::project(entry, policy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    /// Nothing typed, nothing loaded.
    Prompt,
    /// First page in flight.
    Loading,
    /// The last search succeeded and matched nothing.
    NoResults,
    /// The last request failed before anything was shown.
    Failed(ErrorKind),
    Results {
        heading: String,
        cards: Vec<EpisodeCard>,
        load_more: Option<LoadMoreButton>,
        /// A load-more that failed; the rows above it are still valid.
        error: Option<ErrorKind>,
    },
}

impl ResultsView {
    /// `draft_text` is what the search box shows right now.
    pub fn from_state(state: &SessionState, draft_text: &str, policy: SanitizePolicy) -> Self {
        let status = state.status();
        let results = state.results();

        if status.is_loading() && results.is_empty() {
            return ResultsView::Loading;
        }

        if !results.is_empty() {
            let load_more = state.has_more().then(|| LoadMoreButton {
                label: if status.is_loading() {
                    LOAD_MORE_BUSY_LABEL
                } else {
                    LOAD_MORE_LABEL
                },
                enabled: state.can_load_more(),
            });
            return ResultsView::Results {
                heading: results_heading(state.total()),
                cards: results
                    .iter()
                    .map(|entry| EpisodeCard::from_entry(entry, policy))
                    .collect(),
                load_more,
                error: match status {
                    SessionStatus::Error(kind) => Some(kind),
                    _ => None,
                },
            };
        }

        match status {
            SessionStatus::Error(kind) => ResultsView::Failed(kind),
            _ if !draft_text.is_empty() => ResultsView::NoResults,
            _ => ResultsView::Prompt,
        }
    }
}

/// `"Found 1 episode"`, `"Found 23 episodes"`.
pub fn results_heading(total: usize) -> String {
    format!("Found {} episode{}", total, if total == 1 { "" } else { "s" })
}

/// `"2007-05-02"` or an RFC 3339 timestamp → `"May 2, 2007"`.
///
/// Anything unparseable is shown as-is.
pub fn format_air_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));

    match date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}
