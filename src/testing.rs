//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures and an in-memory backend so tests do not
//! each invent their own.

#![doc(hidden)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::SearchBackend;
use crate::error::SearchError;
use crate::request::RequestDescriptor;
use crate::types::{Episode, HighlightMap, ResultEntry, ResultPage};
use crate::url_state::{EXACT_PHRASE_KEY, SEARCH_TITLE_KEY};

/// Create a test episode with predictable fields.
pub fn make_episode(id: usize, title: &str, script: &str) -> Episode {
    Episode {
        id: format!("ep-{}", id),
        title: title.to_string(),
        link: format!("https://archive.example/watch/{}", id),
        script: script.to_string(),
        duration: "3:00".to_string(),
        air_date: "2008-03-14".to_string(),
        scribe: None,
        embed_src: format!("https://archive.example/embed/{}", id),
    }
}

/// Create a result entry without highlights.
pub fn make_entry(id: usize) -> ResultEntry {
    ResultEntry {
        episode: make_episode(id, &format!("Episode {}", id), "Jake: hey. Amir: hey."),
        highlight: None,
    }
}

/// Create a result entry with the given highlights.
pub fn make_entry_with_highlight(id: usize, fields: &[(&str, &[&str])]) -> ResultEntry {
    let highlight: HighlightMap = fields
        .iter()
        .map(|(field, fragments)| {
            (
                field.to_string(),
                fragments.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            )
        })
        .collect();
    ResultEntry {
        highlight: Some(highlight),
        ..make_entry(id)
    }
}

/// A page of `count` entries numbered from `offset`.
pub fn make_page(total: usize, offset: usize, count: usize) -> ResultPage {
    ResultPage {
        total,
        offset,
        limit: count,
        data: (offset..offset + count).map(make_entry).collect(),
    }
}

// =============================================================================
// IN-MEMORY BACKEND
// =============================================================================

/// A fault to inject into the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Status(u16),
    Network,
    /// Never answer (until the caller's timeout fires).
    Hang,
}

/// Serves `GET /api/episodes` semantics from a fixed list of episodes.
///
/// Matching is case-insensitive substring on the title (title-only) or title
/// and script. Without exact-phrase, every word must appear somewhere.
pub struct CorpusBackend {
    corpus: Vec<Episode>,
    requests: Mutex<Vec<RequestDescriptor>>,
    faults: Mutex<VecDeque<Fault>>,
    delay: Option<Duration>,
}

impl CorpusBackend {
    pub fn new(corpus: Vec<Episode>) -> Self {
        Self {
            corpus,
            requests: Mutex::new(Vec::new()),
            faults: Mutex::new(VecDeque::new()),
            delay: None,
        }
    }

    /// `count` episodes, every one mentioning `word` in its script.
    pub fn with_matches(word: &str, count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| make_episode(i, &format!("Episode {}", i), &format!("Jake: {} again?", word)))
                .collect(),
        )
    }

    /// Answer every request after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next request with `fault`. Faults queue up in order.
    pub fn fail_next(&self, fault: Fault) {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(fault);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Run the query and slice the window, without recording anything.
    pub fn answer(&self, request: &RequestDescriptor) -> ResultPage {
        let exact_phrase = request.params().get(EXACT_PHRASE_KEY) == Some("true");
        let search_title = request.params().get(SEARCH_TITLE_KEY) == Some("true");
        let needle = request.text().map(str::to_lowercase);

        let matched: Vec<ResultEntry> = self
            .corpus
            .iter()
            .filter_map(|episode| {
                let Some(needle) = needle.as_deref() else {
                    return Some(ResultEntry {
                        episode: episode.clone(),
                        highlight: None,
                    });
                };
                let mut highlight = HighlightMap::new();
                let mut fields = vec![("title", episode.title.as_str())];
                if !search_title {
                    fields.push(("script", episode.script.as_str()));
                }
                for (name, text) in fields {
                    if let Some(fragment) = highlight_field(text, needle, exact_phrase) {
                        highlight.insert(name, vec![fragment]);
                    }
                }
                let haystack = fields_text(episode, search_title);
                let is_match = if exact_phrase {
                    haystack.contains(needle)
                } else {
                    needle.split_whitespace().all(|word| haystack.contains(word))
                };
                is_match.then(|| ResultEntry {
                    episode: episode.clone(),
                    highlight: (!highlight.is_empty()).then_some(highlight),
                })
            })
            .collect();

        let total = matched.len();
        let offset = request.offset().unwrap_or(0);
        let data: Vec<ResultEntry> = matched
            .into_iter()
            .skip(offset)
            .take(request.limit())
            .collect();

        ResultPage {
            total,
            offset,
            limit: request.limit(),
            data,
        }
    }
}

fn fields_text(episode: &Episode, search_title: bool) -> String {
    if search_title {
        episode.title.to_lowercase()
    } else {
        format!("{}\n{}", episode.title, episode.script).to_lowercase()
    }
}

/// Wrap the first occurrence of the needle (or its first word) in `<em>`.
fn highlight_field(text: &str, needle: &str, exact_phrase: bool) -> Option<String> {
    let lower = text.to_lowercase();
    let term = if exact_phrase {
        needle
    } else {
        needle.split_whitespace().next()?
    };
    // Only ASCII-lowercase-stable text keeps byte offsets aligned.
    if lower.len() != text.len() {
        return None;
    }
    let start = lower.find(term)?;
    let end = start + term.len();
    Some(format!(
        "{}<em>{}</em>{}",
        &text[..start],
        &text[start..end],
        &text[end..]
    ))
}

#[async_trait]
impl SearchBackend for CorpusBackend {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<ResultPage, SearchError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let fault = self
            .faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match fault {
            Some(Fault::Status(status)) => Err(SearchError::Backend { status }),
            Some(Fault::Network) => Err(SearchError::Network("connection refused".to_string())),
            Some(Fault::Hang) => std::future::pending().await,
            None => Ok(self.answer(request)),
        }
    }
}
