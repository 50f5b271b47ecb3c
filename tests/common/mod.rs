//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::time::Duration;

use episode_search::contracts;
use episode_search::testing::{make_episode, CorpusBackend};
use episode_search::{Episode, SearchSession, SessionConfig, SessionState};

// Re-export canonical test utilities from episode_search::testing.
// Not every test binary uses both.
#[allow(unused_imports)]
pub use episode_search::testing::{make_page, Fault};

// ============================================================================
// CORPORA
// ============================================================================

/// 23 episodes mention "jake"; one page holds them all.
pub const JAKE_MATCHES: usize = 23;

/// 62 episodes mention "amir": a 50-row first page, then 10, then 2.
pub const AMIR_MATCHES: usize = 62;

/// Episodes whose script asks "a quick question" (all but the jake ones).
pub const QUESTION_MATCHES: usize = AMIR_MATCHES - JAKE_MATCHES;

/// A small archive:
///
/// - "jake" matches 23 scripts, "amir" matches 62.
/// - "fired" matches two episodes, only one of them by title.
pub fn archive() -> Vec<Episode> {
    let mut episodes: Vec<Episode> = (0..AMIR_MATCHES)
        .map(|i| {
            let script = if i < JAKE_MATCHES {
                "Amir: Jake, listen. Jake: no."
            } else {
                "Amir: I have a quick question."
            };
            make_episode(i, &format!("Episode {}", i), script)
        })
        .collect();
    episodes.push(make_episode(100, "Fired", "Sam: you are both out."));
    episodes.push(make_episode(101, "Quiz", "Sam: you're fired."));
    episodes
}

// ============================================================================
// SESSIONS
// ============================================================================

/// Default config with a timeout short enough for hang tests.
pub fn test_config() -> SessionConfig {
    SessionConfig {
        request_timeout_ms: 200,
        ..SessionConfig::default()
    }
}

/// A session over `archive()`, mounted from `url_query`.
pub fn archive_session(url_query: &str) -> SearchSession<CorpusBackend> {
    SearchSession::mount(test_config(), CorpusBackend::new(archive()), url_query)
}

/// A session over `backend`, mounted with an empty URL.
pub fn session(backend: CorpusBackend) -> SearchSession<CorpusBackend> {
    SearchSession::mount(test_config(), backend, "")
}

/// A session over `count` episodes that all mention `word`.
pub fn session_with_matches(word: &str, count: usize) -> SearchSession<CorpusBackend> {
    session(CorpusBackend::with_matches(word, count))
}

pub fn short(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Assert that a session state satisfies every structural invariant.
pub fn assert_state_well_formed(state: &SessionState) {
    assert!(
        state.results().len() <= state.total(),
        "results.len() {} > total {}",
        state.results().len(),
        state.total()
    );
    assert_eq!(
        state.offset(),
        state.page_count() * state.page_size(),
        "offset is not a whole number of pages"
    );
    contracts::check_state_well_formed(state);
}
