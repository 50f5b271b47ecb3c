//! Out-of-order responses and supersession.
//!
//! These drive the reducer directly so two requests can be in flight at
//! once, the way an interactive front end would.

use super::common::{archive, make_page, short, test_config};
use episode_search::testing::CorpusBackend;
use episode_search::{fetch_page, Outcome, SearchQuery, SessionState, SessionStatus};

#[tokio::test]
async fn superseded_search_never_overwrites_newer_results() {
    let backend = CorpusBackend::new(archive()).with_delay(short(20));
    let mut state = SessionState::new(&test_config());

    let jake = state.begin_search(SearchQuery::new("jake")).unwrap();
    let fired = state.begin_search(SearchQuery::new("fired")).unwrap();

    let (jake_page, fired_page) = tokio::join!(
        fetch_page(&backend, &jake, short(1000)),
        fetch_page(&backend, &fired, short(1000)),
    );

    // Newest lands first, the older one arrives late.
    assert_eq!(state.apply(&fired, fired_page), Outcome::Applied);
    assert_eq!(state.apply(&jake, jake_page), Outcome::Stale);

    assert_eq!(state.query().text, "fired");
    assert_eq!(state.total(), 2);
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn late_response_arriving_first_is_still_discarded() {
    let backend = CorpusBackend::new(archive());
    let mut state = SessionState::new(&test_config());

    let jake = state.begin_search(SearchQuery::new("jake")).unwrap();
    let amir = state.begin_search(SearchQuery::new("amir")).unwrap();

    let jake_page = fetch_page(&backend, &jake, short(1000)).await;
    assert_eq!(state.apply(&jake, jake_page), Outcome::Stale);
    assert_eq!(state.status(), SessionStatus::Loading);
    assert!(state.results().is_empty());

    let amir_page = fetch_page(&backend, &amir, short(1000)).await;
    assert_eq!(state.apply(&amir, amir_page), Outcome::Applied);
    assert_eq!(state.total(), 62);
}

#[tokio::test]
async fn new_search_supersedes_pending_load_more() {
    let mut state = SessionState::new(&test_config());
    let search = state.begin_search(SearchQuery::new("amir")).unwrap();
    state.apply_success(&search, make_page(62, 0, 50));

    let more = state.begin_load_more().unwrap();
    let search = state.begin_search(SearchQuery::new("jake")).unwrap();

    assert_eq!(state.apply_success(&more, make_page(62, 50, 10)), Outcome::Stale);
    assert!(state.results().is_empty());
    assert_eq!(state.offset(), 0);

    state.apply_success(&search, make_page(23, 0, 23));
    assert_eq!(state.results().len(), 23);
}

#[tokio::test]
async fn stale_failure_does_not_flag_an_error() {
    let mut state = SessionState::new(&test_config());
    let old = state.begin_search(SearchQuery::new("jake")).unwrap();
    let new = state.begin_search(SearchQuery::new("amir")).unwrap();

    state.apply_success(&new, make_page(5, 0, 5));
    let outcome = state.apply(
        &old,
        Err(episode_search::SearchError::Backend { status: 500 }),
    );

    assert_eq!(outcome, Outcome::Stale);
    assert_eq!(state.status(), SessionStatus::Loaded);
}

#[tokio::test]
async fn teardown_discards_in_flight_response() {
    let backend = CorpusBackend::new(archive());
    let mut state = SessionState::new(&test_config());

    let ticket = state.begin_search(SearchQuery::new("jake")).unwrap();
    let page = fetch_page(&backend, &ticket, short(1000)).await;
    state.close();

    assert_eq!(state.apply(&ticket, page), Outcome::Stale);
    assert!(state.results().is_empty());
}
