//! Backend failures, timeouts and recovery.

use super::common::{archive_session, assert_state_well_formed, session_with_matches, Fault, AMIR_MATCHES};
use episode_search::{ErrorKind, ResultsView, SanitizePolicy, SearchQuery, SessionStatus};

#[tokio::test]
async fn backend_status_is_surfaced() {
    let mut session = archive_session("");
    session.backend().fail_next(Fault::Status(500));

    let status = session.search(SearchQuery::new("jake")).await;

    assert_eq!(status, SessionStatus::Error(ErrorKind::Backend { status: 500 }));
    assert!(session.state().results().is_empty());
    assert_eq!(
        ResultsView::from_state(session.state(), "jake", SanitizePolicy::default()),
        ResultsView::Failed(ErrorKind::Backend { status: 500 })
    );
}

#[tokio::test]
async fn network_failure_is_surfaced() {
    let mut session = archive_session("");
    session.backend().fail_next(Fault::Network);
    assert_eq!(
        session.search(SearchQuery::new("jake")).await,
        SessionStatus::Error(ErrorKind::Network)
    );
}

#[tokio::test]
async fn hung_backend_times_out() {
    let mut session = archive_session("");
    session.backend().fail_next(Fault::Hang);

    let status = session.search(SearchQuery::new("jake")).await;

    assert_eq!(status, SessionStatus::Error(ErrorKind::Timeout));
    assert!(!session.state().status().is_loading());
}

#[tokio::test]
async fn next_search_recovers_after_failure() {
    let mut session = archive_session("");
    session.backend().fail_next(Fault::Status(503));
    session.search(SearchQuery::new("jake")).await;

    let status = session.submit().await;

    assert_eq!(status, SessionStatus::Loaded);
    assert_eq!(session.state().total(), 23);
}

#[tokio::test]
async fn failed_load_more_keeps_rows_and_rolls_back() {
    let mut session = session_with_matches("amir", AMIR_MATCHES);
    session.search(SearchQuery::new("amir")).await;

    session.backend().fail_next(Fault::Status(502));
    let status = session.load_more().await;

    assert_eq!(status, SessionStatus::Error(ErrorKind::Backend { status: 502 }));
    assert_eq!(session.state().results().len(), 50);
    assert_eq!(session.state().offset(), 0);
    assert_eq!(session.state().page_count(), 0);
    assert_state_well_formed(session.state());

    // Rows stay on screen with the failure beside them; the button is inert
    // until a new search.
    match ResultsView::from_state(session.state(), "amir", SanitizePolicy::default()) {
        ResultsView::Results { cards, load_more, error, .. } => {
            assert_eq!(cards.len(), 50);
            assert!(!load_more.unwrap().enabled);
            assert_eq!(error, Some(ErrorKind::Backend { status: 502 }));
        }
        other => panic!("expected results, got {:?}", other),
    }
    session.load_more().await;
    assert_eq!(session.backend().request_count(), 2);

    session.submit().await;
    session.load_more().await;
    assert_eq!(session.state().results().len(), 60);
    assert_eq!(session.state().offset(), 10);

    let offsets: Vec<_> = session.backend().requests().iter().map(|r| r.offset()).collect();
    assert_eq!(offsets, vec![None, Some(50), None, Some(50)]);
}

#[tokio::test]
async fn recovered_search_clears_the_load_more_error() {
    let mut session = session_with_matches("amir", AMIR_MATCHES);
    session.search(SearchQuery::new("amir")).await;
    session.backend().fail_next(Fault::Hang);
    session.load_more().await;

    session.submit().await;

    match ResultsView::from_state(session.state(), "amir", SanitizePolicy::default()) {
        ResultsView::Results { error, load_more, .. } => {
            assert_eq!(error, None);
            assert!(load_more.unwrap().enabled);
        }
        other => panic!("expected results, got {:?}", other),
    }
}
