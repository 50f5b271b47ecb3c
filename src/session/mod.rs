// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search session: state machine plus the I/O around it.
//!
//! `state::SessionState` decides; `SearchSession` does. It owns the backend,
//! the address-bar string, and the draft query the inputs show, and runs each
//! ticket the state hands out under the configured timeout.
//!
//! The split matters for ordering. `SearchSession`'s methods take `&mut self`,
//! so one session never has two of its own requests in flight. A front end
//! that wants to fire a new search without waiting for the old one drives the
//! reducer directly: `begin_search` on the state, `fetch_page` on the backend,
//! `apply` with whatever comes back. Stale outcomes are dropped by sequence
//! number either way.
//!
//! # URL synchronization
//!
//! The address bar is written on explicit actions only: `submit`, `search`,
//! and the facet toggles. `set_text` (typing) never touches it, and `restore`
//! (mounting from a shared link) reads it without writing it back.
//!
//! A facet toggle re-runs the query held in the URL, not the draft. Text
//! typed since the last submit is replaced by the submitted text.

pub mod state;

use std::time::Duration;

use tracing::debug;

use crate::backend::SearchBackend;
use crate::config::SessionConfig;
use crate::error::SearchError;
use crate::types::{ResultPage, SearchQuery, SessionStatus};
use crate::url_state;

pub use state::{Outcome, RequestKind, SessionState, Ticket};

/// Issue `ticket` against `backend`, bounded by `timeout`.
pub async fn fetch_page<B: SearchBackend + ?Sized>(
    backend: &B,
    ticket: &Ticket,
    timeout: Duration,
) -> Result<ResultPage, SearchError> {
    match tokio::time::timeout(timeout, backend.fetch(ticket.request())).await {
        Ok(result) => result,
        Err(_) => Err(SearchError::Timeout(timeout)),
    }
}

/// One mounted search view.
pub struct SearchSession<B> {
    backend: B,
    config: SessionConfig,
    state: SessionState,
    draft: SearchQuery,
    query_string: String,
}

impl<B: SearchBackend> SearchSession<B> {
    /// Mount from the current URL query string. Issues nothing yet; call
    /// `restore` to run the search a shared link describes.
    pub fn mount(config: SessionConfig, backend: B, url_query: &str) -> Self {
        let draft = url_state::decode(url_query);
        let query_string = url_query.strip_prefix('?').unwrap_or(url_query).to_string();
        debug!(query = %draft.text, exact_phrase = draft.exact_phrase, search_title = draft.search_title, "session mounted");
        Self {
            state: SessionState::new(&config),
            backend,
            config,
            draft,
            query_string,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// What the search inputs currently show.
    pub fn draft(&self) -> &SearchQuery {
        &self.draft
    }

    /// Current URL query string, without `?`.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Address-bar form of the query string (`?…` or empty).
    pub fn location(&self) -> String {
        url_state::location(&self.query_string)
    }

    /// Run the search the mounted URL describes, if it has text.
    pub async fn restore(&mut self) -> SessionStatus {
        if self.draft.is_blank() {
            return self.state.status();
        }
        let ticket = self.state.begin_search(self.draft.clone());
        self.run(ticket).await
    }

    /// A keystroke: update the draft only.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    /// Search for whatever the inputs show.
    pub async fn submit(&mut self) -> SessionStatus {
        self.search(self.draft.clone()).await
    }

    /// Start a new query, persisting it to the URL.
    ///
    /// Blank text clears the board without a request.
    pub async fn search(&mut self, query: SearchQuery) -> SessionStatus {
        if self.state.is_closed() {
            return self.state.status();
        }
        self.query_string = url_state::encode(&self.query_string, &url_state::to_changes(&query));
        self.draft = query.clone();
        let ticket = self.state.begin_search(query);
        self.run(ticket).await
    }

    /// Flip the exact-phrase facet and re-run the submitted query.
    pub async fn toggle_exact_phrase(&mut self) -> SessionStatus {
        let query = self.submitted().with_exact_phrase(!self.draft.exact_phrase);
        self.change_facets(query).await
    }

    /// Flip the title-only facet and re-run the submitted query.
    pub async fn toggle_search_title(&mut self) -> SessionStatus {
        let query = self.submitted().with_search_title(!self.draft.search_title);
        self.change_facets(query).await
    }

    /// The query last written to the URL. Typed but unsubmitted text is not part of it.
    fn submitted(&self) -> SearchQuery {
        url_state::decode(&self.query_string)
    }

    /// A facet change searches only when the URL already holds text;
    /// otherwise it just records the facet.
    async fn change_facets(&mut self, query: SearchQuery) -> SessionStatus {
        if self.state.is_closed() {
            return self.state.status();
        }
        if !query.is_blank() {
            return self.search(query).await;
        }
        self.query_string = url_state::encode(&self.query_string, &url_state::to_changes(&query));
        self.draft.exact_phrase = query.exact_phrase;
        self.draft.search_title = query.search_title;
        debug!(exact_phrase = query.exact_phrase, search_title = query.search_title, "facets changed without a query");
        self.state.status()
    }

    /// Fetch the next page, if there is one and nothing is loading.
    pub async fn load_more(&mut self) -> SessionStatus {
        let ticket = self.state.begin_load_more();
        self.run(ticket).await
    }

    /// Unmount. Anything still in flight is ignored when it lands.
    pub fn teardown(&mut self) {
        debug!("session torn down");
        self.state.close();
    }

    async fn run(&mut self, ticket: Option<Ticket>) -> SessionStatus {
        if let Some(ticket) = ticket {
            let result = fetch_page(&self.backend, &ticket, self.config.request_timeout()).await;
            self.state.apply(&ticket, result);
        }
        self.state.status()
    }
}
