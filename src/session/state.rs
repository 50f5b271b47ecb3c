// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The session state machine, as a reducer.
//!
//! Nothing in here performs I/O. A transition either hands back a `Ticket`
//! describing the request to issue, or applies the outcome of one. That keeps
//! the whole state machine testable without a runtime or a backend.
//!
//! ```text
//!          begin_search                 success
//!   Idle ───────────────▶ Loading ─────────────────▶ Loaded
//!    ▲                     │  ▲                        │
//!    │             failure │  │ begin_search           │
//!    │                     ▼  │ begin_load_more        │
//!    │                 Error(kind) ◀───────────────────┘
//!    │                                  (Loaded also re-enters Loading)
//!    └── begin_search with blank text, from any state
//! ```
//!
//! # Ordering
//!
//! Every `begin_*` bumps a sequence number and stamps it on the ticket. An
//! outcome is applied only if its ticket carries the latest number; anything
//! older is reported as `Outcome::Stale` and leaves the state untouched. A new
//! search therefore supersedes whatever was in flight, and a late response
//! can never overwrite newer results.
//!
//! # Pagination
//!
//! `offset` counts load-more rows requested so far (`page_count * page_size`).
//! The backend window of a load-more starts right after the rows already
//! held (`results.len()`), so the first load-more after a 50-row first page
//! asks for rows 50..60, not 10..20.

use tracing::{debug, info, warn};

use crate::accumulate;
use crate::config::SessionConfig;
use crate::contracts;
use crate::error::SearchError;
use crate::request::{self, RequestDescriptor};
use crate::types::{ResultEntry, ResultPage, SearchQuery, SessionStatus};

/// Which transition issued a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Search,
    LoadMore,
}

/// A request the session wants issued, tied to the transition that asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    kind: RequestKind,
    request: RequestDescriptor,
    /// First row of the backend window (0 for a search).
    window: usize,
    /// Value of `offset` once this ticket succeeds.
    next_offset: usize,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn request(&self) -> &RequestDescriptor {
        &self.request
    }
}

/// What happened when an outcome was offered to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer request was issued (or the session closed); nothing changed.
    Stale,
}

/// Single-owner search state.
#[derive(Debug, Clone)]
pub struct SessionState {
    query: SearchQuery,
    results: Vec<ResultEntry>,
    total: usize,
    offset: usize,
    page_count: usize,
    status: SessionStatus,
    first_page_limit: usize,
    page_size: usize,
    latest_seq: u64,
    closed: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl SessionState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            query: SearchQuery::default(),
            results: Vec::new(),
            total: 0,
            offset: 0,
            page_count: 0,
            status: SessionStatus::Idle,
            first_page_limit: config.first_page_limit,
            page_size: config.page_size,
            latest_seq: 0,
            closed: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The last submitted query.
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True when a load-more would be issued right now.
    pub fn can_load_more(&self) -> bool {
        !self.closed
            && self.status == SessionStatus::Loaded
            && self.results.len() < self.total
            && !self.query.is_blank()
    }

    /// True when more rows exist than are held, regardless of status.
    pub fn has_more(&self) -> bool {
        self.results.len() < self.total
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn next_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }

    /// Start a new query. Blank text clears the board and issues nothing.
    ///
    /// Supersedes any request in flight.
    pub fn begin_search(&mut self, query: SearchQuery) -> Option<Ticket> {
        if self.closed {
            return None;
        }
        let seq = self.next_seq();

        self.results.clear();
        self.total = 0;
        self.offset = 0;
        self.page_count = 0;

        if query.is_blank() {
            debug!(seq, "blank search; clearing results");
            self.query = query;
            self.status = SessionStatus::Idle;
            return None;
        }

        let request = request::build(&query, self.first_page_limit, None);
        debug!(seq, %request, "search issued");
        self.query = query;
        self.status = SessionStatus::Loading;

        Some(Ticket {
            seq,
            kind: RequestKind::Search,
            request,
            window: 0,
            next_offset: 0,
        })
    }

    /// Ask for the next page. `None` unless `can_load_more()`.
    ///
    /// The wire offset is `results.len()` (50, 60, ...), not `offset + page_size`,
    /// so the window always starts after the last row held.
    pub fn begin_load_more(&mut self) -> Option<Ticket> {
        if !self.can_load_more() {
            return None;
        }
        let seq = self.next_seq();

        let window = self.results.len();
        let next_offset = self.offset + self.page_size;
        let request = request::build(&self.query, self.page_size, Some(window));
        debug!(seq, %request, next_offset, "load more issued");
        self.status = SessionStatus::Loading;

        Some(Ticket {
            seq,
            kind: RequestKind::LoadMore,
            request,
            window,
            next_offset,
        })
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        !self.closed && ticket.seq == self.latest_seq && self.status.is_loading()
    }

    /// Apply a page the backend returned for `ticket`.
    pub fn apply_success(&mut self, ticket: &Ticket, mut page: ResultPage) -> Outcome {
        if !self.is_current(ticket) {
            debug!(seq = ticket.seq, latest = self.latest_seq, "discarding stale page");
            return Outcome::Stale;
        }

        if page.offset != ticket.window {
            debug!(
                expected = ticket.window,
                got = page.offset,
                "backend echoed a different offset; using the requested window"
            );
            page.offset = ticket.window;
        }

        let before = self.results.len();
        let merged = accumulate::merge(std::mem::take(&mut self.results), self.total, page);
        if merged.dropped > 0 {
            warn!(dropped = merged.dropped, total = merged.total, "page overran total; rows dropped");
        }
        self.results = merged.results;
        self.total = merged.total;

        match ticket.kind {
            RequestKind::Search => {
                info!(
                    query = %self.query.text,
                    total = self.total,
                    loaded = self.results.len(),
                    "search loaded"
                );
            }
            RequestKind::LoadMore => {
                contracts::check_results_grew(before, self.results.len());
                self.offset = ticket.next_offset;
                self.page_count += 1;
                debug!(
                    offset = self.offset,
                    pages = self.page_count,
                    loaded = self.results.len(),
                    "page appended"
                );
            }
        }

        self.status = SessionStatus::Loaded;
        contracts::check_state_well_formed(self);
        Outcome::Applied
    }

    /// Record that `ticket` failed.
    ///
    /// A failed search empties the board. A failed load-more keeps what was
    /// already loaded and does not advance `offset`/`page_count`, so nothing is
    /// skipped when the user searches again.
    pub fn apply_failure(&mut self, ticket: &Ticket, error: &SearchError) -> Outcome {
        if !self.is_current(ticket) {
            debug!(seq = ticket.seq, latest = self.latest_seq, %error, "discarding stale failure");
            return Outcome::Stale;
        }

        match ticket.kind {
            RequestKind::Search => {
                warn!(query = %self.query.text, %error, "error searching episodes");
                self.results.clear();
                self.total = 0;
            }
            RequestKind::LoadMore => {
                warn!(query = %self.query.text, window = ticket.window, %error, "error loading more episodes");
            }
        }

        self.status = SessionStatus::Error(error.kind());
        contracts::check_state_well_formed(self);
        Outcome::Applied
    }

    /// Apply either outcome of a ticket.
    pub fn apply(&mut self, ticket: &Ticket, result: Result<ResultPage, SearchError>) -> Outcome {
        match result {
            Ok(page) => self.apply_success(ticket, page),
            Err(error) => self.apply_failure(ticket, &error),
        }
    }

    /// Tear the session down: outstanding tickets become stale and no new
    /// ones are issued.
    pub fn close(&mut self) {
        self.latest_seq += 1;
        self.closed = true;
        if self.status.is_loading() {
            self.status = SessionStatus::Idle;
        }
    }
}
