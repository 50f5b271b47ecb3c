// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the session state machine.
//!
//! Drives arbitrary interleavings of searches, load-mores, responses (in any
//! order, including stale ones) and teardown. The state must stay well
//! formed throughout: no more rows than the total, offset a whole number of
//! pages, and nothing applied after teardown.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use episode_search::testing::make_page;
use episode_search::{Outcome, SearchError, SearchQuery, SessionState, Ticket};

#[derive(Debug, Arbitrary)]
enum Op {
    Search { blank: bool },
    LoadMore,
    /// Answer the ticket at this index with `rows` rows out of `total`.
    Succeed { ticket: u8, total: u8, rows: u8 },
    Fail { ticket: u8, status: u16 },
    Close,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut state = SessionState::default();
    let mut tickets: Vec<Ticket> = Vec::new();

    for op in ops {
        match op {
            Op::Search { blank } => {
                let text = if blank { "  " } else { "amir" };
                tickets.extend(state.begin_search(SearchQuery::new(text)));
            }
            Op::LoadMore => tickets.extend(state.begin_load_more()),
            Op::Succeed { ticket, total, rows } => {
                if tickets.is_empty() {
                    continue;
                }
                let ticket = &tickets[ticket as usize % tickets.len()];
                let start = ticket.request().offset().unwrap_or(0);
                let page = make_page(total as usize, start, rows as usize);
                let was_closed = state.is_closed();
                let outcome = state.apply(ticket, Ok(page));
                if was_closed {
                    assert_eq!(outcome, Outcome::Stale);
                }
            }
            Op::Fail { ticket, status } => {
                if tickets.is_empty() {
                    continue;
                }
                let ticket = &tickets[ticket as usize % tickets.len()];
                state.apply(ticket, Err(SearchError::Backend { status }));
            }
            Op::Close => state.close(),
        }

        assert!(state.results().len() <= state.total());
        assert_eq!(state.offset(), state.page_count() * state.page_size());
    }
});
