// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for shared-link decoding.
//!
//! Anyone can hand us a URL. Decoding must never panic, and whatever it
//! decodes must survive a trip back through the encoder unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use episode_search::url_state;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    // Property 1: decode never panics, whatever the bytes
    let query = url_state::decode(&raw);

    // Property 2: the canonical form decodes to the same query
    let canonical = url_state::encode("", &url_state::to_changes(&query));
    assert_eq!(url_state::decode(&canonical), query, "canonical form drifted: {:?}", canonical);

    // Property 3: the canonical form is a fixed point
    let again = url_state::encode("", &url_state::to_changes(&url_state::decode(&canonical)));
    assert_eq!(again, canonical);

    // Property 4: rewriting on top of the raw string keeps the query
    let rewritten = url_state::encode(&raw, &url_state::to_changes(&query));
    assert_eq!(url_state::decode(&rewritten), query);
});
