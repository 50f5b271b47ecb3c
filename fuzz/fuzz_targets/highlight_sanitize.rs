// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the emphasis-only highlight sanitizer.
//!
//! Fragments come from the backend and end up in markup. The only tags that
//! may survive are bare emphasis tags; every other angle bracket is escaped.

#![no_main]

use libfuzzer_sys::fuzz_target;
use episode_search::highlight::{sanitize_emphasis, to_terminal};

const ALLOWED: &[&str] = &["em", "mark", "strong", "b", "i"];

/// True if `s` starts with `<tag>` or `</tag>` for an allowed tag.
fn starts_with_allowed_tag(s: &str) -> bool {
    let body = s.strip_prefix("</").or_else(|| s.strip_prefix('<'));
    let Some(body) = body else { return false };
    ALLOWED
        .iter()
        .any(|tag| body.strip_prefix(tag).is_some_and(|rest| rest.starts_with('>')))
}

fuzz_target!(|data: &[u8]| {
    let Ok(html) = std::str::from_utf8(data) else { return };

    let clean = sanitize_emphasis(html);

    // Property 1: every surviving '<' opens an allowed tag
    for (i, _) in clean.match_indices('<') {
        assert!(
            starts_with_allowed_tag(&clean[i..]),
            "disallowed markup survived in {:?}",
            clean
        );
    }

    // Property 2: sanitizing is idempotent
    assert_eq!(sanitize_emphasis(&clean), clean);

    // Property 3: terminal rendering never panics
    let _ = to_terminal(&clean, "\x1b[1m", "\x1b[0m");
});
