// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Highlight fragments: from backend markup to something safe to render.
//!
//! The backend sends, per matched field, snippets like
//! `"…and then <em>Jake</em> said…"`. Its contract is that everything except
//! the emphasis tags is already escaped. Rendering layers inject these as raw
//! markup, so a broken backend is an injection vector.
//!
//! Two policies:
//!
//! - `TrustBackend`: pass fragments through untouched (the historical behavior).
//! - `EmphasisOnly` (default): re-escape every `<`/`>` that is not part of a
//!   bare `<em>`, `<mark>`, `<strong>`, `<b>` or `<i>` open/close tag.
//!   Attributes disqualify a tag (`<em onclick=…>` is escaped).
//!
//! Anything richer than emphasis belongs in a real sanitizer at the backend.

use serde::{Deserialize, Serialize};

use crate::types::ResultEntry;

/// Tags that may survive sanitizing.
const EMPHASIS_TAGS: &[&str] = &["em", "mark", "strong", "b", "i"];

/// How much the projector trusts backend markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SanitizePolicy {
    TrustBackend,
    #[default]
    EmphasisOnly,
}

/// One renderable snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub fragment_html: String,
}

/// All snippets for one matched field, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHighlights {
    pub field: String,
    pub fragments: Vec<Fragment>,
}

/// Project an entry's highlights for display. Empty when nothing matched.
pub fn project(entry: &ResultEntry, policy: SanitizePolicy) -> Vec<FieldHighlights> {
    let Some(highlight) = entry.highlight.as_ref() else {
        return Vec::new();
    };

    highlight
        .iter()
        .map(|(field, fragments)| FieldHighlights {
            field: field.to_string(),
            fragments: fragments
                .iter()
                .map(|html| Fragment {
                    fragment_html: match policy {
                        SanitizePolicy::TrustBackend => html.clone(),
                        SanitizePolicy::EmphasisOnly => sanitize_emphasis(html),
                    },
                })
                .collect(),
        })
        .collect()
}

// =============================================================================
// TAG SCANNING
// =============================================================================

/// A tag found at the start of a string slice.
struct Tag<'a> {
    name: &'a str,
    closing: bool,
    /// Byte length including `<` and `>`.
    len: usize,
    bare: bool,
}

/// Parse `<name ...>` or `</name>` at the start of `s`.
fn scan_tag(s: &str) -> Option<Tag<'_>> {
    let end = s.find('>')?;
    let inner = &s[1..end];
    let (closing, body) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    if name_len == 0 {
        return None;
    }
    Some(Tag {
        name: &body[..name_len],
        closing,
        len: end + 1,
        bare: name_len == body.len(),
    })
}

fn is_emphasis(tag: &Tag<'_>) -> bool {
    tag.bare
        && EMPHASIS_TAGS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(tag.name))
}

/// Escape every angle bracket that is not part of an allowed emphasis tag.
pub fn sanitize_emphasis(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(pos) = rest.find(&['<', '>'][..]) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('>') {
            out.push_str("&gt;");
            rest = &rest[1..];
            continue;
        }

        match scan_tag(rest) {
            Some(tag) if is_emphasis(&tag) => {
                out.push('<');
                if tag.closing {
                    out.push('/');
                }
                out.push_str(&tag.name.to_ascii_lowercase());
                out.push('>');
                rest = &rest[tag.len..];
            }
            _ => {
                out.push_str("&lt;");
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// =============================================================================
// TERMINAL RENDERING
// =============================================================================

/// Render a fragment as plain text, wrapping emphasis in `on`/`off`.
///
/// Non-emphasis tags are dropped and the common entities decoded, so the
/// result is fit for a terminal but not for HTML.
pub fn to_terminal(fragment_html: &str, on: &str, off: &str) -> String {
    let mut out = String::with_capacity(fragment_html.len());
    let mut rest = fragment_html;

    while let Some(pos) = rest.find('<') {
        out.push_str(&decode_entities(&rest[..pos]));
        rest = &rest[pos..];
        match scan_tag(rest) {
            Some(tag) => {
                if is_emphasis(&tag) {
                    out.push_str(if tag.closing { off } else { on });
                }
                rest = &rest[tag.len..];
            }
            None => {
                out.push('<');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(&decode_entities(rest));
    out
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
