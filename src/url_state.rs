// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shareable URLs: `SearchQuery` ⇄ address-bar query string.
//!
//! The address bar is treated as a pure projection of the query. Nothing in
//! here holds state; the session decides *when* to write (explicit search,
//! facet toggle) and this module only decides *what* the string looks like.
//!
//! # Canonical absence
//!
//! A parameter at its default (`""` for text, `false` for a facet) is removed
//! rather than written. So the URL of a fresh page and the URL after
//! clearing every field are the same string, and a shared link never carries
//! `exactPhrase=false` noise.
//!
//! Encoding follows `application/x-www-form-urlencoded` the way browsers'
//! `URLSearchParams` does it: `+` for space, percent escapes for everything
//! outside `[A-Za-z0-9*-._]`.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::SearchQuery;

pub const QUERY_KEY: &str = "query";
pub const EXACT_PHRASE_KEY: &str = "exactPhrase";
pub const SEARCH_TITLE_KEY: &str = "searchTitle";

/// Bytes left alone by the form serializer.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

// =============================================================================
// ORDERED PARAMETER LIST
// =============================================================================

/// Ordered query-string parameters, duplicates allowed.
///
/// Mirrors `URLSearchParams`: `get` returns the first value, `set` replaces
/// the first occurrence in place and drops the rest, `delete` drops all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let pairs = input
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (form_decode(key), form_decode(value)),
                None => (form_decode(segment), String::new()),
            })
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", form_encode(key), form_encode(value))?;
        }
        Ok(())
    }
}

pub(crate) fn form_encode(raw: &str) -> String {
    utf8_percent_encode(raw, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

fn form_decode(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

// =============================================================================
// CODEC
// =============================================================================

/// A new value for one URL parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Flag(bool),
}

impl ParamValue {
    /// Defaults are represented by absence.
    pub fn is_default(&self) -> bool {
        match self {
            ParamValue::Text(text) => text.is_empty(),
            ParamValue::Flag(flag) => !flag,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        ParamValue::Text(text.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        ParamValue::Text(text)
    }
}

impl From<bool> for ParamValue {
    fn from(flag: bool) -> Self {
        ParamValue::Flag(flag)
    }
}

/// Read a `SearchQuery` out of a query string. Unknown keys are ignored.
pub fn decode(query_string: &str) -> SearchQuery {
    let params = QueryParams::parse(query_string);
    SearchQuery {
        text: params.get(QUERY_KEY).unwrap_or_default().to_string(),
        exact_phrase: params.get(EXACT_PHRASE_KEY) == Some("true"),
        search_title: params.get(SEARCH_TITLE_KEY) == Some("true"),
    }
}

/// Apply `changes` on top of `current` and return the new query string.
///
/// Keys not named in `changes` keep their value and position.
pub fn encode(current: &str, changes: &[(&str, ParamValue)]) -> String {
    let mut params = QueryParams::parse(current);
    for (key, value) in changes {
        if value.is_default() {
            params.delete(key);
        } else {
            params.set(key, value.to_string());
        }
    }
    params.to_string()
}

/// Every field of `query` as a change set, as written on submit.
pub fn to_changes(query: &SearchQuery) -> Vec<(&'static str, ParamValue)> {
    vec![
        (QUERY_KEY, ParamValue::Text(query.text.clone())),
        (EXACT_PHRASE_KEY, ParamValue::Flag(query.exact_phrase)),
        (SEARCH_TITLE_KEY, ParamValue::Flag(query.search_title)),
    ]
}

/// The string pushed as navigation state: `?qs`, or empty when nothing is left.
pub fn location(query_string: &str) -> String {
    if query_string.is_empty() {
        String::new()
    } else {
        format!("?{}", query_string)
    }
}
