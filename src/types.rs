// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The values that flow between the session, the backend, and the view.
//!
//! Everything the backend sends is immutable once decoded: an `Episode` is
//! never edited client-side, only replaced or appended. The session state
//! itself lives in `session::state`; this module only holds the data that
//! crosses a boundary (URL, wire, display).
//!
//! # Invariants
//!
//! - **ResultPage**: `data.len() <= limit`. The backend is trusted for this;
//!   the accumulator clamps against `total` regardless.
//! - **HighlightMap**: only fields that matched are present, each with at
//!   least one fragment. Field order is the order the backend sent.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ErrorKind;

// =============================================================================
// QUERY
// =============================================================================

/// What the user asked for: free text plus the two facets.
///
/// Empty `text` means "no search". The facets default to `false` and are
/// dropped from the URL when they hold their default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub text: String,
    #[serde(default)]
    pub exact_phrase: bool,
    #[serde(default)]
    pub search_title: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_exact_phrase(mut self, exact_phrase: bool) -> Self {
        self.exact_phrase = exact_phrase;
        self
    }

    pub fn with_search_title(mut self, search_title: bool) -> Self {
        self.search_title = search_title;
        self
    }

    /// True when the text is empty after trimming.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// =============================================================================
// EPISODES
// =============================================================================

/// One episode of the archive, exactly as the backend describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub link: String,
    pub script: String,
    pub duration: String,
    pub air_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scribe: Option<String>,
    pub embed_src: String,
}

/// Field name → highlighted fragments, in backend order.
///
/// Stored as a vector of pairs rather than a hash map so that rendering
/// order matches what the backend ranked first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightMap(Vec<(String, Vec<String>)>);

impl HighlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append fragments for a field. A repeated field extends the existing entry.
    pub fn insert(&mut self, field: impl Into<String>, fragments: Vec<String>) {
        let field = field.into();
        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => existing.extend(fragments),
            None => self.0.push((field, fragments)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, fragments)| fragments.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, fragments)| (name.as_str(), fragments.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F: Into<String>> FromIterator<(F, Vec<String>)> for HighlightMap {
    fn from_iter<I: IntoIterator<Item = (F, Vec<String>)>>(iter: I) -> Self {
        let mut map = HighlightMap::new();
        for (field, fragments) in iter {
            map.insert(field, fragments);
        }
        map
    }
}

impl Serialize for HighlightMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, fragments) in &self.0 {
            map.serialize_entry(field, fragments)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HighlightMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HighlightVisitor;

        impl<'de> Visitor<'de> for HighlightVisitor {
            type Value = HighlightMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field name to highlight fragments")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = HighlightMap::new();
                while let Some((field, fragments)) = access.next_entry::<String, Vec<String>>()? {
                    map.insert(field, fragments);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(HighlightVisitor)
    }
}

/// An episode together with the highlights for the current query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    #[serde(flatten)]
    pub episode: Episode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightMap>,
}

/// One page of results as returned by `GET /api/episodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub data: Vec<ResultEntry>,
}

// =============================================================================
// STATUS
// =============================================================================

/// Where the session is in its request lifecycle.
///
/// `Error` carries the failure kind so that a failed request is never
/// confused with a search that matched nothing (`Loaded` with no results).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(ErrorKind),
}

impl SessionStatus {
    #[inline]
    pub fn is_loading(self) -> bool {
        matches!(self, SessionStatus::Loading)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, SessionStatus::Error(_))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Loading => write!(f, "loading"),
            SessionStatus::Loaded => write!(f, "loaded"),
            SessionStatus::Error(kind) => write!(f, "error ({})", kind),
        }
    }
}
