//! Backend request descriptors for `GET /api/episodes`.
//!
//! The rules differ on purpose between the text and the facets: blank text
//! is *omitted* (no key means "no filter", which is not the same as an
//! explicit empty filter), while the facets are *always* sent as literal
//! `"true"`/`"false"` so the backend never has to guess a default.

use std::fmt;

use crate::types::SearchQuery;
use crate::url_state::{QueryParams, EXACT_PHRASE_KEY, QUERY_KEY, SEARCH_TITLE_KEY};

/// Path of the episodes endpoint, relative to the backend base URL.
pub const EPISODES_PATH: &str = "/api/episodes";

pub const LIMIT_KEY: &str = "limit";
pub const OFFSET_KEY: &str = "offset";

/// Rows requested by the first search of a query.
pub const FIRST_PAGE_LIMIT: usize = 50;

/// Rows requested by each "load more".
pub const PAGE_SIZE: usize = 10;

/// A fully-resolved request: everything needed to issue the GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    params: QueryParams,
    limit: usize,
    offset: Option<usize>,
}

impl RequestDescriptor {
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// `None` for the first page.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// The trimmed text filter, if one is sent.
    pub fn text(&self) -> Option<&str> {
        self.params.get(QUERY_KEY)
    }

    pub fn query_string(&self) -> String {
        self.params.to_string()
    }

    /// `path?query` relative to the backend root.
    pub fn path_and_query(&self) -> String {
        format!("{}?{}", EPISODES_PATH, self.params)
    }

    /// Absolute URL against `base_url` (trailing slash tolerated).
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path_and_query())
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_and_query())
    }
}

/// Build the request for `query` at the given window.
///
/// `offset` is only serialized when it points past the first page.
pub fn build(query: &SearchQuery, limit: usize, offset: Option<usize>) -> RequestDescriptor {
    let mut params = QueryParams::new();

    let text = query.text.trim();
    if !text.is_empty() {
        params.append(QUERY_KEY, text);
    }
    params.append(EXACT_PHRASE_KEY, query.exact_phrase.to_string());
    params.append(SEARCH_TITLE_KEY, query.search_title.to_string());
    params.append(LIMIT_KEY, limit.to_string());

    let offset = offset.filter(|&n| n > 0);
    if let Some(n) = offset {
        params.append(OFFSET_KEY, n.to_string());
    }

    RequestDescriptor {
        params,
        limit,
        offset,
    }
}
