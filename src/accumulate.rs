//! Merging result pages into one ordered list.
//!
//! The first page of a query replaces whatever was there; every later page is
//! appended in arrival order. There is no identity check across pages: the
//! backend serves disjoint offset windows, and the session only ever asks for
//! the window right after the rows it already holds.
//!
//! The one thing we do not trust blindly is the row count. A page that would
//! push the list past `total` is truncated, so `results.len() <= total` holds
//! even against a misbehaving backend.

use crate::types::{ResultEntry, ResultPage};

/// Outcome of merging one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulated {
    pub results: Vec<ResultEntry>,
    pub total: usize,
    /// Rows from the page that were dropped to respect `total`.
    pub dropped: usize,
}

/// Merge `page` into `current`, where `total` is the count established by the
/// first page of the query.
///
/// - `page.offset == 0`: replace, and adopt `page.total`.
/// - otherwise: append, keeping the established `total`.
pub fn merge(current: Vec<ResultEntry>, total: usize, page: ResultPage) -> Accumulated {
    let (mut results, total) = if page.offset == 0 {
        (Vec::with_capacity(page.data.len()), page.total)
    } else {
        (current, total)
    };

    let room = total.saturating_sub(results.len());
    let incoming = page.data.len();
    results.extend(page.data.into_iter().take(room));

    Accumulated {
        results,
        total,
        dropped: incoming.saturating_sub(room),
    }
}
