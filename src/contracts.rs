//! Runtime contracts for session state.
//!
//! Debug-mode assertions for the invariants the rest of the crate relies
//! on. They compile to nothing in release builds.
//!
//! | Contract                      | Invariant                                   |
//! |-------------------------------|---------------------------------------------|
//! | `check_results_within_total`  | `results.len() <= total`                    |
//! | `check_results_grew`          | results only grow within one query          |
//! | `check_offset_step`           | `offset == page_count * page_size`          |

use crate::session::state::SessionState;

/// `results.len() <= total`, always.
#[inline]
pub fn check_results_within_total(state: &SessionState) {
    debug_assert!(
        state.results().len() <= state.total(),
        "Contract violation: results.len() {} > total {}",
        state.results().len(),
        state.total()
    );
}

/// Appending never shrinks the list.
#[inline]
pub fn check_results_grew(before: usize, after: usize) {
    debug_assert!(
        after >= before,
        "Contract violation: results shrank from {} to {} during load more",
        before,
        after
    );
}

/// Each successful load-more advances `offset` by exactly one page.
#[inline]
pub fn check_offset_step(state: &SessionState) {
    debug_assert_eq!(
        state.offset(),
        state.page_count() * state.page_size(),
        "Contract violation: offset {} after {} pages of {}",
        state.offset(),
        state.page_count(),
        state.page_size()
    );
}

/// All state contracts at once.
#[inline]
pub fn check_state_well_formed(state: &SessionState) {
    check_results_within_total(state);
    check_offset_step(state);
}
