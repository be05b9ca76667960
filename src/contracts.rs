// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the invariants written down in `SPEC_FULL.md` §3/§8.
//!
//! These are zero-cost in release builds (`debug_assert!`) and exist purely
//! to fail loudly, near the site of the bug, during development and tests.
//! The reference crate's `contracts.rs` ties each check to a Lean theorem;
//! this crate makes no such formal claim, but keeps the same habit of
//! writing the invariant down as executable code next to the structure it
//! protects rather than trusting a comment to stay true.

use crate::types::{BadWord, Suggestion, MAX_WLEN};

/// `depth < MAX_WLEN` at all times (§3 invariant 1).
#[inline]
pub fn check_depth_in_bounds(depth: usize) {
    debug_assert!(
        depth < MAX_WLEN,
        "Contract violation: walker depth {depth} >= MAX_WLEN {MAX_WLEN}"
    );
}

/// `ts_fidx <= strlen(fword)` always (§3 invariant 2).
#[inline]
pub fn check_fidx_in_bounds(fidx: usize, fword_len: usize) {
    debug_assert!(
        fidx <= fword_len,
        "Contract violation: fidx {fidx} > fword length {fword_len}"
    );
}

/// `ts_fidxtry <= ts_fidx` for all later-tried edits (§3 invariant 3).
#[inline]
pub fn check_fidxtry_not_past_fidx(fidxtry: usize, fidx: usize) {
    debug_assert!(
        fidxtry <= fidx,
        "Contract violation: fidxtry {fidxtry} > fidx {fidx}"
    );
}

/// No pair of suggestions in a finished list shares `(word, orglen)` (§3
/// invariant: dedup key).
pub fn check_no_duplicate_identity(suggestions: &[Suggestion]) {
    for i in 1..suggestions.len() {
        for j in 0..i {
            debug_assert!(
                suggestions[i].identity() != suggestions[j].identity(),
                "Contract violation: duplicate suggestion identity {:?} at positions {} and {}",
                suggestions[i].identity(),
                j,
                i
            );
        }
    }
}

/// A finished suggestion list is non-decreasing in `(score, altscore,
/// lowercase word)` order (§4.5.3, §8).
pub fn check_sorted(suggestions: &[Suggestion]) {
    for i in 1..suggestions.len() {
        debug_assert!(
            suggestions[i - 1].sort_key() <= suggestions[i].sort_key(),
            "Contract violation: suggestion list not sorted at position {i}"
        );
    }
}

/// No suggestion in the output is a banned word (§3, §8).
pub fn check_no_banned_words(suggestions: &[Suggestion], banned: &std::collections::HashSet<String>) {
    for s in suggestions {
        debug_assert!(
            !banned.contains(&s.word),
            "Contract violation: banned word {:?} present in output",
            s.word
        );
    }
}

/// Every returned suggestion scores within the documented bound relative to
/// the bad word (§8 invariant 1). `edit_score` is supplied by the caller
/// (usually `edit::unbounded`) so this module stays free of a dependency on
/// `edit.rs`.
pub fn check_score_bound(bad: &BadWord, suggestion: &Suggestion, edit_score: i32) {
    use crate::types::{SCORE_MAXINIT, SCORE_SFMAX3};
    let bound = SCORE_MAXINIT.saturating_add(SCORE_SFMAX3.max(crate::types::SCORE_LIMITMAX));
    debug_assert!(
        edit_score <= bound || bad.char_len() == 0,
        "Contract violation: suggestion {:?} scores {} beyond bound {}",
        suggestion.word,
        edit_score,
        bound
    );
}
