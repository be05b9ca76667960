// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `SuggestionSet`: the ordered, deduplicating container every search stage
//! inserts into (§4.5).
//!
//! This mirrors the reference crate's `ResultMerger` (`search/dedup.rs`): a
//! single place that owns merge/dedup/tie-break logic keyed on an explicit
//! identity, rather than scattering ad hoc `HashMap` merges across call
//! sites. There, the identity is `doc_id`; here it's `(word, orglen)`.

use std::collections::HashMap;

use crate::types::{compare_suggestions, sug_max_count, Score, Suggestion, SUG_CLEAN_COUNT};

/// Ordered, deduplicating collection of candidate corrections.
pub struct SuggestionSet {
    items: Vec<Suggestion>,
    /// `(word, orglen) -> index into items`, kept in sync with `items` so
    /// dedup lookups don't need a linear scan.
    index: HashMap<(String, usize), usize>,
    maxcount: usize,
}

impl SuggestionSet {
    pub fn new(maxcount: usize) -> Self {
        SuggestionSet {
            items: Vec::new(),
            index: HashMap::new(),
            maxcount,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert `candidate`, deduplicating on `(word, orglen)` (§4.5.1). If a
    /// record with that identity exists, keep the lower score and
    /// reconcile the alt-score: a side that already had one computed wins
    /// over a side that didn't.
    ///
    /// Returns the tightened soft-cap ceiling if inserting pushed the set
    /// over `SUG_MAX_COUNT` and it had to clean up (§4.5.2), else `None`.
    pub fn insert(&mut self, candidate: Suggestion) -> Option<i32> {
        let key = (candidate.word.to_lowercase(), candidate.orglen);
        if let Some(&pos) = self.index.get(&key) {
            let existing = &mut self.items[pos];
            if candidate.score < existing.score {
                let keep_alt = if existing.altscore_computed {
                    existing.altscore
                } else if candidate.altscore_computed {
                    candidate.altscore
                } else {
                    candidate.altscore
                };
                let keep_alt_computed = existing.altscore_computed || candidate.altscore_computed;
                existing.word = candidate.word;
                existing.score = candidate.score;
                existing.altscore = keep_alt;
                existing.altscore_computed = keep_alt_computed;
                existing.language = candidate.language;
                existing.from_soundalike = candidate.from_soundalike;
            } else if !existing.altscore_computed && candidate.altscore_computed {
                existing.altscore = candidate.altscore;
                existing.altscore_computed = true;
            }
        } else {
            self.index.insert(key, self.items.len());
            self.items.push(candidate);
        }

        let cap = sug_max_count(self.maxcount);
        if self.items.len() > cap {
            Some(self.clean())
        } else {
            None
        }
    }

    /// Sort and truncate to `SUG_CLEAN_COUNT`, rebuild the identity index,
    /// and return the new effective score ceiling (the score of the last
    /// kept entry) for the caller to tighten future search against (§4.5.2).
    fn clean(&mut self) -> i32 {
        self.items.sort_by(compare_suggestions);
        self.items.truncate(SUG_CLEAN_COUNT);
        self.reindex();
        self.items.last().map(|s| s.score.0).unwrap_or(crate::types::SCORE_MAXMAX)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, s) in self.items.iter().enumerate() {
            self.index.insert((s.word.to_lowercase(), s.orglen), i);
        }
    }

    /// Final cleanup (§4.5.3): sort by `(score, altscore, case-insensitive
    /// word)` and truncate to `self.maxcount`, consuming the set.
    pub fn finish(mut self) -> Vec<Suggestion> {
        self.items.sort_by(compare_suggestions);
        self.items.truncate(self.maxcount);
        self.items
    }

    /// Remove every suggestion whose word is in `banned` (§3: "a word in
    /// the banned set never appears in the final output").
    pub fn retain_not_banned(&mut self, banned: &std::collections::HashSet<String>) {
        self.items.retain(|s| !banned.contains(&s.word));
        self.reindex();
    }

    /// Current best (lowest) score in the set, if any - used as a tightened
    /// ceiling for further search even before a soft-cap clean fires.
    pub fn current_ceiling(&self) -> Option<Score> {
        self.items.iter().map(|s| s.score).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_lower_score() {
        let mut set = SuggestionSet::new(10);
        set.insert(Suggestion::new("cat", 3, 50, 0));
        set.insert(Suggestion::new("cat", 3, 20, 0));
        let out = set.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score.0, 20);
    }

    #[test]
    fn distinct_orglen_is_not_deduped() {
        let mut set = SuggestionSet::new(10);
        set.insert(Suggestion::new("cat", 3, 50, 0));
        set.insert(Suggestion::new("cat", 4, 20, 0));
        let out = set.finish();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn alt_score_reconciled_when_only_one_side_has_it() {
        let mut set = SuggestionSet::new(10);
        let mut a = Suggestion::new("cat", 3, 50, 0);
        a.altscore = Score(5);
        a.altscore_computed = true;
        set.insert(a);
        // A cheaper candidate with no altscore yet should not erase the
        // previously computed one as "more authoritative" silently -
        // reconciliation favors whichever side actually computed it.
        let b = Suggestion::new("cat", 3, 20, 0);
        set.insert(b);
        let out = set.finish();
        assert_eq!(out[0].score.0, 20);
        assert!(out[0].altscore_computed);
        assert_eq!(out[0].altscore.0, 5);
    }

    #[test]
    fn final_cleanup_sorts_and_truncates() {
        let mut set = SuggestionSet::new(2);
        set.insert(Suggestion::new("zebra", 5, 10, 0));
        set.insert(Suggestion::new("apple", 5, 10, 0));
        set.insert(Suggestion::new("mango", 5, 30, 0));
        let out = set.finish();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].word, "apple");
        assert_eq!(out[1].word, "zebra");
    }

    #[test]
    fn banned_words_are_removed() {
        let mut set = SuggestionSet::new(10);
        set.insert(Suggestion::new("cat", 3, 10, 0));
        set.insert(Suggestion::new("dog", 3, 10, 0));
        let mut banned = std::collections::HashSet::new();
        banned.insert("cat".to_string());
        set.retain_not_banned(&banned);
        let out = set.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].word, "dog");
    }
}
