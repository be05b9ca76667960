// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! External collaborators named in §6: the banned-word set, the `file:`
//! suggestion-list adapter, and the `expr:` expression collaborator. None
//! of these touch the trie walk directly - they're inputs the Orchestrator
//! folds in alongside the walker's own output (§4.6 step 4).
//!
//! Grounded in the reference crate's `util/dict_table.rs`: a small,
//! dependency-free table keyed by string, loaded once and consulted by
//! value rather than parsed inline at every call site.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::dictionary::Dictionary;
use crate::errors::SuggestError;
use crate::types::{BadWord, CapsFlags, Suggestion, SCORE_FILE};

/// Insertion-only set of words to exclude from suggestions for the
/// lifetime of one request (§3: "A set of banned words (insertion-only
/// while this request is live)").
#[derive(Debug, Clone, Default)]
pub struct BannedWords(HashSet<String>);

impl BannedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ban(&mut self, word: &str) {
        self.0.insert(word.to_string());
    }

    pub fn is_banned(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn as_set(&self) -> &HashSet<String> {
        &self.0
    }
}

/// A user-supplied expression evaluator for the `expr:` mode (§6). The
/// core has no opinion on expression syntax; it only needs "given the bad
/// word, produce candidate corrections". A real embedding supplies one
/// backed by whatever scripting engine the host exposes; `NullExprEval`
/// is the default no-op used when no such collaborator is wired up.
pub trait ExprEval {
    fn evaluate(&self, expr: &str, bad_word: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullExprEval;

impl ExprEval for NullExprEval {
    fn evaluate(&self, _expr: &str, _bad_word: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Run the `expr:` collaborator and wrap its output as suggestions at
/// `SCORE_FILE` (the spec gives `expr:` no score of its own; it shares the
/// file adapter's flat external-source weight).
pub fn expr_suggestions(eval: &dyn ExprEval, expr: &str, bad: &BadWord) -> Vec<Suggestion> {
    eval.evaluate(expr, &bad.original)
        .into_iter()
        .map(|good| Suggestion::new(good, bad.char_len(), SCORE_FILE, 0))
        .collect()
}

/// `file:<path>` adapter (§6): each non-blank line is `bad<TAB>good`; on a
/// case-insensitive match of `bad` against the request's bad word, emit
/// `good` (re-cased to the bad word's caps pattern if `good` carries no
/// explicit case of its own) at `SCORE_FILE`.
pub fn file_suggestions<D: Dictionary>(
    dict: &D,
    path: &Path,
    bad: &BadWord,
) -> Result<Vec<Suggestion>, SuggestError> {
    let file = std::fs::File::open(path).map_err(|e| SuggestError::InputInvalid {
        reason: if e.kind() == std::io::ErrorKind::NotFound {
            "file: adapter path does not exist"
        } else {
            "file: adapter path could not be read"
        },
    })?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|_| SuggestError::InputInvalid {
            reason: "file: adapter encountered invalid UTF-8",
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((file_bad, file_good)) = line.split_once('\t') else {
            continue;
        };
        if !file_bad.eq_ignore_ascii_case(&bad.folded) {
            continue;
        }
        let good = if dict.captype(file_good) == CapsFlags::None {
            dict.make_case_word(&dict.casefold(file_good), bad.caps)
        } else {
            file_good.to_string()
        };
        out.push(Suggestion::new(good, bad.char_len(), SCORE_FILE, 0));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryBuilder;

    #[test]
    fn banned_words_track_insertions() {
        let mut banned = BannedWords::new();
        assert!(!banned.is_banned("cat"));
        banned.ban("cat");
        assert!(banned.is_banned("cat"));
    }

    #[test]
    fn file_adapter_reads_tab_separated_lines() {
        let dict = DictionaryBuilder::new().build();
        let dir = std::env::temp_dir();
        let path = dir.join(format!("spellsuggest_test_{}.tsv", std::process::id()));
        std::fs::write(&path, "teh\tthe\nfoo\tbar\n").unwrap();

        let bad = BadWord {
            original: "teh".to_string(),
            folded: "teh".to_string(),
            caps: CapsFlags::None,
            sound_folded: None,
            max_suggestions: 10,
            word_score_ceiling: crate::types::SCORE_MAXMAX,
            soundfold_score_ceiling: crate::types::SCORE_MAXMAX,
        };
        let results = file_suggestions(&dict, &path, &bad).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].word, "the");
        assert_eq!(results[0].score.0, SCORE_FILE);
    }

    #[test]
    fn file_adapter_reports_missing_file() {
        let dict = DictionaryBuilder::new().build();
        let bad = BadWord {
            original: "teh".to_string(),
            folded: "teh".to_string(),
            caps: CapsFlags::None,
            sound_folded: None,
            max_suggestions: 10,
            word_score_ceiling: crate::types::SCORE_MAXMAX,
            soundfold_score_ceiling: crate::types::SCORE_MAXMAX,
        };
        let err = file_suggestions(&dict, Path::new("/nonexistent/path.tsv"), &bad).unwrap_err();
        assert!(matches!(err, SuggestError::InputInvalid { .. }));
    }

    #[test]
    fn null_expr_eval_produces_nothing() {
        let bad = BadWord {
            original: "teh".to_string(),
            folded: "teh".to_string(),
            caps: CapsFlags::None,
            sound_folded: None,
            max_suggestions: 10,
            word_score_ceiling: crate::types::SCORE_MAXMAX,
            soundfold_score_ceiling: crate::types::SCORE_MAXMAX,
        };
        assert!(expr_suggestions(&NullExprEval, "anything", &bad).is_empty());
    }
}
