// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The suggestion entry point (§4.6): wires the bad-word context, the
//! external collaborators (`expr:`/`file:`), and the two internal search
//! stages (`TrieWalker`, `SoundFoldSearch`) into one ranked result.
//!
//! Grounded in the reference crate's `hybrid.rs`: a multi-stage dispatcher
//! (there: exact -> prefix -> fuzzy; here: external adapters -> doubled-word
//! collapse -> edit-tolerant walk -> phonetic walk) that runs its stages in
//! a fixed order and folds every stage's output into one merged, deduped,
//! sorted list rather than handing the caller several disjoint result sets.

use std::time::{Duration, Instant};

use crate::dictionary::{Dictionary, SimpleDictionary};
use crate::edit;
use crate::errors::{DiagnosticLog, SuggestError};
use crate::external::{self, BannedWords, ExprEval};
use crate::options::{self, Mode, SuggestOptions};
use crate::soundalike;
use crate::soundfold_search;
use crate::suggestion_set::SuggestionSet;
use crate::types::{rescore, BadWord, CapsFlags, Score, Suggestion, SCORE_ICASE, SCORE_MAXMAX, SCORE_REP};
use crate::walker;

/// Default walker deadline (§5): 5000 ms, overridable by `timeout:`.
const DEFAULT_DEADLINE_MS: u64 = 5000;

/// The result of one `suggest()` call: the ranked list plus whatever
/// degraded along the way (§7.1 - failure is absorbed, never propagated).
pub struct SuggestResult {
    pub suggestions: Vec<Suggestion>,
    pub diagnostics: DiagnosticLog,
}

/// Produce ranked corrections for `bad_word` against `dict`, configured by
/// the `'spellsuggest'` option string (§6) and an optional `expr:`
/// collaborator (§6's expression adapter; pass `&NullExprEval` if the host
/// has none wired up).
///
/// Takes a concrete `SimpleDictionary` rather than `&dyn Dictionary`
/// because `SoundFoldSearch` needs `spelling_at_ordinal` (§4.4), which is
/// specific to the in-memory fixture builder (§6.1).
pub fn suggest(
    dict: &SimpleDictionary,
    bad_word: &str,
    spellsuggest_spec: &str,
    expr_eval: &dyn ExprEval,
) -> SuggestResult {
    let mut log = DiagnosticLog::new();

    if bad_word.is_empty() || bad_word.contains('\n') {
        log.push(SuggestError::InputInvalid {
            reason: if bad_word.is_empty() {
                "empty bad word"
            } else {
                "bad word spans more than one line"
            },
        });
        return SuggestResult {
            suggestions: Vec::new(),
            diagnostics: log,
        };
    }

    let (opts, parse_err) = options::parse_or_default(spellsuggest_spec);
    if let Some(err) = parse_err {
        log.push(err);
    }

    let bad = build_bad_word(dict, bad_word, &opts);
    let deadline = resolve_deadline(&opts);

    let mut banned = BannedWords::new();
    banned.ban(&bad.folded);

    let mut set = SuggestionSet::new(bad.max_suggestions);

    // Step 2 (§4.6): a lowercase word the checker accepts as correct still
    // gets its capitalized variant offered, for the sentence-initial case.
    if bad.caps == CapsFlags::None && word_is_correct(dict, &bad.folded) {
        let variant = dict.make_case_word(&bad.folded, CapsFlags::OneCap);
        if variant != bad.original {
            set.insert(Suggestion::new(variant, bad.char_len(), SCORE_ICASE, 0));
        }
    }

    for s in suggest_try_special(&bad) {
        set.insert(s);
    }

    if let Some(expr) = &opts.expr {
        for s in external::expr_suggestions(expr_eval, expr, &bad) {
            set.insert(s);
        }
    }
    if let Some(path) = &opts.file {
        match external::file_suggestions(dict, path, &bad) {
            Ok(found) => {
                for s in found {
                    set.insert(s);
                }
            }
            Err(err) => log.push(err),
        }
    }

    for s in suggest_internal(dict, &bad, opts.mode, deadline, &mut log) {
        set.insert(s);
    }

    set.retain_not_banned(banned.as_set());
    let mut suggestions = set.finish();

    contracts_check(&bad, &suggestions, banned.as_set());
    suggestions.truncate(bad.max_suggestions);

    SuggestResult { suggestions, diagnostics: log }
}

/// Build the per-request bad-word context (§4.6 step 1): case-fold,
/// classify caps, sound-fold in the dictionary's default language.
fn build_bad_word(dict: &SimpleDictionary, bad_word: &str, opts: &SuggestOptions) -> BadWord {
    let folded = dict.casefold(bad_word);
    let caps = dict.captype(bad_word);
    let sound_folded = dict.sound_fold(&folded);
    BadWord {
        original: bad_word.to_string(),
        folded,
        caps,
        sound_folded,
        max_suggestions: opts.max_count,
        word_score_ceiling: SCORE_MAXMAX,
        soundfold_score_ceiling: SCORE_MAXMAX,
    }
}

/// `timeout:<ms>` sets the deadline; `timeout:-<ms>` means "no deadline"
/// (§9's decision on the negative form); absent, fall back to the
/// request-wide default (§5).
fn resolve_deadline(opts: &SuggestOptions) -> Option<Instant> {
    match opts.timeout_ms {
        Some(ms) if ms < 0 => None,
        Some(ms) => Some(Instant::now() + Duration::from_millis(ms as u64)),
        None => Some(Instant::now() + Duration::from_millis(DEFAULT_DEADLINE_MS)),
    }
}

/// True if `folded` names a dictionary entry that is neither banned nor
/// marked nosuggest - the minimal "checker" primitive the Orchestrator
/// needs for step 2, without pulling in a full spell-check API that's out
/// of scope for this crate.
fn word_is_correct(dict: &SimpleDictionary, folded: &str) -> bool {
    let trie = dict.fold_trie();
    match trie.find_exact(folded) {
        Some(node) => trie.terminals(node).any(|f| !f.banned() && !f.nosuggest()),
        None => false,
    }
}

/// `suggest_try_special` (§4.6 step 5): cheap, pattern-matched corrections
/// that don't need a trie walk at all. Currently just the doubled-word
/// collapse ("the the" -> "the").
fn suggest_try_special(bad: &BadWord) -> Vec<Suggestion> {
    let mut words = bad.folded.split_whitespace();
    let (Some(first), Some(second), None) = (words.next(), words.next(), words.next()) else {
        return Vec::new();
    };
    if first != second {
        return Vec::new();
    }
    vec![Suggestion::new(first.to_string(), bad.char_len(), rescore(SCORE_REP, 0), 0)]
}

/// The internal method (§4.6 step 5/6): `TrieWalker`, optionally
/// `SoundFoldSearch`, merged and rescored per the active `Mode`.
fn suggest_internal(
    dict: &SimpleDictionary,
    bad: &BadWord,
    mode: Mode,
    deadline: Option<Instant>,
    log: &mut DiagnosticLog,
) -> Vec<Suggestion> {
    let no_interrupt = || false;
    let edit_outcome = walker::search(dict, bad, bad.word_score_ceiling, deadline, &no_interrupt, 0);
    if !edit_outcome.completed {
        log.push(SuggestError::Deadline);
    }
    let mut edit_sugs = edit_outcome.suggestions;

    match mode {
        Mode::Fast => edit_sugs,
        Mode::Best => {
            let sound_sugs = soundfold_search::search(dict, bad, edit_sugs.len().max(1), deadline, log);
            let mut combined = edit_sugs;
            combined.extend(sound_sugs);
            for s in &mut combined {
                rescore_with_phonetic(dict, bad, s);
            }
            combined
        }
        Mode::Double => {
            let mut sound_sugs = soundfold_search::search(dict, bad, edit_sugs.len().max(1), deadline, log);
            for s in &mut edit_sugs {
                rescore_with_phonetic(dict, bad, s);
            }
            for s in &mut sound_sugs {
                rescore_with_edit_distance(dict, bad, s);
            }
            edit_sugs.extend(sound_sugs);
            edit_sugs
        }
    }
}

/// Blend a suggestion's primary score with its phonetic distance from the
/// bad word (§4.2, §4.6 step 5's "rescore with SoundAlikeScorer").
fn rescore_with_phonetic(dict: &SimpleDictionary, bad: &BadWord, s: &mut Suggestion) {
    let (Some(bad_sf), Some(good_sf)) = (&bad.sound_folded, dict.sound_fold(&s.word)) else {
        return;
    };
    let phon = soundalike::score(&good_sf, bad_sf);
    if phon >= SCORE_MAXMAX {
        return;
    }
    s.score = Score(rescore(s.score.0, phon));
    s.altscore = Score(phon);
    s.altscore_computed = true;
}

/// Blend a phonetic-origin suggestion's score with its raw edit distance
/// from the bad word (§4.6 step 6: `double` mode rescores each list with
/// the other metric before merging).
fn rescore_with_edit_distance(dict: &SimpleDictionary, bad: &BadWord, s: &mut Suggestion) {
    let dist = edit::bounded(&bad.folded, &s.word, bad.word_score_ceiling, dict.map_table());
    if dist >= SCORE_MAXMAX {
        return;
    }
    s.score = Score(rescore(s.score.0, dist));
    s.altscore = Score(dist);
    s.altscore_computed = true;
}

fn contracts_check(bad: &BadWord, suggestions: &[Suggestion], banned: &std::collections::HashSet<String>) {
    crate::contracts::check_no_duplicate_identity(suggestions);
    crate::contracts::check_sorted(suggestions);
    crate::contracts::check_no_banned_words(suggestions, banned);
    for s in suggestions {
        crate::contracts::check_score_bound(bad, s, s.score.0);
    }
}
