// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `SoundFoldSearch` (§4.4): runs `TrieWalker` over the sound-fold trie and
//! expands each phonetic hit back into real dictionary spellings via the
//! sugbuf ordinal lists, grounded in the same posting-list-expansion idiom
//! as the reference crate's `fst_index.rs`/`inverted.rs`.

use std::collections::HashSet;
use std::time::Instant;

use crate::dictionary::{delta_decode, Dictionary, SimpleDictionary};
use crate::edit;
use crate::errors::{DiagnosticLog, SuggestError};
use crate::soundalike::rescore_with_soundalike;
use crate::trie::TerminalFlags;
use crate::types::{BadWord, CapsFlags, Suggestion, SCORE_ICASE, SCORE_MAXMAX, SCORE_REGION, SCORE_SFMAX1, SCORE_SFMAX2, SCORE_SFMAX3};
use crate::walker;

/// Run the sound-fold search stage for one request (§4.4).
///
/// Needs a concrete `SimpleDictionary` (rather than `&dyn Dictionary`)
/// because expansion reconstructs spellings by walking the fold-case trie
/// with `spelling_at_ordinal`, a capability specific to the in-memory
/// fixture builder (§6.1) rather than part of the narrow `Dictionary`
/// trait every collaborator must implement.
pub fn search(
    dict: &SimpleDictionary,
    bad: &BadWord,
    min_suggestions: usize,
    deadline: Option<Instant>,
    log: &mut DiagnosticLog,
) -> Vec<Suggestion> {
    let Some(sound_folded) = bad.sound_folded.as_deref() else {
        return Vec::new();
    };
    if dict.soundfold_trie().is_empty() {
        return Vec::new();
    }

    let phonetic_bad = BadWord {
        original: bad.original.clone(),
        folded: sound_folded.to_string(),
        caps: bad.caps,
        sound_folded: None,
        max_suggestions: bad.max_suggestions,
        word_score_ceiling: bad.word_score_ceiling,
        soundfold_score_ceiling: bad.soundfold_score_ceiling,
    };

    let mut done: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    // Three progressive ceiling tiers, stopping early once enough
    // candidates exist (§4.4).
    for ceiling in [SCORE_SFMAX1, SCORE_SFMAX2, SCORE_SFMAX3] {
        if out.len() >= min_suggestions {
            break;
        }
        let outcome = walker::search(dict, &phonetic_bad, ceiling, deadline, &|| false, 0);
        for phon_hit in &outcome.suggestions {
            if done.contains(&phon_hit.word) {
                continue;
            }
            done.insert(phon_hit.word.clone());
            expand(dict, bad, phon_hit, &mut out, log);
        }
        if !outcome.completed {
            break;
        }
    }

    out
}

/// Expand one phonetic hit to every original spelling sharing that sound,
/// scoring each against the real bad word (§4.4).
fn expand(
    dict: &SimpleDictionary,
    bad: &BadWord,
    phon_hit: &Suggestion,
    out: &mut Vec<Suggestion>,
    log: &mut DiagnosticLog,
) {
    let line_no = find_sugbuf_line(dict, &phon_hit.word);
    let Some(line_no) = line_no else {
        log.push(SuggestError::InternalInvariantViolation {
            detail: format!("soundfold_find failed to resolve phonetic {:?}", phon_hit.word),
        });
        return;
    };
    let Some(line) = dict.sugbuf_line(line_no) else {
        log.push(SuggestError::InternalInvariantViolation {
            detail: format!("sugbuf line {line_no} missing for phonetic {:?}", phon_hit.word),
        });
        return;
    };

    for ordinal in delta_decode(line) {
        let Some(spelling) = dict.spelling_at_ordinal(ordinal) else {
            log.push(SuggestError::InternalInvariantViolation {
                detail: format!("ordinal {ordinal} did not resolve to a spelling"),
            });
            continue;
        };
        let entry_flags = dict.fold_trie().find_exact(&spelling).and_then(|n| dict.fold_trie().terminals(n).next());
        let (emit_word, case_penalty) = case_adjusted_spelling(dict, bad, &spelling, entry_flags);
        let region_penalty = entry_flags.map_or(0, |f| if f.region_mask() != 0 { SCORE_REGION } else { 0 });

        let edit_score = edit::bounded(&bad.folded, &spelling, bad.soundfold_score_ceiling, dict.map_table());
        if edit_score >= SCORE_MAXMAX {
            continue;
        }
        // goodscore = region_penalty + case_penalty + EditScore(bad, candidate) (§4.4).
        let goodscore = region_penalty + case_penalty + edit_score;
        let combined = rescore_with_soundalike(goodscore, phon_hit.score.0);
        let mut suggestion = Suggestion::new(emit_word, bad.char_len(), combined, phon_hit.language);
        suggestion.from_soundalike = true;
        out.push(suggestion);
    }
}

/// Apply the bad word's caps pattern to a phonetic candidate, mirroring the
/// trie walker's own terminal-case handling (§4.3.3 step 3): a KEEPCAP entry
/// always surfaces its exact spelling, everything else is re-cased to match
/// the input and charged `SCORE_ICASE` for the guess.
fn case_adjusted_spelling(
    dict: &SimpleDictionary,
    bad: &BadWord,
    spelling: &str,
    entry_flags: Option<TerminalFlags>,
) -> (String, i32) {
    if entry_flags.is_some_and(|f| f.keep_case()) {
        match dict.keep_case_spelling(spelling) {
            Some(exact) => (exact.to_string(), 0),
            None => (spelling.to_string(), SCORE_ICASE),
        }
    } else if bad.caps == CapsFlags::None {
        (spelling.to_string(), 0)
    } else {
        (dict.make_case_word(spelling, bad.caps), SCORE_ICASE)
    }
}

/// `soundfold_find(phonetic) -> ordinal` (§4.4): locate the sugbuf line
/// index for a phonetic spelling by walking the sound-fold trie exactly
/// (no edit tolerance - the phonetic string was already produced by the
/// walk, so it's known to be a literal path).
fn find_sugbuf_line(dict: &SimpleDictionary, phonetic: &str) -> Option<usize> {
    let trie = dict.soundfold_trie();
    let node = trie.find_exact(phonetic)?;
    trie.terminals(node).next().map(|f| f.0 as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{DictionaryBuilder, WordFlags};
    use crate::types::CapsFlags;

    fn naive_sound_fold(word: &str) -> String {
        // Collapse vowels to a single marker and drop doubled consonants -
        // enough of a toy SAL rule to exercise expansion without needing a
        // real phonetic algorithm.
        let mut out = String::new();
        let mut last = '\0';
        for c in word.chars() {
            let mapped = if "aeiou".contains(c) { '*' } else { c };
            if mapped != last {
                out.push(mapped);
            }
            last = mapped;
        }
        out
    }

    #[test]
    fn expands_phonetic_hit_to_original_spelling() {
        let dict = DictionaryBuilder::new()
            .word("night", WordFlags::default())
            .word("nite", WordFlags::default())
            .sound_fold_fn(naive_sound_fold)
            .build();
        let bad = BadWord {
            original: "nite".to_string(),
            folded: "nite".to_string(),
            caps: CapsFlags::None,
            sound_folded: Some(naive_sound_fold("nite")),
            max_suggestions: 20,
            word_score_ceiling: crate::types::SCORE_MAXMAX,
            soundfold_score_ceiling: crate::types::SCORE_MAXMAX,
        };
        let mut log = DiagnosticLog::new();
        let results = search(&dict, &bad, 5, None, &mut log);
        assert!(results.iter().any(|s| s.word == "night" || s.word == "nite"));
    }

    #[test]
    fn no_sound_fold_table_yields_empty_results() {
        let dict = DictionaryBuilder::new().word("night", WordFlags::default()).build();
        let bad = BadWord {
            original: "nite".to_string(),
            folded: "nite".to_string(),
            caps: CapsFlags::None,
            sound_folded: Some("nt".to_string()),
            max_suggestions: 20,
            word_score_ceiling: crate::types::SCORE_MAXMAX,
            soundfold_score_ceiling: crate::types::SCORE_MAXMAX,
        };
        let mut log = DiagnosticLog::new();
        let results = search(&dict, &bad, 5, None, &mut log);
        assert!(results.is_empty());
    }
}
