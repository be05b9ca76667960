// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! End-to-end scenarios for `suggest()` against small fixture dictionaries,
//! mirroring the reference crate's top-level `tests/integration.rs` habit
//! of exercising the public API rather than internals.

use spellsuggest::dictionary::{DictionaryBuilder, SimpleDictionary, WordFlags};
use spellsuggest::external::NullExprEval;
use spellsuggest::orchestrator::suggest;

fn sample_dictionary() -> SimpleDictionary {
    DictionaryBuilder::new()
        .word("hello", WordFlags::default())
        .word("accommodate", WordFlags::default())
        .word("the", WordFlags::default())
        .word("Monday", WordFlags { keep_case: true, ..WordFlags::default() })
        .word("wordpress", WordFlags { banned: true, ..WordFlags::default() })
        .rep("ph", "f")
        .build()
}

#[test]
fn hello_helo_finds_correction() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "helo", "", &NullExprEval);
    assert!(result.suggestions.iter().any(|s| s.word == "hello"));
}

#[test]
fn accommodate_acommodate_finds_correction() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "acommodate", "", &NullExprEval);
    assert!(result.suggestions.iter().any(|s| s.word == "accommodate"));
}

#[test]
fn transposition_scores_swap_not_two_substitutions() {
    let dict = DictionaryBuilder::new().word("the", WordFlags::default()).build();
    let result = suggest(&dict, "hte", "", &NullExprEval);
    let hit = result.suggestions.iter().find(|s| s.word == "the").expect("the must be suggested");
    assert_eq!(hit.score.0, spellsuggest::types::SCORE_SWAP);
}

#[test]
fn monday_keepcap_entry_is_offered_with_correct_case() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "monday", "", &NullExprEval);
    // "monday" is lowercase and folds to a dictionary hit, so the
    // capitalized variant should appear among the suggestions.
    assert!(result.suggestions.iter().any(|s| s.word == "Monday"));
}

#[test]
fn keepcap_and_banned_homographs_only_offer_the_keepcap_spelling() {
    // {"Monday", "monday"}: "Monday" is KEEPCAP, "monday" is banned. Both
    // fold to the same trie node as two distinct terminal variants. Typing
    // the lowercase form must surface only the KEEPCAP spelling, never the
    // banned homograph.
    let dict = DictionaryBuilder::new()
        .word("Monday", WordFlags { keep_case: true, ..WordFlags::default() })
        .word("monday", WordFlags { banned: true, ..WordFlags::default() })
        .build();
    let result = suggest(&dict, "monday", "", &NullExprEval);
    assert!(result.suggestions.iter().any(|s| s.word == "Monday"));
    assert!(!result.suggestions.iter().any(|s| s.word == "monday"));
}

#[test]
fn compound_word_is_suggested_from_two_dictionary_pieces() {
    let dict = DictionaryBuilder::new()
        .word("micro", WordFlags { compound_flag: b'A', ..WordFlags::default() })
        .word("chip", WordFlags { compound_flag: b'A', ..WordFlags::default() })
        .compound(spellsuggest::dictionary::CompoundSettings {
            start_flags: vec![b'A'],
            all_flags: vec![b'A'],
            min_length: 3,
            ..spellsuggest::dictionary::CompoundSettings::default()
        })
        .build();
    let result = suggest(&dict, "microchip", "", &NullExprEval);
    assert!(result.suggestions.iter().any(|s| s.word == "microchip"));
}

#[test]
fn prefix_restricted_to_matching_stem_is_suggested() {
    let dict = DictionaryBuilder::new()
        .prefix("un", WordFlags { prefix_id: 3, ..WordFlags::default() })
        .word("happy", WordFlags { prefix_id: 3, ..WordFlags::default() })
        .build();
    let result = suggest(&dict, "unhapy", "", &NullExprEval);
    assert!(result.suggestions.iter().any(|s| s.word == "unhappy"));
}

#[test]
fn banned_word_never_appears_even_when_closest_match() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "wordpres", "", &NullExprEval);
    assert!(!result.suggestions.iter().any(|s| s.word == "wordpress"));
}

#[test]
fn empty_bad_word_yields_no_suggestions() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "", "", &NullExprEval);
    assert!(result.suggestions.is_empty());
    assert!(!result.diagnostics.is_empty());
}

#[test]
fn fast_mode_still_finds_close_matches_without_soundfold() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "helo", "fast,5", &NullExprEval);
    assert!(result.suggestions.iter().any(|s| s.word == "hello"));
    assert!(result.suggestions.len() <= 5);
}

#[test]
fn doubled_word_collapses_to_single_word() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "the the", "", &NullExprEval);
    let hit = result.suggestions.iter().find(|s| s.word == "the").expect("the must be suggested");
    assert_eq!(hit.score.0, spellsuggest::types::rescore(spellsuggest::types::SCORE_REP, 0));
}

#[test]
fn max_count_option_caps_suggestion_list_length() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "helo", "2", &NullExprEval);
    assert!(result.suggestions.len() <= 2);
}

#[test]
fn output_is_sorted_by_score_then_word() {
    let dict = sample_dictionary();
    let result = suggest(&dict, "helo", "", &NullExprEval);
    for pair in result.suggestions.windows(2) {
        assert!(pair[0].sort_key() <= pair[1].sort_key());
    }
}
