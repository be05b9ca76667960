// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a suggestion request.
//!
//! `BadWord` holds everything the walker needs about the misspelling itself;
//! `Suggestion` is one candidate correction; the newtypes at the top give
//! trie node indices and scores their own types so a caller can't pass a
//! byte offset where a node index is expected. Same trick as `DocId` /
//! `CharOffset` in the reference crate's `types.rs` - the wrapper costs
//! nothing at runtime and catches a whole category of index-confusion bugs
//! at compile time.

use std::cmp::Ordering;

// =============================================================================
// SCORE CONSTANTS
// =============================================================================
// Every weight below is load-bearing: tests in `tests/` and `edit.rs` pin
// exact suggestions to exact scores (e.g. a duplicated-character insert must
// cost SCORE_INSDUP, never SCORE_INS). Changing one of these is a behavior
// change, not a tuning knob.

pub const SCORE_INS: i32 = 96;
pub const SCORE_DEL: i32 = 94;
pub const SCORE_SUBST: i32 = 93;
pub const SCORE_ICASE: i32 = 52;
pub const SCORE_SIMILAR: i32 = 33;
pub const SCORE_SWAP: i32 = 75;
pub const SCORE_SWAP3: i32 = 110;
pub const SCORE_REP: i32 = 65;
pub const SCORE_DELDUP: i32 = 66;
pub const SCORE_DELCOMP: i32 = 28;
pub const SCORE_INSDUP: i32 = 67;
pub const SCORE_INSCOMP: i32 = 30;
pub const SCORE_REGION: i32 = 200;
pub const SCORE_RARE: i32 = 180;
pub const SCORE_SPLIT: i32 = 149;
pub const SCORE_SPLIT_NO: i32 = 249;
pub const SCORE_FILE: i32 = 30;
pub const SCORE_COMMON1: i32 = 30;
pub const SCORE_COMMON2: i32 = 40;
pub const SCORE_COMMON3: i32 = 50;
pub const SCORE_MAXMAX: i32 = 999_999;
pub const SCORE_MAXINIT: i32 = SCORE_MAXMAX;
pub const SCORE_EDIT_MIN: i32 = SCORE_SIMILAR;

pub const SCORE_SFMAX1: i32 = 200;
pub const SCORE_SFMAX2: i32 = 300;
pub const SCORE_SFMAX3: i32 = 400;
pub const SCORE_LIMITMAX: i32 = SCORE_SFMAX3;

/// Max candidate word length the fixed-size search stack can hold.
///
/// Every `walker::Frame` array is `[Frame; MAX_WLEN]`; exceeding this in a
/// candidate construction is a bug, not a user-facing limit worth raising -
/// see `contracts::check_depth_in_bounds`.
pub const MAX_WLEN: usize = 176;

/// Soft/hard suggestion-set caps (§4.5).
pub const SUG_CLEAN_COUNT: usize = 50;

pub fn sug_max_count(maxcount: usize) -> usize {
    maxcount.max(150) + 50
}

/// `RESCORE(w, s) = (3w + s) / 4` - blend a primary score with a secondary
/// one (sound-alike rescoring, phonetic/edit-distance merge in `double`
/// mode), weighted 3:1 toward the primary.
pub fn rescore(primary: i32, secondary: i32) -> i32 {
    (3 * primary + secondary) / 4
}

// =============================================================================
// NEWTYPES
// =============================================================================

/// Index of a node within a packed trie's `bytes`/`idxs` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    pub const ROOT: NodeIdx = NodeIdx(0);

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeIdx {
    fn from(v: u32) -> Self {
        NodeIdx(v)
    }
}

/// A score in the "lower is better" domain used throughout this crate.
///
/// Plain `i32` would work just as well, but giving it a name stops a score
/// from being added to a byte offset by accident - the same motivation as
/// `CharOffset` in the reference crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const MAX: Score = Score(SCORE_MAXMAX);

    #[inline]
    pub fn saturating_add(self, cost: i32) -> Score {
        Score(self.0.saturating_add(cost))
    }
}

impl From<i32> for Score {
    fn from(v: i32) -> Self {
        Score(v)
    }
}

// =============================================================================
// CAPS FLAGS
// =============================================================================

/// Capitalization pattern of the original (not case-folded) bad word.
///
/// Computed once from the raw bytes via the opaque `captype()` collaborator
/// (§6), then threaded through prefix/split transitions in the walker,
/// which snapshot and restore it per §9's "caps-flag snapshot" discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapsFlags {
    /// All lowercase, or no alphabetic characters.
    None,
    /// First letter capitalized, rest lowercase: "Monday".
    OneCap,
    /// Every letter capitalized: "MONDAY".
    AllCap,
    /// Must match with exact original case via the keep-case trie: proper
    /// nouns, acronyms with embedded lowercase, etc.
    KeepCap,
    /// Irregular capitalization not covered by the above: "MacDonald".
    MixCap,
}

impl CapsFlags {
    pub fn is_upper_leaning(self) -> bool {
        matches!(self, CapsFlags::OneCap | CapsFlags::AllCap | CapsFlags::MixCap)
    }
}

// =============================================================================
// BAD WORD CONTEXT
// =============================================================================

/// Everything the walker and orchestrator need to know about the
/// misspelling for the duration of one request.
#[derive(Debug, Clone)]
pub struct BadWord {
    /// Original text, exactly as the caller supplied it.
    pub original: String,
    /// Case-folded copy - this is what the trie walk actually matches
    /// against (`fword` in §3/§9).
    pub folded: String,
    pub caps: CapsFlags,
    /// Sound-folded form in the default sound-fold language, if the
    /// dictionary provides one.
    pub sound_folded: Option<String>,
    /// Suggestion maximum count (from the bare-integer option, default
    /// 9999).
    pub max_suggestions: usize,
    /// Word-score ceiling; tightens as `SuggestionSet` fills (§4.5).
    pub word_score_ceiling: i32,
    /// Sound-fold-score ceiling (§4.4's SFMAX tiers start under this).
    pub soundfold_score_ceiling: i32,
}

impl BadWord {
    /// Character length of the case-folded word. The walker never lets
    /// `fidx` exceed this.
    pub fn char_len(&self) -> usize {
        self.folded.chars().count()
    }
}

// =============================================================================
// SUGGESTION RECORD
// =============================================================================

/// One candidate correction.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub word: String,
    /// Length (in bytes of the *original* bad-word text) this suggestion
    /// replaces. Two suggestions with the same spelling but different
    /// `orglen` are distinct entries (§3, §9 - "do not collapse them").
    pub orglen: usize,
    pub score: Score,
    pub altscore: Score,
    pub altscore_computed: bool,
    /// Index of the dictionary/language that produced this suggestion.
    pub language: usize,
    /// True if this candidate was discovered via `SoundFoldSearch` rather
    /// than the primary edit-tolerant trie walk.
    pub from_soundalike: bool,
}

impl Suggestion {
    pub fn new(word: impl Into<String>, orglen: usize, score: i32, language: usize) -> Self {
        Suggestion {
            word: word.into(),
            orglen,
            score: Score(score),
            altscore: Score(score),
            altscore_computed: false,
            language,
            from_soundalike: false,
        }
    }

    /// Identity used for dedup (§3: "deduplication uses `(word, orglen)`").
    pub fn identity(&self) -> (&str, usize) {
        (&self.word, self.orglen)
    }

    /// `(score, altscore, case-insensitive word)` ordering key (§4.5).
    pub fn sort_key(&self) -> (Score, Score, String) {
        (self.score, self.altscore, self.word.to_lowercase())
    }
}

/// Total order used for final cleanup (§4.5.3). A free function rather than
/// `impl Ord for Suggestion` because the case-insensitive word key involves
/// an allocation we don't want paid on every `Suggestion::eq` call a derived
/// `Ord` would otherwise invite.
pub fn compare_suggestions(a: &Suggestion, b: &Suggestion) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}
