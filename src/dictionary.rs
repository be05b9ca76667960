// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The `Dictionary` interface (§6) and a fixture compiler for it.
//!
//! The spec treats a dictionary as opaque: the walker never parses an affix
//! file, it only calls a handful of narrow accessors. `DictionaryBuilder`
//! is the minimal in-memory compiler needed to produce a valid `Dictionary`
//! for tests, benches, and the CLI demo - it has no file-format knowledge,
//! the same way the reference crate's test suite builds small `SearchIndex`
//! values directly rather than round-tripping through `binary/postings.rs`.

use std::collections::HashMap;

use crate::trie::{Trie, TrieBuilder, TerminalFlags};
use crate::types::CapsFlags;

// =============================================================================
// SUPPORTING TABLES
// =============================================================================

/// `from -> to` substitution pairs (REP or REPSAL), sorted by `from` with a
/// 256-entry first-byte index so the walker can narrow to candidate rules in
/// O(1) before doing any string comparison.
#[derive(Debug, Clone)]
pub struct ReplacementTable {
    entries: Vec<(String, String)>,
    index: [Option<(u32, u32)>; 256],
}

impl Default for ReplacementTable {
    fn default() -> Self {
        ReplacementTable { entries: Vec::new(), index: [None; 256] }
    }
}

impl ReplacementTable {
    pub fn build(mut pairs: Vec<(String, String)>) -> Self {
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let mut index = [None; 256];
        let mut i = 0;
        while i < pairs.len() {
            let byte = pairs[i].0.as_bytes().first().copied().unwrap_or(0) as usize;
            let start = i;
            while i < pairs.len()
                && pairs[i].0.as_bytes().first().copied().unwrap_or(0) as usize == byte
            {
                i += 1;
            }
            index[byte] = Some((start as u32, i as u32));
        }
        ReplacementTable { entries: pairs, index }
    }

    /// Rules whose `from` starts with `byte`, in sorted order.
    pub fn rules_for(&self, byte: u8) -> &[(String, String)] {
        match self.index[byte as usize] {
            Some((s, e)) => &self.entries[s as usize..e as usize],
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// MAP equivalence classes: characters that substitute for each other at
/// `SCORE_SIMILAR` instead of `SCORE_SUBST` (§4.1). ASCII characters are
/// looked up via the byte array; anything else falls through to the hash
/// map.
#[derive(Debug, Clone)]
pub struct MapTable {
    ascii_group: [u8; 128],
    wide_group: HashMap<char, u8>,
}

impl Default for MapTable {
    fn default() -> Self {
        MapTable { ascii_group: [0u8; 128], wide_group: HashMap::new() }
    }
}

impl MapTable {
    pub fn build(classes: &[Vec<char>]) -> Self {
        let mut ascii_group = [0u8; 128];
        let mut wide_group = HashMap::new();
        for (i, class) in classes.iter().enumerate() {
            // group id 0 means "no group"; real groups start at 1.
            let id = (i + 1) as u8;
            for &ch in class {
                if ch.is_ascii() {
                    ascii_group[ch as usize] = id;
                } else {
                    wide_group.insert(ch, id);
                }
            }
        }
        MapTable { ascii_group, wide_group }
    }

    pub fn group_of(&self, ch: char) -> Option<u8> {
        let id = if ch.is_ascii() {
            self.ascii_group[ch as usize]
        } else {
            *self.wide_group.get(&ch).unwrap_or(&0)
        };
        if id == 0 {
            None
        } else {
            Some(id)
        }
    }

    /// Two characters are MAP-similar if they're in the same nonzero group.
    pub fn similar(&self, a: char, b: char) -> bool {
        matches!((self.group_of(a), self.group_of(b)), (Some(x), Some(y)) if x == y)
    }
}

/// Compound-word rules and constraints (§3, §4.3.3).
pub struct CompoundSettings {
    pub min_length: usize,
    pub min_syllables: usize,
    pub max_pieces: usize,
    pub start_flags: Vec<u8>,
    pub all_flags: Vec<u8>,
    pub no_break: bool,
    pub no_split_sugs: bool,
    pub no_compound_sugs: bool,
    /// `match_compoundrule(accumulated flag string) -> bool`. `None` means
    /// no rules are defined, which the spec treats as "accept" (§4.3.3.6).
    pub rule_matcher: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
    /// `CHECKCOMPOUNDPATTERN`: veto a specific (left, right) join.
    pub pattern_veto: Option<Box<dyn Fn(&str, &str) -> bool + Send + Sync>>,
}

impl Default for CompoundSettings {
    fn default() -> Self {
        CompoundSettings {
            min_length: 3,
            min_syllables: 0,
            max_pieces: 2,
            start_flags: Vec::new(),
            all_flags: Vec::new(),
            no_break: false,
            no_split_sugs: false,
            no_compound_sugs: false,
            rule_matcher: None,
            pattern_veto: None,
        }
    }
}

impl CompoundSettings {
    pub fn allows_compounding(&self) -> bool {
        !self.start_flags.is_empty() || !self.all_flags.is_empty()
    }

    pub fn rule_accepts(&self, accumulated_flags: &str) -> bool {
        match &self.rule_matcher {
            Some(f) => f(accumulated_flags),
            None => true,
        }
    }

    pub fn pattern_vetoes(&self, left: &str, right: &str) -> bool {
        match &self.pattern_veto {
            Some(f) => f(left, right),
            None => false,
        }
    }
}

impl std::fmt::Debug for CompoundSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundSettings")
            .field("min_length", &self.min_length)
            .field("min_syllables", &self.min_syllables)
            .field("max_pieces", &self.max_pieces)
            .field("start_flags", &self.start_flags)
            .field("all_flags", &self.all_flags)
            .field("no_break", &self.no_break)
            .field("no_split_sugs", &self.no_split_sugs)
            .field("no_compound_sugs", &self.no_compound_sugs)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// DICTIONARY TRAIT
// =============================================================================

/// Narrow, read-only interface the core consumes (§6). Everything here is
/// shared across an entire request (and usually across many requests); the
/// walker never mutates a `Dictionary`.
pub trait Dictionary {
    fn fold_trie(&self) -> &Trie;
    fn keep_trie(&self) -> &Trie;
    fn prefix_trie(&self) -> &Trie;
    fn soundfold_trie(&self) -> &Trie;
    fn compound(&self) -> &CompoundSettings;
    fn rep(&self) -> &ReplacementTable;
    fn repsal(&self) -> &ReplacementTable;
    fn map_table(&self) -> &MapTable;

    /// Sound-fold `word` in this dictionary's language, if it has SAL rules.
    fn sound_fold(&self, word: &str) -> Option<String>;

    /// Line `n` of the sugbuf (§3, §4.4): delta-encoded original-word
    /// ordinals sharing one phonetic spelling, as a raw text line.
    fn sugbuf_line(&self, n: usize) -> Option<&str>;

    /// Nonnegative observed frequency for `word`, if tracked (§3).
    fn word_count(&self, word: &str) -> Option<u32>;

    /// Exact-case spelling for a KEEPCAP entry whose fold-case spelling is
    /// `folded` (§3, §4.3.3.3): a KEEPCAP terminal found during the
    /// fold-case walk must surface this casing, never the all-lowercase
    /// walk path that found it. Default `None`: a dictionary without this
    /// capability falls back to charging `SCORE_ICASE` and emitting the
    /// lowercase spelling as-is.
    fn keep_case_spelling(&self, folded: &str) -> Option<&str> {
        let _ = folded;
        None
    }

    /// Case-fold `word` for primary trie lookup. Default: Unicode lowercase,
    /// which is adequate for the fixture dictionaries this crate ships;
    /// a real-world collaborator would apply locale-aware folding here.
    fn casefold(&self, word: &str) -> String {
        word.to_lowercase()
    }

    /// Re-apply a caps pattern to a folded word (the inverse of `captype`).
    fn make_case_word(&self, folded: &str, caps: CapsFlags) -> String {
        match caps {
            CapsFlags::None | CapsFlags::KeepCap | CapsFlags::MixCap => folded.to_string(),
            CapsFlags::OneCap => {
                let mut chars = folded.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
            CapsFlags::AllCap => folded.to_uppercase(),
        }
    }

    /// Classify the capitalization pattern of `word` (§3, §6). Never
    /// returns `KeepCap`: that flag marks a *dictionary entry's* required
    /// case, not a pattern derived from arbitrary text.
    fn captype(&self, word: &str) -> CapsFlags {
        captype_of(word)
    }
}

/// Free function so `contracts`/tests can classify text without a
/// `Dictionary` in hand.
pub fn captype_of(word: &str) -> CapsFlags {
    let mut chars = word.chars().filter(|c| c.is_alphabetic());
    let first = match chars.next() {
        Some(c) => c,
        None => return CapsFlags::None,
    };
    let rest: Vec<char> = chars.collect();
    if rest.is_empty() {
        return if first.is_uppercase() {
            CapsFlags::OneCap
        } else {
            CapsFlags::None
        };
    }
    let first_upper = first.is_uppercase();
    let rest_upper: Vec<bool> = rest.iter().map(|c| c.is_uppercase()).collect();
    let all_rest_upper = rest_upper.iter().all(|&u| u);
    let all_rest_lower = rest_upper.iter().all(|&u| !u);

    if !first_upper && all_rest_lower {
        CapsFlags::None
    } else if first_upper && all_rest_lower {
        CapsFlags::OneCap
    } else if first_upper && all_rest_upper {
        CapsFlags::AllCap
    } else if !first_upper && all_rest_upper && rest.len() > 0 {
        CapsFlags::AllCap
    } else {
        CapsFlags::MixCap
    }
}

// =============================================================================
// FIXTURE BUILDER
// =============================================================================

/// Per-word metadata supplied to `DictionaryBuilder::word` (§3's terminal
/// flag word, unpacked).
#[derive(Debug, Clone, Copy, Default)]
pub struct WordFlags {
    pub rare: bool,
    pub keep_case: bool,
    pub needcompound: bool,
    pub banned: bool,
    pub nosuggest: bool,
    pub region_mask: u8,
    pub prefix_id: u8,
    pub compound_flag: u8,
}

impl WordFlags {
    fn pack(self) -> TerminalFlags {
        TerminalFlags::build()
            .rare(self.rare)
            .keep_case(self.keep_case)
            .needcompound(self.needcompound)
            .banned(self.banned)
            .nosuggest(self.nosuggest)
            .region_mask(self.region_mask)
            .prefix_id(self.prefix_id)
            .compound_flag(self.compound_flag)
            .finish()
    }
}

/// In-memory trie-under-construction: a BTreeMap keeps children in byte
/// order for free, and NUL terminators are a property of the node (a list
/// of flag variants) rather than a synthetic child until serialization,
/// which is when they become NUL-byte entries per the packed layout.
#[derive(Default)]
struct BuildNode {
    children: std::collections::BTreeMap<u8, BuildNode>,
    terminals: Vec<TerminalFlags>,
}

impl BuildNode {
    fn insert(&mut self, bytes: &[u8], flags: TerminalFlags) {
        match bytes.split_first() {
            None => self.terminals.push(flags),
            Some((&b, rest)) => self.children.entry(b).or_default().insert(rest, flags),
        }
    }

    fn serialize(&self, tb: &mut TrieBuilder) -> crate::types::NodeIdx {
        let mut pairs: Vec<(u8, u32)> = Vec::with_capacity(self.terminals.len() + self.children.len());
        for t in &self.terminals {
            pairs.push((0, t.0));
        }
        for (&b, child) in &self.children {
            let idx = child.serialize(tb);
            pairs.push((b, idx.0));
        }
        tb.push_node(&pairs)
    }
}

fn build_trie(entries: &[(String, TerminalFlags)]) -> Trie {
    let mut root = BuildNode::default();
    for (word, flags) in entries {
        root.insert(word.as_bytes(), *flags);
    }
    let mut tb = TrieBuilder::new();
    root.serialize(&mut tb);
    tb.finish()
}

/// Compiles `(word, flags)` entries plus affix-derived tables into a
/// ready-to-use `Dictionary` (§6.1). Not an affix-file parser: callers
/// supply already-decided REP/MAP/compound data.
#[derive(Default)]
pub struct DictionaryBuilder {
    words: Vec<(String, WordFlags)>,
    prefixes: Vec<(String, WordFlags)>,
    rep: Vec<(String, String)>,
    repsal: Vec<(String, String)>,
    map_classes: Vec<Vec<char>>,
    compound: CompoundSettings,
    sound_fold_fn: Option<Box<dyn Fn(&str) -> String + Send + Sync>>,
    word_counts: HashMap<String, u32>,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(mut self, spelling: &str, flags: WordFlags) -> Self {
        self.words.push((spelling.to_string(), flags));
        self
    }

    pub fn prefix(mut self, text: &str, flags: WordFlags) -> Self {
        self.prefixes.push((text.to_string(), flags));
        self
    }

    pub fn rep(mut self, from: &str, to: &str) -> Self {
        self.rep.push((from.to_string(), to.to_string()));
        self
    }

    pub fn repsal(mut self, from: &str, to: &str) -> Self {
        self.repsal.push((from.to_string(), to.to_string()));
        self
    }

    pub fn map_class(mut self, chars: &[char]) -> Self {
        self.map_classes.push(chars.to_vec());
        self
    }

    pub fn compound(mut self, settings: CompoundSettings) -> Self {
        self.compound = settings;
        self
    }

    pub fn sound_fold_fn(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.sound_fold_fn = Some(Box::new(f));
        self
    }

    pub fn word_count(mut self, word: &str, count: u32) -> Self {
        self.word_counts.insert(word.to_string(), count);
        self
    }

    pub fn build(self) -> SimpleDictionary {
        let fold_entries: Vec<(String, TerminalFlags)> = self
            .words
            .iter()
            .map(|(w, f)| (w.to_lowercase(), f.pack()))
            .collect();
        let fold_trie = build_trie(&fold_entries);

        let keep_entries: Vec<(String, TerminalFlags)> = self
            .words
            .iter()
            .filter(|(_, f)| f.keep_case)
            .map(|(w, f)| (w.clone(), f.pack()))
            .collect();
        let keep_trie = build_trie(&keep_entries);
        let keep_case_spellings: HashMap<String, String> = self
            .words
            .iter()
            .filter(|(_, f)| f.keep_case)
            .map(|(w, _)| (w.to_lowercase(), w.clone()))
            .collect();

        let prefix_entries: Vec<(String, TerminalFlags)> = self
            .prefixes
            .iter()
            .map(|(w, f)| (w.to_lowercase(), f.pack()))
            .collect();
        let prefix_trie = build_trie(&prefix_entries);

        // Sound-fold trie + sugbuf: group words by phonetic spelling, one
        // sugbuf line per phonetic form, listing original-word ordinals
        // (delta-encoded, ascending) that produced it (§3, §4.4).
        let mut soundfold_trie = Trie::default();
        let mut sugbuf: Vec<String> = Vec::new();
        if let Some(sf) = &self.sound_fold_fn {
            let mut phonetic_to_ordinals: HashMap<String, Vec<u32>> = HashMap::new();
            for (i, (w, _)) in self.words.iter().enumerate() {
                let phon = sf(&w.to_lowercase());
                phonetic_to_ordinals.entry(phon).or_default().push(i as u32);
            }
            let mut phon_entries: Vec<(String, TerminalFlags)> = Vec::new();
            for (line_no, (phon, ordinals)) in phonetic_to_ordinals.into_iter().enumerate() {
                let encoded = delta_encode(&ordinals);
                sugbuf.push(encoded);
                // The sugbuf line number is the "flag word" payload here:
                // soundfold terminals carry an ordinal into `sugbuf`, not
                // dictionary flags, so the raw bits are reused directly
                // rather than going through `TerminalFlagsBuilder`.
                phon_entries.push((phon, TerminalFlags(line_no as u32)));
            }
            soundfold_trie = build_trie(&phon_entries);
        }

        SimpleDictionary {
            fold_trie,
            keep_trie,
            prefix_trie,
            soundfold_trie,
            sugbuf,
            rep: ReplacementTable::build(self.rep),
            repsal: ReplacementTable::build(self.repsal),
            map_table: MapTable::build(&self.map_classes),
            compound: self.compound,
            sound_fold_fn: self.sound_fold_fn,
            word_counts: self.word_counts,
            keep_case_spellings,
        }
    }
}

/// Delta-encode ascending ordinals as space-separated decimal deltas, one
/// sugbuf line (§3: "delta-encoded as variable-length offsets" - text
/// lines are the simplest faithful encoding for a fixture this small).
fn delta_encode(ordinals: &[u32]) -> String {
    let mut out = String::new();
    let mut prev = 0u32;
    for (i, &o) in ordinals.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&(o - prev).to_string());
        prev = o;
    }
    out
}

/// Decode a sugbuf line produced by `delta_encode` back into ordinals.
pub fn delta_decode(line: &str) -> Vec<u32> {
    let mut out = Vec::new();
    let mut acc = 0u32;
    for tok in line.split_whitespace() {
        if let Ok(delta) = tok.parse::<u32>() {
            acc += delta;
            out.push(acc);
        }
    }
    out
}

/// A `Dictionary` built entirely in memory by `DictionaryBuilder`.
pub struct SimpleDictionary {
    fold_trie: Trie,
    keep_trie: Trie,
    prefix_trie: Trie,
    soundfold_trie: Trie,
    sugbuf: Vec<String>,
    rep: ReplacementTable,
    repsal: ReplacementTable,
    map_table: MapTable,
    compound: CompoundSettings,
    sound_fold_fn: Option<Box<dyn Fn(&str) -> String + Send + Sync>>,
    word_counts: HashMap<String, u32>,
    keep_case_spellings: HashMap<String, String>,
}

impl SimpleDictionary {
    /// The original word list's spelling at `ordinal`, reconstructed by
    /// walking the fold-case trie and counting terminal emissions in
    /// traversal order (§4.4: "walk the fold-case trie by counting
    /// terminal words to reconstruct the spelling").
    pub fn spelling_at_ordinal(&self, ordinal: u32) -> Option<String> {
        let mut counter = 0u32;
        let mut buf = Vec::new();
        find_ordinal(&self.fold_trie, crate::trie::Trie::root(), &mut buf, &mut counter, ordinal)
    }
}

fn find_ordinal(
    trie: &Trie,
    node: crate::types::NodeIdx,
    buf: &mut Vec<u8>,
    counter: &mut u32,
    target: u32,
) -> Option<String> {
    use crate::trie::Child;
    for (byte, child) in trie.children(node) {
        if byte == 0 {
            if *counter == target {
                return Some(String::from_utf8_lossy(buf).into_owned());
            }
            *counter += 1;
        } else if let Child::Node(next) = child {
            buf.push(byte);
            if let Some(found) = find_ordinal(trie, next, buf, counter, target) {
                return Some(found);
            }
            buf.pop();
        }
    }
    None
}

impl Dictionary for SimpleDictionary {
    fn fold_trie(&self) -> &Trie {
        &self.fold_trie
    }
    fn keep_trie(&self) -> &Trie {
        &self.keep_trie
    }
    fn prefix_trie(&self) -> &Trie {
        &self.prefix_trie
    }
    fn soundfold_trie(&self) -> &Trie {
        &self.soundfold_trie
    }
    fn compound(&self) -> &CompoundSettings {
        &self.compound
    }
    fn rep(&self) -> &ReplacementTable {
        &self.rep
    }
    fn repsal(&self) -> &ReplacementTable {
        &self.repsal
    }
    fn map_table(&self) -> &MapTable {
        &self.map_table
    }
    fn sound_fold(&self, word: &str) -> Option<String> {
        self.sound_fold_fn.as_ref().map(|f| f(word))
    }
    fn sugbuf_line(&self, n: usize) -> Option<&str> {
        self.sugbuf.get(n).map(|s| s.as_str())
    }
    fn word_count(&self, word: &str) -> Option<u32> {
        self.word_counts.get(word).copied()
    }
    fn keep_case_spelling(&self, folded: &str) -> Option<&str> {
        self.keep_case_spellings.get(folded).map(|s| s.as_str())
    }
}
