// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error-tolerant trie search and phonetic scoring for spelling suggestions.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌──────────────┐
//! │ dictionary │───▶│    trie     │───▶│    walker    │
//! │ (fixture   │    │ (packed     │    │ (TrieWalker: │
//! │  builder)  │    │  bytes[]/   │    │  DEL/INS/    │
//! │            │    │  idxs[])    │    │  SWAP/REP)   │
//! └────────────┘    └─────────────┘    └──────────────┘
//!        │                                     │
//!        ▼                                     ▼
//! ┌────────────────┐   ┌───────────┐   ┌───────────────┐
//! │ soundfold_search│──▶│ soundalike│   │ suggestion_set│
//! │ (phonetic pass) │   │ (scoring) │   │  (dedup/rank) │
//! └────────────────┘   └───────────┘   └───────────────┘
//!                              │                │
//!                              ▼                ▼
//!                         ┌─────────────────────────┐
//!                         │      orchestrator        │
//!                         │ (suggest: the entry point)│
//!                         └─────────────────────────┘
//! ```
//!
//! `edit` supplies the weighted Levenshtein scorer the walker and the
//! sound-fold expansion both lean on; `options` parses the `'spellsuggest'`
//! grammar; `external` wraps the `expr:`/`file:` collaborators; `errors`
//! and `contracts` carry the non-fatal diagnostic log and the
//! `debug_assert!`-backed invariants respectively.
//!
//! # Usage
//!
//! ```
//! use spellsuggest::dictionary::{DictionaryBuilder, WordFlags};
//! use spellsuggest::external::NullExprEval;
//! use spellsuggest::orchestrator::suggest;
//!
//! let dict = DictionaryBuilder::new()
//!     .word("hello", WordFlags::default())
//!     .build();
//!
//! let result = suggest(&dict, "helo", "", &NullExprEval);
//! assert!(result.suggestions.iter().any(|s| s.word == "hello"));
//! ```

pub mod contracts;
pub mod dictionary;
pub mod edit;
pub mod errors;
pub mod external;
pub mod options;
pub mod orchestrator;
pub mod soundalike;
pub mod soundfold_search;
pub mod suggestion_set;
pub mod trie;
pub mod types;
pub mod walker;

pub use errors::{DiagnosticLog, SuggestError};
pub use orchestrator::{suggest, SuggestResult};
pub use types::{BadWord, CapsFlags, Suggestion};
