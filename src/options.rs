// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parser for the `'spellsuggest'` option grammar (§6): a comma-separated
//! list of at most one scoring-strategy flag, plus any number of
//! `expr:`/`file:`/`timeout:`/bare-integer tokens.
//!
//! Grounded in the reference crate's hand-rolled CLI flag parsing
//! (`main.rs`) - a small manual tokenizer rather than a derive-based
//! parser, since the grammar is comma-separated key:value pairs embedded
//! in a single string option, not a process argv.

use std::path::PathBuf;

use crate::errors::SuggestError;

/// Scoring strategy (§4.6, §6). Default `Best`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Best,
    Fast,
    Double,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Best
    }
}

/// Parsed `'spellsuggest'` option state.
#[derive(Debug, Clone)]
pub struct SuggestOptions {
    pub mode: Mode,
    pub expr: Option<String>,
    pub file: Option<PathBuf>,
    /// Raw `timeout:` value in milliseconds. A negative value (the
    /// `timeout:-<int-ms>` form) is treated by the Orchestrator as "no
    /// deadline" rather than a negative wall-clock limit.
    pub timeout_ms: Option<i64>,
    pub max_count: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        SuggestOptions {
            mode: Mode::Best,
            expr: None,
            file: None,
            timeout_ms: None,
            max_count: 9999,
        }
    }
}

/// Parse a `'spellsuggest'` option string. On any grammar error, returns
/// `Err` - per §6, "invalid grammar resets to defaults and fails": the
/// caller is expected to catch the error, log it, and fall back to
/// `SuggestOptions::default()` rather than to propagate it further.
pub fn parse(spec: &str) -> Result<SuggestOptions, SuggestError> {
    let mut opts = SuggestOptions::default();
    let mut mode_seen = false;

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(expr) = token.strip_prefix("expr:") {
            opts.expr = Some(expr.to_string());
        } else if let Some(path) = token.strip_prefix("file:") {
            opts.file = Some(PathBuf::from(path));
        } else if let Some(ms) = token.strip_prefix("timeout:") {
            let parsed = ms.parse::<i64>().map_err(|_| SuggestError::ConfigInvalid {
                reason: format!("invalid timeout value {ms:?}"),
            })?;
            opts.timeout_ms = Some(parsed);
        } else if token == "best" || token == "fast" || token == "double" {
            if mode_seen {
                return Err(SuggestError::ConfigInvalid {
                    reason: "more than one scoring-strategy flag given".to_string(),
                });
            }
            mode_seen = true;
            opts.mode = match token {
                "best" => Mode::Best,
                "fast" => Mode::Fast,
                "double" => Mode::Double,
                _ => unreachable!(),
            };
        } else if let Ok(count) = token.parse::<usize>() {
            opts.max_count = count;
        } else {
            return Err(SuggestError::ConfigInvalid {
                reason: format!("unrecognized 'spellsuggest' token {token:?}"),
            });
        }
    }

    Ok(opts)
}

/// Parse `spec`, falling back to defaults (and logging the failure via the
/// returned error) on any grammar violation - the usual call shape at the
/// Orchestrator boundary.
pub fn parse_or_default(spec: &str) -> (SuggestOptions, Option<SuggestError>) {
    match parse(spec) {
        Ok(opts) => (opts, None),
        Err(err) => (SuggestOptions::default(), Some(err)),
    }
}
