// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Command-line demo: load a plain word list, ask for suggestions for one
//! word, print the ranked output.
//!
//! ```bash
//! spellsuggest --dict words.txt --spellsuggest best helo
//! ```
//!
//! Grounded in the reference crate's `main.rs`: a `clap`-derive CLI that
//! loads a file, builds an in-memory structure, and prints a simple
//! ranked-results table. No progress bars or colored output here - the
//! reference crate's terminal theming lives in `cli/display.rs`, which has
//! no counterpart since this binary is a demo harness, not a product UI.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use spellsuggest::dictionary::{DictionaryBuilder, WordFlags};
use spellsuggest::external::NullExprEval;
use spellsuggest::orchestrator::suggest;

/// Suggest spelling corrections for a word against a plain word-list
/// dictionary.
#[derive(Parser, Debug)]
#[command(name = "spellsuggest", version, about)]
struct Cli {
    /// Word to check and suggest corrections for.
    word: String,

    /// Path to a newline-delimited word list. One word per line; blank
    /// lines and lines starting with '#' are skipped.
    #[arg(long)]
    dict: PathBuf,

    /// `'spellsuggest'` option string (§6 grammar): e.g. "best,10" or
    /// "fast" or "file:extra.tsv".
    #[arg(long, default_value = "")]
    spellsuggest: String,
}

fn main() {
    let cli = Cli::parse();

    let dict = match load_dictionary(&cli.dict) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: failed to read dictionary {}: {}", cli.dict.display(), e);
            std::process::exit(1);
        }
    };

    let result = suggest(&dict, &cli.word, &cli.spellsuggest, &NullExprEval);

    if result.suggestions.is_empty() {
        println!("No suggestions for {:?}.", cli.word);
    } else {
        println!("Suggestions for {:?}:", cli.word);
        for (i, s) in result.suggestions.iter().enumerate() {
            println!("  {:>2}. {:<20} score={}", i + 1, s.word, s.score.0);
        }
    }

    for err in result.diagnostics.entries() {
        eprintln!("note: {err}");
    }
}

fn load_dictionary(path: &PathBuf) -> std::io::Result<spellsuggest::dictionary::SimpleDictionary> {
    let text = fs::read_to_string(path)?;
    let mut builder = DictionaryBuilder::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        builder = builder.word(line, WordFlags::default());
    }
    Ok(builder.build())
}
