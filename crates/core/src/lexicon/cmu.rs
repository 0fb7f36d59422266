//! CMU pronouncing dictionary ingestion.
//!
//! Parses `cmudict`-format text (`WORD  PH1 PH2 ...`, with `WORD(2)`
//! variant markers and `;;;` comments) into a [`Lexicon`].

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::store::Lexicon;
use crate::phonetics::{Pronunciation, UnknownPhonemeError};

lazy_static! {
    /// Dictionary entry line: word, optional variant marker, phonemes.
    static ref CMU_LINE: Regex =
        Regex::new(r"^([A-Z'\-.]+)(?:\(\d+\))?\s+(.+)$").expect("valid regex");
}

/// Errors raised by strict-mode ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),

    #[error("{word}: {source}")]
    Phoneme {
        word: String,
        source: UnknownPhonemeError,
    },
}

/// Counters reported by a CMU ingest run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CmuStats {
    /// Unique words that received at least one pronunciation.
    pub words: usize,
    /// Pronunciations stored (duplicates not counted).
    pub pronunciations: usize,
    /// Entries skipped for unknown phonemes (lenient mode only).
    pub skipped: usize,
}

/// Ingest a CMU dictionary file. The source is decoded lossily since
/// the published dictionary is Latin-1 with a few non-ASCII bytes.
pub fn ingest_cmu_file(
    lexicon: &mut Lexicon,
    path: &Path,
    strict: bool,
) -> Result<CmuStats, IngestError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    ingest_cmu_text(lexicon, &text, strict)
}

/// Ingest CMU dictionary text.
///
/// Every pronunciation is validated against the phoneme inventory. In
/// strict mode the first unknown phoneme aborts the batch; otherwise
/// the entry is skipped with a warning. Words whose entries all fail
/// validation are not added.
pub fn ingest_cmu_text(
    lexicon: &mut Lexicon,
    text: &str,
    strict: bool,
) -> Result<CmuStats, IngestError> {
    let mut stats = CmuStats::default();
    let mut word_ids: HashMap<String, u32> = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(";;;") {
            continue;
        }
        let Some(caps) = CMU_LINE.captures(line) else {
            continue;
        };
        let word = caps[1].to_lowercase();
        let phones: Vec<String> = caps[2].split_whitespace().map(str::to_string).collect();

        match Pronunciation::from_tokens(phones) {
            Ok(pron) => {
                let word_id = *word_ids
                    .entry(word.clone())
                    .or_insert_with(|| lexicon.add_word(&word));
                if lexicon.add_pronunciation(word_id, &pron) {
                    stats.pronunciations += 1;
                }
            }
            Err(err) if strict => return Err(IngestError::Phoneme { word, source: err }),
            Err(err) => {
                log::warn!("skipping {}: {}", word, err);
                stats.skipped += 1;
            }
        }
    }

    stats.words = word_ids.len();
    Ok(stats)
}
