//! In-memory lexicon with versioned JSON persistence.
//!
//! Words, pronunciation entries with precomputed phonetic features,
//! and glosses live in one structure with lookup indexes that are
//! rebuilt on load.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::phonetics::Pronunciation;

/// Lexicon file format version for compatibility checking.
pub const LEXICON_FORMAT_VERSION: u32 = 1;

/// Errors raised while loading or saving a lexicon file.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read or write lexicon: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse lexicon: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported lexicon format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// A stored pronunciation with its precomputed phonetic features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PronEntry {
    pub word_id: u32,
    /// Space-joined phoneme text, stress digits kept.
    pub pronunciation: String,
    pub syllable_count: usize,
    /// Vowel stress digits in order, e.g. `"10"` for `spider`.
    pub stress_pattern: String,
    /// Vowel of the final syllable, digits kept.
    pub terminal_vowels: Option<String>,
    /// Consonants after the last vowel, empty when there are none.
    pub terminal_consonants: String,
    /// Depth-1 rhyme key: the last vowel plus trailing consonants.
    pub terminal_both: Option<String>,
    /// Rhyme keys for depths 1 through 4; deeper keys are derived on
    /// demand from the pronunciation text.
    pub rhyme_keys: [Option<String>; 4],
    /// Phoneme text with stress digits removed.
    pub phonemes_no_stress: String,
}

impl PronEntry {
    fn from_pronunciation(word_id: u32, pron: &Pronunciation) -> Self {
        Self {
            word_id,
            pronunciation: pron.text(),
            syllable_count: pron.syllable_count(),
            stress_pattern: pron.stress_pattern(),
            terminal_vowels: pron.terminal_vowels(1),
            terminal_consonants: pron.terminal_consonants(),
            terminal_both: pron.rhyme_key(1),
            rhyme_keys: [
                pron.rhyme_key(1),
                pron.rhyme_key(2),
                pron.rhyme_key(3),
                pron.rhyme_key(4),
            ],
            phonemes_no_stress: pron.strip_stress().text(),
        }
    }

    /// Precomputed rhyme key for `depth` in 1..=4, `None` when the
    /// entry has fewer syllables than the requested depth.
    pub fn rhyme_key(&self, depth: usize) -> Option<&str> {
        match depth {
            1..=4 => self.rhyme_keys[depth - 1].as_deref(),
            _ => None,
        }
    }
}

/// A part-of-speech-tagged definition with optional example and synonyms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gloss {
    pub part_of_speech: Option<String>,
    pub definition: String,
    pub example: Option<String>,
    /// Provenance tag, e.g. `"wordnet"`.
    pub source: String,
    pub synonyms: Vec<String>,
}

/// On-disk lexicon document.
#[derive(Debug, Serialize, Deserialize)]
struct LexiconFile {
    version: u32,
    words: Vec<String>,
    entries: Vec<PronEntry>,
    glosses: BTreeMap<u32, Vec<Gloss>>,
}

/// In-memory lexicon: words, pronunciations, and glosses.
#[derive(Debug, Default)]
pub struct Lexicon {
    /// Word text by id; ids are dense indices into this list.
    words: Vec<String>,
    /// Lowercased word -> id, ordered for alphabetical scans.
    word_index: BTreeMap<String, u32>,
    entries: Vec<PronEntry>,
    entries_by_word: HashMap<u32, Vec<usize>>,
    glosses: HashMap<u32, Vec<Gloss>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a word (lowercased) and return its id.
    pub fn add_word(&mut self, word: &str) -> u32 {
        let word = word.to_lowercase();
        if let Some(&id) = self.word_index.get(&word) {
            return id;
        }
        let id = self.words.len() as u32;
        self.words.push(word.clone());
        self.word_index.insert(word, id);
        id
    }

    /// Store a pronunciation for a word. Returns `false` when the word
    /// id is unknown or the (word, pronunciation) pair already exists.
    pub fn add_pronunciation(&mut self, word_id: u32, pron: &Pronunciation) -> bool {
        if self.words.get(word_id as usize).is_none() {
            return false;
        }
        let text = pron.text();
        if let Some(indices) = self.entries_by_word.get(&word_id) {
            if indices.iter().any(|&i| self.entries[i].pronunciation == text) {
                return false;
            }
        }
        let entry = PronEntry::from_pronunciation(word_id, pron);
        self.entries_by_word
            .entry(word_id)
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Attach a gloss to a word. Synonyms are lowercased and empty
    /// ones dropped.
    pub fn add_gloss(&mut self, word_id: u32, gloss: Gloss) {
        let synonyms = gloss
            .synonyms
            .iter()
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self.glosses
            .entry(word_id)
            .or_default()
            .push(Gloss { synonyms, ..gloss });
    }

    pub fn word(&self, word_id: u32) -> Option<&str> {
        self.words.get(word_id as usize).map(String::as_str)
    }

    pub fn word_id(&self, word: &str) -> Option<u32> {
        self.word_index.get(&word.to_lowercase()).copied()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All entries for a word id, in insertion order.
    pub fn entries_for(&self, word_id: u32) -> Vec<&PronEntry> {
        self.entries_by_word
            .get(&word_id)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// All entries for a word given as text.
    pub fn pronunciations_for_word(&self, word: &str) -> Vec<&PronEntry> {
        match self.word_id(word) {
            Some(id) => self.entries_for(id),
            None => Vec::new(),
        }
    }

    /// Iterate every entry in word-alphabetical order, insertion order
    /// within a word.
    pub fn iter_entries(&self) -> impl Iterator<Item = &PronEntry> + '_ {
        self.word_index.values().flat_map(move |id| {
            self.entries_by_word
                .get(id)
                .into_iter()
                .flatten()
                .map(move |&i| &self.entries[i])
        })
    }

    /// Glosses attached to a word, empty when there are none.
    pub fn glosses(&self, word_id: u32) -> &[Gloss] {
        self.glosses.get(&word_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when the word's glosses satisfy every given filter; each
    /// filter may be satisfied by a different gloss. Part of speech is
    /// an exact tag match, definition and synonym are case-insensitive
    /// substring matches.
    pub fn matches_gloss_filters(
        &self,
        word_id: u32,
        part_of_speech: Option<&str>,
        definition_query: Option<&str>,
        synonym_query: Option<&str>,
    ) -> bool {
        let glosses = self.glosses(word_id);
        if let Some(pos) = part_of_speech {
            if !glosses
                .iter()
                .any(|g| g.part_of_speech.as_deref() == Some(pos))
            {
                return false;
            }
        }
        if let Some(query) = definition_query {
            let query = query.to_lowercase();
            if !glosses
                .iter()
                .any(|g| g.definition.to_lowercase().contains(&query))
            {
                return false;
            }
        }
        if let Some(query) = synonym_query {
            // Synonyms are stored lowercased.
            let query = query.to_lowercase();
            if !glosses
                .iter()
                .any(|g| g.synonyms.iter().any(|s| s.contains(&query)))
            {
                return false;
            }
        }
        true
    }

    /// Load a lexicon from a JSON file, rebuilding its indexes.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let data = std::fs::read_to_string(path)?;
        let file: LexiconFile = serde_json::from_str(&data)?;
        if file.version != LEXICON_FORMAT_VERSION {
            return Err(LexiconError::Version {
                found: file.version,
                expected: LEXICON_FORMAT_VERSION,
            });
        }
        let mut lexicon = Lexicon {
            words: file.words,
            entries: file.entries,
            glosses: file.glosses.into_iter().collect(),
            ..Default::default()
        };
        for (id, word) in lexicon.words.iter().enumerate() {
            lexicon.word_index.insert(word.clone(), id as u32);
        }
        for (index, entry) in lexicon.entries.iter().enumerate() {
            lexicon
                .entries_by_word
                .entry(entry.word_id)
                .or_default()
                .push(index);
        }
        Ok(lexicon)
    }

    /// Save the lexicon as JSON, written atomically.
    pub fn save(&self, path: &Path) -> Result<(), LexiconError> {
        let file = LexiconFile {
            version: LEXICON_FORMAT_VERSION,
            words: self.words.clone(),
            entries: self.entries.clone(),
            glosses: self.glosses.iter().map(|(k, v)| (*k, v.clone())).collect(),
        };
        let json = serde_json::to_string(&file)?;
        atomic_write(path, json.as_bytes())?;
        Ok(())
    }
}

/// Atomically write data to a file via temp file + rename.
fn atomic_write(target: &Path, data: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = target.with_extension("tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, target)?;
    Ok(())
}
