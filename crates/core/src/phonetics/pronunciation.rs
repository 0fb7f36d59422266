//! A validated pronunciation and the phonetic features derived from it.
//!
//! Rhyme keys and terminal features keep their stress digits; whole-word
//! stress stripping is explicit via [`Pronunciation::strip_stress`].

use crate::phonetics::inventory::{self, UnknownPhonemeError};

/// An ordered phoneme-token sequence, validated against the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pronunciation {
    phonemes: Vec<String>,
}

impl Pronunciation {
    /// Build from pre-split tokens, rejecting the first unknown one.
    pub fn from_tokens(phonemes: Vec<String>) -> Result<Self, UnknownPhonemeError> {
        inventory::ensure_known(&phonemes)?;
        Ok(Pronunciation { phonemes })
    }

    /// Parse a space-separated pronunciation string.
    pub fn parse(text: &str) -> Result<Self, UnknownPhonemeError> {
        Self::from_tokens(inventory::tokens(text))
    }

    pub fn phonemes(&self) -> &[String] {
        &self.phonemes
    }

    /// Canonical space-joined form.
    pub fn text(&self) -> String {
        self.phonemes.join(" ")
    }

    /// Number of syllables (one per vowel token).
    pub fn syllable_count(&self) -> usize {
        self.phonemes.iter().filter(|p| inventory::is_vowel(p)).count()
    }

    /// Stress digits of the vowels in order, e.g. "102".
    ///
    /// A vowel without a digit counts as unstressed.
    pub fn stress_pattern(&self) -> String {
        self.phonemes
            .iter()
            .filter(|p| inventory::is_vowel(p))
            .map(|p| {
                inventory::stress_of(p)
                    .map(|d| char::from(b'0' + d))
                    .unwrap_or('0')
            })
            .collect()
    }

    /// Phonemes from the `syllables`-th vowel from the end onward.
    ///
    /// `None` when the pronunciation has fewer vowels than requested.
    pub fn rhyme_key(&self, syllables: usize) -> Option<String> {
        let indices = self.vowel_indices();
        if syllables == 0 || indices.len() < syllables {
            return None;
        }
        let start = indices[indices.len() - syllables];
        Some(self.phonemes[start..].join(" "))
    }

    /// Phonemes from the last primary- or secondary-stressed vowel onward.
    ///
    /// `None` when no vowel carries stress 1 or 2.
    pub fn perfect_rhyme_key(&self) -> Option<String> {
        let mut last_stressed = None;
        for (index, phoneme) in self.phonemes.iter().enumerate() {
            if !inventory::is_vowel(phoneme) {
                continue;
            }
            if matches!(inventory::stress_of(phoneme), Some(1) | Some(2)) {
                last_stressed = Some(index);
            }
        }
        last_stressed.map(|start| self.phonemes[start..].join(" "))
    }

    /// The vowels of the last `syllables` syllables, in order.
    pub fn terminal_vowels(&self, syllables: usize) -> Option<String> {
        let indices = self.vowel_indices();
        if syllables == 0 || indices.len() < syllables {
            return None;
        }
        let start = indices[indices.len() - syllables];
        let vowels: Vec<&str> = self.phonemes[start..]
            .iter()
            .filter(|p| inventory::is_vowel(p))
            .map(|p| p.as_str())
            .collect();
        if vowels.is_empty() {
            None
        } else {
            Some(vowels.join(" "))
        }
    }

    /// Consonants after the last vowel, space joined.
    ///
    /// Empty when the last phoneme is a vowel or there is no vowel at all.
    pub fn terminal_consonants(&self) -> String {
        match self.vowel_indices().last() {
            Some(&last) => self.phonemes[last + 1..].join(" "),
            None => String::new(),
        }
    }

    /// Same sequence with all stress digits removed.
    pub fn strip_stress(&self) -> Pronunciation {
        Pronunciation {
            phonemes: self
                .phonemes
                .iter()
                .map(|p| inventory::base(p).to_string())
                .collect(),
        }
    }

    fn vowel_indices(&self) -> Vec<usize> {
        self.phonemes
            .iter()
            .enumerate()
            .filter(|(_, p)| inventory::is_vowel(p))
            .map(|(i, _)| i)
            .collect()
    }
}
