//! Core library for couplet: phonetic lexicon search and rhyme
//! assistance over ARPABET pronunciations.
//!
//! Pronunciations are segmented into syllables, matched against a
//! per-syllable pattern grammar, and scored by phoneme edit distance.

pub mod lexicon;
pub mod pattern;
pub mod phonetics;
pub mod rhymes;
pub mod search;
pub mod syllables;
pub mod wildcard;
