//! Syllable segmentation: onset tables, the segmenter, and its memo cache.

pub mod cache;
pub mod onsets;
pub mod segment;

pub use cache::SyllableCache;
pub use onsets::is_permissible_onset;
pub use segment::{syllabify, Syllable};
