//! Process-lifetime memo cache for syllable segmentation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::segment::{syllabify, Syllable};

/// Shared segmentation cache keyed by the exact phoneme sequence.
///
/// Segmentation is a pure function of its input, so entries never need
/// invalidation. Concurrent misses on the same key recompute redundantly
/// and keep the first inserted value.
#[derive(Debug, Default)]
pub struct SyllableCache {
    inner: Mutex<HashMap<String, Arc<Vec<Syllable>>>>,
}

impl SyllableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment `phonemes`, reusing a cached result when available.
    pub fn get_or_segment(&self, phonemes: &[String]) -> Arc<Vec<Syllable>> {
        let key = phonemes.join(" ");
        if let Some(found) = self.inner.lock().unwrap().get(&key) {
            return Arc::clone(found);
        }
        let computed = Arc::new(syllabify(phonemes));
        let mut map = self.inner.lock().unwrap();
        Arc::clone(map.entry(key).or_insert(computed))
    }

    /// Number of cached segmentations.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
