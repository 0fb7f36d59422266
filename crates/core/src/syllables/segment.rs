//! Maximal-onset segmentation of phoneme sequences into syllables.

use serde::{Deserialize, Serialize};

use crate::phonetics::inventory;

use super::onsets::is_permissible_onset;

/// One syllable: onset consonants, vowel nucleus, coda consonants.
///
/// The nucleus keeps its stress digit; `stress` carries the parsed digit,
/// defaulting to 0 when the vowel has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllable {
    pub onset: Vec<String>,
    pub nucleus: String,
    pub coda: Vec<String>,
    pub stress: u8,
}

impl Syllable {
    /// The nucleus without its stress digit.
    pub fn vowel_base(&self) -> &str {
        inventory::base(&self.nucleus)
    }

    /// All phonemes of this syllable in order.
    pub fn phonemes(&self) -> Vec<String> {
        let mut out = self.onset.clone();
        out.push(self.nucleus.clone());
        out.extend(self.coda.iter().cloned());
        out
    }
}

/// Segment a phoneme sequence into syllables using the Maximal Onset Principle.
///
/// Each vowel seeds exactly one syllable. The consonant run between two vowels
/// is split by taking the longest run suffix that is a permissible onset; if no
/// suffix qualifies the whole run stays in the preceding coda. Consonants before
/// the first vowel form its onset, consonants after the last vowel its coda.
/// A sequence without vowels yields no syllables. Tokens outside the inventory
/// are treated as consonants.
pub fn syllabify(phonemes: &[String]) -> Vec<Syllable> {
    let vowel_positions: Vec<usize> = phonemes
        .iter()
        .enumerate()
        .filter(|(_, p)| inventory::is_vowel(p))
        .map(|(i, _)| i)
        .collect();
    if vowel_positions.is_empty() {
        return Vec::new();
    }

    let mut syllables: Vec<Syllable> = Vec::with_capacity(vowel_positions.len());
    for (k, &vi) in vowel_positions.iter().enumerate() {
        let run_start = if k == 0 { 0 } else { vowel_positions[k - 1] + 1 };
        let run = &phonemes[run_start..vi];
        let nucleus = phonemes[vi].clone();
        let stress = inventory::stress_of(&nucleus).unwrap_or(0);
        let onset = if k == 0 {
            run.to_vec()
        } else {
            let (coda, onset) = split_run(run);
            syllables[k - 1].coda = coda;
            onset
        };
        syllables.push(Syllable {
            onset,
            nucleus,
            coda: Vec::new(),
            stress,
        });
    }

    let last_vowel = vowel_positions[vowel_positions.len() - 1];
    let last = syllables.len() - 1;
    syllables[last].coda = phonemes[last_vowel + 1..].to_vec();

    syllables
}

/// Split an inter-vowel consonant run into (preceding coda, following onset).
fn split_run(run: &[String]) -> (Vec<String>, Vec<String>) {
    for cut in 0..run.len() {
        if is_permissible_onset(&run[cut..]) {
            return (run[..cut].to_vec(), run[cut..].to_vec());
        }
    }
    (run.to_vec(), Vec::new())
}
