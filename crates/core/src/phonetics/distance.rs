//! Edit distance and similarity over whole phoneme tokens.
//!
//! Substitution, insertion, and deletion cost 1 by default; callers can
//! supply their own [`EditCosts`] to bias the metric. The scorer is a
//! pure metric: thresholds live in the search layer.

use crate::phonetics::inventory;

/// Pluggable cost table for the edit-distance scorer.
pub trait EditCosts {
    /// Cost of substituting token `a` with token `b`. Zero when equal.
    fn substitution(&self, a: &str, b: &str) -> u32;

    /// Cost of inserting `token`.
    fn insertion(&self, token: &str) -> u32 {
        let _ = token;
        1
    }

    /// Cost of deleting `token`.
    fn deletion(&self, token: &str) -> u32 {
        let _ = token;
        1
    }
}

/// Uniform costs: every edit is 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCosts;

impl EditCosts for UnitCosts {
    fn substitution(&self, a: &str, b: &str) -> u32 {
        if a == b { 0 } else { 1 }
    }
}

/// Costs that keep substitutions within a phoneme class cheap.
///
/// Swapping one vowel for another (or one consonant for another) costs 1;
/// crossing the vowel/consonant boundary costs 2. Stress digits are
/// ignored for the class check but still distinguish tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassWeightedCosts;

impl EditCosts for ClassWeightedCosts {
    fn substitution(&self, a: &str, b: &str) -> u32 {
        if a == b {
            0
        } else if inventory::is_vowel(a) == inventory::is_vowel(b) {
            1
        } else {
            2
        }
    }
}

/// Levenshtein distance over whole tokens with a custom cost table.
pub fn distance_with<C: EditCosts>(a: &[String], b: &[String], costs: &C) -> u32 {
    if a == b {
        return 0;
    }

    // prev[j] = distance between a[..i] and b[..j]
    let mut prev: Vec<u32> = Vec::with_capacity(b.len() + 1);
    prev.push(0);
    for token in b {
        prev.push(prev[prev.len() - 1] + costs.insertion(token));
    }

    let mut current = vec![0u32; b.len() + 1];
    for left in a {
        current[0] = prev[0] + costs.deletion(left);
        for (j, right) in b.iter().enumerate() {
            let insert = current[j] + costs.insertion(right);
            let delete = prev[j + 1] + costs.deletion(left);
            let substitute = prev[j] + costs.substitution(left, right);
            current[j + 1] = insert.min(delete).min(substitute);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}

/// Levenshtein distance with unit costs.
pub fn distance(a: &[String], b: &[String]) -> u32 {
    distance_with(a, b, &UnitCosts)
}

/// Normalized similarity in `[0, 1]` derived from the unit-cost distance.
///
/// Two empty sequences are identical, so their similarity is 1.
pub fn similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let normalizer = a.len().max(b.len()).max(1) as f64;
    let d = distance(a, b) as f64;
    (1.0 - d / normalizer).max(0.0)
}
