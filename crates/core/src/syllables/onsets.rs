//! Permissible English onset clusters for maximal-onset segmentation.

use std::collections::HashSet;

lazy_static::lazy_static! {
    /// Licit single-consonant onsets (every consonant may open a syllable).
    static ref ONSET_SINGLES: HashSet<&'static str> = {
        [
            "B", "CH", "D", "DH", "F", "G", "HH", "JH", "K", "L",
            "M", "N", "NG", "P", "R", "S", "SH", "T", "TH", "V",
            "W", "Y", "Z", "ZH",
        ].into_iter().collect()
    };

    /// Licit 2-consonant onsets.
    static ref ONSET_PAIRS: HashSet<(&'static str, &'static str)> = {
        [
            ("B", "L"), ("B", "R"), ("B", "W"),
            ("CH", "R"),
            ("D", "R"), ("D", "W"),
            ("F", "L"), ("F", "R"),
            ("G", "L"), ("G", "R"), ("G", "W"),
            ("HH", "Y"),
            ("K", "L"), ("K", "R"), ("K", "W"),
            ("P", "L"), ("P", "R"), ("P", "W"),
            ("S", "K"), ("S", "L"), ("S", "M"), ("S", "N"),
            ("S", "P"), ("S", "T"), ("S", "W"),
            ("SH", "R"),
            ("T", "R"), ("T", "W"),
            ("TH", "R"), ("TH", "W"),
            ("V", "L"), ("V", "R"),
            ("Z", "L"), ("Z", "R"),
            ("ZH", "R"),
        ].into_iter().collect()
    };

    /// Licit 3-consonant onsets.
    static ref ONSET_TRIPLES: HashSet<(&'static str, &'static str, &'static str)> = {
        [
            ("S", "K", "L"), ("S", "K", "R"), ("S", "K", "W"),
            ("S", "P", "L"), ("S", "P", "R"),
            ("S", "T", "L"), ("S", "T", "R"),
        ].into_iter().collect()
    };
}

/// Return true if `cluster` may legally open an English syllable.
///
/// Clusters longer than three consonants are never permissible.
pub fn is_permissible_onset(cluster: &[String]) -> bool {
    match cluster {
        [] => true,
        [a] => ONSET_SINGLES.contains(a.as_str()),
        [a, b] => ONSET_PAIRS.contains(&(a.as_str(), b.as_str())),
        [a, b, c] => ONSET_TRIPLES.contains(&(a.as_str(), b.as_str(), c.as_str())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(words: &str) -> Vec<String> {
        words.split_whitespace().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_single_consonants_permissible() {
        assert!(is_permissible_onset(&s("K")));
        assert!(is_permissible_onset(&s("NG")));
        assert!(is_permissible_onset(&s("ZH")));
    }

    #[test]
    fn test_pairs() {
        assert!(is_permissible_onset(&s("S T")));
        assert!(is_permissible_onset(&s("B R")));
        assert!(is_permissible_onset(&s("TH R")));
        assert!(!is_permissible_onset(&s("T K")));
        assert!(!is_permissible_onset(&s("N G")));
    }

    #[test]
    fn test_triples() {
        assert!(is_permissible_onset(&s("S T R")));
        assert!(is_permissible_onset(&s("S P L")));
        assert!(!is_permissible_onset(&s("S T W")));
    }

    #[test]
    fn test_empty_and_long() {
        assert!(is_permissible_onset(&[]));
        assert!(!is_permissible_onset(&s("S T R AW")));
        assert!(!is_permissible_onset(&s("K S T R")));
    }
}
