//! Windowed matching of compiled patterns against syllable sequences.

use serde::{Deserialize, Serialize};

use crate::syllables::Syllable;

use super::parse::{ClusterPattern, ClusterToken, SyllablePattern, VowelAlt, VowelPattern};

/// How a pattern is laid against a syllable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Pattern length must equal the syllable count.
    Exact,
    /// Slide a pattern-length window; first satisfying window wins.
    Contains,
}

/// Inclusive syllable span of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Match `pattern` against `syllables`, returning the first matched span.
///
/// A pattern longer than the syllable sequence (or an empty pattern) never
/// matches; that is a plain `None`, not an error. Window scan order is fixed
/// at ascending start index.
pub fn find_match(
    pattern: &[SyllablePattern],
    syllables: &[Syllable],
    mode: MatchMode,
    ignore_stress: bool,
) -> Option<MatchSpan> {
    if pattern.is_empty() || pattern.len() > syllables.len() {
        return None;
    }
    if mode == MatchMode::Exact && pattern.len() != syllables.len() {
        return None;
    }
    let last_start = match mode {
        MatchMode::Exact => 0,
        MatchMode::Contains => syllables.len() - pattern.len(),
    };
    for start in 0..=last_start {
        let window = &syllables[start..start + pattern.len()];
        if pattern
            .iter()
            .zip(window)
            .all(|(p, s)| syllable_matches(p, s, ignore_stress))
        {
            return Some(MatchSpan {
                start,
                end: start + pattern.len() - 1,
            });
        }
    }
    None
}

/// Test one syllable against one pattern position.
pub fn syllable_matches(pattern: &SyllablePattern, syllable: &Syllable, ignore_stress: bool) -> bool {
    if !cluster_matches(&pattern.onset, &syllable.onset) {
        return false;
    }
    if !vowel_matches(&pattern.vowel, syllable.vowel_base()) {
        return false;
    }
    if !cluster_matches(&pattern.coda, &syllable.coda) {
        return false;
    }
    if ignore_stress {
        return true;
    }
    match &pattern.stress {
        None => true,
        Some(digits) => digits.contains(&syllable.stress),
    }
}

fn cluster_matches(pattern: &ClusterPattern, cluster: &[String]) -> bool {
    match pattern {
        ClusterPattern::Unconstrained => true,
        ClusterPattern::Empty => cluster.is_empty(),
        ClusterPattern::Sequence(tokens) => sequence_matches(tokens, cluster, 0, 0),
        ClusterPattern::AnyOf(alternatives) => alternatives
            .iter()
            .any(|tokens| sequence_matches(tokens, cluster, 0, 0)),
    }
}

fn vowel_matches(pattern: &VowelPattern, base: &str) -> bool {
    match pattern {
        VowelPattern::Any => true,
        VowelPattern::OneOf(alts) => alts.iter().any(|alt| match alt {
            VowelAlt::Base(sym) => sym == base,
            VowelAlt::Glob(glob) => glob.matches(base),
        }),
    }
}

/// Backtracking walk of a token sequence over a consonant cluster.
fn sequence_matches(tokens: &[ClusterToken], cluster: &[String], mut ti: usize, mut ci: usize) -> bool {
    while ti < tokens.len() {
        match &tokens[ti] {
            ClusterToken::Run => {
                // collapse adjacent runs
                while ti + 1 < tokens.len() && matches!(tokens[ti + 1], ClusterToken::Run) {
                    ti += 1;
                }
                let next = ti + 1;
                if next == tokens.len() {
                    return true;
                }
                return (ci..=cluster.len()).any(|skip| sequence_matches(tokens, cluster, next, skip));
            }
            ClusterToken::One => {
                if ci >= cluster.len() {
                    return false;
                }
            }
            ClusterToken::Literal(sym) => {
                if ci >= cluster.len() || cluster[ci] != *sym {
                    return false;
                }
            }
            ClusterToken::OneOf(choices) => {
                if ci >= cluster.len() || !choices.contains(&cluster[ci]) {
                    return false;
                }
            }
        }
        ti += 1;
        ci += 1;
    }
    ci == cluster.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse::parse;
    use crate::syllables::syllabify;

    fn s(words: &str) -> Vec<String> {
        words.split_whitespace().map(|w| w.to_string()).collect()
    }

    fn run(pattern: &str, pron: &str, mode: MatchMode) -> Option<MatchSpan> {
        let parsed = parse(pattern).unwrap();
        let syllables = syllabify(&s(pron));
        find_match(&parsed, &syllables, mode, false)
    }

    #[test]
    fn test_exact_match_cat() {
        let span = run("*-AE[1]/T", "K AE1 T", MatchMode::Exact);
        assert_eq!(span, Some(MatchSpan { start: 0, end: 0 }));
    }

    #[test]
    fn test_single_wildcard_requires_one_token() {
        // brown's B R onset has two tokens, gown's G has one
        assert_eq!(run("?-AW[1]/N", "B R AW1 N", MatchMode::Exact), None);
        assert_eq!(
            run("?-AW[1]/N", "G AW1 N", MatchMode::Exact),
            Some(MatchSpan { start: 0, end: 0 })
        );
    }

    #[test]
    fn test_exact_two_syllables() {
        let span = run("[S P]-AY[1] D-ER[0]", "S P AY1 D ER0", MatchMode::Exact);
        assert_eq!(span, Some(MatchSpan { start: 0, end: 1 }));
    }

    #[test]
    fn test_contains_picks_lowest_start() {
        // about: AH0 / B AW1 T; only the second syllable has AW
        let span = run("*-AW[1]/*", "AH0 B AW1 T", MatchMode::Contains);
        assert_eq!(span, Some(MatchSpan { start: 1, end: 1 }));
    }

    #[test]
    fn test_contains_first_of_several_windows() {
        // banana: all three syllables carry the same vowel pattern
        let span = run("*-AH|AE", "B AH0 N AE1 N AH0", MatchMode::Contains);
        assert_eq!(span, Some(MatchSpan { start: 0, end: 0 }));
    }

    #[test]
    fn test_exact_requires_equal_length() {
        assert_eq!(run("*-AW[1]/*", "AH0 B AW1 T", MatchMode::Exact), None);
    }

    #[test]
    fn test_pattern_longer_than_word() {
        // two-chunk pattern against one syllable is a miss, not an error
        assert_eq!(run("*-AE *-IY", "K AE1 T", MatchMode::Contains), None);
        assert_eq!(run("*-AE *-IY", "K AE1 T", MatchMode::Exact), None);
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let syllables = syllabify(&s("K AE1 T"));
        assert_eq!(find_match(&[], &syllables, MatchMode::Contains, false), None);
    }

    #[test]
    fn test_exact_implies_contains_same_window() {
        let parsed = parse("[S P]-AY[1] D-ER[0]").unwrap();
        let syllables = syllabify(&s("S P AY1 D ER0"));
        let exact = find_match(&parsed, &syllables, MatchMode::Exact, false);
        let contains = find_match(&parsed, &syllables, MatchMode::Contains, false);
        assert!(exact.is_some());
        assert_eq!(exact, contains);
    }

    #[test]
    fn test_stress_constraint() {
        assert_eq!(run("*-AE[0]/T", "K AE1 T", MatchMode::Exact), None);
        assert!(run("*-AE[0|1]/T", "K AE1 T", MatchMode::Exact).is_some());
        assert!(run("*-AE/T", "K AE1 T", MatchMode::Exact).is_some());
    }

    #[test]
    fn test_ignore_stress() {
        let parsed = parse("*-AE[0]/T").unwrap();
        let syllables = syllabify(&s("K AE1 T"));
        assert_eq!(find_match(&parsed, &syllables, MatchMode::Exact, false), None);
        assert!(find_match(&parsed, &syllables, MatchMode::Exact, true).is_some());
    }

    #[test]
    fn test_empty_onset_marker() {
        // about's first syllable has no onset
        assert!(run("-AH *-AW/*", "AH0 B AW1 T", MatchMode::Exact).is_some());
        assert_eq!(run("-AE/T", "K AE1 T", MatchMode::Exact), None);
    }

    #[test]
    fn test_run_token_backtracks() {
        // "* T" needs the cluster to end in T
        assert!(run("(* T)-IY", "S T IY1", MatchMode::Exact).is_some());
        assert!(run("(* T)-IY", "T IY1", MatchMode::Exact).is_some());
        assert_eq!(run("(* T)-IY", "T R IY1", MatchMode::Exact), None);
    }

    #[test]
    fn test_sequence_alternation() {
        assert!(run("(S T|K R)-IY", "S T IY1", MatchMode::Exact).is_some());
        assert_eq!(run("(S T|K R)-IY", "T IY1", MatchMode::Exact), None);
    }

    #[test]
    fn test_choice_element() {
        assert!(run("[B|G]-AW[1]/N", "G AW1 N", MatchMode::Exact).is_some());
        assert_eq!(run("[B|G]-AW[1]/N", "T AW1 N", MatchMode::Exact), None);
    }

    #[test]
    fn test_vowel_glob() {
        assert!(run("*-A?/T", "K AE1 T", MatchMode::Exact).is_some());
        assert_eq!(run("*-A?/T", "K IY1 T", MatchMode::Exact), None);
    }
}
