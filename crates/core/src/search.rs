//! Rhyme and phonetic search over a lexicon.
//!
//! A search scans pronunciation entries in word-alphabetical order,
//! matches one phonetic feature sequence (or the syllable structure)
//! per entry, and ranks survivors by syllable count, score, and word.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::lexicon::{Gloss, Lexicon, PronEntry};
use crate::pattern::{find_match, parse, MatchMode, MatchSpan, PatternSyntaxError};
use crate::phonetics::{distance, similarity, Pronunciation};
use crate::syllables::SyllableCache;
use crate::wildcard::{has_glob, WildcardPattern};

/// Rhyme keys are precomputed up to this depth; deeper keys are
/// derived from the pronunciation on the fly.
pub const MAX_PRECOMPUTED_RHYME_KEY: usize = 4;

/// Errors raised while preparing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Pattern(#[from] PatternSyntaxError),

    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("{0}")]
    InvalidOptions(String),
}

/// Which feature sequence a pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternKind {
    /// Rhyme key at the requested syllable depth.
    #[default]
    Rhyme,
    /// Vowel of the final syllable.
    Vowel,
    /// Consonants after the last vowel.
    Consonant,
    /// Final vowel plus trailing consonants.
    Both,
    /// The full phoneme text.
    Phonemes,
    /// Structural per-syllable pattern matching.
    Syllable,
}

impl FromStr for PatternKind {
    type Err = SearchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rhyme" => Ok(PatternKind::Rhyme),
            "vowel" => Ok(PatternKind::Vowel),
            "consonant" => Ok(PatternKind::Consonant),
            "both" => Ok(PatternKind::Both),
            "phonemes" => Ok(PatternKind::Phonemes),
            "syllable" => Ok(PatternKind::Syllable),
            other => Err(SearchError::InvalidOptions(format!(
                "unknown pattern kind '{other}'"
            ))),
        }
    }
}

/// Options controlling a search request.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub pattern: Option<String>,
    pub kind: PatternKind,
    /// Rhyme-key depth for [`PatternKind::Rhyme`]; values below 1 are
    /// treated as 1.
    pub syllables: usize,
    /// Treat the pattern as a regular expression.
    pub regex: bool,
    /// Substring matching instead of whole-sequence matching.
    pub contains: bool,
    /// Keep entries within this edit distance of the pattern.
    pub max_distance: Option<u32>,
    /// Keep entries at least this similar to the pattern.
    pub min_similarity: Option<f64>,
    /// Wildcard over the stress digit string, e.g. `"1*"`.
    pub stress_pattern: Option<String>,
    /// Ignore stress constraints in syllable-pattern matching.
    pub ignore_stress: bool,
    pub part_of_speech: Option<String>,
    pub definition_query: Option<String>,
    pub synonym_query: Option<String>,
    pub limit: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            pattern: None,
            kind: PatternKind::Rhyme,
            syllables: 1,
            regex: false,
            contains: false,
            max_distance: None,
            min_similarity: None,
            stress_pattern: None,
            ignore_stress: false,
            part_of_speech: None,
            definition_query: None,
            synonym_query: None,
            limit: Some(50),
        }
    }
}

/// A single search hit with its lexical annotations.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub word_id: u32,
    pub word: String,
    pub pronunciation: String,
    pub syllable_count: usize,
    pub stress_pattern: String,
    /// Match score in [0, 1]; absent for plain listings.
    pub similarity: Option<f64>,
    pub terminal_vowels: Option<String>,
    pub terminal_consonants: String,
    /// Depth-1 rhyme key.
    pub rhyme_key: Option<String>,
    /// Matched syllable span for syllable-pattern searches.
    pub matched_syllables: Option<MatchSpan>,
    pub glosses: Vec<Gloss>,
}

/// A pattern compiled for text-sequence matching.
enum TextQuery {
    Regex(Regex),
    Wildcard(WildcardPattern),
}

impl TextQuery {
    fn is_match(&self, text: &str) -> bool {
        match self {
            TextQuery::Regex(regex) => regex.is_match(text),
            TextQuery::Wildcard(wildcard) => wildcard.matches(text),
        }
    }
}

/// Search interface over a [`Lexicon`].
#[derive(Debug)]
pub struct SearchEngine<'a> {
    lexicon: &'a Lexicon,
    cache: SyllableCache,
}

impl<'a> SearchEngine<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            cache: SyllableCache::new(),
        }
    }

    /// Run a search and return ranked, gloss-annotated results.
    pub fn search(&self, options: &SearchOptions) -> Result<Vec<SearchResult>, SearchError> {
        let pattern_text = options.pattern.as_deref().filter(|p| !p.is_empty());

        let syllable_pattern = if options.kind == PatternKind::Syllable {
            let text = pattern_text.map(str::trim).unwrap_or("");
            if text.is_empty() {
                return Err(SearchError::InvalidOptions(
                    "syllable searches need a pattern".to_string(),
                ));
            }
            Some(parse(text)?)
        } else {
            None
        };
        let text_query = match (&syllable_pattern, pattern_text) {
            (None, Some(pattern)) => Some(compile_text_query(pattern, options)?),
            _ => None,
        };
        let stress_filter = match options.stress_pattern.as_deref() {
            Some(p) if !p.is_empty() => Some(WildcardPattern::new(p)?),
            _ => None,
        };

        let mut results: Vec<SearchResult> = Vec::new();
        for entry in self.lexicon.iter_entries() {
            if !self.lexicon.matches_gloss_filters(
                entry.word_id,
                options.part_of_speech.as_deref(),
                options.definition_query.as_deref(),
                options.synonym_query.as_deref(),
            ) {
                continue;
            }

            let mut score: Option<f64> = None;
            let mut match_span: Option<MatchSpan> = None;
            let mut sequence: Option<String> = None;
            let mut text_match = true;

            match &syllable_pattern {
                Some(pattern) => {
                    let phonemes: Vec<String> = entry
                        .pronunciation
                        .split_whitespace()
                        .map(str::to_string)
                        .collect();
                    let syllables = self.cache.get_or_segment(&phonemes);
                    let mode = if options.contains {
                        MatchMode::Contains
                    } else {
                        MatchMode::Exact
                    };
                    match find_match(pattern, &syllables, mode, options.ignore_stress) {
                        Some(span) => {
                            match_span = Some(span);
                            score = Some(1.0);
                        }
                        None => continue,
                    }
                }
                None => {
                    let Some(seq) = sequence_for_entry(entry, options) else {
                        continue;
                    };
                    if let Some(query) = &text_query {
                        text_match = query.is_match(&normalize_spaces(&seq));
                        let near_enabled =
                            options.max_distance.is_some() || options.min_similarity.is_some();
                        if !text_match && !near_enabled {
                            continue;
                        }
                    }
                    sequence = Some(seq);
                }
            }

            if let Some(stress) = &stress_filter {
                if !stress.matches(&entry.stress_pattern) {
                    continue;
                }
            }

            // Near thresholds supersede the text match; plain patterns
            // require it.
            if let (Some(seq), Some(pattern)) = (&sequence, pattern_text) {
                if let Some(max_distance) = options.max_distance {
                    let seq_tokens = split_tokens(seq);
                    let pattern_tokens = split_tokens(pattern);
                    let d = distance(&seq_tokens, &pattern_tokens);
                    if d > max_distance {
                        continue;
                    }
                    let normalizer = seq_tokens.len().max(pattern_tokens.len()).max(1);
                    score = Some(1.0 - f64::from(d) / normalizer as f64);
                } else if let Some(min_similarity) = options.min_similarity {
                    let s = similarity(&split_tokens(seq), &split_tokens(pattern));
                    if s < min_similarity {
                        continue;
                    }
                    score = Some(s);
                } else {
                    if !text_match {
                        continue;
                    }
                    score = Some(1.0);
                }
            }

            let Some(word) = self.lexicon.word(entry.word_id) else {
                continue;
            };
            results.push(SearchResult {
                word_id: entry.word_id,
                word: word.to_string(),
                pronunciation: entry.pronunciation.clone(),
                syllable_count: entry.syllable_count,
                stress_pattern: entry.stress_pattern.clone(),
                similarity: score,
                terminal_vowels: entry.terminal_vowels.clone(),
                terminal_consonants: entry.terminal_consonants.clone(),
                rhyme_key: entry.rhyme_keys[0].clone(),
                matched_syllables: match_span,
                glosses: Vec::new(),
            });

            // Plain listings stop early; patterned searches scan the
            // whole lexicon so ranking sees every candidate.
            if let Some(limit) = options.limit {
                if results.len() >= limit && pattern_text.is_none() {
                    break;
                }
            }
        }

        results.sort_by(result_order);
        if let Some(limit) = options.limit {
            results.truncate(limit);
        }
        self.attach_glosses(&mut results);
        Ok(results)
    }

    /// Entries whose perfect rhyme key equals `key`, excluding the
    /// given word ids.
    pub fn perfect_rhyme_matches(
        &self,
        key: &str,
        part_of_speech: Option<&str>,
        limit: Option<usize>,
        exclude_word_ids: &HashSet<u32>,
    ) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = Vec::new();
        for entry in self.lexicon.iter_entries() {
            if exclude_word_ids.contains(&entry.word_id) {
                continue;
            }
            if !self
                .lexicon
                .matches_gloss_filters(entry.word_id, part_of_speech, None, None)
            {
                continue;
            }
            let Ok(pron) = Pronunciation::parse(&entry.pronunciation) else {
                continue;
            };
            if pron.perfect_rhyme_key().as_deref() != Some(key) {
                continue;
            }
            let Some(word) = self.lexicon.word(entry.word_id) else {
                continue;
            };
            results.push(SearchResult {
                word_id: entry.word_id,
                word: word.to_string(),
                pronunciation: entry.pronunciation.clone(),
                syllable_count: entry.syllable_count,
                stress_pattern: entry.stress_pattern.clone(),
                similarity: Some(1.0),
                terminal_vowels: entry.terminal_vowels.clone(),
                terminal_consonants: entry.terminal_consonants.clone(),
                rhyme_key: entry.rhyme_keys[0].clone(),
                matched_syllables: None,
                glosses: Vec::new(),
            });
        }

        results.sort_by(result_order);
        if let Some(limit) = limit {
            results.truncate(limit);
        }
        self.attach_glosses(&mut results);
        results
    }

    fn attach_glosses(&self, results: &mut [SearchResult]) {
        for result in results {
            result.glosses = self.lexicon.glosses(result.word_id).to_vec();
        }
    }
}

/// Ranking: syllable count descending, score descending (unscored
/// last), word ascending.
fn result_order(a: &SearchResult, b: &SearchResult) -> Ordering {
    let a_score = a.similarity.unwrap_or(f64::NEG_INFINITY);
    let b_score = b.similarity.unwrap_or(f64::NEG_INFINITY);
    b.syllable_count
        .cmp(&a.syllable_count)
        .then_with(|| b_score.partial_cmp(&a_score).unwrap_or(Ordering::Equal))
        .then_with(|| a.word.cmp(&b.word))
}

/// Select the feature sequence an entry is matched on.
fn sequence_for_entry(entry: &PronEntry, options: &SearchOptions) -> Option<String> {
    let depth = options.syllables.max(1);
    match options.kind {
        PatternKind::Vowel => entry.terminal_vowels.clone(),
        PatternKind::Consonant => Some(entry.terminal_consonants.clone()),
        PatternKind::Both => entry.terminal_both.clone(),
        PatternKind::Rhyme => {
            if depth <= MAX_PRECOMPUTED_RHYME_KEY {
                entry.rhyme_key(depth).map(str::to_string)
            } else {
                let pron = Pronunciation::parse(&entry.pronunciation).ok()?;
                pron.rhyme_key(depth)
            }
        }
        PatternKind::Phonemes => Some(entry.pronunciation.clone()),
        PatternKind::Syllable => None,
    }
}

fn compile_text_query(pattern: &str, options: &SearchOptions) -> Result<TextQuery, SearchError> {
    if options.regex {
        let regex = if options.contains {
            Regex::new(pattern)?
        } else {
            Regex::new(&format!("^(?:{pattern})$"))?
        };
        return Ok(TextQuery::Regex(regex));
    }
    // a glob-free pattern in contains mode matches as a substring
    let wildcard = if options.contains && !has_glob(pattern) {
        WildcardPattern::new(&format!("*{pattern}*"))?
    } else {
        WildcardPattern::new(pattern)?
    };
    Ok(TextQuery::Wildcard(wildcard))
}

fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lexicon() -> Lexicon {
        let mut lex = Lexicon::new();
        for (word, phones) in [
            ("cat", "K AE1 T"),
            ("bat", "B AE1 T"),
            ("brown", "B R AW1 N"),
            ("gown", "G AW1 N"),
            ("crown", "K R AW1 N"),
            ("spider", "S P AY1 D ER0"),
            ("about", "AH0 B AW1 T"),
        ] {
            let id = lex.add_word(word);
            lex.add_pronunciation(id, &Pronunciation::parse(phones).unwrap());
        }
        lex
    }

    fn words(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.word.as_str()).collect()
    }

    #[test]
    fn test_rhyme_search() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                pattern: Some("AW1 N".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["brown", "crown", "gown"]);
        assert!(results.iter().all(|r| r.similarity == Some(1.0)));
    }

    #[test]
    fn test_vowel_and_consonant_kinds() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);

        let results = engine
            .search(&SearchOptions {
                pattern: Some("ER0".to_string()),
                kind: PatternKind::Vowel,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["spider"]);

        let results = engine
            .search(&SearchOptions {
                pattern: Some("T".to_string()),
                kind: PatternKind::Consonant,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["about", "bat", "cat"]);
    }

    #[test]
    fn test_phonemes_contains_wraps_plain_pattern() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                pattern: Some("AW1".to_string()),
                kind: PatternKind::Phonemes,
                contains: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["about", "brown", "crown", "gown"]);
    }

    #[test]
    fn test_regex_whole_and_contains() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);

        let results = engine
            .search(&SearchOptions {
                pattern: Some(".* N".to_string()),
                regex: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["brown", "crown", "gown"]);

        // whole-text matching does not fall back to substring search
        let results = engine
            .search(&SearchOptions {
                pattern: Some("AW1".to_string()),
                regex: true,
                ..Default::default()
            })
            .unwrap();
        assert!(results.is_empty());

        let results = engine
            .search(&SearchOptions {
                pattern: Some("AW1".to_string()),
                regex: true,
                contains: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["about", "brown", "crown", "gown"]);
    }

    #[test]
    fn test_max_distance_supersedes_text_match() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                pattern: Some("AW1 T".to_string()),
                max_distance: Some(1),
                ..Default::default()
            })
            .unwrap();
        // "about" rhymes exactly and sorts first on syllable count
        assert_eq!(
            words(&results),
            vec!["about", "bat", "brown", "cat", "crown", "gown"]
        );
        assert_eq!(results[0].similarity, Some(1.0));
        assert_eq!(results[1].similarity, Some(0.5));
    }

    #[test]
    fn test_min_similarity_ranking() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                pattern: Some("AW1 N".to_string()),
                min_similarity: Some(0.5),
                ..Default::default()
            })
            .unwrap();
        // bat and cat score 0.0 and drop below the threshold; "about"
        // still leads the survivors on syllable count
        assert_eq!(words(&results), vec!["about", "brown", "crown", "gown"]);
        assert_eq!(results[0].similarity, Some(0.5));
        assert_eq!(results[1].similarity, Some(1.0));
    }

    #[test]
    fn test_syllable_kind_matches_structure() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                pattern: Some("?-AW[1]/N".to_string()),
                kind: PatternKind::Syllable,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["gown"]);
        let span = results[0].matched_syllables.unwrap();
        assert_eq!((span.start, span.end), (0, 0));
        assert_eq!(results[0].similarity, Some(1.0));
    }

    #[test]
    fn test_syllable_kind_requires_pattern() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let err = engine
            .search(&SearchOptions {
                kind: PatternKind::Syllable,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidOptions(_)));
    }

    #[test]
    fn test_stress_pattern_filter() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                stress_pattern: Some("01".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["about"]);
        assert_eq!(results[0].similarity, None);
    }

    #[test]
    fn test_plain_listing_stops_at_limit() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                limit: Some(3),
                ..Default::default()
            })
            .unwrap();
        // scan order is alphabetical, so the first three words win
        assert_eq!(words(&results), vec!["about", "bat", "brown"]);
        assert!(results.iter().all(|r| r.similarity.is_none()));
    }

    #[test]
    fn test_gloss_filters_restrict_candidates() {
        let mut lex = sample_lexicon();
        let cat = lex.word_id("cat").unwrap();
        lex.add_gloss(
            cat,
            Gloss {
                part_of_speech: Some("noun".to_string()),
                definition: "a small domesticated feline".to_string(),
                example: None,
                source: "wordnet".to_string(),
                synonyms: vec!["feline".to_string()],
            },
        );
        let engine = SearchEngine::new(&lex);

        let results = engine
            .search(&SearchOptions {
                part_of_speech: Some("noun".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["cat"]);
        assert_eq!(results[0].glosses.len(), 1);

        let results = engine
            .search(&SearchOptions {
                synonym_query: Some("feline".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["cat"]);
    }

    #[test]
    fn test_perfect_rhyme_matches() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let brown = lex.word_id("brown").unwrap();
        let excluded: HashSet<u32> = [brown].into_iter().collect();

        let results = engine.perfect_rhyme_matches("AW1 N", None, Some(50), &excluded);
        assert_eq!(words(&results), vec!["crown", "gown"]);
        assert!(results.iter().all(|r| r.similarity == Some(1.0)));
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let lex = sample_lexicon();
        let engine = SearchEngine::new(&lex);
        let err = engine
            .search(&SearchOptions {
                pattern: Some("(".to_string()),
                regex: true,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, SearchError::Regex(_)));
    }

    #[test]
    fn test_pattern_kind_from_str() {
        assert_eq!("rhyme".parse::<PatternKind>().unwrap(), PatternKind::Rhyme);
        assert_eq!(
            "syllable".parse::<PatternKind>().unwrap(),
            PatternKind::Syllable
        );
        assert!("verse".parse::<PatternKind>().is_err());
    }

    #[test]
    fn test_deep_rhyme_key_computed_on_the_fly() {
        let mut lex = Lexicon::new();
        let id = lex.add_word("serendipity");
        lex.add_pronunciation(
            id,
            &Pronunciation::parse("S EH2 R AH0 N D IH1 P IH0 T IY0").unwrap(),
        );
        let engine = SearchEngine::new(&lex);
        let results = engine
            .search(&SearchOptions {
                pattern: Some("EH2 R AH0 N D IH1 P IH0 T IY0".to_string()),
                syllables: 5,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(words(&results), vec!["serendipity"]);
    }
}
