//! High level rhyme suggestions built on the search engine.

use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::lexicon::Lexicon;
use crate::phonetics::Pronunciation;
use crate::search::{PatternKind, SearchEngine, SearchError, SearchOptions, SearchResult};

lazy_static! {
    /// Words as letter runs, apostrophes included.
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z']+").expect("valid regex");
}

/// Options controlling rhyme suggestion.
#[derive(Debug, Clone)]
pub struct RhymeOptions {
    /// Deepest rhyme-key depth to try, capped by the word's own
    /// syllable count.
    pub max_syllables: usize,
    /// Cap per syllable-depth bucket.
    pub max_results: Option<usize>,
    pub max_distance: Option<u32>,
    pub min_similarity: Option<f64>,
    pub part_of_speech: Option<String>,
}

impl Default for RhymeOptions {
    fn default() -> Self {
        Self {
            max_syllables: 3,
            max_results: Some(20),
            max_distance: None,
            min_similarity: None,
            part_of_speech: None,
        }
    }
}

/// Combines pronunciation lookups and search queries.
#[derive(Debug)]
pub struct RhymeAssistant<'a> {
    lexicon: &'a Lexicon,
    search: SearchEngine<'a>,
}

impl<'a> RhymeAssistant<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            search: SearchEngine::new(lexicon),
        }
    }

    /// All stored pronunciations of a word.
    pub fn pronunciations_for_word(&self, word: &str) -> Vec<Pronunciation> {
        self.lexicon
            .pronunciations_for_word(word)
            .iter()
            .filter_map(|entry| Pronunciation::parse(&entry.pronunciation).ok())
            .collect()
    }

    /// Suggest rhymes for the final syllables of `line`, bucketed by
    /// rhyme-key depth. Callers usually render deepest bucket first.
    pub fn suggest_rhymes(
        &self,
        line: &str,
        options: &RhymeOptions,
    ) -> Result<BTreeMap<usize, Vec<SearchResult>>, SearchError> {
        let candidates = self.line_pronunciations(line);
        let mut results: BTreeMap<usize, Vec<SearchResult>> = BTreeMap::new();
        let mut seen: HashSet<(String, usize)> = HashSet::new();

        for (word_text, pron) in candidates {
            let deepest = options.max_syllables.min(pron.syllable_count());
            for depth in 1..=deepest {
                let Some(rhyme_key) = pron.rhyme_key(depth) else {
                    continue;
                };
                let search_options = SearchOptions {
                    pattern: Some(rhyme_key),
                    kind: PatternKind::Rhyme,
                    syllables: depth,
                    max_distance: options.max_distance,
                    min_similarity: options.min_similarity,
                    part_of_speech: options.part_of_speech.clone(),
                    limit: options.max_results,
                    ..Default::default()
                };
                for matched in self.search.search(&search_options)? {
                    if matched.word == word_text {
                        continue;
                    }
                    let key = (matched.word.clone(), depth);
                    if seen.contains(&key) {
                        continue;
                    }
                    seen.insert(key);
                    let bucket = results.entry(depth).or_default();
                    if options.max_results.map_or(true, |cap| bucket.len() < cap) {
                        bucket.push(matched);
                    }
                }
            }
        }
        Ok(results)
    }

    /// Perfect rhyme suggestions keyed by pronunciation text, the
    /// word's own entries excluded.
    pub fn perfect_rhymes(
        &self,
        word: &str,
        max_results: Option<usize>,
        part_of_speech: Option<&str>,
    ) -> BTreeMap<String, Vec<SearchResult>> {
        let entries = self.lexicon.pronunciations_for_word(word);
        let target_ids: HashSet<u32> = entries.iter().map(|e| e.word_id).collect();

        let mut suggestions = BTreeMap::new();
        for entry in entries {
            let Ok(pron) = Pronunciation::parse(&entry.pronunciation) else {
                continue;
            };
            let Some(key) = pron.perfect_rhyme_key() else {
                continue;
            };
            let matches =
                self.search
                    .perfect_rhyme_matches(&key, part_of_speech, max_results, &target_ids);
            suggestions.insert(pron.text(), matches);
        }
        suggestions
    }

    /// Pronunciations of the last line word the lexicon knows; scans
    /// words from the end until one has entries.
    fn line_pronunciations(&self, line: &str) -> Vec<(String, Pronunciation)> {
        let lowered = line.to_lowercase();
        let words: Vec<&str> = WORD_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut pronunciations = Vec::new();
        for word in words.into_iter().rev() {
            for entry in self.lexicon.pronunciations_for_word(word) {
                if let Ok(pron) = Pronunciation::parse(&entry.pronunciation) {
                    pronunciations.push((word.to_string(), pron));
                }
            }
            if !pronunciations.is_empty() {
                break;
            }
        }
        pronunciations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon_with(words: &[(&str, &str)]) -> Lexicon {
        let mut lex = Lexicon::new();
        for (word, phones) in words {
            let id = lex.add_word(word);
            lex.add_pronunciation(id, &Pronunciation::parse(phones).unwrap());
        }
        lex
    }

    fn bucket_words(results: &BTreeMap<usize, Vec<SearchResult>>, depth: usize) -> Vec<&str> {
        results[&depth].iter().map(|r| r.word.as_str()).collect()
    }

    #[test]
    fn test_suggest_rhymes_for_line() {
        let lex = lexicon_with(&[
            ("brown", "B R AW1 N"),
            ("crown", "K R AW1 N"),
            ("gown", "G AW1 N"),
            ("cat", "K AE1 T"),
        ]);
        let assistant = RhymeAssistant::new(&lex);
        let results = assistant
            .suggest_rhymes("a golden crown", &RhymeOptions::default())
            .unwrap();

        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![1]);
        // the query word itself never appears
        assert_eq!(bucket_words(&results, 1), vec!["brown", "gown"]);
    }

    #[test]
    fn test_unknown_trailing_words_are_skipped() {
        let lex = lexicon_with(&[("brown", "B R AW1 N"), ("gown", "G AW1 N")]);
        let assistant = RhymeAssistant::new(&lex);
        let results = assistant
            .suggest_rhymes("the gown zzz'qx", &RhymeOptions::default())
            .unwrap();
        assert_eq!(bucket_words(&results, 1), vec!["brown"]);
    }

    #[test]
    fn test_no_known_words_yields_nothing() {
        let lex = lexicon_with(&[("brown", "B R AW1 N")]);
        let assistant = RhymeAssistant::new(&lex);
        let results = assistant
            .suggest_rhymes("xyzzy qwerty", &RhymeOptions::default())
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_depth_buckets() {
        let lex = lexicon_with(&[
            ("spider", "S P AY1 D ER0"),
            ("glider", "G L AY1 D ER0"),
            ("rider", "R AY1 D ER0"),
            ("cider", "S AY1 D ER0"),
        ]);
        let assistant = RhymeAssistant::new(&lex);
        let results = assistant
            .suggest_rhymes("along came a spider", &RhymeOptions::default())
            .unwrap();

        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        // a word may appear at several depths
        assert_eq!(bucket_words(&results, 1), vec!["cider", "glider", "rider"]);
        assert_eq!(bucket_words(&results, 2), vec!["cider", "glider", "rider"]);
    }

    #[test]
    fn test_per_bucket_cap() {
        let lex = lexicon_with(&[
            ("spider", "S P AY1 D ER0"),
            ("glider", "G L AY1 D ER0"),
            ("rider", "R AY1 D ER0"),
            ("cider", "S AY1 D ER0"),
        ]);
        let assistant = RhymeAssistant::new(&lex);
        let options = RhymeOptions {
            max_results: Some(1),
            ..Default::default()
        };
        let results = assistant.suggest_rhymes("spider", &options).unwrap();
        assert_eq!(bucket_words(&results, 1), vec!["cider"]);
        assert_eq!(bucket_words(&results, 2), vec!["cider"]);
    }

    #[test]
    fn test_near_rhymes_via_max_distance() {
        let lex = lexicon_with(&[
            ("cat", "K AE1 T"),
            ("bat", "B AE1 T"),
            ("about", "AH0 B AW1 T"),
            ("gown", "G AW1 N"),
        ]);
        let assistant = RhymeAssistant::new(&lex);
        let options = RhymeOptions {
            max_distance: Some(1),
            ..Default::default()
        };
        let results = assistant.suggest_rhymes("the cat", &options).unwrap();
        // "about" ends AW1 T, one substitution away from AE1 T
        assert_eq!(bucket_words(&results, 1), vec!["about", "bat"]);
    }

    #[test]
    fn test_perfect_rhymes() {
        let lex = lexicon_with(&[
            ("cat", "K AE1 T"),
            ("bat", "B AE1 T"),
            ("hat", "HH AE1 T"),
            ("gown", "G AW1 N"),
        ]);
        let assistant = RhymeAssistant::new(&lex);
        let suggestions = assistant.perfect_rhymes("cat", None, None);

        assert_eq!(
            suggestions.keys().collect::<Vec<_>>(),
            vec![&"K AE1 T".to_string()]
        );
        let words: Vec<&str> = suggestions["K AE1 T"].iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["bat", "hat"]);
    }

    #[test]
    fn test_perfect_rhymes_per_pronunciation() {
        let mut lex = lexicon_with(&[
            ("reed", "R IY1 D"),
            ("red", "R EH1 D"),
            ("bead", "B IY1 D"),
        ]);
        let id = lex.add_word("read");
        lex.add_pronunciation(id, &Pronunciation::parse("R IY1 D").unwrap());
        lex.add_pronunciation(id, &Pronunciation::parse("R EH1 D").unwrap());

        let assistant = RhymeAssistant::new(&lex);
        let suggestions = assistant.perfect_rhymes("read", None, None);

        let keys: Vec<&str> = suggestions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["R EH1 D", "R IY1 D"]);
        let long: Vec<&str> = suggestions["R IY1 D"].iter().map(|r| r.word.as_str()).collect();
        assert_eq!(long, vec!["bead", "reed"]);
        let short: Vec<&str> = suggestions["R EH1 D"].iter().map(|r| r.word.as_str()).collect();
        assert_eq!(short, vec!["red"]);
    }

    #[test]
    fn test_perfect_rhymes_unknown_word() {
        let lex = lexicon_with(&[("cat", "K AE1 T")]);
        let assistant = RhymeAssistant::new(&lex);
        assert!(assistant.perfect_rhymes("dog", None, None).is_empty());
    }
}
