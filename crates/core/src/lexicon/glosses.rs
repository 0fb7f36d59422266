//! Gloss ingestion from tab-separated exports.
//!
//! Each line carries `word <TAB> pos <TAB> definition` with optional
//! `example` and `;`-separated `synonyms` columns. Lines starting with
//! `#` are comments.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;

use super::store::{Gloss, Lexicon};

lazy_static! {
    /// WordNet part-of-speech letters mapped to full tags.
    static ref POS_TAGS: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("n", "noun");
        map.insert("v", "verb");
        map.insert("a", "adjective");
        map.insert("s", "adjective");
        map.insert("r", "adverb");
        map
    };
}

/// Counters reported by a gloss ingest run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlossStats {
    /// Glosses attached to lexicon words.
    pub glosses: usize,
    /// Lines naming words absent from the lexicon.
    pub unknown_words: usize,
}

/// Ingest a tab-separated gloss file.
pub fn ingest_gloss_file(lexicon: &mut Lexicon, path: &Path) -> Result<GlossStats, std::io::Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(ingest_gloss_text(lexicon, &text))
}

/// Ingest tab-separated gloss text. Glosses for words the lexicon
/// does not contain are counted and skipped; malformed lines are
/// skipped with a warning.
pub fn ingest_gloss_text(lexicon: &mut Lexicon, text: &str) -> GlossStats {
    let mut stats = GlossStats::default();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 || fields[2].trim().is_empty() {
            log::warn!("skipping malformed gloss line {}", number + 1);
            continue;
        }
        let word = fields[0].trim();
        let Some(word_id) = lexicon.word_id(word) else {
            stats.unknown_words += 1;
            continue;
        };
        let example = fields
            .get(3)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let synonyms = fields
            .get(4)
            .map(|s| {
                s.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        lexicon.add_gloss(
            word_id,
            Gloss {
                part_of_speech: normalize_pos(fields[1]),
                definition: fields[2].trim().to_string(),
                example,
                source: "wordnet".to_string(),
                synonyms,
            },
        );
        stats.glosses += 1;
    }

    stats
}

/// Map a part-of-speech field to a canonical tag. Single WordNet
/// letters expand to full tags; full tags pass through; anything else
/// is dropped.
fn normalize_pos(field: &str) -> Option<String> {
    let tag = field.trim().to_lowercase();
    if tag.is_empty() {
        return None;
    }
    if let Some(full) = POS_TAGS.get(tag.as_str()) {
        return Some((*full).to_string());
    }
    if POS_TAGS.values().any(|&full| full == tag) {
        return Some(tag);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonetics::Pronunciation;

    fn lexicon_with(words: &[(&str, &str)]) -> Lexicon {
        let mut lex = Lexicon::new();
        for (word, phones) in words {
            let id = lex.add_word(word);
            lex.add_pronunciation(id, &Pronunciation::parse(phones).unwrap());
        }
        lex
    }

    #[test]
    fn test_ingest_glosses() {
        let mut lex = lexicon_with(&[("cat", "K AE1 T"), ("bark", "B AA1 R K")]);
        let text = "\
# word\tpos\tdefinition\texample\tsynonyms
cat\tn\ta small domesticated feline\tthe cat sat\tfeline;kitty
bark\tv\tto speak sharply\t\t
dog\tn\ta canine
bad line
";
        let stats = ingest_gloss_text(&mut lex, text);
        assert_eq!(stats.glosses, 2);
        assert_eq!(stats.unknown_words, 1);

        let id = lex.word_id("cat").unwrap();
        let glosses = lex.glosses(id);
        assert_eq!(glosses.len(), 1);
        assert_eq!(glosses[0].part_of_speech.as_deref(), Some("noun"));
        assert_eq!(glosses[0].example.as_deref(), Some("the cat sat"));
        assert_eq!(glosses[0].synonyms, vec!["feline", "kitty"]);

        let bark = lex.word_id("bark").unwrap();
        assert_eq!(lex.glosses(bark)[0].part_of_speech.as_deref(), Some("verb"));
        assert_eq!(lex.glosses(bark)[0].example, None);
        assert!(lex.glosses(bark)[0].synonyms.is_empty());
    }

    #[test]
    fn test_pos_normalization() {
        assert_eq!(normalize_pos("n").as_deref(), Some("noun"));
        assert_eq!(normalize_pos("s").as_deref(), Some("adjective"));
        assert_eq!(normalize_pos("ADVERB").as_deref(), Some("adverb"));
        assert_eq!(normalize_pos("verb").as_deref(), Some("verb"));
        assert_eq!(normalize_pos("x"), None);
        assert_eq!(normalize_pos(""), None);
    }

    #[test]
    fn test_file_ingest() {
        let dir = std::env::temp_dir().join(format!("couplet_gloss_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("glosses.tsv");
        std::fs::write(&path, "cat\tn\ta feline\n").unwrap();

        let mut lex = lexicon_with(&[("cat", "K AE1 T")]);
        let stats = ingest_gloss_file(&mut lex, &path).unwrap();
        assert_eq!(stats.glosses, 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
