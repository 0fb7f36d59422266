//! Couplet CLI — phonetic lexicon search and rhyme assistance.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use couplet_core::lexicon::{ingest_cmu_file, ingest_gloss_file, Lexicon};
use couplet_core::rhymes::{RhymeAssistant, RhymeOptions};
use couplet_core::search::{SearchEngine, SearchOptions, SearchResult};
use couplet_core::syllables::syllabify;

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "couplet",
    about = "Phonetic lexicon search and rhyme assistant",
    version,
)]
struct Cli {
    /// Lexicon file path
    #[arg(long, global = true, default_value = "couplet-lexicon.json")]
    lexicon: PathBuf,

    /// Show verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the lexicon from corpus files
    Ingest(IngestArgs),
    /// Search for rhymes and phonetic patterns
    Search(SearchArgs),
    /// Show pronunciations, syllables, and glosses for a word
    Word(WordArgs),
    /// Suggest words that rhyme with the end of a line
    RhymesWith(RhymesWithArgs),
}

// ─── Ingest ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Build the lexicon from a CMU dictionary and optional glosses")]
struct IngestArgs {
    /// Path to a CMU pronouncing dictionary file
    #[arg(long)]
    cmu: PathBuf,

    /// Path to a tab-separated gloss export
    #[arg(long)]
    glosses: Option<PathBuf>,

    /// Abort on the first unknown phoneme instead of skipping
    #[arg(long, default_value_t = false)]
    strict: bool,
}

// ─── Search ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Search for rhymes and phonetic patterns")]
struct SearchArgs {
    /// Phoneme pattern to match
    pattern: Option<String>,

    /// Feature sequence to match against
    #[arg(long, default_value = "rhyme", value_parser = ["rhyme", "vowel", "consonant", "both", "phonemes", "syllable"])]
    kind: String,

    /// Rhyme-key depth in syllables
    #[arg(long, default_value_t = 1)]
    syllables: usize,

    /// Treat the pattern as a regular expression
    #[arg(long, default_value_t = false)]
    regex: bool,

    /// Allow substring matches instead of whole-sequence matches
    #[arg(long, default_value_t = false)]
    contains: bool,

    /// Maximum edit distance for near matches
    #[arg(long)]
    max_distance: Option<u32>,

    /// Minimum similarity score for near matches (0-1)
    #[arg(long)]
    min_similarity: Option<f64>,

    /// Stress pattern wildcard (use * and ?)
    #[arg(long)]
    stress: Option<String>,

    /// Ignore stress constraints in syllable patterns
    #[arg(long, default_value_t = false)]
    ignore_stress: bool,

    /// Part of speech filter (noun, verb, adjective, adverb)
    #[arg(long)]
    pos: Option<String>,

    /// Keep words whose definition contains this text
    #[arg(long)]
    definition: Option<String>,

    /// Keep words listing this synonym
    #[arg(long)]
    synonym: Option<String>,

    /// Maximum number of results
    #[arg(long, default_value_t = 25)]
    limit: usize,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Word ────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Show pronunciations, syllables, and glosses for a word")]
struct WordArgs {
    /// Word to inspect
    word: String,

    /// Print as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Rhymes-with ─────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Suggest words that rhyme with the end of a line")]
struct RhymesWithArgs {
    /// Input line to analyse
    #[arg(required = true)]
    line: Vec<String>,

    /// Maximum syllables to match
    #[arg(long, default_value_t = 3)]
    max_syllables: usize,

    /// Maximum edit distance for near rhymes
    #[arg(long)]
    max_distance: Option<u32>,

    /// Minimum similarity score for near rhymes (0-1)
    #[arg(long)]
    min_similarity: Option<f64>,

    /// Part of speech filter for rhymes
    #[arg(long)]
    pos: Option<String>,

    /// Maximum suggestions per syllable count
    #[arg(long, default_value_t = 15)]
    limit: usize,

    /// Print as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Ingest(args) => run_ingest(&cli.lexicon, args),
        Command::Search(args) => run_search(&cli.lexicon, args),
        Command::Word(args) => run_word(&cli.lexicon, args),
        Command::RhymesWith(args) => run_rhymes_with(&cli.lexicon, args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

fn load_lexicon(path: &Path) -> Result<Lexicon> {
    if !path.exists() {
        bail!(
            "Lexicon {} does not exist. Run 'couplet ingest' first.",
            path.display()
        );
    }
    Lexicon::load(path).with_context(|| format!("Failed to load lexicon {}", path.display()))
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No matches found");
        return;
    }
    let word_width = results.iter().map(|r| r.word.len()).fold(4, usize::max);
    let pron_width = results
        .iter()
        .map(|r| r.pronunciation.len())
        .fold(13, usize::max);
    println!(
        "{:<word_width$}  {:<pron_width$}  {:<6}  {:<10}  Definition",
        "Word", "Pronunciation", "Stress", "Similarity"
    );
    for result in results {
        let similarity = result
            .similarity
            .map(|s| format!("{:.3}", s))
            .unwrap_or_default();
        let definition = result
            .glosses
            .first()
            .map(|g| g.definition.as_str())
            .unwrap_or("");
        println!(
            "{:<word_width$}  {:<pron_width$}  {:<6}  {:<10}  {}",
            result.word, result.pronunciation, result.stress_pattern, similarity, definition
        );
    }
}

// ─── Ingest runner ───────────────────────────────────────────────

fn run_ingest(lexicon_path: &Path, args: IngestArgs) -> Result<()> {
    let mut lexicon = Lexicon::new();

    log::info!("Ingesting pronunciations from {}", args.cmu.display());
    let stats = ingest_cmu_file(&mut lexicon, &args.cmu, args.strict)
        .with_context(|| format!("Failed to ingest {}", args.cmu.display()))?;
    log::info!(
        "Loaded {} words, {} pronunciations ({} skipped)",
        stats.words,
        stats.pronunciations,
        stats.skipped
    );

    if let Some(gloss_path) = &args.glosses {
        log::info!("Ingesting glosses from {}", gloss_path.display());
        let gloss_stats = ingest_gloss_file(&mut lexicon, gloss_path)
            .with_context(|| format!("Failed to ingest {}", gloss_path.display()))?;
        log::info!(
            "Attached {} glosses ({} unknown words)",
            gloss_stats.glosses,
            gloss_stats.unknown_words
        );
    }

    lexicon
        .save(lexicon_path)
        .with_context(|| format!("Failed to save lexicon {}", lexicon_path.display()))?;
    println!("Lexicon created at {}", lexicon_path.display());
    Ok(())
}

// ─── Search runner ───────────────────────────────────────────────

fn run_search(lexicon_path: &Path, args: SearchArgs) -> Result<()> {
    let lexicon = load_lexicon(lexicon_path)?;
    let engine = SearchEngine::new(&lexicon);

    let options = SearchOptions {
        pattern: args.pattern,
        kind: args.kind.parse()?,
        syllables: args.syllables,
        regex: args.regex,
        contains: args.contains,
        max_distance: args.max_distance,
        min_similarity: args.min_similarity,
        stress_pattern: args.stress,
        ignore_stress: args.ignore_stress,
        part_of_speech: args.pos,
        definition_query: args.definition,
        synonym_query: args.synonym,
        limit: Some(args.limit),
    };
    let results = engine.search(&options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    print_results(&results);
    Ok(())
}

// ─── Word runner ─────────────────────────────────────────────────

fn run_word(lexicon_path: &Path, args: WordArgs) -> Result<()> {
    let lexicon = load_lexicon(lexicon_path)?;
    let assistant = RhymeAssistant::new(&lexicon);

    let pronunciations = assistant.pronunciations_for_word(&args.word);
    let glosses = match lexicon.word_id(&args.word) {
        Some(id) => lexicon.glosses(id),
        None => &[],
    };

    if args.json {
        let entries: Vec<serde_json::Value> = pronunciations
            .iter()
            .map(|pron| {
                serde_json::json!({
                    "pronunciation": pron.text(),
                    "syllable_count": pron.syllable_count(),
                    "stress_pattern": pron.stress_pattern(),
                    "syllables": syllabify(pron.phonemes()),
                })
            })
            .collect();
        let doc = serde_json::json!({
            "word": args.word,
            "pronunciations": entries,
            "glosses": glosses,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if pronunciations.is_empty() {
        println!("No pronunciations found for {}", args.word);
        return Ok(());
    }

    println!("Pronunciations for {}:", args.word);
    for pron in &pronunciations {
        println!(
            "  - {} (syllables={}, stress={})",
            pron.text(),
            pron.syllable_count(),
            pron.stress_pattern()
        );
        let parts: Vec<String> = syllabify(pron.phonemes())
            .iter()
            .map(|s| s.phonemes().join(" "))
            .collect();
        println!("    syllables: {}", parts.join(" . "));
    }

    if !glosses.is_empty() {
        println!("Definitions:");
        for gloss in glosses {
            let pos = gloss.part_of_speech.as_deref().unwrap_or("-");
            let mut line = format!("  - ({}) {}", pos, gloss.definition);
            if !gloss.synonyms.is_empty() {
                line.push_str(&format!(" | synonyms: {}", gloss.synonyms.join(", ")));
            }
            if let Some(example) = &gloss.example {
                line.push_str(&format!(" | example: {}", example));
            }
            println!("{}", line);
        }
    }
    Ok(())
}

// ─── Rhymes-with runner ──────────────────────────────────────────

fn run_rhymes_with(lexicon_path: &Path, args: RhymesWithArgs) -> Result<()> {
    let lexicon = load_lexicon(lexicon_path)?;
    let assistant = RhymeAssistant::new(&lexicon);

    let line = args.line.join(" ");
    let options = RhymeOptions {
        max_syllables: args.max_syllables,
        max_results: Some(args.limit),
        max_distance: args.max_distance,
        min_similarity: args.min_similarity,
        part_of_speech: args.pos,
    };
    let suggestions = assistant.suggest_rhymes(&line, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No rhymes found");
        return Ok(());
    }
    // deepest rhymes first
    for (depth, bucket) in suggestions.iter().rev() {
        println!("Last {} syllable(s):", depth);
        if bucket.is_empty() {
            println!("  (no matches)");
            continue;
        }
        for suggestion in bucket {
            match suggestion.similarity {
                Some(score) if score < 1.0 => println!(
                    "  {} ({}) ~{:.2}",
                    suggestion.word, suggestion.pronunciation, score
                ),
                _ => println!("  {} ({})", suggestion.word, suggestion.pronunciation),
            }
        }
    }
    Ok(())
}
