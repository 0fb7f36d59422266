//! Lexicon storage and corpus ingestion.

pub mod cmu;
pub mod glosses;
pub mod store;

pub use cmu::{ingest_cmu_file, ingest_cmu_text, CmuStats, IngestError};
pub use glosses::{ingest_gloss_file, ingest_gloss_text, GlossStats};
pub use store::{Gloss, Lexicon, LexiconError, PronEntry, LEXICON_FORMAT_VERSION};
