//! Per-syllable pattern grammar: parser and windowed matcher.

pub mod matcher;
pub mod parse;

pub use matcher::{find_match, MatchMode, MatchSpan};
pub use parse::{
    parse, ClusterPattern, ClusterToken, PatternSyntaxError, SyllablePattern, VowelAlt,
    VowelPattern,
};
