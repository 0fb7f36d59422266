//! The closed ARPABET phoneme inventory and per-token classification.
//!
//! Vowel tokens may carry a trailing stress digit (0 = unstressed,
//! 1 = primary, 2 = secondary); consonants never do. Multi-character
//! symbols such as "TH" and "CH" are atomic.

use std::collections::HashSet;

use thiserror::Error;

lazy_static::lazy_static! {
    /// Base vowel symbols, stress digit stripped.
    static ref VOWELS: HashSet<&'static str> = {
        [
            "AA", "AE", "AH", "AO", "AW", "AY",
            "EH", "ER", "EY", "IH", "IY",
            "OW", "OY", "UH", "UW",
        ].into_iter().collect()
    };

    /// Consonant symbols.
    static ref CONSONANTS: HashSet<&'static str> = {
        [
            "B", "CH", "D", "DH", "F", "G", "HH", "JH", "K", "L",
            "M", "N", "NG", "P", "R", "S", "SH", "T", "TH", "V",
            "W", "Y", "Z", "ZH",
        ].into_iter().collect()
    };
}

/// A token that is not part of the phoneme inventory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown phoneme '{token}'")]
pub struct UnknownPhonemeError {
    /// The offending symbol, verbatim.
    pub token: String,
}

impl UnknownPhonemeError {
    pub fn new(token: impl Into<String>) -> Self {
        UnknownPhonemeError { token: token.into() }
    }
}

/// Classification of a single phoneme token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonemeClass {
    /// A vowel, with its stress digit if one was attached.
    Vowel { stress: Option<u8> },
    /// A consonant (never carries a stress digit).
    Consonant,
}

/// Strip the trailing stress digit from a token, if any.
pub fn base(token: &str) -> &str {
    token.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// True if the token is a vowel (with or without a stress digit).
pub fn is_vowel(token: &str) -> bool {
    VOWELS.contains(base(token))
}

/// True if the token is a bare consonant symbol.
pub fn is_consonant(token: &str) -> bool {
    CONSONANTS.contains(token)
}

/// The stress digit attached to a token, if any.
///
/// Purely syntactic: does not check inventory membership.
pub fn stress_of(token: &str) -> Option<u8> {
    token
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

/// Classify a token against the inventory.
///
/// Rejects consonants carrying digits, stress digits outside 0..=2,
/// and any symbol outside the inventory.
pub fn classify(token: &str) -> Result<PhonemeClass, UnknownPhonemeError> {
    let stem = base(token);
    let suffix = &token[stem.len()..];

    if VOWELS.contains(stem) {
        let stress = match suffix {
            "" => None,
            "0" => Some(0),
            "1" => Some(1),
            "2" => Some(2),
            _ => return Err(UnknownPhonemeError::new(token)),
        };
        return Ok(PhonemeClass::Vowel { stress });
    }

    if suffix.is_empty() && CONSONANTS.contains(stem) {
        return Ok(PhonemeClass::Consonant);
    }

    Err(UnknownPhonemeError::new(token))
}

/// Validate every token in a sequence, reporting the first offender.
pub fn ensure_known(tokens: &[String]) -> Result<(), UnknownPhonemeError> {
    for token in tokens {
        classify(token)?;
    }
    Ok(())
}

/// Split a pronunciation string into phoneme tokens.
pub fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_string()).collect()
}
