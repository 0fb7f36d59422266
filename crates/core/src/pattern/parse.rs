//! Parser for the per-syllable pattern grammar.
//!
//! A pattern is a whitespace-separated list of chunks, one per syllable:
//! `onset '-' vowels ['/' coda] [stress]`. Whitespace inside bracket,
//! paren, or brace groups does not split chunks.

use thiserror::Error;

use crate::phonetics::inventory;
use crate::wildcard::{self, WildcardPattern};

/// Malformed pattern text. `position` is a byte offset into the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pattern syntax error at byte {position}: {reason}")]
pub struct PatternSyntaxError {
    pub position: usize,
    pub reason: String,
}

impl PatternSyntaxError {
    fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

/// One element of an onset or coda sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterToken {
    /// A literal consonant.
    Literal(String),
    /// Exactly one consonant of any value (`?`).
    One,
    /// Any run of consonants, possibly empty (`*`).
    Run,
    /// One consonant drawn from a set (`[S|Z]`).
    OneOf(Vec<String>),
}

/// Constraint over a syllable's onset or coda cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterPattern {
    /// Matches any cluster (omitted coda).
    Unconstrained,
    /// The cluster must be empty.
    Empty,
    /// The cluster must match one token sequence.
    Sequence(Vec<ClusterToken>),
    /// The cluster must match one of several sequences.
    AnyOf(Vec<Vec<ClusterToken>>),
}

/// One alternative in a vowel zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VowelAlt {
    /// A literal base vowel.
    Base(String),
    /// A glob over base vowels.
    Glob(WildcardPattern),
}

/// Constraint over a syllable's base vowel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VowelPattern {
    /// Any vowel.
    Any,
    /// One of the listed alternatives.
    OneOf(Vec<VowelAlt>),
}

/// Compiled constraints for one syllable position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllablePattern {
    pub onset: ClusterPattern,
    pub vowel: VowelPattern,
    pub coda: ClusterPattern,
    /// Acceptable stress digits, sorted; `None` means don't-care.
    pub stress: Option<Vec<u8>>,
}

/// Markers that pin an onset or coda to the empty cluster (case-insensitive).
const EMPTY_MARKERS: [&str; 4] = ["Ø", "0", "NONE", "NULL"];

type StressSpec = Option<Vec<u8>>;

/// Parse pattern text into one `SyllablePattern` per chunk.
pub fn parse(text: &str) -> Result<Vec<SyllablePattern>, PatternSyntaxError> {
    let chunks = tokenize(text)?;
    if chunks.is_empty() {
        return Err(PatternSyntaxError::new(0, "empty pattern"));
    }
    chunks
        .iter()
        .map(|(pos, chunk)| parse_chunk(*pos, chunk))
        .collect()
}

/// Split pattern text on whitespace, keeping grouped text intact.
fn tokenize(text: &str) -> Result<Vec<(usize, String)>, PatternSyntaxError> {
    let mut chunks: Vec<(usize, String)> = Vec::new();
    let mut current = String::new();
    let mut start = 0usize;
    let mut open_positions: Vec<usize> = Vec::new();
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => open_positions.push(i),
            ')' | ']' | '}' => {
                if open_positions.pop().is_none() {
                    return Err(PatternSyntaxError::new(i, format!("unmatched '{ch}'")));
                }
            }
            _ => {}
        }
        if ch.is_whitespace() && open_positions.is_empty() {
            if !current.is_empty() {
                chunks.push((start, std::mem::take(&mut current)));
            }
        } else {
            if current.is_empty() {
                start = i;
            }
            current.push(ch);
        }
    }
    if let Some(&pos) = open_positions.last() {
        return Err(PatternSyntaxError::new(pos, "unmatched opening bracket"));
    }
    if !current.is_empty() {
        chunks.push((start, current));
    }
    Ok(chunks)
}

fn parse_chunk(pos: usize, chunk: &str) -> Result<SyllablePattern, PatternSyntaxError> {
    let (core, block_stress) = extract_stress_block(pos, chunk)?;
    let core = core.trim();
    if core.is_empty() {
        return Err(PatternSyntaxError::new(
            pos,
            format!("'{chunk}' has no syllable body"),
        ));
    }
    let dash = find_depth0(core, '-').ok_or_else(|| {
        PatternSyntaxError::new(pos, format!("'{chunk}' is missing the '-' onset separator"))
    })?;
    let onset = parse_component(pos, &core[..dash])?;
    let remainder = &core[dash + 1..];
    let (vowel_text, coda) = match find_depth0(remainder, '/') {
        Some(slash) => (
            &remainder[..slash],
            parse_component(pos, &remainder[slash + 1..])?,
        ),
        None => (remainder, ClusterPattern::Unconstrained),
    };
    let (vowel, vowel_stress) = parse_vowel_zone(pos, vowel_text)?;
    let stress = match (block_stress, vowel_stress) {
        (Some(_), Some(_)) => {
            return Err(PatternSyntaxError::new(
                pos,
                format!("'{chunk}' specifies stress more than once"),
            ))
        }
        (block, vowel) => block.or(vowel).unwrap_or(None),
    };
    Ok(SyllablePattern {
        onset,
        vowel,
        coda,
        stress,
    })
}

/// Byte index of the first `needle` outside any bracket group.
fn find_depth0(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Pull at most one `{...}` stress block out of a chunk.
///
/// The outer `Option` records whether a block was present at all, so a
/// don't-care block still conflicts with a later stress constraint.
fn extract_stress_block(
    pos: usize,
    chunk: &str,
) -> Result<(String, Option<StressSpec>), PatternSyntaxError> {
    let open = match chunk.find('{') {
        Some(i) => i,
        None => {
            if chunk.contains('}') {
                return Err(PatternSyntaxError::new(
                    pos,
                    format!("'{chunk}' has mismatched braces"),
                ));
            }
            return Ok((chunk.to_string(), None));
        }
    };
    let close = match chunk[open + 1..].find('}') {
        Some(j) => open + 1 + j,
        None => {
            return Err(PatternSyntaxError::new(
                pos,
                format!("'{chunk}' has mismatched braces"),
            ))
        }
    };
    let after = &chunk[close + 1..];
    if after.contains('{') {
        return Err(PatternSyntaxError::new(
            pos,
            format!("'{chunk}' has more than one stress block"),
        ));
    }
    if chunk[..open].contains('}') || after.contains('}') {
        return Err(PatternSyntaxError::new(
            pos,
            format!("'{chunk}' has mismatched braces"),
        ));
    }
    let spec = parse_stress_symbols(pos, &chunk[open + 1..close])?;
    let rest = format!("{}{}", &chunk[..open], after);
    Ok((rest.trim().to_string(), Some(spec)))
}

/// Parse the inside of a stress block into accepted digits.
fn parse_stress_symbols(pos: usize, raw: &str) -> Result<StressSpec, PatternSyntaxError> {
    let spec = raw.trim();
    if spec.is_empty() || spec == "*" {
        return Ok(None);
    }
    let mut digits: Vec<u8> = Vec::new();
    for ch in spec.chars() {
        match ch {
            '0'..='2' => digits.push(ch as u8 - b'0'),
            'P' | 'p' => digits.push(1),
            'S' | 's' => digits.push(2),
            'U' | 'u' => digits.push(0),
            ',' | '|' | '_' | '.' | '+' => {}
            c if c.is_whitespace() => {}
            c => {
                return Err(PatternSyntaxError::new(
                    pos,
                    format!("unknown stress marker '{c}'"),
                ))
            }
        }
    }
    if digits.is_empty() {
        return Ok(None);
    }
    digits.sort_unstable();
    digits.dedup();
    Ok(Some(digits))
}

/// Parse an onset or coda component.
fn parse_component(pos: usize, text: &str) -> Result<ClusterPattern, PatternSyntaxError> {
    let raw = text.trim();
    if raw.is_empty() {
        return Ok(ClusterPattern::Empty);
    }
    let normalized = normalize_separators(strip_outer_group(raw));
    let upper = normalized.to_uppercase();
    if upper.is_empty() || EMPTY_MARKERS.contains(&upper.as_str()) {
        return Ok(ClusterPattern::Empty);
    }
    let mut alternatives: Vec<Vec<ClusterToken>> = Vec::new();
    for alt in split_alternatives(&normalized) {
        let alt = alt.trim();
        if alt.is_empty() {
            return Err(PatternSyntaxError::new(
                pos,
                format!("empty alternative in component '{text}'"),
            ));
        }
        let mut tokens = Vec::new();
        for element in split_elements(alt) {
            tokens.push(parse_element(pos, element)?);
        }
        alternatives.push(tokens);
    }
    if alternatives.len() == 1 {
        Ok(ClusterPattern::Sequence(alternatives.remove(0)))
    } else {
        Ok(ClusterPattern::AnyOf(alternatives))
    }
}

/// Remove one outer bracket or paren pair when it wraps the whole text.
fn strip_outer_group(text: &str) -> &str {
    let t = text.trim();
    if !(t.starts_with('(') && t.ends_with(')')) && !(t.starts_with('[') && t.ends_with(']')) {
        return t;
    }
    let mut depth = 0usize;
    for (i, ch) in t.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    // strip only when the opener closes at the very end
                    return if i == t.len() - 1 { t[1..i].trim() } else { t };
                }
            }
            _ => {}
        }
    }
    t
}

/// Replace the `_ . +` separators with spaces and collapse runs.
fn normalize_separators(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if matches!(c, '_' | '.' | '+') { ' ' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on `|` and `,` outside bracket groups.
fn split_alternatives(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '|' | ',' if depth == 0 => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&text[start..]);
    out
}

/// Split a sequence into elements on spaces outside bracket groups.
fn split_elements(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if ch == ' ' && depth == 0 {
            if let Some(s) = start.take() {
                out.push(&text[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}

fn parse_element(pos: usize, element: &str) -> Result<ClusterToken, PatternSyntaxError> {
    match element {
        "*" => Ok(ClusterToken::Run),
        "?" => Ok(ClusterToken::One),
        _ if element.starts_with('[') && element.ends_with(']') => {
            parse_choice_block(pos, &element[1..element.len() - 1])
        }
        _ if inventory::is_consonant(element) => Ok(ClusterToken::Literal(element.to_string())),
        _ => Err(PatternSyntaxError::new(
            pos,
            format!("'{element}' is not a known consonant"),
        )),
    }
}

fn parse_choice_block(pos: usize, inner: &str) -> Result<ClusterToken, PatternSyntaxError> {
    let mut choices: Vec<String> = Vec::new();
    for piece in inner.split([' ', ',', '|']) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        if !inventory::is_consonant(piece) {
            return Err(PatternSyntaxError::new(
                pos,
                format!("'{piece}' is not a known consonant"),
            ));
        }
        if !choices.iter().any(|c| c == piece) {
            choices.push(piece.to_string());
        }
    }
    if choices.is_empty() {
        return Err(PatternSyntaxError::new(pos, "empty choice block"));
    }
    Ok(ClusterToken::OneOf(choices))
}

/// Parse the vowel zone, which may carry its own stress constraint.
///
/// A trailing `[...]` whose content is all stress symbols is a stress
/// constraint; a stress digit on a lone plain vowel (`ER0`) is shorthand
/// for the same.
fn parse_vowel_zone(
    pos: usize,
    text: &str,
) -> Result<(VowelPattern, Option<StressSpec>), PatternSyntaxError> {
    let mut t = text.trim();
    let mut stress: Option<StressSpec> = None;
    if t.ends_with(']') {
        if let Some(open) = t.rfind('[') {
            let content = &t[open + 1..t.len() - 1];
            if content.chars().all(is_stress_symbol) {
                stress = Some(parse_stress_symbols(pos, content)?);
                t = t[..open].trim_end();
            }
        }
    }
    if t.is_empty() {
        return Err(PatternSyntaxError::new(pos, "missing vowel specification"));
    }
    let normalized = normalize_separators(strip_outer_group(t));
    let mut alts: Vec<&str> = normalized
        .split([' ', '|', ','])
        .filter(|p| !p.is_empty())
        .collect();
    if alts.is_empty() {
        return Err(PatternSyntaxError::new(pos, "missing vowel specification"));
    }
    if alts.len() == 1 {
        if let Some(base) = split_stress_digit(pos, alts[0], &mut stress)? {
            alts[0] = base;
        }
    } else {
        for alt in &alts {
            if !wildcard::has_glob(alt) && alt.ends_with(|c: char| c.is_ascii_digit()) {
                return Err(PatternSyntaxError::new(
                    pos,
                    format!("stress digit on '{alt}' is not allowed in a vowel alternation; use a stress block"),
                ));
            }
        }
    }
    if alts.iter().any(|a| *a == "*") {
        return Ok((VowelPattern::Any, stress));
    }
    let mut vowel_alts = Vec::new();
    for alt in alts {
        if wildcard::has_glob(alt) {
            let glob = WildcardPattern::new(alt).map_err(|e| {
                PatternSyntaxError::new(pos, format!("bad vowel wildcard '{alt}': {e}"))
            })?;
            vowel_alts.push(VowelAlt::Glob(glob));
        } else if inventory::is_vowel(alt) && inventory::stress_of(alt).is_none() {
            vowel_alts.push(VowelAlt::Base(alt.to_string()));
        } else {
            return Err(PatternSyntaxError::new(
                pos,
                format!("'{alt}' is not a known vowel"),
            ));
        }
    }
    Ok((VowelPattern::OneOf(vowel_alts), stress))
}

/// Apply the trailing-digit shorthand on a lone plain vowel alternative.
fn split_stress_digit<'a>(
    pos: usize,
    alt: &'a str,
    stress: &mut Option<StressSpec>,
) -> Result<Option<&'a str>, PatternSyntaxError> {
    if wildcard::has_glob(alt) || !alt.ends_with(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }
    let (base, digit_text) = alt.split_at(alt.len() - 1);
    let digit = digit_text.as_bytes()[0] - b'0';
    if digit > 2 || !inventory::is_vowel(base) || inventory::stress_of(base).is_some() {
        return Err(PatternSyntaxError::new(
            pos,
            format!("'{alt}' is not a known vowel"),
        ));
    }
    if stress.is_some() {
        return Err(PatternSyntaxError::new(
            pos,
            format!("'{alt}' specifies stress more than once"),
        ));
    }
    *stress = Some(Some(vec![digit]));
    Ok(Some(base))
}

fn is_stress_symbol(ch: char) -> bool {
    matches!(
        ch,
        '0'..='2' | 'P' | 'p' | 'S' | 's' | 'U' | 'u' | '*' | ',' | '|' | '_' | '.' | '+'
    ) || ch.is_whitespace()
}
