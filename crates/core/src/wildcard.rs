//! Glob-style wildcard matching over phoneme and feature strings.

use regex::Regex;

/// A compiled wildcard pattern, anchored at both ends.
///
/// `*` matches zero or more characters, `?` matches exactly one, and
/// `\*`/`\?` match the literal characters. A backslash before any
/// other character matches a literal backslash.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    pattern: String,
    regex: Regex,
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for WildcardPattern {}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&compile_pattern(pattern))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The original wildcard text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Return true if `text` contains a `*` or `?` metacharacter.
pub fn has_glob(text: &str) -> bool {
    text.contains(['*', '?'])
}

/// Translate a wildcard pattern into an anchored regex pattern.
fn compile_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');

    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                let next = chars[i + 1];
                if matches!(
                    next,
                    '*' | '?' | '^' | '$' | '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
                        | '\\'
                ) {
                    out.push('\\');
                } else {
                    // a backslash not escaping a metacharacter is itself literal
                    out.push_str("\\\\");
                }
                out.push(next);
                i += 1;
            }
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c @ ('^' | '$' | '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\') => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }

    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_any_run() {
        let p = WildcardPattern::new("A*").unwrap();
        assert!(p.matches("AE"));
        assert!(p.matches("A"));
        assert!(p.matches("AW1 T"));
        assert!(!p.matches("EY"));
    }

    #[test]
    fn test_question_matches_one() {
        let p = WildcardPattern::new("A?").unwrap();
        assert!(p.matches("AE"));
        assert!(p.matches("AH"));
        assert!(!p.matches("A"));
        assert!(!p.matches("AXX"));
    }

    #[test]
    fn test_anchored_both_ends() {
        let p = WildcardPattern::new("ER").unwrap();
        assert!(p.matches("ER"));
        assert!(!p.matches("ER0"));
        assert!(!p.matches("B ER"));
    }

    #[test]
    fn test_stress_shape() {
        let p = WildcardPattern::new("1*0").unwrap();
        assert!(p.matches("10"));
        assert!(p.matches("1020"));
        assert!(!p.matches("01"));
    }

    #[test]
    fn test_escaped_metacharacters() {
        let p = WildcardPattern::new("a\\*b").unwrap();
        assert!(p.matches("a*b"));
        assert!(!p.matches("axb"));
    }

    #[test]
    fn test_backslash_before_ordinary_char_stays_literal() {
        // "\d" must not become a regex digit class
        let p = WildcardPattern::new("\\d").unwrap();
        assert!(p.matches("\\d"));
        assert!(!p.matches("5"));
        assert!(!p.matches("d"));
        let p = WildcardPattern::new("\\\\").unwrap();
        assert!(p.matches("\\"));
    }

    #[test]
    fn test_has_glob() {
        assert!(has_glob("A*"));
        assert!(has_glob("?"));
        assert!(!has_glob("AE1 T"));
    }
}
