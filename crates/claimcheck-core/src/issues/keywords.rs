//! Severity keyword sets.
//!
//! A keyword matches a case-insensitive substring that starts and ends on a
//! word boundary, so "altered" does not match "unaltered" and "forged" does
//! not match "forgot". An occurrence directly preceded by a negation
//! ("not a fake", "no signs of tampering") does not count.
//!
//! The defaults are versioned data and can be replaced wholesale from
//! configuration.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Forgery and tampering language plus editing-tool names.
    pub static ref CRITICAL_KEYWORDS: Vec<&'static str> = vec![
        "forged",
        "forgery",
        "forgeries",
        "forging",
        "tamper",
        "tampered",
        "tampering",
        "fake",
        "faked",
        "fabricated",
        "fabrication",
        "counterfeit",
        "manipulated",
        "manipulation",
        "altered",
        "doctored",
        "don't match",
        "doesn't match",
        "do not match",
        "does not match",
        "mismatch",
        "mismatched",
        "editing software",
        "photoshop",
        "gimp",
        "lightroom",
        "capture one",
        "affinity",
        "pixelmator",
        "paint.net",
        "corel",
        "snapseed",
        "vsco",
    ];

    /// Encryption, corruption and processing failures. Never a fraud signal.
    pub static ref TECHNICAL_KEYWORDS: Vec<&'static str> = vec![
        "encrypt",
        "encrypted",
        "encryption",
        "password",
        "corrupt",
        "corrupted",
        "corruption",
        "damaged file",
        "unreadable",
        "cannot be read",
        "could not be read",
        "failed to extract",
        "failed to parse",
        "parse error",
        "parsing issue",
        "parsing error",
        "timed out",
        "analysis failed",
        "validation failed",
        "unknown file type",
        "unsupported",
    ];

    /// Weak heuristics: missing provenance, location, staleness, quality.
    pub static ref SUSPICIOUS_KEYWORDS: Vec<&'static str> = vec![
        "no gps",
        "gps coordinates",
        "outside",
        "location cannot be verified",
        "no capture date",
        "no camera",
        "no device",
        "stripped",
        "downloaded",
        "too old",
        "before the",
        "in the future",
        "stale",
        "low resolution",
        "thumbnail",
        "heavily compressed",
        "government stamp",
    ];

    /// Messages about encryption; at most one survives deduplication.
    pub static ref ENCRYPTION_KEYWORDS: Vec<&'static str> = vec![
        "encrypt",
        "encrypted",
        "encryption",
        "password protected",
        "password-protected",
    ];

    /// Messages about corrupt or unparseable containers; at most one survives.
    pub static ref CORRUPTION_KEYWORDS: Vec<&'static str> = vec![
        "corrupt",
        "corrupted",
        "corruption",
        "damaged file",
        "unreadable",
        "cannot be read",
        "could not be read",
        "failed to parse",
        "parse error",
        "parsing issue",
        "parsing error",
    ];

    /// Negation cue at the end of the text preceding a keyword.
    static ref NEGATED_TAIL: Regex = Regex::new(
        r"(?:\b(?:not|no|never|without)|n['’]t)(?:\s+(?:a|an|any|been|being|evidence\s+of|signs?\s+of))*\s*$"
    )
    .unwrap();
}

pub const DEFAULT_KEYWORDS_VERSION: &str = "2024.2";

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Keyword sets driving issue classification and deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordConfig {
    /// Version label of the keyword data
    pub version: String,
    pub critical: Vec<String>,
    pub technical: Vec<String>,
    pub suspicious: Vec<String>,
    pub encryption: Vec<String>,
    pub corruption: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_KEYWORDS_VERSION.to_string(),
            critical: owned(&CRITICAL_KEYWORDS),
            technical: owned(&TECHNICAL_KEYWORDS),
            suspicious: owned(&SUSPICIOUS_KEYWORDS),
            encryption: owned(&ENCRYPTION_KEYWORDS),
            corruption: owned(&CORRUPTION_KEYWORDS),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offsets where `keyword` occurs as a whole word or phrase.
fn word_matches<'t>(text: &'t str, keyword: &'t str) -> impl Iterator<Item = usize> + 't {
    text.match_indices(keyword).filter_map(move |(start, _)| {
        let end = start + keyword.len();
        let open = text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let close = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
        (open && close).then_some(start)
    })
}

fn is_negated(before: &str) -> bool {
    NEGATED_TAIL.is_match(before)
}

/// True if the lowercased `text` contains any keyword as a whole,
/// non-negated word or phrase.
pub fn contains_any(text_lower: &str, keywords: &[String]) -> bool {
    keywords.iter().filter(|k| !k.is_empty()).any(|k| {
        let keyword = k.to_lowercase();
        let mut starts = word_matches(text_lower, &keyword);
        starts.any(|start| !is_negated(&text_lower[..start]))
    })
}

/// The first keyword found anywhere in `text`, if any.
///
/// Plain substring search, for product names in Software and Producer
/// fields ("Adobe Photoshop 24.1") rather than free text.
pub fn first_match<'k>(text: &str, keywords: &'k [String]) -> Option<&'k str> {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .find(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_lowercase_and_nonempty() {
        let config = KeywordConfig::default();
        for set in [
            &config.critical,
            &config.technical,
            &config.suspicious,
            &config.encryption,
            &config.corruption,
        ] {
            assert!(!set.is_empty());
            for word in set.iter() {
                assert_eq!(word, &word.to_lowercase());
            }
        }
    }

    #[test]
    fn test_group_keywords_are_technical() {
        let config = KeywordConfig::default();
        for word in config.encryption.iter().chain(config.corruption.iter()) {
            assert!(contains_any(word, &config.technical), "{}", word);
            assert!(!contains_any(word, &config.critical), "{}", word);
        }
    }

    #[test]
    fn test_first_match_is_case_insensitive() {
        let config = KeywordConfig::default();
        assert_eq!(first_match("Adobe PHOTOSHOP 24", &config.critical), Some("photoshop"));
        assert_eq!(first_match("all good", &config.critical), None);
    }

    #[test]
    fn test_whole_words_only() {
        let critical = KeywordConfig::default().critical;
        assert!(!contains_any("applicant forgot to sign page 2", &critical));
        assert!(!contains_any("we will not forget", &critical));
        assert!(!contains_any("photo appears unaltered", &critical));
        assert!(contains_any("forged signature", &critical));
        assert!(contains_any("stamp was altered.", &critical));
        assert!(contains_any("created in paint.net", &critical));
        assert!(contains_any("images don't match text claims", &critical));
    }

    #[test]
    fn test_negated_occurrences_ignored() {
        let critical = KeywordConfig::default().critical;
        assert!(!contains_any("this is not a fake", &critical));
        assert!(!contains_any("stamp isn't fake", &critical));
        assert!(!contains_any("no signs of tampering", &critical));
        assert!(!contains_any("never altered", &critical));
        // A later, non-negated occurrence still counts
        assert!(contains_any("not fake, but the date was altered", &critical));
    }

    #[test]
    fn test_negation_does_not_hide_phrases_containing_it() {
        let config = KeywordConfig::default();
        assert!(contains_any("images do not match document claims", &config.critical));
        assert!(contains_any("no gps coordinates found", &config.suspicious));
        assert!(contains_any("file could not be read", &config.technical));
    }
}
