//! Issue collection, severity classification and deduplication.
//!
//! Findings arrive from three channels: validator errors, semantic red flags
//! and warnings (analysis warnings first, then validator warnings). Each is
//! assigned exactly one severity by keyword precedence:
//!
//! 1. CRITICAL - forgery, tampering, editing tools
//! 2. TECHNICAL - encryption, corruption, processing failures
//! 3. SUSPICIOUS - weak heuristics
//! 4. Unclassified - anything else
//!
//! The full match set is kept so "CRITICAL but also TECHNICAL" can be told
//! apart from a plain CRITICAL finding.

pub mod keywords;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use keywords::KeywordConfig;

use crate::types::DocumentAnalysis;
use crate::validation::ValidationResult;

/// Red flag added when embedded images contradict the document text.
pub const IMAGES_MISMATCH_FLAG: &str = "Images do not match document claims";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Technical,
    Suspicious,
    Unclassified,
}

/// Where a finding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueChannel {
    Error,
    RedFlag,
    Warning,
}

/// Which keyword sets an issue text matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatches {
    pub critical: bool,
    pub technical: bool,
    pub suspicious: bool,
}

impl KeywordMatches {
    fn count(&self) -> usize {
        [self.critical, self.technical, self.suspicious]
            .iter()
            .filter(|m| **m)
            .count()
    }

    /// Severity by fixed precedence.
    pub fn severity(&self) -> Severity {
        if self.critical {
            Severity::Critical
        } else if self.technical {
            Severity::Technical
        } else if self.suspicious {
            Severity::Suspicious
        } else {
            Severity::Unclassified
        }
    }
}

/// A classified finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub text: String,
    pub channel: IssueChannel,
    pub severity: Severity,
    pub matches: KeywordMatches,
}

impl Issue {
    /// Critical and not explained by a technical failure.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Critical && !self.matches.technical
    }

    /// Matched a technical keyword, whatever its tier.
    pub fn is_technical(&self) -> bool {
        self.matches.technical
    }
}

/// Deduplicated issues in channel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueSet {
    issues: Vec<Issue>,
}

impl IssueSet {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity == severity)
    }

    pub fn first_blocking(&self) -> Option<&Issue> {
        self.issues.iter().find(|i| i.is_blocking())
    }

    pub fn first_technical(&self) -> Option<&Issue> {
        self.issues.iter().find(|i| i.is_technical())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Texts from one channel.
    pub fn texts(&self, channel: IssueChannel) -> Vec<String> {
        self.issues
            .iter()
            .filter(|i| i.channel == channel)
            .map(|i| i.text.clone())
            .collect()
    }
}

impl<'s> IntoIterator for &'s IssueSet {
    type Item = &'s Issue;
    type IntoIter = std::slice::Iter<'s, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

/// Classifies and deduplicates findings against a keyword configuration.
pub struct IssueClassifier<'a> {
    keywords: &'a KeywordConfig,
}

impl<'a> IssueClassifier<'a> {
    pub fn new(keywords: &'a KeywordConfig) -> Self {
        Self { keywords }
    }

    pub fn matches(&self, text: &str) -> KeywordMatches {
        let lower = text.to_lowercase();
        KeywordMatches {
            critical: keywords::contains_any(&lower, &self.keywords.critical),
            technical: keywords::contains_any(&lower, &self.keywords.technical),
            suspicious: keywords::contains_any(&lower, &self.keywords.suspicious),
        }
    }

    pub fn classify(&self, text: &str, channel: IssueChannel) -> Issue {
        let matches = self.matches(text);
        let severity = matches.severity();
        if matches.count() > 1 {
            trace!(text, ?severity, ?matches, "ambiguous issue resolved by precedence");
        }
        Issue {
            text: text.to_string(),
            channel,
            severity,
            matches,
        }
    }

    /// Gather, classify and deduplicate every finding for one file.
    pub fn collect(&self, analysis: &DocumentAnalysis, validation: &ValidationResult) -> IssueSet {
        let mut red_flags: Vec<&str> = analysis.red_flags.iter().map(String::as_str).collect();
        if analysis.images_match_claims == Some(false) {
            red_flags.push(IMAGES_MISMATCH_FLAG);
        }

        let errors = validation.errors().iter().map(|t| (t.as_str(), IssueChannel::Error));
        let flags = red_flags.into_iter().map(|t| (t, IssueChannel::RedFlag));
        let warnings = analysis
            .warnings
            .iter()
            .chain(validation.warnings())
            .map(|t| (t.as_str(), IssueChannel::Warning));

        let mut seen: HashSet<String> = HashSet::new();
        let mut seen_encryption = false;
        let mut seen_corruption = false;
        let mut issues = Vec::new();

        for (text, channel) in errors.chain(flags).chain(warnings) {
            let lower = text.trim().to_lowercase();
            if lower.is_empty() || !seen.insert(lower.clone()) {
                continue;
            }
            if keywords::contains_any(&lower, &self.keywords.encryption) {
                if seen_encryption {
                    trace!(text, "dropping duplicate encryption issue");
                    continue;
                }
                seen_encryption = true;
            }
            if keywords::contains_any(&lower, &self.keywords.corruption) {
                if seen_corruption {
                    trace!(text, "dropping duplicate corruption issue");
                    continue;
                }
                seen_corruption = true;
            }
            issues.push(self.classify(text, channel));
        }

        IssueSet { issues }
    }
}
