//! Decision engine: maps an analysis and a frozen validation result to
//! ACCEPT / REVIEW / REJECT.
//!
//! Guards are checked in order; the first that fires decides:
//! 1. Screenshot (creation method or document type) → REJECT
//! 2. A CRITICAL issue that is not also TECHNICAL → REJECT
//! 3. Any TECHNICAL issue → REVIEW
//! 4. Any SUSPICIOUS issue → REVIEW
//! 5. Any other issue → REVIEW
//! 6. No issues: final confidence ≥ 0.7 → ACCEPT, ≥ 0.4 → REVIEW, else REJECT
//!
//! The engine is pure: the same inputs always yield the same outcome.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::confidence::{ConfidenceBreakdown, ConfidenceCalculator};
use crate::issues::{IssueClassifier, IssueSet, KeywordConfig, Severity};
use crate::types::{Decision, DocumentAnalysis};
use crate::validation::ValidationResult;

/// Final confidence at or above this is accepted when no issues exist.
pub const ACCEPT_THRESHOLD: f64 = 0.7;

/// Final confidence below this is rejected when no issues exist.
pub const REVIEW_THRESHOLD: f64 = 0.4;

pub const SCREENSHOT_REASON: &str = "Screenshots are not accepted as proof";

/// A decision with its justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub reason: String,
    pub confidence: ConfidenceBreakdown,
    pub issues: IssueSet,
}

impl DecisionOutcome {
    pub fn final_confidence(&self) -> f64 {
        self.confidence.final_confidence
    }

    pub fn is_acceptable(&self) -> bool {
        self.decision.is_acceptable()
    }
}

pub struct DecisionEngine<'a> {
    classifier: IssueClassifier<'a>,
    calculator: ConfidenceCalculator,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(keywords: &'a KeywordConfig) -> Self {
        Self {
            classifier: IssueClassifier::new(keywords),
            calculator: ConfidenceCalculator::new(),
        }
    }

    /// Decide one file.
    pub fn decide(&self, analysis: &DocumentAnalysis, validation: &ValidationResult) -> DecisionOutcome {
        let issues = self.classifier.collect(analysis, validation);
        let confidence = self
            .calculator
            .compute(analysis.confidence, &issues, validation.confidence());
        debug!(
            issues = issues.len(),
            stage_one = confidence.stage_one,
            final_confidence = confidence.final_confidence,
            "confidence computed"
        );

        let (decision, reason) = self.apply_guards(analysis, &issues, confidence.final_confidence);
        info!(
            file = %validation.file_path(),
            decision = decision.as_str(),
            reason = %reason,
            "decision rendered"
        );

        DecisionOutcome {
            decision,
            reason,
            confidence,
            issues,
        }
    }

    fn apply_guards(&self, analysis: &DocumentAnalysis, issues: &IssueSet, confidence: f64) -> (Decision, String) {
        // Guard 1
        if analysis.is_screenshot() {
            return (Decision::Reject, SCREENSHOT_REASON.to_string());
        }

        // Guard 2
        if let Some(issue) = issues.first_blocking() {
            return (Decision::Reject, issue.text.clone());
        }

        // Guard 3
        if let Some(issue) = issues.first_technical() {
            return (
                Decision::Review,
                format!("Technical issue requires manual review: {}", issue.text),
            );
        }

        // Guard 4
        let suspicious = issues.count(Severity::Suspicious);
        if suspicious > 0 {
            return (
                Decision::Review,
                format!("{} suspicious issue(s) require review", suspicious),
            );
        }

        // Guard 5
        if !issues.is_empty() {
            return (
                Decision::Review,
                format!("{} issue(s) require review", issues.len()),
            );
        }

        // Guard 6
        if confidence >= ACCEPT_THRESHOLD {
            (Decision::Accept, "Document passed all checks".to_string())
        } else if confidence >= REVIEW_THRESHOLD {
            (
                Decision::Review,
                format!("Moderate confidence ({:.2}), verification recommended", confidence),
            )
        } else {
            (
                Decision::Reject,
                format!("Low confidence ({:.2}), document cannot be accepted", confidence),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreationMethod, DocumentKind, FileType};
    use proptest::prelude::*;

    fn analysis(confidence: f64) -> DocumentAnalysis {
        DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, confidence)
    }

    fn decide(analysis: &DocumentAnalysis, validation: &ValidationResult) -> DecisionOutcome {
        let keywords = KeywordConfig::default();
        DecisionEngine::new(&keywords).decide(analysis, validation)
    }

    #[test]
    fn test_screenshot_rejected_without_issues() {
        let analysis = DocumentAnalysis::new(
            FileType::Image,
            DocumentKind::DamagePhoto,
            CreationMethod::Screenshot,
            1.0,
        );
        let outcome = decide(&analysis, &ValidationResult::new("s.png"));
        assert_eq!(outcome.decision, Decision::Reject);
        assert!(outcome.reason.to_lowercase().contains("screenshot"));
    }

    #[test]
    fn test_critical_red_flag_rejects() {
        let analysis = analysis(0.95).with_red_flag("Images don't match text claims");
        let outcome = decide(&analysis, &ValidationResult::new("a.pdf"));
        assert_eq!(outcome.decision, Decision::Reject);
        assert_eq!(outcome.reason, "Images don't match text claims");
        assert_eq!(outcome.final_confidence(), 0.0);
    }

    #[test]
    fn test_images_mismatch_rejects() {
        let analysis = analysis(0.95).with_images_match_claims(false);
        let outcome = decide(&analysis, &ValidationResult::new("a.pdf"));
        assert_eq!(outcome.decision, Decision::Reject);
    }

    #[test]
    fn test_encrypted_error_reviews() {
        let mut validation = ValidationResult::new("a.pdf");
        validation.add_error("pdf_encrypted", "PDF is encrypted");
        let outcome = decide(&analysis(0.95), &validation);
        assert_eq!(outcome.decision, Decision::Review);
        assert_eq!(
            outcome.reason,
            "Technical issue requires manual review: PDF is encrypted"
        );
    }

    #[test]
    fn test_critical_and_technical_reviews() {
        let analysis = analysis(0.95).with_red_flag("Possible tampering, file is corrupt");
        let outcome = decide(&analysis, &ValidationResult::new("a.pdf"));
        assert_eq!(outcome.decision, Decision::Review);
    }

    #[test]
    fn test_suspicious_and_unclassified_counts() {
        let mut validation = ValidationResult::new("a.jpg");
        validation.add_warning("gps_exists", "No GPS coordinates found in image.");
        validation.add_warning("date_exists", "No capture date found in metadata.");
        let outcome = decide(&analysis(0.95), &validation);
        assert_eq!(outcome.decision, Decision::Review);
        assert_eq!(outcome.reason, "2 suspicious issue(s) require review");

        let other = analysis(0.95).with_warning("Signature is faint");
        let outcome = decide(&other, &ValidationResult::new("a.pdf"));
        assert_eq!(outcome.reason, "1 issue(s) require review");
    }

    #[test]
    fn test_benign_wording_is_not_rejected() {
        for warning in [
            "Applicant forgot to sign page 2",
            "Photo appears unaltered; not a fake",
            "Stamp is not fake",
            "No signs of tampering",
        ] {
            let outcome = decide(&analysis(0.95).with_warning(warning), &ValidationResult::new("act.pdf"));
            assert_eq!(outcome.decision, Decision::Review, "{}", warning);
            assert_eq!(outcome.reason, "1 issue(s) require review", "{}", warning);
        }
    }

    #[test]
    fn test_confidence_thresholds() {
        let accept = decide(&analysis(0.9), &ValidationResult::new("a.pdf"));
        assert_eq!(accept.decision, Decision::Accept);
        assert_eq!(accept.final_confidence(), 1.0);
        assert!(accept.is_acceptable());

        let review = decide(&analysis(0.5), &ValidationResult::new("a.pdf"));
        assert_eq!(review.decision, Decision::Review);
        assert_eq!(review.reason, "Moderate confidence (0.50), verification recommended");

        let reject = decide(&analysis(0.1), &ValidationResult::new("a.pdf"));
        assert_eq!(reject.decision, Decision::Reject);
        assert_eq!(reject.reason, "Low confidence (0.25), document cannot be accepted");
    }

    const POOL: &[&str] = &[
        "Forged signature",
        "Images don't match text claims",
        "PDF is encrypted",
        "File appears corrupt",
        "No GPS coordinates found in image.",
        "Photo date 2019-01-01 seems too old - verify metadata",
        "Signature is faint",
        "Tampered page, password protected",
        "Very low resolution image: 10x10",
    ];

    fn findings() -> impl Strategy<Value = Vec<(usize, u8)>> {
        proptest::collection::vec((0..POOL.len(), 0u8..3), 0..6)
    }

    fn build(semantic: f64, screenshot: bool, picks: &[(usize, u8)]) -> (DocumentAnalysis, ValidationResult) {
        let method = if screenshot {
            CreationMethod::Screenshot
        } else {
            CreationMethod::DigitalNative
        };
        let mut analysis = DocumentAnalysis::new(FileType::Image, DocumentKind::DamagePhoto, method, semantic);
        let mut validation = ValidationResult::new("p.jpg");
        for (index, channel) in picks {
            let text = POOL[*index];
            match channel {
                0 => validation.add_error("check", text),
                1 => analysis.red_flags.push(text.to_string()),
                _ => validation.add_warning("check", text),
            }
        }
        (analysis, validation)
    }

    proptest! {
        #[test]
        fn prop_decision_is_idempotent(semantic in 0.0f64..=1.0, screenshot: bool, picks in findings()) {
            let (analysis, validation) = build(semantic, screenshot, &picks);
            let first = decide(&analysis, &validation);
            let second = decide(&analysis, &validation);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_blocking_issue_rejects(semantic in 0.0f64..=1.0, picks in findings()) {
            let (analysis, validation) = build(semantic, false, &picks);
            let outcome = decide(&analysis, &validation);
            if outcome.issues.first_blocking().is_some() {
                prop_assert_eq!(outcome.decision, Decision::Reject);
            }
        }

        #[test]
        fn prop_accept_requires_no_issues(semantic in 0.0f64..=1.0, picks in findings()) {
            let (analysis, validation) = build(semantic, false, &picks);
            let outcome = decide(&analysis, &validation);
            if outcome.decision == Decision::Accept {
                prop_assert!(outcome.issues.is_empty());
                prop_assert!(outcome.final_confidence() >= ACCEPT_THRESHOLD);
            }
        }
    }
}
