//! The auditable per-file decision record.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceBreakdown;
use crate::decision::DecisionOutcome;
use crate::issues::Issue;
use crate::types::{Decision, DocumentAnalysis, FileType};
use crate::validation::ValidationResult;

/// Everything a reviewer needs to audit one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub file_path: String,
    pub file_type: FileType,
    pub assessed_at: DateTime<Utc>,
    pub decision: Decision,
    pub decision_reason: String,
    /// Final confidence rounded to 3 decimals
    pub confidence: f64,
    pub confidence_breakdown: ConfidenceBreakdown,
    pub is_acceptable: bool,
    /// Validator errors
    pub errors: Vec<String>,
    /// Analysis warnings followed by validator warnings
    pub warnings: Vec<String>,
    pub red_flags: Vec<String>,
    /// Classified, deduplicated issues that fed the decision
    pub issues: Vec<Issue>,
    pub validation: ValidationResult,
    pub analysis: DocumentAnalysis,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl DecisionRecord {
    pub fn new(analysis: DocumentAnalysis, validation: ValidationResult, outcome: DecisionOutcome) -> Self {
        let file_path = if validation.file_path().is_empty() {
            analysis.file_path.clone()
        } else {
            validation.file_path().to_string()
        };
        let warnings = analysis
            .warnings
            .iter()
            .chain(validation.warnings())
            .cloned()
            .collect();

        Self {
            file_path,
            file_type: analysis.file_type,
            assessed_at: Utc::now(),
            decision: outcome.decision,
            decision_reason: outcome.reason,
            confidence: round3(outcome.confidence.final_confidence),
            confidence_breakdown: outcome.confidence,
            is_acceptable: outcome.decision.is_acceptable(),
            errors: validation.errors().to_vec(),
            warnings,
            red_flags: analysis.red_flags.clone(),
            issues: outcome.issues.issues().to_vec(),
            validation,
            analysis,
        }
    }

    /// File name without directories, for display.
    pub fn file_name(&self) -> &str {
        self.file_path
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.file_path)
    }

    /// Human-readable summary block.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "File: {}", self.file_name());
        let _ = writeln!(
            out,
            "Type: {} ({}, {})",
            self.file_type, self.analysis.document_type, self.analysis.creation_method
        );
        let _ = writeln!(out, "Decision: {} (confidence {:.3})", self.decision, self.confidence);
        let _ = writeln!(out, "Reason: {}", self.decision_reason);

        for (title, items) in [
            ("Errors", &self.errors),
            ("Red flags", &self.red_flags),
            ("Warnings", &self.warnings),
        ] {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{}:", title);
            for item in items {
                let _ = writeln!(out, "  - {}", item);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionEngine;
    use crate::issues::KeywordConfig;
    use crate::types::{CreationMethod, DocumentKind};

    fn record(analysis: DocumentAnalysis, validation: ValidationResult) -> DecisionRecord {
        let keywords = KeywordConfig::default();
        let outcome = DecisionEngine::new(&keywords).decide(&analysis, &validation);
        DecisionRecord::new(analysis, validation, outcome)
    }

    #[test]
    fn test_confidence_rounded_to_three_decimals() {
        let analysis = DocumentAnalysis::new(FileType::Image, DocumentKind::DamagePhoto, CreationMethod::Unknown, 0.9);
        let mut validation = ValidationResult::new("/tmp/claims/photo.jpg");
        validation.add_warning("x", "Signature is faint");
        validation.add_warning("y", "Stamp is faint");
        validation.add_warning("z", "Edge is faint");

        let record = record(analysis, validation);
        assert_eq!(record.confidence, 0.512);
        assert_eq!(record.decision, Decision::Review);
        assert_eq!(record.file_name(), "photo.jpg");
    }

    #[test]
    fn test_json_shape() {
        let analysis = DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, 0.95)
            .with_red_flag("Forged stamp");
        let record = record(analysis, ValidationResult::new("act.pdf"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["decision"], "REJECT");
        assert_eq!(json["decision_reason"], "Forged stamp");
        assert_eq!(json["is_acceptable"], false);
        assert_eq!(json["file_type"], "pdf");
        assert_eq!(json["red_flags"][0], "Forged stamp");
        assert_eq!(json["issues"][0]["severity"], "CRITICAL");
        assert_eq!(json["issues"][0]["channel"], "red_flag");
        assert!(json["validation"]["is_valid"].as_bool().unwrap());
        assert_eq!(json["analysis"]["document_type"], "damage_act");
    }

    #[test]
    fn test_summary_lists_findings() {
        let analysis = DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, 0.95);
        let mut validation = ValidationResult::new("act.pdf");
        validation.add_error("pdf_encrypted", "PDF is encrypted");
        let summary = record(analysis, validation).summary();

        assert!(summary.contains("File: act.pdf"));
        assert!(summary.contains("Type: pdf (damage_act, scanned)"));
        assert!(summary.contains("Decision: REVIEW (confidence 0.000)"));
        assert!(summary.contains("Errors:\n  - PDF is encrypted"));
        assert!(!summary.contains("Warnings:"));
    }
}
