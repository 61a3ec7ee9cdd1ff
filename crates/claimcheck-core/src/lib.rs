//! # claimcheck-core
//!
//! Deterministic validation and decision engine for compensation-claim
//! documents and photos.
//!
//! This crate answers, for one submitted file:
//! - What does its metadata say about where, when and how it was captured?
//! - Which of those findings matter, and how much?
//! - Should the claim evidence be accepted, reviewed or rejected?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same analysis and validation snapshot always produce the same decision
//! 2. **No model calls**: The semantic analysis is an input, never computed here
//! 3. **Auditable**: Every decision carries its reason, classified issues and confidence breakdown
//! 4. **Failure-contained**: A missing or corrupt file becomes a validator error, never a panic or abort
//!
//! ## Example
//!
//! ```rust,ignore
//! use claimcheck_core::{assess_file, DocumentAnalysis, EngineConfig};
//!
//! let config = EngineConfig::from_file("engine.yaml")?;
//! let analysis: DocumentAnalysis = serde_json::from_str(&analysis_json)?;
//! let record = assess_file(&config, "claims/photo_001.jpg", analysis);
//!
//! println!("{}: {}", record.decision, record.decision_reason);
//! ```

pub mod confidence;
pub mod config;
pub mod decision;
pub mod issues;
pub mod metadata;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use confidence::{ConfidenceBreakdown, ConfidenceCalculator};
pub use config::{ConfigError, EngineConfig, KeywordConfig, ProcessingRules, TerritoryConfig};
pub use decision::{DecisionEngine, DecisionOutcome};
pub use issues::{Issue, IssueChannel, IssueClassifier, IssueSet, Severity};
pub use metadata::{
    Extraction, FileAccessError, GeoCoordinate, MetadataExtractor, MetadataGroup, MetadataGroups,
    MetadataValue, ParseWarning, PdfMetadata,
};
pub use pipeline::Pipeline;
pub use record::DecisionRecord;
pub use report::BatchReport;
pub use types::{CreationMethod, Decision, DocumentAnalysis, DocumentKind, FileType};
pub use validation::{ImageValidator, ValidationResult};

use std::path::Path;

/// Decide a file from its analysis and a frozen validation result.
///
/// This is the pure core: no I/O, no clock reads besides the record timestamp.
pub fn decide(config: &EngineConfig, analysis: &DocumentAnalysis, validation: &ValidationResult) -> DecisionOutcome {
    DecisionEngine::new(&config.keywords).decide(analysis, validation)
}

/// Validate a file on disk and decide it.
///
/// # Arguments
///
/// * `config` - Engine configuration
/// * `path` - The submitted file
/// * `analysis` - Semantic analysis of the same file
///
/// # Returns
///
/// A `DecisionRecord`. File access failures are recorded as validator
/// errors inside it.
pub fn assess_file(config: &EngineConfig, path: impl AsRef<Path>, analysis: DocumentAnalysis) -> DecisionRecord {
    Pipeline::new(config).assess_file(path, analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_decision() {
        let config = EngineConfig::default();
        let analysis = DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, 0.9);
        let outcome = decide(&config, &analysis, &ValidationResult::new("act.pdf"));
        assert_eq!(outcome.decision, Decision::Accept);
        assert!(outcome.is_acceptable());
    }

    #[test]
    fn test_analysis_json_input() {
        let json = r#"{
            "document_type": "damage_photo",
            "creation_method": "screenshot",
            "confidence": 1.0,
            "red_flags": [],
            "warnings": [],
            "images_match_claims": null,
            "file_type": "image"
        }"#;
        let analysis: DocumentAnalysis = serde_json::from_str(json).unwrap();
        let config = EngineConfig::default();
        let outcome = decide(&config, &analysis, &ValidationResult::new("shot.png"));
        assert_eq!(outcome.decision, Decision::Reject);
    }

    #[test]
    fn test_validator_confidence_scales_decision() {
        let config = EngineConfig::default();
        let analysis = DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, 0.5);
        let outcome = decide(&config, &analysis, &ValidationResult::new("act.pdf"));
        assert_eq!(outcome.decision, Decision::Review);
        assert_eq!(outcome.confidence.bucketed, 0.5);
    }
}
