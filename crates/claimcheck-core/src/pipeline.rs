//! Per-file pipeline: select processing rules, run the validators that
//! apply to the file's container, then decide.
//!
//! Nothing here returns an error. File access failures become validator
//! errors so one bad file never aborts a batch.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::config::{EngineConfig, ProcessingRules};
use crate::decision::DecisionEngine;
use crate::metadata::{MetadataExtractor, PdfMetadata};
use crate::record::DecisionRecord;
use crate::types::{DocumentAnalysis, FileType};
use crate::validation::{
    DateValidator, DeviceValidator, GeoValidator, ImageValidator, IntegrityValidator, PdfValidator,
    ValidationResult,
};

pub struct Pipeline<'a> {
    config: &'a EngineConfig,
    today: NaiveDate,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            today: Utc::now().date_naive(),
        }
    }

    /// Fix the date used as "today" by the date validator.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// Run every applicable validator over one file.
    pub fn validate_file(&self, path: impl AsRef<Path>, analysis: &DocumentAnalysis) -> ValidationResult {
        let path = path.as_ref();
        let mut result = ValidationResult::new(path.display().to_string());
        let rules = self.config.rules_for(analysis);

        if rules.auto_reject {
            let reason = rules
                .reason
                .clone()
                .unwrap_or_else(|| "Rejected by processing rules".to_string());
            result.add_error("auto_reject", reason);
            return result;
        }

        match self.file_type(path, analysis) {
            FileType::Image => self.validate_image(path, &rules, &mut result),
            FileType::Pdf => self.validate_pdf(path, &rules, &mut result),
            FileType::Unknown => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown");
                result.add_error("file_type", format!("Unknown file type: {}", ext));
            }
        }

        debug!(
            path = %path.display(),
            valid = result.is_valid(),
            confidence = result.confidence(),
            "validation finished"
        );
        result
    }

    /// Validate and decide one file.
    pub fn assess_file(&self, path: impl AsRef<Path>, analysis: DocumentAnalysis) -> DecisionRecord {
        let validation = self.validate_file(path, &analysis);
        self.assess(analysis, validation)
    }

    /// Decide from an already frozen validation result.
    pub fn assess(&self, analysis: DocumentAnalysis, validation: ValidationResult) -> DecisionRecord {
        let outcome = DecisionEngine::new(&self.config.keywords).decide(&analysis, &validation);
        DecisionRecord::new(analysis, validation, outcome)
    }

    /// Record for a file whose processing failed outside the validators
    /// (timeout, worker crash). The failure becomes a validator error.
    pub fn assess_failure(&self, path: impl AsRef<Path>, analysis: DocumentAnalysis, failure: &str) -> DecisionRecord {
        let mut validation = ValidationResult::new(path.as_ref().display().to_string());
        validation.add_error("processing", failure);
        self.assess(analysis, validation)
    }

    /// The analysis decides; an unknown type falls back to the extension.
    fn file_type(&self, path: &Path, analysis: &DocumentAnalysis) -> FileType {
        match analysis.file_type {
            FileType::Unknown => path
                .extension()
                .and_then(|e| e.to_str())
                .map(FileType::from_extension)
                .unwrap_or(FileType::Unknown),
            known => known,
        }
    }

    fn validate_image(&self, path: &Path, rules: &ProcessingRules, result: &mut ValidationResult) {
        let extractor = MetadataExtractor::new(self.config.limits);
        let extraction = match extractor.extract_path(path) {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "metadata extraction failed");
                result.add_error("metadata_extraction", format!("Failed to extract metadata: {}", e));
                return;
            }
        };

        for warning in &extraction.warnings {
            debug!(path = %path.display(), %warning, "metadata parse warning");
            result.add_info(format!("Metadata warning: {}", warning));
        }
        result.record("metadata_tag_count", extraction.stats.routed_tags);

        let groups = &extraction.groups;
        let validators: [&dyn ImageValidator; 4] = [
            &GeoValidator::new(&self.config.territory),
            &DateValidator::new(&self.config.dates, self.today),
            &DeviceValidator::new(&self.config.device),
            &IntegrityValidator::new(&self.config.integrity),
        ];
        for validator in validators {
            validator.run(groups, rules, result);
        }
    }

    fn validate_pdf(&self, path: &Path, rules: &ProcessingRules, result: &mut ValidationResult) {
        let pdf = match PdfMetadata::from_path(path, &self.config.limits) {
            Ok(pdf) => pdf,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "pdf metadata extraction failed");
                result.add_error("metadata_extraction", format!("Failed to extract metadata: {}", e));
                return;
            }
        };
        PdfValidator::new(&self.config.device).validate(&pdf, rules, result);
    }
}
