//! Field validators.
//!
//! Each validator inspects one aspect of a file's metadata and records its
//! findings in a shared [`ValidationResult`]. Errors are blocking, warnings
//! lower confidence, info is never penalized.

mod date;
mod device;
mod geo;
mod integrity;
mod pdf;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ProcessingRules;
use crate::metadata::MetadataGroups;

pub use date::{parse_capture_datetime, DateValidator};
pub use device::DeviceValidator;
pub use geo::GeoValidator;
pub use integrity::IntegrityValidator;
pub use pdf::PdfValidator;

/// Multiplier applied to confidence for every warning.
pub const WARNING_PENALTY: f64 = 0.8;

/// Outcome of the validator pass over one file.
///
/// Confidence starts at 1.0 and never increases: each warning multiplies it
/// by [`WARNING_PENALTY`], any error sets it to 0 and clears `is_valid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    is_valid: bool,
    confidence: f64,
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Vec<String>,
    checks_passed: Vec<String>,
    checks_failed: Vec<String>,
    extracted_data: BTreeMap<String, serde_json::Value>,
    file_path: String,
    validated_at: DateTime<Utc>,
    rules_applied: Vec<String>,
}

impl ValidationResult {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            confidence: 1.0,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            checks_passed: Vec::new(),
            checks_failed: Vec::new(),
            extracted_data: BTreeMap::new(),
            file_path: file_path.into(),
            validated_at: Utc::now(),
            rules_applied: Vec::new(),
        }
    }

    /// Blocking finding.
    pub fn add_error(&mut self, check: &str, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
        self.confidence = 0.0;
        self.checks_failed.push(check.to_string());
    }

    /// Non-blocking finding that lowers confidence.
    pub fn add_warning(&mut self, check: &str, message: impl Into<String>) {
        self.warnings.push(message.into());
        self.confidence *= WARNING_PENALTY;
        self.checks_failed.push(check.to_string());
    }

    pub fn add_info(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }

    pub fn pass_check(&mut self, check: &str, message: impl Into<String>) {
        self.checks_passed.push(check.to_string());
        let message = message.into();
        if !message.is_empty() {
            self.info.push(message);
        }
    }

    pub fn record(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.extracted_data.insert(key.to_string(), value.into());
    }

    /// Note that a validator pass ran.
    pub fn apply_rule(&mut self, rule: &str) {
        self.rules_applied.push(rule.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }

    pub fn checks_passed(&self) -> &[String] {
        &self.checks_passed
    }

    pub fn checks_failed(&self) -> &[String] {
        &self.checks_failed
    }

    pub fn extracted_data(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.extracted_data
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn validated_at(&self) -> DateTime<Utc> {
        self.validated_at
    }

    pub fn rules_applied(&self) -> &[String] {
        &self.rules_applied
    }
}

/// A validator pass over image metadata.
pub trait ImageValidator {
    /// Name recorded in `rules_applied`
    fn rule_name(&self) -> &'static str;

    /// Whether the processing rules enable this pass.
    fn enabled(&self, _rules: &ProcessingRules) -> bool {
        true
    }

    fn validate(&self, metadata: &MetadataGroups, rules: &ProcessingRules, result: &mut ValidationResult);

    /// Run the pass if enabled, recording its name.
    fn run(&self, metadata: &MetadataGroups, rules: &ProcessingRules, result: &mut ValidationResult) {
        if self.enabled(rules) {
            result.apply_rule(self.rule_name());
            self.validate(metadata, rules, result);
        }
    }
}
