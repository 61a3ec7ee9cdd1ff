//! Two-stage confidence composition.
//!
//! Stage 1 snaps the semantic confidence to a fixed level, then lets the
//! classified issues override it:
//!
//! | semantic       | level |
//! |----------------|-------|
//! | > 0.8          | 1.0   |
//! | > 0.6          | 0.7   |
//! | >= 0.3         | 0.5   |
//! | otherwise      | 0.25  |
//!
//! Any CRITICAL issue forces 0.0; otherwise any SUSPICIOUS issue forces 0.25.
//!
//! Stage 2 multiplies by the validator confidence and clamps to [0, 1].

use serde::{Deserialize, Serialize};

use crate::issues::{IssueSet, Severity};

/// Level used when a SUSPICIOUS issue is present.
pub const SUSPICIOUS_LEVEL: f64 = 0.25;

/// Every intermediate value of one confidence computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Composite confidence reported by the semantic analysis
    pub semantic: f64,
    pub bucketed: f64,
    /// Bucketed level after issue overrides
    pub stage_one: f64,
    pub validator: f64,
    pub final_confidence: f64,
}

pub struct ConfidenceCalculator;

impl ConfidenceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Snap a semantic confidence to its discrete level.
    pub fn bucket(&self, semantic: f64) -> f64 {
        if semantic > 0.8 {
            1.0
        } else if semantic > 0.6 {
            0.7
        } else if semantic >= 0.3 {
            0.5
        } else {
            0.25
        }
    }

    pub fn stage_one(&self, semantic: f64, issues: &IssueSet) -> f64 {
        if issues.has_severity(Severity::Critical) {
            0.0
        } else if issues.has_severity(Severity::Suspicious) {
            SUSPICIOUS_LEVEL
        } else {
            self.bucket(semantic)
        }
    }

    pub fn compute(&self, semantic: f64, issues: &IssueSet, validator: f64) -> ConfidenceBreakdown {
        let stage_one = self.stage_one(semantic, issues);
        let final_confidence = (stage_one * validator).clamp(0.0, 1.0);
        ConfidenceBreakdown {
            semantic,
            bucketed: self.bucket(semantic),
            stage_one,
            validator,
            final_confidence,
        }
    }
}

impl Default for ConfidenceCalculator {
    fn default() -> Self {
        Self::new()
    }
}
