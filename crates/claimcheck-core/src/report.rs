//! Batch summary over decision records.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::record::DecisionRecord;
use crate::types::Decision;

/// Count and share of one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub accepted: OutcomeCount,
    pub review: OutcomeCount,
    pub rejected: OutcomeCount,
    /// One summary block per document, in input order
    pub documents: Vec<String>,
}

impl BatchReport {
    pub fn from_records(records: &[DecisionRecord]) -> Self {
        let total = records.len();
        let outcome = |decision: Decision| {
            let count = records.iter().filter(|r| r.decision == decision).count();
            let percent = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            OutcomeCount { count, percent }
        };

        Self {
            total,
            accepted: outcome(Decision::Accept),
            review: outcome(Decision::Review),
            rejected: outcome(Decision::Reject),
            documents: records.iter().map(DecisionRecord::summary).collect(),
        }
    }

    pub fn render(&self) -> String {
        if self.total == 0 {
            return "No results to report.".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(out, "DOCUMENT ASSESSMENT REPORT");
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "Total documents: {}", self.total);
        for (label, outcome) in [
            ("ACCEPT", &self.accepted),
            ("REVIEW", &self.review),
            ("REJECT", &self.rejected),
        ] {
            let _ = writeln!(out, "  {:<7} {:>4} ({:.1}%)", label, outcome.count, outcome.percent);
        }

        for document in &self.documents {
            let _ = writeln!(out, "{}", "-".repeat(60));
            out.push_str(document);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::pipeline::Pipeline;
    use crate::types::{CreationMethod, DocumentAnalysis, DocumentKind, FileType};
    use crate::validation::ValidationResult;

    fn records() -> Vec<DecisionRecord> {
        let config = EngineConfig::default();
        let pipeline = Pipeline::new(&config);
        let pdf = |confidence| DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, confidence);

        vec![
            pipeline.assess(pdf(0.95), ValidationResult::new("a.pdf")),
            pipeline.assess(pdf(0.95), ValidationResult::new("b.pdf")),
            pipeline.assess(pdf(0.5), ValidationResult::new("c.pdf")),
            pipeline.assess(pdf(0.95).with_red_flag("Forged signature"), ValidationResult::new("d.pdf")),
        ]
    }

    #[test]
    fn test_counts_and_percentages() {
        let report = BatchReport::from_records(&records());
        assert_eq!(report.total, 4);
        assert_eq!(report.accepted.count, 2);
        assert_eq!(report.accepted.percent, 50.0);
        assert_eq!(report.review.count, 1);
        assert_eq!(report.rejected.percent, 25.0);
        assert_eq!(report.documents.len(), 4);
    }

    #[test]
    fn test_render() {
        let text = BatchReport::from_records(&records()).render();
        assert!(text.starts_with("DOCUMENT ASSESSMENT REPORT"));
        assert!(text.contains("Total documents: 4"));
        assert!(text.contains("ACCEPT     2 (50.0%)"));
        assert!(text.contains("File: d.pdf"));
    }

    #[test]
    fn test_empty_report() {
        let report = BatchReport::from_records(&[]);
        assert_eq!(report.accepted.percent, 0.0);
        assert_eq!(report.render(), "No results to report.");
    }
}
