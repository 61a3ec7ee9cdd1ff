//! Container-level checks for PDF documents.

use tracing::debug;

use super::ValidationResult;
use crate::config::{DeviceConfig, ProcessingRules};
use crate::issues::keywords::first_match;
use crate::metadata::PdfMetadata;

/// Checks a PDF's document information and container flags.
///
/// Each pass is gated by its processing rule: `check_modification`,
/// `check_producer`, `check_encryption`.
pub struct PdfValidator<'a> {
    device: &'a DeviceConfig,
}

impl<'a> PdfValidator<'a> {
    pub fn new(device: &'a DeviceConfig) -> Self {
        Self { device }
    }

    pub fn validate(&self, pdf: &PdfMetadata, rules: &ProcessingRules, result: &mut ValidationResult) {
        if let Some(error) = &pdf.parse_error {
            result.add_warning("pdf_parse", format!("PDF parsing issue: {}", error));
        }

        if rules.check_modification {
            result.apply_rule("check_modification");
            self.check_modification(pdf, result);
        }
        if rules.check_producer {
            result.apply_rule("check_producer");
            self.check_producer(pdf, result);
        }

        result.record("pdf_page_count", pdf.page_count);
        result.record("pdf_encrypted", pdf.encrypted);

        if rules.check_encryption {
            result.apply_rule("check_encryption");
            if pdf.encrypted {
                result.add_warning("pdf_encrypted", "PDF is encrypted");
            } else {
                result.pass_check("pdf_encrypted", "");
            }
        }
    }

    fn check_modification(&self, pdf: &PdfMetadata, result: &mut ValidationResult) {
        result.record("pdf_creation_date", pdf.creation_date.clone());
        result.record("pdf_modification_date", pdf.modification_date.clone());

        if let (Some(created), Some(modified)) = (&pdf.creation_date, &pdf.modification_date) {
            if created != modified {
                result.add_info("PDF was modified after creation");
            }
        }
    }

    fn check_producer(&self, pdf: &PdfMetadata, result: &mut ValidationResult) {
        result.record("pdf_producer", pdf.producer.clone());
        result.record("pdf_creator", pdf.creator.clone());

        let producer = pdf.producer.as_deref().unwrap_or_default();
        if let Some(tool) = first_match(producer, &self.device.editing_software) {
            debug!(producer, tool, "pdf produced by editing software");
            result.add_warning(
                "producer_check",
                format!("PDF created with image editing software: {}", producer),
            );
        } else {
            let shown = if producer.is_empty() { "Unknown" } else { producer };
            result.pass_check("producer_check", format!("Producer: {}", shown));
        }
    }
}
