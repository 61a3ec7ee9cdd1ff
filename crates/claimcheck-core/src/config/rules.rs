//! Per-kind processing rules.
//!
//! Each document type or image category selects which validators run and
//! how strictly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{CreationMethod, DocumentKind};

/// Which checks apply to one document kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingRules {
    pub check_gps: bool,
    pub check_date: bool,
    pub check_device: bool,
    /// Missing GPS becomes a warning instead of info
    pub require_gps: bool,
    /// Missing capture date warning states that a date is required
    pub require_date: bool,
    /// Overrides the configured earliest acceptable capture date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    /// Reject before any metadata is read
    pub auto_reject: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub check_modification: bool,
    pub check_producer: bool,
    pub check_encryption: bool,
}

impl Default for ProcessingRules {
    fn default() -> Self {
        Self {
            check_gps: true,
            check_date: true,
            check_device: true,
            require_gps: false,
            require_date: false,
            min_date: None,
            auto_reject: false,
            reason: None,
            check_modification: true,
            check_producer: true,
            check_encryption: true,
        }
    }
}

impl ProcessingRules {
    fn rejecting(reason: &str) -> Self {
        Self {
            auto_reject: true,
            reason: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Rules for an image category.
    pub fn image_rules(category: DocumentKind) -> Self {
        match category {
            DocumentKind::DamagePhoto => Self {
                require_gps: true,
                require_date: true,
                ..Self::default()
            },
            DocumentKind::DocumentPhoto | DocumentKind::IdentityPhoto => Self {
                check_gps: false,
                ..Self::default()
            },
            DocumentKind::Screenshot => Self::rejecting("Screenshots are not accepted as proof"),
            _ => Self::default(),
        }
    }

    /// Rules for a PDF document type and creation method.
    pub fn pdf_rules(_document_type: DocumentKind, creation_method: CreationMethod) -> Self {
        match creation_method {
            CreationMethod::Screenshot => Self::rejecting("Screenshot PDFs are not accepted"),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_photo_requires_gps_and_date() {
        let rules = ProcessingRules::image_rules(DocumentKind::DamagePhoto);
        assert!(rules.check_gps && rules.require_gps && rules.require_date);
        assert!(!rules.auto_reject);
    }

    #[test]
    fn test_document_photos_skip_gps() {
        for kind in [DocumentKind::DocumentPhoto, DocumentKind::IdentityPhoto] {
            let rules = ProcessingRules::image_rules(kind);
            assert!(!rules.check_gps);
            assert!(rules.check_date && rules.check_device);
        }
    }

    #[test]
    fn test_screenshots_auto_reject() {
        let image = ProcessingRules::image_rules(DocumentKind::Screenshot);
        assert!(image.auto_reject);
        assert_eq!(image.reason.as_deref(), Some("Screenshots are not accepted as proof"));

        let pdf = ProcessingRules::pdf_rules(DocumentKind::DamageAct, CreationMethod::Screenshot);
        assert!(pdf.auto_reject);
        assert_eq!(pdf.reason.as_deref(), Some("Screenshot PDFs are not accepted"));
    }

    #[test]
    fn test_pdf_base_rules() {
        let rules = ProcessingRules::pdf_rules(DocumentKind::DamageAct, CreationMethod::Scanned);
        assert!(rules.check_modification && rules.check_producer && rules.check_encryption);
        assert!(!rules.auto_reject);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let rules: ProcessingRules = serde_yaml::from_str("require_gps: true\nmin_date: 2023-01-01").unwrap();
        assert!(rules.require_gps);
        assert!(rules.check_date);
        assert_eq!(rules.min_date, NaiveDate::from_ymd_opt(2023, 1, 1));
    }
}
