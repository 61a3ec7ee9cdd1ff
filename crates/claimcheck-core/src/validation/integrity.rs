//! Integrity validator: image dimensions versus thumbnail and low-resolution limits.

use super::{ImageValidator, ValidationResult};
use crate::config::{IntegrityConfig, ProcessingRules};
use crate::metadata::{MetadataGroup, MetadataGroups};

/// Flags thumbnails and heavily downscaled images by pixel dimensions.
pub struct IntegrityValidator<'a> {
    integrity: &'a IntegrityConfig,
}

impl<'a> IntegrityValidator<'a> {
    pub fn new(integrity: &'a IntegrityConfig) -> Self {
        Self { integrity }
    }
}

impl ImageValidator for IntegrityValidator<'_> {
    fn rule_name(&self) -> &'static str {
        "check_integrity"
    }

    fn validate(&self, metadata: &MetadataGroups, _rules: &ProcessingRules, result: &mut ValidationResult) {
        let dimension = |key: &str| {
            metadata
                .get(MetadataGroup::BasicInfo, key)
                .and_then(|v| v.as_i64())
                .unwrap_or(0)
        };
        let width = dimension("width");
        let height = dimension("height");

        result.record("image_width", width);
        result.record("image_height", height);

        let min = i64::from(self.integrity.min_dimension);
        let max = i64::from(self.integrity.max_dimension);
        if width < min || height < min {
            result.add_warning(
                "resolution_check",
                format!(
                    "Very low resolution image: {}x{}. May be thumbnail or heavily compressed.",
                    width, height
                ),
            );
        } else if width > max || height > max {
            result.add_info(format!("Very high resolution: {}x{}", width, height));
        } else {
            result.pass_check("resolution_check", format!("Resolution: {}x{}", width, height));
        }
    }
}
