//! Device validator: camera provenance and editing software.

use tracing::debug;

use super::{ImageValidator, ValidationResult};
use crate::config::{DeviceConfig, ProcessingRules};
use crate::issues::keywords::first_match;
use crate::metadata::{MetadataGroup, MetadataGroups};

pub struct DeviceValidator<'a> {
    device: &'a DeviceConfig,
}

impl<'a> DeviceValidator<'a> {
    pub fn new(device: &'a DeviceConfig) -> Self {
        Self { device }
    }
}

impl ImageValidator for DeviceValidator<'_> {
    fn rule_name(&self) -> &'static str {
        "check_device"
    }

    fn enabled(&self, rules: &ProcessingRules) -> bool {
        rules.check_device
    }

    fn validate(&self, metadata: &MetadataGroups, _rules: &ProcessingRules, result: &mut ValidationResult) {
        let field = |key: &str| {
            metadata
                .text(MetadataGroup::TiffStructure, key)
                .unwrap_or_default()
        };
        let make = field("Make");
        let model = field("Model");
        let software = field("Software");

        result.record("device_make", make.clone());
        result.record("device_model", model.clone());
        result.record("software", software.clone());

        if make.is_empty() && model.is_empty() {
            result.add_warning(
                "device_exists",
                "No camera/device information found. Photo may have been downloaded or stripped of metadata.",
            );
        } else {
            result.pass_check("device_exists", format!("Device: {} {}", make, model).trim().to_string());
        }

        if let Some(tool) = first_match(&software, &self.device.editing_software) {
            debug!(software = %software, tool, "editing software detected");
            result.add_warning(
                "software_check",
                format!("Image was processed with editing software: {}", software),
            );
            return;
        }

        let legitimate = [&software, &make, &model]
            .iter()
            .any(|s| first_match(s, &self.device.legitimate_software).is_some());
        if legitimate {
            result.pass_check("software_check", "Legitimate software/device detected");
        } else if !software.is_empty() {
            result.add_info(format!("Software: {} (not in known list)", software));
        }
    }
}
