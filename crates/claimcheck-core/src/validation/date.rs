//! Date validator: was the photo taken inside the claim window?

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use super::{ImageValidator, ValidationResult};
use crate::config::{DateConfig, ProcessingRules};
use crate::metadata::{MetadataGroup, MetadataGroups};

/// Capture date fields, highest priority first.
const DATE_SOURCES: [(MetadataGroup, &str); 3] = [
    (MetadataGroup::ExifCamera, "DateTimeOriginal"),
    (MetadataGroup::ExifCamera, "DateTimeDigitized"),
    (MetadataGroup::TiffStructure, "DateTime"),
];

/// Parse a metadata date string with the first matching format.
///
/// Date-only formats yield midnight.
pub fn parse_capture_datetime(text: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}

/// Checks the capture date against the minimum date, today and the sanity year.
pub struct DateValidator<'a> {
    dates: &'a DateConfig,
    today: NaiveDate,
}

impl<'a> DateValidator<'a> {
    pub fn new(dates: &'a DateConfig, today: NaiveDate) -> Self {
        Self { dates, today }
    }

    fn capture_datetime(&self, metadata: &MetadataGroups) -> Option<(NaiveDateTime, &'static str)> {
        DATE_SOURCES.iter().find_map(|(group, key)| {
            let text = metadata.text(*group, key)?;
            parse_capture_datetime(&text, &self.dates.formats).map(|dt| (dt, *key))
        })
    }
}

impl ImageValidator for DateValidator<'_> {
    fn rule_name(&self) -> &'static str {
        "validate_date"
    }

    fn enabled(&self, rules: &ProcessingRules) -> bool {
        rules.check_date
    }

    fn validate(&self, metadata: &MetadataGroups, rules: &ProcessingRules, result: &mut ValidationResult) {
        result.record("date_required", rules.require_date);

        let (captured, source) = match self.capture_datetime(metadata) {
            Some(found) => found,
            None => {
                let mut message =
                    "No capture date found in metadata. Cannot verify when photo was taken.".to_string();
                if rules.require_date {
                    message.push_str(" A capture date is required for this document type.");
                }
                result.add_warning("date_exists", message);
                return;
            }
        };

        result.record("capture_datetime", captured.format("%Y-%m-%dT%H:%M:%S").to_string());
        result.record("capture_date_source", source);

        let date = captured.date();
        let min_date = rules.min_date.unwrap_or(self.dates.min_date);
        debug!(%date, %min_date, source, "capture date");

        if date < min_date {
            result.add_error(
                "date_valid",
                format!("Photo date {} is before the minimum claim date ({})", date, min_date),
            );
        } else if date > self.today {
            result.add_error("date_valid", format!("Photo date {} is in the future", date));
        } else if date.year() < self.dates.sanity_year {
            result.add_warning(
                "date_valid",
                format!("Photo date {} seems too old - verify metadata", date),
            );
        } else {
            result.pass_check("date_valid", format!("Photo date {} is valid", date));
        }
    }
}
