//! Geo validator: is the photo located inside the claim territory?

use tracing::debug;

use super::{ImageValidator, ValidationResult};
use crate::config::{ProcessingRules, TerritoryConfig};
use crate::metadata::gps::{parse_coordinate, round_coordinate};
use crate::metadata::{GeoCoordinate, MetadataGroup, MetadataGroups};

/// Checks GPS coordinates against the territory bounding box.
///
/// Points outside the box are warnings, not errors.
pub struct GeoValidator<'a> {
    territory: &'a TerritoryConfig,
}

impl<'a> GeoValidator<'a> {
    pub fn new(territory: &'a TerritoryConfig) -> Self {
        Self { territory }
    }

    /// Decimal coordinates from the raw GPS tags, falling back to the
    /// derived `_latitude_decimal`/`_longitude_decimal` keys.
    fn coordinates(&self, metadata: &MetadataGroups) -> Option<(f64, f64)> {
        let gps = MetadataGroup::GpsLocation;
        let raw = metadata
            .get(gps, "GPSLatitude")
            .zip(metadata.get(gps, "GPSLongitude"));
        if let Some((lat, lon)) = raw {
            let lat_ref = metadata.text(gps, "GPSLatitudeRef");
            let lon_ref = metadata.text(gps, "GPSLongitudeRef");
            let parsed = parse_coordinate(lat, lat_ref.as_deref())
                .zip(parse_coordinate(lon, lon_ref.as_deref()));
            if let Some((lat, lon)) = parsed {
                return Some((round_coordinate(lat), round_coordinate(lon)));
            }
        }

        let lat = metadata.get(gps, "_latitude_decimal")?.as_f64()?;
        let lon = metadata.get(gps, "_longitude_decimal")?.as_f64()?;
        Some((lat, lon))
    }
}

impl ImageValidator for GeoValidator<'_> {
    fn rule_name(&self) -> &'static str {
        "check_gps"
    }

    fn enabled(&self, rules: &ProcessingRules) -> bool {
        rules.check_gps
    }

    fn validate(&self, metadata: &MetadataGroups, rules: &ProcessingRules, result: &mut ValidationResult) {
        let (lat, lon) = match self.coordinates(metadata) {
            Some(pair) => pair,
            None => {
                if rules.require_gps {
                    result.add_warning(
                        "gps_exists",
                        "No GPS coordinates found in image. Location cannot be verified.",
                    );
                } else {
                    result.add_info("No GPS coordinates in metadata");
                }
                return;
            }
        };

        let coordinate = match GeoCoordinate::new(lat, lon) {
            Ok(c) => c,
            Err(e) => {
                result.add_warning("gps_valid", format!("GPS coordinates are invalid: {}", e));
                return;
            }
        };

        result.record("gps_latitude", coordinate.latitude());
        result.record("gps_longitude", coordinate.longitude());

        let location = self.territory.describe(lat, lon);
        debug!(lat, lon, location = %location, "gps located");
        result.record("gps_location", location.clone());

        if self.territory.contains(lat, lon) {
            result.pass_check(
                "gps_valid",
                format!("Location: {} ({:.4}, {:.4})", location, lat, lon),
            );
        } else {
            result.add_warning(
                "gps_valid",
                format!(
                    "GPS coordinates ({:.4}, {:.4}) are outside {}: {}",
                    lat, lon, self.territory.name, location
                ),
            );
        }
    }
}
