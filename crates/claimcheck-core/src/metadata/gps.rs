//! GPS coordinate handling: DMS → decimal conversion and formatting.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MetadataValue;

lazy_static! {
    /// `49° 7' 24.12"` and looser variants
    static ref DMS_PATTERN: Regex = Regex::new(
        r#"^\s*(\d+(?:\.\d+)?)[°\s]+(\d+(?:\.\d+)?)['\s]+(\d+(?:\.\d+)?)"?"#
    ).unwrap();
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A decimal latitude/longitude pair. Always within valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// "49.123367°N, 32.000000°E"
    pub fn readable(&self) -> String {
        format_readable(self.latitude, self.longitude)
    }
}

/// Convert degrees/minutes/seconds plus hemisphere reference to decimal
/// degrees, rounded to 8 decimals. `S` and `W` references flip the sign.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, reference: &str) -> f64 {
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    round8(apply_reference(decimal, Some(reference)))
}

/// Format decimal coordinates as a human-readable hemisphere string.
pub fn format_readable(latitude: f64, longitude: f64) -> String {
    let lat_dir = if latitude >= 0.0 { 'N' } else { 'S' };
    let lon_dir = if longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.6}°{}, {:.6}°{}",
        latitude.abs(),
        lat_dir,
        longitude.abs(),
        lon_dir
    )
}

/// Parse one coordinate axis from any of the shapes metadata carries it in:
/// a number, a numeric string, a DMS string, or a `[deg, min, sec]` list.
pub fn parse_coordinate(value: &MetadataValue, reference: Option<&str>) -> Option<f64> {
    let decimal = match value {
        MetadataValue::Int(_) | MetadataValue::Float(_) => value.as_f64()?,
        MetadataValue::Text(text) => match text.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                let caps = DMS_PATTERN.captures(text)?;
                let d: f64 = caps[1].parse().ok()?;
                let m: f64 = caps[2].parse().ok()?;
                let s: f64 = caps[3].parse().ok()?;
                d + m / 60.0 + s / 3600.0
            }
        },
        MetadataValue::List(items) if items.len() >= 3 => {
            let d = items[0].as_f64()?;
            let m = items[1].as_f64()?;
            let s = items[2].as_f64()?;
            d + m / 60.0 + s / 3600.0
        }
        _ => return None,
    };
    if !decimal.is_finite() {
        return None;
    }
    Some(apply_reference(decimal, reference))
}

fn apply_reference(decimal: f64, reference: Option<&str>) -> f64 {
    match reference.map(str::trim) {
        Some(r) if r.eq_ignore_ascii_case("S") || r.eq_ignore_ascii_case("W") => -decimal,
        _ => decimal,
    }
}

fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

/// Round to 8 decimals, the precision stored in metadata groups.
pub(crate) fn round_coordinate(value: f64) -> f64 {
    round8(value)
}
