//! Territory bounding box and coarse region lookup.

use serde::{Deserialize, Serialize};

/// Inclusive latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// A region matched when latitude is strictly above `above_lat` and
/// longitude strictly below `below_lon`. Missing thresholds always match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below_lon: Option<f64>,
}

impl RegionRule {
    fn new(name: &str, above_lat: Option<f64>, below_lon: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            above_lat,
            below_lon,
        }
    }

    fn matches(&self, lat: f64, lon: f64) -> bool {
        self.above_lat.map_or(true, |t| lat > t) && self.below_lon.map_or(true, |t| lon < t)
    }
}

/// Descriptions for points beyond each edge of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutsideHints {
    pub north: String,
    pub south: String,
    pub west: String,
    pub east: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerritoryConfig {
    pub name: String,
    pub bounds: Bounds,
    /// Checked in order; first match wins
    pub regions: Vec<RegionRule>,
    pub outside: OutsideHints,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            name: "Ukraine".to_string(),
            bounds: Bounds {
                min_lat: 44.0,
                max_lat: 52.5,
                min_lon: 22.0,
                max_lon: 40.5,
            },
            regions: vec![
                RegionRule::new("Northern Ukraine (Kyiv region)", Some(50.5), Some(32.0)),
                RegionRule::new("Northeastern Ukraine (Sumy/Chernihiv region)", Some(50.5), None),
                RegionRule::new("Central Ukraine", Some(48.5), Some(32.0)),
                RegionRule::new("Eastern Ukraine (Kharkiv/Donetsk region)", Some(48.5), Some(37.0)),
                RegionRule::new("Eastern Ukraine (Luhansk region)", Some(48.5), None),
                RegionRule::new("Southern Ukraine (Zaporizhzhia/Kherson region)", Some(46.5), Some(34.0)),
                RegionRule::new("Southeastern Ukraine", Some(46.5), None),
                RegionRule::new("Southern Ukraine (Crimea region)", None, None),
            ],
            outside: OutsideHints {
                north: "North of Ukraine (possibly Belarus/Russia)".to_string(),
                south: "South of Ukraine (possibly Black Sea/Turkey)".to_string(),
                west: "West of Ukraine (possibly Poland/Slovakia/Hungary)".to_string(),
                east: "East of Ukraine (possibly Russia)".to_string(),
            },
        }
    }
}

impl TerritoryConfig {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.bounds.contains(lat, lon)
    }

    /// Human-readable location: a region inside the box, else the side of
    /// the box the point lies beyond.
    pub fn describe(&self, lat: f64, lon: f64) -> String {
        if self.contains(lat, lon) {
            self.region(lat, lon)
        } else {
            self.describe_outside(lat, lon)
        }
    }

    pub fn region(&self, lat: f64, lon: f64) -> String {
        self.regions
            .iter()
            .find(|r| r.matches(lat, lon))
            .map(|r| r.name.clone())
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn describe_outside(&self, lat: f64, lon: f64) -> String {
        let b = &self.bounds;
        if lat > b.max_lat {
            self.outside.north.clone()
        } else if lat < b.min_lat {
            self.outside.south.clone()
        } else if lon < b.min_lon {
            self.outside.west.clone()
        } else if lon > b.max_lon {
            self.outside.east.clone()
        } else {
            format!("Outside {}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_regions() {
        let t = TerritoryConfig::default();
        assert_eq!(t.describe(50.45, 30.52), "Central Ukraine");
        assert_eq!(t.describe(50.9, 30.5), "Northern Ukraine (Kyiv region)");
        assert_eq!(t.describe(51.5, 33.0), "Northeastern Ukraine (Sumy/Chernihiv region)");
        assert_eq!(t.describe(49.99, 36.23), "Eastern Ukraine (Kharkiv/Donetsk region)");
        assert_eq!(t.describe(48.57, 39.3), "Eastern Ukraine (Luhansk region)");
        assert_eq!(t.describe(46.63, 32.6), "Southern Ukraine (Zaporizhzhia/Kherson region)");
        assert_eq!(t.describe(47.1, 37.5), "Southeastern Ukraine");
        assert_eq!(t.describe(44.95, 34.1), "Southern Ukraine (Crimea region)");
    }

    #[test]
    fn test_outside_sides() {
        let t = TerritoryConfig::default();
        assert_eq!(t.describe(53.9, 27.5), "North of Ukraine (possibly Belarus/Russia)");
        assert_eq!(t.describe(41.0, 29.0), "South of Ukraine (possibly Black Sea/Turkey)");
        assert_eq!(t.describe(52.2, 21.0), "West of Ukraine (possibly Poland/Slovakia/Hungary)");
        assert_eq!(t.describe(50.0, 45.0), "East of Ukraine (possibly Russia)");
    }

    #[test]
    fn test_bounds_inclusive() {
        let t = TerritoryConfig::default();
        assert!(t.contains(44.0, 22.0));
        assert!(t.contains(52.5, 40.5));
        assert!(!t.contains(52.5001, 30.0));
    }

    proptest! {
        #[test]
        fn prop_inside_points_get_a_region(lat in 44.0f64..=52.5, lon in 22.0f64..=40.5) {
            let t = TerritoryConfig::default();
            prop_assert!(t.contains(lat, lon));
            prop_assert!(t.describe(lat, lon).contains("Ukraine"));
        }
    }
}
