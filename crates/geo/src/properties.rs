//! Property key detection.
//!
//! Source data names its attributes inconsistently (`lat`, `Site_Latitude`,
//! `AZIMUTH`, `dir`, ...). Each attribute kind is described by an ordered list
//! of case-insensitive patterns; the first pattern that matches any key wins,
//! and keys are scanned in sorted order so detection never depends on map
//! iteration order.

use crate::feature::{Properties, PropertyValue};
use crate::{normalize_angle, Coordinate};
use once_cell::sync::Lazy;
use regex::Regex;

/// An ordered set of case-insensitive key patterns for one attribute kind.
#[derive(Debug)]
pub struct KeyMatcher {
    name: &'static str,
    patterns: Vec<Regex>,
}

impl KeyMatcher {
    fn new(name: &'static str, patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i)^(?:{})$", p)).expect("static key pattern"))
            .collect();
        Self { name, patterns }
    }

    /// True when `key` matches any pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(key))
    }

    /// First key (by pattern priority, then key order) carrying a numeric value.
    pub fn find_number<'a>(&self, properties: &'a Properties) -> Option<(&'a str, f64)> {
        let found = self.patterns.iter().find_map(|pattern| {
            properties
                .iter()
                .filter(|(key, _)| pattern.is_match(key))
                .find_map(|(key, value)| value.as_f64().map(|n| (key.as_str(), n)))
        });
        if let Some((key, value)) = found {
            tracing::debug!(kind = self.name, key, value, "attribute detected");
        }
        found
    }
}

/// `(site_)?lat(itude)?`
pub static LATITUDE_KEYS: Lazy<KeyMatcher> =
    Lazy::new(|| KeyMatcher::new("latitude", &["lat", "latitude", "site_lat", "site_latitude"]));

/// `(site_)?lon(gitude)?|lng`
pub static LONGITUDE_KEYS: Lazy<KeyMatcher> = Lazy::new(|| {
    KeyMatcher::new("longitude", &["lon", "longitude", "lng", "site_lon", "site_longitude"])
});

/// `(site_)?(azimuth|bearing|heading|dir(ection)?|orient(ation)?)`
pub static AZIMUTH_KEYS: Lazy<KeyMatcher> = Lazy::new(|| {
    KeyMatcher::new(
        "azimuth",
        &[
            "azimuth",
            "bearing",
            "heading",
            "dir",
            "direction",
            "orient",
            "orientation",
            "site_(?:azimuth|bearing|heading|dir(?:ection)?|orient(?:ation)?)",
        ],
    )
});

/// Explicit tower coordinate from latitude/longitude attributes.
///
/// Both values must be numeric and inside the valid coordinate range.
pub fn explicit_coordinate(properties: &Properties) -> Option<Coordinate> {
    let (_, lat) = LATITUDE_KEYS.find_number(properties)?;
    let (_, lng) = LONGITUDE_KEYS.find_number(properties)?;
    Some(Coordinate::new(lat, lng)).filter(Coordinate::is_valid)
}

/// Explicit azimuth attribute, normalized to `[0, 360)`.
pub fn explicit_azimuth(properties: &Properties) -> Option<f64> {
    AZIMUTH_KEYS.find_number(properties).map(|(_, a)| normalize_angle(a))
}

/// Looks up a property by exact name, falling back to a case-insensitive match.
pub fn lookup<'a>(properties: &'a Properties, name: &str) -> Option<&'a PropertyValue> {
    properties.get(name).or_else(|| {
        properties
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}
