//! Free-text coordinate parsing.

use crate::Coordinate;
use once_cell::sync::Lazy;
use regex::Regex;

static LAT_LNG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([-+]?\d+(?:\.\d+)?)[,\s]+([-+]?\d+(?:\.\d+)?)\s*$")
        .expect("coordinate pattern is valid")
});

/// Parses `"lat, lng"` (any run of commas and whitespace between the two) into a coordinate.
///
/// Returns `None` when the text does not match or the values are out of range.
///
/// ```
/// use sitelocator_geo::parse_coordinates;
///
/// let c = parse_coordinates(" 52.52, 13.405 ").unwrap();
/// assert_eq!(c.latitude, 52.52);
/// assert!(parse_coordinates("Berlin").is_none());
/// ```
pub fn parse_coordinates(text: &str) -> Option<Coordinate> {
    let caps = LAT_LNG.captures(text)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lng: f64 = caps[2].parse().ok()?;
    let coordinate = Coordinate::new(lat, lng);
    coordinate.is_valid().then_some(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        for text in [
            "48.1,11.5", "48.1, 11.5", "48.1 11.5", "  48.1 ,\t11.5  ",
            "48.1,,11.5", "48.1 , , 11.5",
        ] {
            assert_eq!(parse_coordinates(text), Some(Coordinate::new(48.1, 11.5)), "{text}");
        }
    }

    #[test]
    fn test_signs_and_integers() {
        assert_eq!(parse_coordinates("-33,+151"), Some(Coordinate::new(-33.0, 151.0)));
    }

    #[test]
    fn test_out_of_range() {
        assert!(parse_coordinates("91.0, 0").is_none());
        assert!(parse_coordinates("0, 180.5").is_none());
    }

    #[test]
    fn test_rejects_noise() {
        assert!(parse_coordinates("").is_none());
        assert!(parse_coordinates("48.1").is_none());
        assert!(parse_coordinates("48.1, 11.5, 3").is_none());
        assert!(parse_coordinates("lat 48.1 lng 11.5").is_none());
        assert!(parse_coordinates("48.1;11.5").is_none());
    }
}
