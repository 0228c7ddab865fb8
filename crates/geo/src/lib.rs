//! Geometric inference and ranking engine for cellular antenna sites.
//!
//! This crate provides:
//! - Great-circle distance and bearing primitives
//! - Tower center ("anchor") inference for sector polygons
//! - Sector geometry analysis (azimuth, beamwidth, coverage wedge)
//! - Site clustering, distance ranking and sector scoring
//! - Batch processing with optional parallelism
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use sitelocator_geo::{analyze, AnnotatedDataset, EngineConfig, Feature, Geometry, Coordinate};
//!
//! let features = vec![
//!     Feature::new(Geometry::Point(Coordinate::new(52.5200, 13.4050))),
//!     Feature::new(Geometry::Point(Coordinate::new(48.8566, 2.3522))),
//! ];
//! let dataset = AnnotatedDataset::build(features, &EngineConfig::default());
//!
//! let result = analyze(52.52, 13.40, &dataset, 1).unwrap();
//! assert!(result.distance_km < 1.0); // Berlin wins, Paris is outside the search window
//! assert!(result.is_omni);
//! ```

mod angle;
mod haversine;
mod parse;
pub mod analyze;
pub mod batch;
pub mod center;
pub mod config;
pub mod dataset;
mod error;
pub mod feature;
pub mod frequency;
pub mod properties;
pub mod scoring;
pub mod sector;
pub mod site;

#[cfg(feature = "wasm")]
mod wasm;

pub use analyze::{analyze, analyze_with_config, AnalysisResult};
pub use angle::{angular_deviation, normalize_angle, turning_angle};
pub use batch::{analyze_batch, Query, QueryOutcome};
pub use config::EngineConfig;
pub use dataset::{AnnotatedDataset, AnnotatedFeature};
pub use error::{GeoError, GeoErrorCode, Result};
pub use feature::{Feature, FeatureCollection, Geometry, PropertyValue};
pub use haversine::{bearing, haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use parse::parse_coordinates;
pub use sector::SectorGeometry;
pub use site::{rank_sites, Site};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate from a GeoJSON-ordered `[lng, lat]` position.
    #[inline]
    pub fn from_lng_lat(longitude: f64, latitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
