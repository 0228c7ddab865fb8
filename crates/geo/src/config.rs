//! Engine configuration.
//!
//! Every empirically tuned constant of the inference and ranking heuristics
//! lives here so hosts can override them from a config file and tests can
//! exercise boundary behaviour.

use crate::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Tunable parameters for center inference, sector analysis and scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Score added per dataset-wide occurrence of a vertex
    pub shared_vertex_weight: f64,

    /// Score bonus for the first vertex of a ring (sector tip convention)
    pub first_vertex_bonus: f64,

    /// Multiplier applied to `180 - turning_angle`
    pub sharpness_factor: f64,

    /// A ring needs strictly more analyzed vertices than this to be judged regular
    pub regular_min_vertices: usize,

    /// Mean turning angle a regular ring must exceed (degrees)
    pub regular_min_mean_angle: f64,

    /// Standard deviation a regular ring must stay below (degrees)
    pub regular_max_std_dev: f64,

    /// Vertices (and centroids) closer than this to the anchor count as collapsed (meters)
    pub collapse_radius_m: f64,

    /// Largest angular gap below which a shape is treated as omnidirectional (degrees)
    pub omni_gap_threshold: f64,

    /// Width of the synthetic sector emitted for collapsed shapes with an explicit azimuth
    pub synthetic_beamwidth: f64,

    /// Decimal places of the anchor rounding key used for site clustering
    pub site_key_decimals: u32,

    /// Half-height of the query bounding box (degrees latitude)
    pub bbox_lat_window: f64,

    /// Floor of the cosine used to widen the longitude window near the poles
    pub bbox_min_cos: f64,

    /// Site-to-query distance under which direction is ignored (meters)
    pub near_field_m: f64,

    /// Score reduction for a candidate polygon containing the query point
    pub inside_bonus: f64,

    /// Score reduction for near-field candidates
    pub near_field_bonus: f64,

    /// Score reduction for candidates whose beam covers the query point
    pub in_beam_bonus: f64,

    /// Tie-break reduction for candidates carrying an explicit azimuth attribute
    pub explicit_azimuth_bonus: f64,

    /// Features processed per slice during dataset annotation
    pub chunk_size: usize,

    /// Property surfaced verbatim alongside each result
    pub custom_field: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shared_vertex_weight: 50.0,
            first_vertex_bonus: 80.0,
            sharpness_factor: 2.0,
            regular_min_vertices: 3,
            regular_min_mean_angle: 90.0,
            regular_max_std_dev: 15.0,
            collapse_radius_m: 2.0,
            omni_gap_threshold: 60.0,
            synthetic_beamwidth: 65.0,
            site_key_decimals: 4,
            bbox_lat_window: 0.5,
            bbox_min_cos: 0.1,
            near_field_m: 30.0,
            inside_bonus: 10_000.0,
            near_field_bonus: 5_000.0,
            in_beam_bonus: 2_000.0,
            explicit_azimuth_bonus: 10.0,
            chunk_size: 2048,
            custom_field: None,
        }
    }
}

impl EngineConfig {
    /// Checks that thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("collapse_radius_m", self.collapse_radius_m),
            ("omni_gap_threshold", self.omni_gap_threshold),
            ("synthetic_beamwidth", self.synthetic_beamwidth),
            ("bbox_lat_window", self.bbox_lat_window),
            ("bbox_min_cos", self.bbox_min_cos),
            ("near_field_m", self.near_field_m),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeoError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.synthetic_beamwidth > 360.0 {
            return Err(GeoError::Config(format!(
                "synthetic_beamwidth must not exceed 360, got {}",
                self.synthetic_beamwidth
            )));
        }
        if self.site_key_decimals > 10 {
            return Err(GeoError::Config(format!(
                "site_key_decimals must be at most 10, got {}",
                self.site_key_decimals
            )));
        }
        if self.chunk_size == 0 {
            return Err(GeoError::Config("chunk_size must be at least 1".into()));
        }

        Ok(())
    }
}
