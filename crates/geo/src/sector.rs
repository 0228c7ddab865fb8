//! Sector geometry analysis.
//!
//! Derives a feature's coverage direction from its shape relative to the
//! site anchor. The covered wedge is the complement of the largest angular gap
//! between vertex bearings: a sector polygon fans out from the anchor over a
//! contiguous arc and leaves the rest of the compass empty. Only the exterior
//! ring used for center inference takes part: holes and later polygons of a
//! multipolygon never widen the wedge.
//!
//! An explicit azimuth attribute replaces the computed direction but never the
//! computed width or wedge. The wedge is not re-centred on the explicit value,
//! so the reported azimuth can fall outside `start_angle..end_angle` when
//! source data disagrees with the drawn shape.

use crate::properties::explicit_azimuth;
use crate::{bearing, haversine_distance_meters, normalize_angle, Coordinate, EngineConfig, Feature, Geometry};
use serde::Serialize;

/// Directional coverage of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorGeometry {
    /// Direction the sector faces, `[0, 360)`
    pub azimuth: f64,
    /// Angular width, `(0, 360]`
    pub beamwidth: f64,
    /// No preferred direction; `beamwidth` is 360
    pub is_omni: bool,
    /// Wedge start, walking clockwise to `end_angle`
    pub start_angle: f64,
    /// Wedge end
    pub end_angle: f64,
    /// Azimuth came from a feature attribute
    pub explicit_azimuth: bool,
}

impl SectorGeometry {
    /// Full-circle coverage.
    pub fn omni(azimuth: f64, explicit_azimuth: bool) -> Self {
        Self {
            azimuth: normalize_angle(azimuth),
            beamwidth: 360.0,
            is_omni: true,
            start_angle: 0.0,
            end_angle: 360.0,
            explicit_azimuth,
        }
    }

    /// Wedge of `beamwidth` centred on `azimuth`.
    pub fn centered(azimuth: f64, beamwidth: f64, explicit_azimuth: bool) -> Self {
        let half = beamwidth / 2.0;
        Self {
            azimuth: normalize_angle(azimuth),
            beamwidth,
            is_omni: false,
            start_angle: normalize_angle(azimuth - half),
            end_angle: normalize_angle(azimuth + half),
            explicit_azimuth,
        }
    }

    /// True when `bearing` lies on the clockwise walk from `start_angle` to `end_angle`.
    pub fn wedge_contains(&self, bearing: f64) -> bool {
        if self.is_omni {
            return true;
        }
        let offset = normalize_angle(bearing - self.start_angle);
        offset <= self.beamwidth + 1e-9
    }
}

/// Result of angular-gap analysis over a set of bearings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapWedge {
    /// Bearing just after the largest gap
    pub start: f64,
    /// Bearing just before the largest gap
    pub end: f64,
    /// Size of the largest gap
    pub max_gap: f64,
}

impl GapWedge {
    /// Covered arc, `360 - max_gap`.
    pub fn beamwidth(&self) -> f64 {
        360.0 - self.max_gap
    }

    /// Midpoint of the covered arc.
    pub fn midpoint(&self) -> f64 {
        normalize_angle(self.start + self.beamwidth() / 2.0)
    }

    /// True when no gap reaches `threshold`. A gap of exactly `threshold` stays directional.
    pub fn is_omni(&self, threshold: f64) -> bool {
        self.max_gap < threshold
    }
}

/// Finds the largest gap between circularly sorted bearings.
///
/// Bearings need not be sorted or normalized. The first largest gap wins ties.
pub fn gap_wedge(bearings: &[f64]) -> Option<GapWedge> {
    let mut sorted: Vec<f64> = bearings.iter().map(|b| normalize_angle(*b)).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mut best = GapWedge { start: sorted[0], end: sorted[n - 1], max_gap: f64::NEG_INFINITY };
    for i in 0..n {
        let (from, to) = (sorted[i], sorted[(i + 1) % n]);
        let gap = if i + 1 < n { to - from } else { to + 360.0 - from };
        if gap > best.max_gap {
            best = GapWedge { start: to, end: from, max_gap: gap };
        }
    }
    Some(best)
}

/// Computes the sector geometry of `feature` as seen from `anchor`.
///
/// # Arguments
/// * `feature` - Site member to analyse
/// * `anchor` - Site anchor the bearings are taken from
/// * `config` - Collapse radius, omni gap threshold and synthetic beamwidth
///
/// # Returns
/// An omni sector for collapsed or evenly spread shapes, a synthetic sector
/// for collapsed shapes with an explicit azimuth, otherwise the directional
/// wedge left by the largest bearing gap.
pub fn analyze_sector(feature: &Feature, anchor: &Coordinate, config: &EngineConfig) -> SectorGeometry {
    let explicit = explicit_azimuth(&feature.properties);
    let centroid = feature.geometry.centroid();

    let collapsed = match (&feature.geometry, centroid) {
        (Geometry::Point(_), _) => true,
        (_, Some(c)) => haversine_distance_meters(&c, anchor) < config.collapse_radius_m,
        (_, None) => false,
    };

    if collapsed {
        return match explicit {
            Some(azimuth) => SectorGeometry::centered(azimuth, config.synthetic_beamwidth, true),
            None => SectorGeometry::omni(0.0, false),
        };
    }

    let bearings: Vec<f64> = feature
        .geometry
        .outer_ring()
        .unwrap_or_default()
        .iter()
        .filter(|v| haversine_distance_meters(anchor, v) > config.collapse_radius_m)
        .map(|v| bearing(anchor, v))
        .collect();

    let wedge = match gap_wedge(&bearings) {
        Some(wedge) if wedge.beamwidth() > 0.0 => wedge,
        _ => {
            tracing::debug!(id = ?feature.id, "no usable vertices around anchor, omni fallback");
            let towards = centroid.map_or(0.0, |c| bearing(anchor, &c));
            return SectorGeometry::omni(towards, explicit.is_some());
        }
    };

    if wedge.is_omni(config.omni_gap_threshold) {
        return SectorGeometry::omni(0.0, explicit.is_some());
    }

    SectorGeometry {
        azimuth: explicit.unwrap_or_else(|| wedge.midpoint()),
        beamwidth: wedge.beamwidth(),
        is_omni: false,
        start_angle: wedge.start,
        end_angle: wedge.end,
        explicit_azimuth: explicit.is_some(),
    }
}
