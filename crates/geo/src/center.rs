//! Tower center inference.
//!
//! Every feature gets an anchor, the point its coverage radiates from. The
//! cascade stops at the first rule that applies:
//!
//! 1. explicit latitude/longitude attributes
//! 2. degenerate geometry: first available vertex
//! 3. regular (circle-like) ring: centroid
//! 4. weighted vertex scoring: shared vertices, ring start, sharp corners
//!
//! Inference never fails for a feature that has at least one vertex; bad
//! geometry degrades to the first ring vertex.

use crate::frequency::FrequencyIndex;
use crate::properties::explicit_coordinate;
use crate::{turning_angle, Coordinate, EngineConfig, Feature, Geometry};
use serde::Serialize;

/// Which rule of the cascade produced an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSource {
    /// Latitude/longitude attributes
    Explicit,
    /// Point geometry or a ring too short to analyse
    FirstVertex,
    /// Centroid of a regular ring
    RegularCentroid,
    /// Highest scoring ring vertex
    ScoredVertex,
    /// Geometry could not be analysed
    Fallback,
}

/// Anchor chosen for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CenterInference {
    /// Inferred tower center
    pub anchor: Coordinate,
    /// Rule that produced it
    pub source: AnchorSource,
}

impl CenterInference {
    fn new(anchor: Coordinate, source: AnchorSource) -> Self {
        Self { anchor, source }
    }
}

/// Turning-angle statistics of a ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingStats {
    /// Interior angle at every vertex, in ring order
    pub angles: Vec<f64>,
    /// Mean of `angles`
    pub mean: f64,
    /// Population standard deviation of `angles`
    pub std_dev: f64,
}

impl RingStats {
    /// Computes statistics over an open ring (no closing duplicate).
    pub fn compute(ring: &[Coordinate]) -> Option<Self> {
        let n = ring.len();
        if n == 0 {
            return None;
        }

        let angles: Vec<f64> = (0..n)
            .map(|i| turning_angle(&ring[(i + n - 1) % n], &ring[i], &ring[(i + 1) % n]))
            .collect();

        let mean = angles.iter().sum::<f64>() / n as f64;
        let variance = angles.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n as f64;
        let std_dev = variance.sqrt();

        if !mean.is_finite() || !std_dev.is_finite() {
            return None;
        }
        Some(Self { angles, mean, std_dev })
    }

    /// True for circle-like rings: enough vertices, wide and uniform angles.
    pub fn is_regular(&self, config: &EngineConfig) -> bool {
        self.angles.len() > config.regular_min_vertices
            && self.mean > config.regular_min_mean_angle
            && self.std_dev < config.regular_max_std_dev
    }
}

/// Drops the closing vertex of a ring when it repeats the first.
pub fn open_ring(ring: &[Coordinate]) -> &[Coordinate] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Infers the anchor of one feature.
///
/// A multipolygon is judged by its first polygon only; later parts never
/// move the anchor.
///
/// # Arguments
/// * `feature` - Feature to anchor
/// * `index` - Vertex frequencies over the whole dataset
/// * `config` - Scoring weights and regularity thresholds
///
/// # Returns
/// The anchor and the rule that produced it, or `None` for geometry without
/// any vertex and without explicit coordinates.
pub fn infer_center(
    feature: &Feature,
    index: &FrequencyIndex,
    config: &EngineConfig,
) -> Option<CenterInference> {
    if let Some(anchor) = explicit_coordinate(&feature.properties) {
        return Some(CenterInference::new(anchor, AnchorSource::Explicit));
    }

    let ring = match &feature.geometry {
        Geometry::Point(c) => return Some(CenterInference::new(*c, AnchorSource::FirstVertex)),
        geometry => match geometry.outer_ring() {
            Some(ring) if ring.len() >= 3 => ring,
            _ => {
                return feature
                    .geometry
                    .first_vertex()
                    .map(|c| CenterInference::new(c, AnchorSource::FirstVertex))
            }
        },
    };

    let ring = open_ring(ring);
    let first = ring[0];
    let finite = ring.iter().all(|c| c.latitude.is_finite() && c.longitude.is_finite());

    let stats = match RingStats::compute(ring) {
        Some(stats) if finite => stats,
        _ => {
            tracing::debug!(id = ?feature.id, "ring could not be analysed, using first vertex");
            return Some(CenterInference::new(first, AnchorSource::Fallback));
        }
    };

    if stats.is_regular(config) {
        if let Some(centroid) = feature.geometry.outer_centroid() {
            return Some(CenterInference::new(centroid, AnchorSource::RegularCentroid));
        }
        tracing::debug!(id = ?feature.id, "regular ring without centroid, scoring vertices");
    }

    let anchor = best_scored_vertex(ring, &stats.angles, index, config).unwrap_or(first);
    Some(CenterInference::new(anchor, AnchorSource::ScoredVertex))
}

/// Score of one ring vertex as a tower tip candidate.
pub fn vertex_score(
    occurrences: u32,
    is_first: bool,
    angle: f64,
    config: &EngineConfig,
) -> f64 {
    let shared = f64::from(occurrences) * config.shared_vertex_weight;
    let tip = if is_first { config.first_vertex_bonus } else { 0.0 };
    let sharpness = (180.0 - angle) * config.sharpness_factor;
    shared + tip + sharpness
}

/// Highest scoring vertex; ties keep the first encountered.
fn best_scored_vertex(
    ring: &[Coordinate],
    angles: &[f64],
    index: &FrequencyIndex,
    config: &EngineConfig,
) -> Option<Coordinate> {
    let mut best: Option<(f64, Coordinate)> = None;
    for (i, (vertex, angle)) in ring.iter().zip(angles).enumerate() {
        let score = vertex_score(index.count(vertex), i == 0, *angle, config);
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, *vertex));
        }
    }
    best.map(|(_, vertex)| vertex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{haversine_distance_meters, PropertyValue};

    /// Offsets a point by meters north/east.
    fn offset(origin: Coordinate, north_m: f64, east_m: f64) -> Coordinate {
        let dlat = north_m / 111_320.0;
        let dlng = east_m / (111_320.0 * origin.latitude.to_radians().cos());
        Coordinate::new(origin.latitude + dlat, origin.longitude + dlng)
    }

    fn regular_ring(center: Coordinate, radius_m: f64, sides: usize) -> Vec<Coordinate> {
        let mut ring: Vec<_> = (0..sides)
            .map(|i| {
                let theta = (i as f64) * std::f64::consts::TAU / sides as f64;
                offset(center, radius_m * theta.cos(), radius_m * theta.sin())
            })
            .collect();
        ring.push(ring[0]);
        ring
    }

    /// Sector polygon starting at the tip, arc from `from` to `to` degrees.
    fn sector_ring(tip: Coordinate, from: f64, to: f64, radius_m: f64) -> Vec<Coordinate> {
        let mut ring = vec![tip];
        let steps = 6;
        for s in 0..=steps {
            let a = (from + (to - from) * s as f64 / steps as f64).to_radians();
            ring.push(offset(tip, radius_m * a.cos(), radius_m * a.sin()));
        }
        ring.push(tip);
        ring
    }

    const BASE: Coordinate = Coordinate { latitude: 51.5, longitude: -0.12 };

    #[test]
    fn test_explicit_attributes_win() {
        let ring = sector_ring(BASE, 0.0, 60.0, 500.0);
        let feature = Feature::new(Geometry::Polygon(vec![ring]))
            .with_property("LAT", PropertyValue::Text("10.5".into()))
            .with_property("lon", 20.25);
        let result = infer_center(&feature, &FrequencyIndex::default(), &EngineConfig::default()).unwrap();
        assert_eq!(result.anchor, Coordinate::new(10.5, 20.25));
        assert_eq!(result.source, AnchorSource::Explicit);
    }

    #[test]
    fn test_point_uses_itself() {
        let feature = Feature::new(Geometry::Point(BASE));
        let result = infer_center(&feature, &FrequencyIndex::default(), &EngineConfig::default()).unwrap();
        assert_eq!(result.anchor, BASE);
        assert_eq!(result.source, AnchorSource::FirstVertex);
    }

    #[test]
    fn test_short_ring_uses_first_vertex() {
        let b = offset(BASE, 10.0, 10.0);
        let feature = Feature::new(Geometry::Polygon(vec![vec![BASE, b]]));
        let result = infer_center(&feature, &FrequencyIndex::default(), &EngineConfig::default()).unwrap();
        assert_eq!(result.anchor, BASE);
    }

    #[test]
    fn test_empty_geometry_has_no_anchor() {
        let feature = Feature::new(Geometry::Polygon(vec![]));
        assert!(infer_center(&feature, &FrequencyIndex::default(), &EngineConfig::default()).is_none());
    }

    #[test]
    fn test_hexagon_uses_centroid() {
        let ring = regular_ring(BASE, 300.0, 6);
        let feature = Feature::new(Geometry::Polygon(vec![ring.clone()]));
        let result = infer_center(&feature, &FrequencyIndex::default(), &EngineConfig::default()).unwrap();

        assert_eq!(result.source, AnchorSource::RegularCentroid);
        assert!(!ring.contains(&result.anchor));
        assert!(haversine_distance_meters(&result.anchor, &BASE) < 5.0);
    }

    #[test]
    fn test_hexagon_stats() {
        let ring = regular_ring(BASE, 300.0, 6);
        let stats = RingStats::compute(open_ring(&ring)).unwrap();
        assert_eq!(stats.angles.len(), 6);
        assert!((stats.mean - 120.0).abs() < 1.0, "mean {}", stats.mean);
        assert!(stats.std_dev < 1.0, "std {}", stats.std_dev);
    }

    #[test]
    fn test_sector_is_not_regular() {
        let ring = sector_ring(BASE, 0.0, 65.0, 500.0);
        let stats = RingStats::compute(open_ring(&ring)).unwrap();
        assert!(stats.std_dev > 15.0);
        assert!(!stats.is_regular(&EngineConfig::default()));
    }

    #[test]
    fn test_regularity_needs_enough_vertices() {
        let ring = regular_ring(BASE, 300.0, 6);
        let stats = RingStats::compute(open_ring(&ring)).unwrap();
        let strict = EngineConfig { regular_min_vertices: 6, ..EngineConfig::default() };
        assert!(stats.is_regular(&EngineConfig::default()));
        assert!(!stats.is_regular(&strict));
    }

    #[test]
    fn test_sector_tip_selected() {
        let ring = sector_ring(BASE, 30.0, 90.0, 800.0);
        let feature = Feature::new(Geometry::Polygon(vec![ring]));
        let index = FrequencyIndex::build([&feature]);
        let result = infer_center(&feature, &index, &EngineConfig::default()).unwrap();
        assert_eq!(result.anchor, BASE);
        assert_eq!(result.source, AnchorSource::ScoredVertex);
    }

    #[test]
    fn test_shared_vertex_beats_ring_start() {
        // Ring drawn starting on the arc; the tip sits in the middle of the ring
        let tip = BASE;
        let mut rotated = sector_ring(tip, 100.0, 160.0, 800.0);
        rotated.pop();
        rotated.rotate_left(3);
        rotated.push(rotated[0]);

        let sibling_a = Feature::new(Geometry::Polygon(vec![sector_ring(tip, 220.0, 280.0, 800.0)]));
        let sibling_b = Feature::new(Geometry::Polygon(vec![sector_ring(tip, 340.0, 400.0, 800.0)]));
        let feature = Feature::new(Geometry::Polygon(vec![rotated]));

        let index = FrequencyIndex::build([&feature, &sibling_a, &sibling_b]);
        let result = infer_center(&feature, &index, &EngineConfig::default()).unwrap();
        assert_eq!(result.anchor, tip);
    }

    #[test]
    fn test_multipolygon_uses_first_polygon() {
        let far_tip = offset(BASE, 20_000.0, 0.0);
        let feature = Feature::new(Geometry::MultiPolygon(vec![
            vec![sector_ring(BASE, 30.0, 90.0, 800.0)],
            vec![sector_ring(far_tip, 200.0, 260.0, 800.0)],
        ]));
        let index = FrequencyIndex::build([&feature]);
        let result = infer_center(&feature, &index, &EngineConfig::default()).unwrap();
        assert_eq!(result.anchor, BASE);
        assert_eq!(result.source, AnchorSource::ScoredVertex);
    }

    #[test]
    fn test_multipolygon_regular_first_part_uses_its_centroid() {
        let far = offset(BASE, 20_000.0, 0.0);
        let feature = Feature::new(Geometry::MultiPolygon(vec![
            vec![regular_ring(BASE, 300.0, 6)],
            vec![regular_ring(far, 300.0, 6)],
        ]));
        let result = infer_center(&feature, &FrequencyIndex::default(), &EngineConfig::default()).unwrap();
        assert_eq!(result.source, AnchorSource::RegularCentroid);
        assert!(haversine_distance_meters(&result.anchor, &BASE) < 5.0);
    }

    #[test]
    fn test_vertex_score_weights() {
        let config = EngineConfig::default();
        assert_eq!(vertex_score(0, false, 180.0, &config), 0.0);
        assert_eq!(vertex_score(2, true, 120.0, &config), 100.0 + 80.0 + 120.0);

        let tuned = EngineConfig { first_vertex_bonus: 0.0, ..EngineConfig::default() };
        assert_eq!(vertex_score(0, true, 180.0, &tuned), 0.0);
    }

    #[test]
    fn test_score_ties_keep_first() {
        let ring = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ];
        let config = EngineConfig { first_vertex_bonus: 0.0, ..EngineConfig::default() };
        let angles = [90.0, 90.0, 90.0];
        let best = best_scored_vertex(&ring, &angles, &FrequencyIndex::default(), &config);
        assert_eq!(best, Some(ring[0]));
    }

    #[test]
    fn test_open_ring() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        assert_eq!(open_ring(&[a, b, a]).len(), 2);
        assert_eq!(open_ring(&[a, b]).len(), 2);
        assert_eq!(open_ring(&[a]).len(), 1);
        assert!(open_ring(&[]).is_empty());
    }
}
