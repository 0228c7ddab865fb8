//! Sector candidate scoring.
//!
//! Every member of the selected site is scored against the query point.
//! Lower scores win. The raw angular deviation is reduced by exactly one tier
//! bonus (containment, near-field, in-beam), then by a small tie-break for
//! features carrying an explicit azimuth attribute.

use crate::dataset::AnnotatedFeature;
use crate::sector::{analyze_sector, SectorGeometry};
use crate::site::Site;
use crate::{angular_deviation, bearing, haversine_distance_meters, Coordinate, EngineConfig};
use serde::Serialize;

/// Strongest criterion a candidate satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Query point lies inside the feature polygon
    Inside,
    /// Query point is within the near-field radius of the site
    NearField,
    /// Query bearing falls within half the beamwidth of the azimuth
    InBeam,
    /// Back-lobe or side match
    OutOfBeam,
}

/// One scored site member.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// The member feature
    pub feature: &'a AnnotatedFeature,
    /// Its sector geometry relative to the site anchor
    pub sector: SectorGeometry,
    /// Angular distance between azimuth and the site-to-query bearing
    pub deviation: f64,
    /// Query point strictly inside the polygon
    pub is_inside: bool,
    /// Query point covered by the beam
    pub is_in_beam: bool,
    /// Site-to-query bearing lies within the drawn wedge
    pub in_wedge: bool,
    /// Tier applied to the score
    pub tier: MatchTier,
    /// Final score, lower is better
    pub score: f64,
}

/// Geometry of the query relative to a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryFrame {
    /// Bearing from the site anchor to the query point
    pub bearing_site_to_query: f64,
    /// Distance from the site anchor to the query point (meters)
    pub distance_m: f64,
    /// Closer than the near-field radius
    pub near_field: bool,
}

impl QueryFrame {
    /// Frames `query` as seen from `anchor`.
    pub fn new(anchor: &Coordinate, query: &Coordinate, config: &EngineConfig) -> Self {
        let distance_m = haversine_distance_meters(anchor, query);
        Self {
            bearing_site_to_query: bearing(anchor, query),
            distance_m,
            near_field: distance_m < config.near_field_m,
        }
    }
}

/// Applies the tier bonus and the explicit-azimuth tie-break to `deviation`.
///
/// Only the first matching tier applies: inside, then near-field, then in-beam.
pub fn tiered_score(
    deviation: f64,
    is_inside: bool,
    near_field: bool,
    is_in_beam: bool,
    explicit_azimuth: bool,
    config: &EngineConfig,
) -> (f64, MatchTier) {
    let (bonus, tier) = if is_inside {
        (config.inside_bonus, MatchTier::Inside)
    } else if near_field {
        (config.near_field_bonus, MatchTier::NearField)
    } else if is_in_beam {
        (config.in_beam_bonus, MatchTier::InBeam)
    } else {
        (0.0, MatchTier::OutOfBeam)
    };

    let tie_break = if explicit_azimuth { config.explicit_azimuth_bonus } else { 0.0 };
    (deviation - bonus - tie_break, tier)
}

/// Scores one feature against the query.
pub fn score_candidate<'a>(
    feature: &'a AnnotatedFeature,
    site_anchor: &Coordinate,
    query: &Coordinate,
    frame: &QueryFrame,
    config: &EngineConfig,
) -> Candidate<'a> {
    let sector = analyze_sector(&feature.feature, site_anchor, config);
    let directionless = sector.is_omni || frame.near_field;

    let deviation = if directionless {
        0.0
    } else {
        angular_deviation(sector.azimuth, frame.bearing_site_to_query)
    };

    let is_inside = feature.feature.geometry.is_areal() && feature.feature.geometry.contains(query);
    let is_in_beam = directionless || deviation <= sector.beamwidth / 2.0;
    let in_wedge = sector.wedge_contains(frame.bearing_site_to_query);

    let (score, tier) = tiered_score(
        deviation,
        is_inside,
        frame.near_field,
        is_in_beam,
        sector.explicit_azimuth,
        config,
    );

    Candidate { feature, sector, deviation, is_inside, is_in_beam, in_wedge, tier, score }
}

/// Scores every member of `site`, best first. Equal scores keep dataset order.
pub fn score_site<'a>(site: &Site<'a>, query: &Coordinate, config: &EngineConfig) -> Vec<Candidate<'a>> {
    let frame = QueryFrame::new(&site.anchor, query, config);
    let mut candidates: Vec<_> = site
        .members
        .iter()
        .map(|feature| score_candidate(feature, &site.anchor, query, &frame, config))
        .collect();
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AnnotatedDataset;
    use crate::site::rank_sites;
    use crate::{Feature, Geometry};

    const SITE: Coordinate = Coordinate { latitude: 48.0, longitude: 11.0 };

    fn offset(origin: Coordinate, north_m: f64, east_m: f64) -> Coordinate {
        let dlat = north_m / 111_320.0;
        let dlng = east_m / (111_320.0 * origin.latitude.to_radians().cos());
        Coordinate::new(origin.latitude + dlat, origin.longitude + dlng)
    }

    fn at_bearing(origin: Coordinate, degrees: f64, meters: f64) -> Coordinate {
        let a = degrees.to_radians();
        offset(origin, meters * a.cos(), meters * a.sin())
    }

    fn wedge(from: f64, to: f64, radius: f64) -> Feature {
        let mut ring = vec![SITE];
        for s in 0..=6 {
            ring.push(at_bearing(SITE, from + (to - from) * s as f64 / 6.0, radius));
        }
        ring.push(SITE);
        Feature::new(Geometry::Polygon(vec![ring]))
    }

    fn three_sectors() -> AnnotatedDataset {
        AnnotatedDataset::build(
            vec![
                wedge(-30.0, 30.0, 1000.0).with_id("north"),
                wedge(90.0, 150.0, 1000.0).with_id("southeast"),
                wedge(210.0, 270.0, 1000.0).with_id("southwest"),
            ],
            &EngineConfig::default(),
        )
    }

    fn best(data: &AnnotatedDataset, query: Coordinate) -> (String, MatchTier) {
        let sites = rank_sites(query.latitude, query.longitude, data).unwrap();
        let candidates = score_site(&sites[0], &query, data.config());
        (candidates[0].feature.id.clone(), candidates[0].tier)
    }

    #[test]
    fn test_tier_order() {
        let config = EngineConfig::default();
        let (inside, _) = tiered_score(180.0, true, false, false, false, &config);
        let (near, _) = tiered_score(0.0, false, true, true, true, &config);
        let (beam, _) = tiered_score(0.0, false, false, true, true, &config);
        let (back, tier) = tiered_score(0.0, false, false, false, true, &config);
        assert!(inside < near && near < beam && beam < back);
        assert_eq!(tier, MatchTier::OutOfBeam);
    }

    #[test]
    fn test_only_first_tier_applies() {
        let config = EngineConfig::default();
        let (score, tier) = tiered_score(5.0, true, true, true, false, &config);
        assert_eq!(score, 5.0 - 10_000.0);
        assert_eq!(tier, MatchTier::Inside);
    }

    #[test]
    fn test_explicit_azimuth_tie_break() {
        let config = EngineConfig::default();
        let (plain, _) = tiered_score(12.0, false, false, true, false, &config);
        let (explicit, _) = tiered_score(12.0, false, false, true, true, &config);
        assert_eq!(plain - explicit, 10.0);
    }

    #[test]
    fn test_back_lobe_keeps_raw_deviation() {
        let config = EngineConfig::default();
        assert_eq!(tiered_score(150.0, false, false, false, false, &config), (150.0, MatchTier::OutOfBeam));
    }

    #[test]
    fn test_inside_sector_wins() {
        let data = three_sectors();
        let (id, tier) = best(&data, at_bearing(SITE, 120.0, 500.0));
        assert_eq!(id, "southeast");
        assert_eq!(tier, MatchTier::Inside);
    }

    #[test]
    fn test_beyond_coverage_uses_beam() {
        let data = three_sectors();
        let (id, tier) = best(&data, at_bearing(SITE, 235.0, 5_000.0));
        assert_eq!(id, "southwest");
        assert_eq!(tier, MatchTier::InBeam);
    }

    #[test]
    fn test_gap_between_sectors_picks_closest_azimuth() {
        let data = three_sectors();
        // 60 degrees: 60 from north, 60 from southeast; 70 favours southeast
        let (id, tier) = best(&data, at_bearing(SITE, 70.0, 5_000.0));
        assert_eq!(id, "southeast");
        assert_eq!(tier, MatchTier::OutOfBeam);
    }

    #[test]
    fn test_near_field_ignores_direction() {
        let data = three_sectors();
        let query = at_bearing(SITE, 180.0, 10.0);
        let sites = rank_sites(query.latitude, query.longitude, &data).unwrap();
        let candidates = score_site(&sites[0], &query, data.config());
        assert!(candidates.iter().all(|c| c.deviation == 0.0 && c.is_in_beam));
        // All tie at the near-field tier; the first member wins
        assert_eq!(candidates[0].feature.id, "north");
        assert_eq!(candidates[0].tier, MatchTier::NearField);
    }

    #[test]
    fn test_in_wedge_follows_drawn_shape() {
        // "north" is drawn facing north but tagged as facing south
        let data = AnnotatedDataset::build(
            vec![
                wedge(-30.0, 30.0, 1000.0).with_id("north").with_property("azimuth", 180.0),
                wedge(90.0, 150.0, 1000.0).with_id("southeast"),
            ],
            &EngineConfig::default(),
        );
        let query = at_bearing(SITE, 0.0, 5_000.0);
        let sites = rank_sites(query.latitude, query.longitude, &data).unwrap();
        let candidates = score_site(&sites[0], &query, data.config());

        let north = candidates.iter().find(|c| c.feature.id == "north").unwrap();
        assert!(north.in_wedge);
        assert!(!north.is_in_beam);
        let southeast = candidates.iter().find(|c| c.feature.id == "southeast").unwrap();
        assert!(!southeast.in_wedge);
    }

    #[test]
    fn test_omni_deviation_is_zero() {
        let data = AnnotatedDataset::build(vec![Feature::new(Geometry::Point(SITE))], &EngineConfig::default());
        let query = at_bearing(SITE, 200.0, 3_000.0);
        let sites = rank_sites(query.latitude, query.longitude, &data).unwrap();
        let candidates = score_site(&sites[0], &query, data.config());
        assert_eq!(candidates[0].deviation, 0.0);
        assert!(candidates[0].is_in_beam && !candidates[0].is_inside);
        assert!(candidates[0].in_wedge);
    }
}
