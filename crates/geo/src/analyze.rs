//! Query entrypoint.
//!
//! `analyze` ranks the sites around a query point, selects the one at the
//! requested rank and returns its best-matching sector together with every
//! metric needed to explain the choice.

use crate::center::AnchorSource;
use crate::dataset::AnnotatedDataset;
use crate::feature::{Properties, PropertyValue};
use crate::properties::lookup;
use crate::scoring::{score_site, Candidate, MatchTier};
use crate::site::{rank_sites_with_config, select_site};
use crate::{bearing, Coordinate, EngineConfig, GeoError, Result};
use serde::Serialize;

/// Per-candidate breakdown included with every result.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    /// Feature id
    pub id: String,
    /// Sector azimuth
    pub azimuth: f64,
    /// Sector beamwidth
    pub beamwidth: f64,
    /// Omnidirectional sector
    pub is_omni: bool,
    /// Deviation from the site-to-query bearing
    pub deviation: f64,
    /// Query point inside the polygon
    pub is_inside: bool,
    /// Query point covered by the beam
    pub is_in_beam: bool,
    /// Site-to-query bearing lies within the drawn wedge
    pub in_wedge: bool,
    /// Tier applied
    pub tier: MatchTier,
    /// Final score
    pub score: f64,
}

impl From<&Candidate<'_>> for CandidateSummary {
    fn from(c: &Candidate<'_>) -> Self {
        Self {
            id: c.feature.id.clone(),
            azimuth: c.sector.azimuth,
            beamwidth: c.sector.beamwidth,
            is_omni: c.sector.is_omni,
            deviation: c.deviation,
            is_inside: c.is_inside,
            is_in_beam: c.is_in_beam,
            in_wedge: c.in_wedge,
            tier: c.tier,
            score: c.score,
        }
    }
}

/// Outcome of one query.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Query point
    pub query: Coordinate,
    /// Id of the winning feature
    pub feature_id: String,
    /// Properties of the winning feature
    pub properties: Properties,
    /// Anchor of the selected site
    pub site_anchor: Coordinate,
    /// Rounded site key
    pub site_key: String,
    /// How the winning feature's anchor was inferred
    pub anchor_source: Option<AnchorSource>,
    /// Distance from the query point to the site (kilometers)
    pub distance_km: f64,
    /// Bearing from the query point to the site
    pub bearing: f64,
    /// Winning sector azimuth
    pub azimuth: f64,
    /// Winning sector beamwidth
    pub beamwidth: f64,
    /// Winning sector is omnidirectional
    pub is_omni: bool,
    /// Coverage wedge start
    pub start_angle: f64,
    /// Coverage wedge end
    pub end_angle: f64,
    /// Deviation of the winning azimuth from the site-to-query bearing
    pub deviation: f64,
    /// Query point lies inside the winning polygon
    pub is_inside: bool,
    /// Query point is covered by the winning beam
    pub is_in_beam: bool,
    /// Tier that decided the match
    pub tier: MatchTier,
    /// Winning score
    pub score: f64,
    /// Effective 1-based site rank
    pub rank: usize,
    /// Number of ranked sites
    pub total_sites: usize,
    /// Dataset provenance; callers may overwrite
    pub source: Option<String>,
    /// Value of the configured custom field on the winning feature
    pub custom_value: Option<PropertyValue>,
    /// Every scored member of the site, best first
    pub candidates: Vec<CandidateSummary>,
}

/// Finds the best sector of the site at `rank` (1-based, clamped) around `(lat, lng)`.
///
/// # Arguments
/// * `lat` - Query latitude in degrees
/// * `lng` - Query longitude in degrees
/// * `dataset` - Annotated features to search
/// * `rank` - 1-based site rank by distance; 0 and values past the end are clamped
///
/// # Returns
/// The winning feature of the selected site with its metrics and the full
/// candidate breakdown.
///
/// # Errors
/// * [`GeoError::NoFeatures`] when the dataset is empty
/// * [`GeoError::NoSuitableSite`] when no site could be formed
/// * [`GeoError::InvalidCoordinate`] for an out-of-range query
///
/// # Example
/// ```
/// use sitelocator_geo::{analyze, AnnotatedDataset, Coordinate, EngineConfig, Feature, Geometry};
///
/// let dataset = AnnotatedDataset::build(
///     vec![Feature::new(Geometry::Point(Coordinate::new(40.0, -3.7))).with_id("madrid")],
///     &EngineConfig::default(),
/// );
/// let result = analyze(40.01, -3.7, &dataset, 1).unwrap();
/// assert_eq!(result.feature_id, "madrid");
/// assert!((result.bearing - 180.0).abs() < 0.1);
/// ```
pub fn analyze(lat: f64, lng: f64, dataset: &AnnotatedDataset, rank: usize) -> Result<AnalysisResult> {
    analyze_with_config(lat, lng, dataset, rank, dataset.config())
}

/// [`analyze`] with an explicit configuration.
pub fn analyze_with_config(
    lat: f64,
    lng: f64,
    dataset: &AnnotatedDataset,
    rank: usize,
    config: &EngineConfig,
) -> Result<AnalysisResult> {
    let query = Coordinate::new(lat, lng);
    if !query.is_valid() {
        return Err(GeoError::InvalidCoordinate(format!("query ({}, {}) out of range", lat, lng)));
    }

    let _span = tracing::debug_span!("analyze", lat, lng, rank).entered();

    let sites = rank_sites_with_config(&query, dataset, config)?;
    let total_sites = sites.len();
    let (rank, site) = select_site(&sites, rank)?;

    let candidates = score_site(site, &query, config);
    let winner = candidates.first().ok_or(GeoError::NoSuitableSite)?;

    tracing::debug!(
        site = %site.key,
        distance_km = site.distance_km,
        winner = %winner.feature.id,
        score = winner.score,
        "site selected"
    );

    let custom_value = config
        .custom_field
        .as_deref()
        .and_then(|name| lookup(&winner.feature.feature.properties, name))
        .cloned();

    Ok(AnalysisResult {
        query,
        feature_id: winner.feature.id.clone(),
        properties: winner.feature.feature.properties.clone(),
        site_anchor: site.anchor,
        site_key: site.key.to_string(),
        anchor_source: winner.feature.anchor_source,
        distance_km: site.distance_km,
        bearing: bearing(&query, &site.anchor),
        azimuth: winner.sector.azimuth,
        beamwidth: winner.sector.beamwidth,
        is_omni: winner.sector.is_omni,
        start_angle: winner.sector.start_angle,
        end_angle: winner.sector.end_angle,
        deviation: winner.deviation,
        is_inside: winner.is_inside,
        is_in_beam: winner.is_in_beam,
        tier: winner.tier,
        score: winner.score,
        rank,
        total_sites,
        source: dataset.source().map(String::from),
        custom_value,
        candidates: candidates.iter().map(CandidateSummary::from).collect(),
    })
}
