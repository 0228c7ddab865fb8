//! Site clustering and ranking.
//!
//! Features whose anchors round to the same key (4 decimals ≈ 11 m by
//! default) form one physical site. Sites are ranked by great-circle distance
//! to the query point.

use crate::dataset::{AnnotatedDataset, AnnotatedFeature};
use crate::{haversine_distance, Coordinate, EngineConfig, GeoError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Rounded anchor identifying a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteKey {
    lat: i64,
    lng: i64,
    decimals: u32,
}

impl SiteKey {
    /// Rounds `coordinate` to `decimals` decimal degrees.
    pub fn new(coordinate: &Coordinate, decimals: u32) -> Self {
        let scale = 10f64.powi(decimals as i32);
        Self {
            lat: (coordinate.latitude * scale).round() as i64,
            lng: (coordinate.longitude * scale).round() as i64,
            decimals,
        }
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10f64.powi(self.decimals as i32);
        let width = self.decimals as usize;
        write!(
            f,
            "{:.*},{:.*}",
            width,
            self.lat as f64 / scale,
            width,
            self.lng as f64 / scale
        )
    }
}

impl Serialize for SiteKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A cluster of features sharing one physical anchor.
#[derive(Debug, Clone)]
pub struct Site<'a> {
    /// Rounded anchor key
    pub key: SiteKey,
    /// Anchor of the first member encountered
    pub anchor: Coordinate,
    /// Great-circle distance from the anchor to the query point
    pub distance_km: f64,
    /// Members, in dataset order
    pub members: Vec<&'a AnnotatedFeature>,
}

/// Latitude/longitude window around a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    center: Coordinate,
    lat_window: f64,
    lng_window: f64,
}

impl SearchWindow {
    /// Window of `±bbox_lat_window` degrees latitude, widened in longitude
    /// by `1 / max(bbox_min_cos, cos(lat))`.
    pub fn around(center: Coordinate, config: &EngineConfig) -> Self {
        let cos = center.latitude.to_radians().cos().max(config.bbox_min_cos);
        Self {
            center,
            lat_window: config.bbox_lat_window,
            lng_window: config.bbox_lat_window / cos,
        }
    }

    /// True when `c` falls inside the window. Longitude wraps at the antimeridian.
    pub fn contains(&self, c: &Coordinate) -> bool {
        let d_lat = (c.latitude - self.center.latitude).abs();
        let d_lng = ((c.longitude - self.center.longitude + 540.0).rem_euclid(360.0) - 180.0).abs();
        d_lat <= self.lat_window && d_lng <= self.lng_window
    }
}

/// Features whose position lies inside the search window, or every
/// positioned feature when none does.
pub fn prefilter<'a>(
    dataset: &'a AnnotatedDataset,
    query: &Coordinate,
    config: &EngineConfig,
) -> Vec<(&'a AnnotatedFeature, Coordinate)> {
    let window = SearchWindow::around(*query, config);
    let positioned: Vec<_> = dataset
        .features()
        .iter()
        .filter_map(|f| f.position().map(|p| (f, p)))
        .collect();

    let nearby: Vec<_> = positioned.iter().copied().filter(|(_, p)| window.contains(p)).collect();
    if nearby.is_empty() {
        tracing::debug!(
            total = positioned.len(),
            "no features inside search window, ranking the full dataset"
        );
        positioned
    } else {
        nearby
    }
}

/// Groups positioned features into sites, in order of first appearance.
pub fn cluster<'a>(
    candidates: &[(&'a AnnotatedFeature, Coordinate)],
    query: &Coordinate,
    config: &EngineConfig,
) -> Vec<Site<'a>> {
    let mut sites: Vec<Site<'a>> = Vec::new();
    let mut by_key: HashMap<SiteKey, usize> = HashMap::new();

    for &(feature, position) in candidates {
        let key = SiteKey::new(&position, config.site_key_decimals);
        match by_key.get(&key) {
            Some(&i) => sites[i].members.push(feature),
            None => {
                by_key.insert(key, sites.len());
                sites.push(Site {
                    key,
                    anchor: position,
                    distance_km: haversine_distance(&position, query),
                    members: vec![feature],
                });
            }
        }
    }

    sites
}

/// Ranks sites around `(lat, lng)`, nearest first.
///
/// # Arguments
/// * `lat` - Query latitude in degrees
/// * `lng` - Query longitude in degrees
/// * `dataset` - Annotated features to cluster
///
/// # Returns
/// Sites sorted by distance from the query; equal distances keep first appearance.
///
/// # Errors
/// * [`GeoError::NoFeatures`] on an empty dataset
pub fn rank_sites(lat: f64, lng: f64, dataset: &AnnotatedDataset) -> Result<Vec<Site<'_>>> {
    rank_sites_with_config(&Coordinate::new(lat, lng), dataset, dataset.config())
}

/// [`rank_sites`] with an explicit configuration.
pub fn rank_sites_with_config<'a>(
    query: &Coordinate,
    dataset: &'a AnnotatedDataset,
    config: &EngineConfig,
) -> Result<Vec<Site<'a>>> {
    if dataset.is_empty() {
        return Err(GeoError::NoFeatures);
    }

    let candidates = prefilter(dataset, query, config);
    let mut sites = cluster(&candidates, query, config);
    sites.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(sites)
}

/// Clamps a 1-based rank to `[1, total]`.
pub fn clamp_rank(rank: usize, total: usize) -> usize {
    rank.clamp(1, total.max(1))
}

/// Selects the site at 1-based `rank`, clamped to the available sites.
///
/// Returns the effective rank alongside the site.
pub fn select_site<'s, 'a>(sites: &'s [Site<'a>], rank: usize) -> Result<(usize, &'s Site<'a>)> {
    if sites.is_empty() {
        return Err(GeoError::NoSuitableSite);
    }
    let rank = clamp_rank(rank, sites.len());
    Ok((rank, &sites[rank - 1]))
}
