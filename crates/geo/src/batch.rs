//! Batch query analysis with optional parallelism.
//!
//! A dataset is annotated once and then shared read-only, so independent
//! queries can run concurrently without coordination.

use crate::analyze::{analyze, AnalysisResult};
use crate::dataset::AnnotatedDataset;
use serde::{Deserialize, Serialize};

fn default_rank() -> usize {
    1
}

/// One query in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Query latitude
    pub lat: f64,
    /// Query longitude
    pub lng: f64,
    /// 1-based site rank
    #[serde(default = "default_rank")]
    pub rank: usize,
}

impl Query {
    /// Query for the nearest site.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, rank: 1 }
    }

    /// Builder: selects the site at `rank`.
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }
}

/// Result of a single batch query. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// The query as submitted
    pub query: Query,
    /// Analysis result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Numeric error code on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u32>,
}

impl QueryOutcome {
    /// True when the query produced a result.
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

/// Runs every query against `dataset`, preserving input order.
///
/// # Example
/// ```
/// use sitelocator_geo::{analyze_batch, AnnotatedDataset, Coordinate, EngineConfig, Feature, Geometry, Query};
///
/// let dataset = AnnotatedDataset::build(
///     vec![Feature::new(Geometry::Point(Coordinate::new(1.0, 1.0)))],
///     &EngineConfig::default(),
/// );
/// let outcomes = analyze_batch(&[Query::new(1.0, 1.01), Query::new(95.0, 0.0)], &dataset);
/// assert!(outcomes[0].is_ok());
/// assert!(!outcomes[1].is_ok());
/// ```
pub fn analyze_batch(queries: &[Query], dataset: &AnnotatedDataset) -> Vec<QueryOutcome> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        queries.par_iter().map(|query| run_query(query, dataset)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        queries.iter().map(|query| run_query(query, dataset)).collect()
    }
}

#[inline]
fn run_query(query: &Query, dataset: &AnnotatedDataset) -> QueryOutcome {
    match analyze(query.lat, query.lng, dataset, query.rank) {
        Ok(result) => QueryOutcome { query: *query, result: Some(result), error: None, error_code: None },
        Err(e) => QueryOutcome {
            query: *query,
            result: None,
            error_code: Some(e.code() as u32),
            error: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, EngineConfig, Feature, Geometry};

    fn towers() -> AnnotatedDataset {
        AnnotatedDataset::build(
            vec![
                Feature::new(Geometry::Point(Coordinate::new(52.52, 13.405))).with_id("berlin"),
                Feature::new(Geometry::Point(Coordinate::new(48.8566, 2.3522))).with_id("paris"),
                Feature::new(Geometry::Point(Coordinate::new(51.5074, -0.1276))).with_id("london"),
            ],
            &EngineConfig::default(),
        )
    }

    #[test]
    fn test_batch_preserves_order() {
        let data = towers();
        let queries = [Query::new(48.85, 2.35), Query::new(52.5, 13.4), Query::new(51.5, -0.12)];
        let ids: Vec<_> = analyze_batch(&queries, &data)
            .into_iter()
            .map(|o| o.result.unwrap().feature_id)
            .collect();
        assert_eq!(ids, ["paris", "berlin", "london"]);
    }

    #[test]
    fn test_batch_reports_errors_per_query() {
        let data = towers();
        let outcomes = analyze_batch(&[Query::new(0.0, 200.0), Query::new(52.5, 13.4)], &data);
        assert_eq!(outcomes[0].error_code, Some(10003));
        assert!(outcomes[0].result.is_none());
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn test_rank_defaults_to_one() {
        let query: Query = serde_json::from_str(r#"{"lat": 1.0, "lng": 2.0}"#).unwrap();
        assert_eq!(query, Query::new(1.0, 2.0));
        let query: Query = serde_json::from_str(r#"{"lat": 1.0, "lng": 2.0, "rank": 3}"#).unwrap();
        assert_eq!(query.rank, 3);
    }

    #[test]
    fn test_batch_with_rank() {
        let data = towers();
        // Query far from every tower: full dataset is ranked
        let outcomes = analyze_batch(&[Query::new(50.0, 5.0).with_rank(2)], &data);
        let result = outcomes[0].result.as_ref().unwrap();
        assert_eq!(result.rank, 2);
        assert_eq!(result.total_sites, 3);
    }

    #[test]
    fn test_empty_batch() {
        assert!(analyze_batch(&[], &towers()).is_empty());
    }
}
