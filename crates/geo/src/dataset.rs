//! Load-time annotation of a feature collection.
//!
//! Building an [`AnnotatedDataset`] runs the one-time passes (duplicate
//! removal, frequency indexing, center inference) to completion. Queries only
//! accept an annotated dataset, so no query can observe a half-annotated one.

use crate::center::{infer_center, AnchorSource, CenterInference};
use crate::frequency::FrequencyIndex;
use crate::{Coordinate, EngineConfig, Feature, FeatureCollection};
use serde::Serialize;
use std::collections::HashSet;

/// A feature together with its inferred anchor and stable id.
#[derive(Debug, Clone)]
pub struct AnnotatedFeature {
    /// Stable identifier: the source id, or `feature-<index>`
    pub id: String,
    /// The source feature
    pub feature: Feature,
    /// Inferred tower center, `None` for geometry without vertices
    pub anchor: Option<Coordinate>,
    /// Rule that produced the anchor
    pub anchor_source: Option<AnchorSource>,
}

impl AnnotatedFeature {
    /// Location used for filtering and clustering: the anchor, else the centroid.
    pub fn position(&self) -> Option<Coordinate> {
        self.anchor.or_else(|| self.feature.geometry.centroid())
    }
}

/// Counters collected while annotating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Features received
    pub input: usize,
    /// Exact duplicates dropped
    pub duplicates: usize,
    /// Features kept
    pub annotated: usize,
    /// Kept features without any usable anchor
    pub unanchored: usize,
}

/// A read-only dataset that has completed every load-time pass.
#[derive(Debug, Clone)]
pub struct AnnotatedDataset {
    features: Vec<AnnotatedFeature>,
    config: EngineConfig,
    source: Option<String>,
    stats: LoadStats,
}

impl AnnotatedDataset {
    /// Annotates `features` with `config`.
    pub fn build(features: Vec<Feature>, config: &EngineConfig) -> Self {
        let input = features.len();
        let features = dedup(features);
        let duplicates = input - features.len();

        let chunk_size = config.chunk_size.max(1);
        let index = build_index(&features, chunk_size);
        let annotated = annotate(features, &index, config, chunk_size);

        let unanchored = annotated.iter().filter(|f| f.anchor.is_none()).count();
        let stats = LoadStats { input, duplicates, annotated: annotated.len(), unanchored };

        tracing::info!(
            input,
            duplicates,
            annotated = stats.annotated,
            unanchored,
            distinct_vertices = index.len(),
            "dataset annotated"
        );

        Self { features: annotated, config: config.clone(), source: None, stats }
    }

    /// Annotates a parsed collection.
    pub fn from_collection(collection: FeatureCollection, config: &EngineConfig) -> Self {
        Self::build(collection.features, config)
    }

    /// Builder: names the dataset for result provenance.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Annotated features, in load order.
    pub fn features(&self) -> &[AnnotatedFeature] {
        &self.features
    }

    /// Configuration the dataset was annotated with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Provenance name, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Load counters.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when there are no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Drops exact duplicates (same geometry, properties and id), keeping the first.
fn dedup(features: Vec<Feature>) -> Vec<Feature> {
    let mut seen = HashSet::with_capacity(features.len());
    features
        .into_iter()
        .filter(|f| match serde_json::to_string(&f.to_geojson()) {
            Ok(key) => seen.insert(key),
            Err(_) => true,
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn build_index(features: &[Feature], chunk_size: usize) -> FrequencyIndex {
    use rayon::prelude::*;
    features
        .par_chunks(chunk_size)
        .map(|chunk| FrequencyIndex::build(chunk))
        .reduce(FrequencyIndex::default, |mut a, b| {
            a.merge(b);
            a
        })
}

#[cfg(not(feature = "parallel"))]
fn build_index(features: &[Feature], chunk_size: usize) -> FrequencyIndex {
    let mut index = FrequencyIndex::default();
    for chunk in features.chunks(chunk_size) {
        index.merge(FrequencyIndex::build(chunk));
    }
    index
}

fn infer_all(
    features: &[Feature],
    index: &FrequencyIndex,
    config: &EngineConfig,
    chunk_size: usize,
) -> Vec<Option<CenterInference>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        features
            .par_chunks(chunk_size)
            .flat_map_iter(|chunk| chunk.iter().map(|f| infer_center(f, index, config)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        features
            .chunks(chunk_size)
            .flat_map(|chunk| chunk.iter().map(|f| infer_center(f, index, config)))
            .collect()
    }
}

fn annotate(
    features: Vec<Feature>,
    index: &FrequencyIndex,
    config: &EngineConfig,
    chunk_size: usize,
) -> Vec<AnnotatedFeature> {
    let centers = infer_all(&features, index, config, chunk_size);

    features
        .into_iter()
        .zip(centers)
        .enumerate()
        .map(|(i, (feature, center))| {
            if center.is_none() {
                tracing::debug!(index = i, "feature has no vertices, left unanchored");
            }
            AnnotatedFeature {
                id: feature.id.clone().unwrap_or_else(|| format!("feature-{}", i)),
                anchor: center.map(|c| c.anchor),
                anchor_source: center.map(|c| c.source),
                feature,
            }
        })
        .collect()
}
