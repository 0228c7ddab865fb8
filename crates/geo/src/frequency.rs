//! Coordinate frequency index.
//!
//! Counts, for every distinct vertex, how many features reference it. A vertex
//! shared by several sector polygons is very likely the real tower location.

use crate::{Coordinate, Feature};
use std::collections::{HashMap, HashSet};

/// Exact identity of a coordinate, independent of float formatting.
///
/// Two coordinates share a key iff they have the same shortest decimal
/// representation (`-0.0` and `0.0` are merged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey(u64, u64);

impl From<&Coordinate> for CoordKey {
    fn from(c: &Coordinate) -> Self {
        // Adding 0.0 turns -0.0 into 0.0
        CoordKey((c.longitude + 0.0).to_bits(), (c.latitude + 0.0).to_bits())
    }
}

/// Dataset-wide vertex occurrence counts.
#[derive(Debug, Clone, Default)]
pub struct FrequencyIndex {
    counts: HashMap<CoordKey, u32>,
}

impl FrequencyIndex {
    /// Builds the index over all features.
    pub fn build<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Self {
        let mut index = Self::default();
        for feature in features {
            index.add(feature);
        }
        index
    }

    /// Counts one feature's distinct vertices.
    pub fn add(&mut self, feature: &Feature) {
        let unique: HashSet<CoordKey> = feature.geometry.vertices().iter().map(CoordKey::from).collect();
        for key in unique {
            *self.counts.entry(key).or_insert(0) += 1;
        }
    }

    /// Merges another index into this one.
    pub fn merge(&mut self, other: FrequencyIndex) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    /// Number of features referencing `coordinate`.
    pub fn count(&self, coordinate: &Coordinate) -> u32 {
        self.counts.get(&CoordKey::from(coordinate)).copied().unwrap_or(0)
    }

    /// Number of distinct coordinates.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no coordinate has been indexed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Geometry;

    fn wedge(tip: Coordinate, a: Coordinate, b: Coordinate) -> Feature {
        Feature::new(Geometry::Polygon(vec![vec![tip, a, b, tip]]))
    }

    #[test]
    fn test_empty_dataset() {
        let features: Vec<Feature> = Vec::new();
        let index = FrequencyIndex::build(&features);
        assert!(index.is_empty());
        assert_eq!(index.count(&Coordinate::new(0.0, 0.0)), 0);
    }

    #[test]
    fn test_closing_vertex_counted_once() {
        let tip = Coordinate::new(1.0, 1.0);
        let f = wedge(tip, Coordinate::new(1.1, 1.0), Coordinate::new(1.0, 1.1));
        let index = FrequencyIndex::build([&f]);
        assert_eq!(index.count(&tip), 1);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_shared_tip_counts_across_features() {
        let tip = Coordinate::new(1.0, 1.0);
        let features = vec![
            wedge(tip, Coordinate::new(1.1, 1.0), Coordinate::new(1.1, 1.1)),
            wedge(tip, Coordinate::new(1.0, 1.1), Coordinate::new(0.9, 1.1)),
            wedge(tip, Coordinate::new(0.9, 0.9), Coordinate::new(1.0, 0.9)),
        ];
        let index = FrequencyIndex::build(&features);
        assert_eq!(index.count(&tip), 3);
        assert_eq!(index.count(&Coordinate::new(1.1, 1.0)), 1);
    }

    #[test]
    fn test_exact_keys_not_rounded() {
        let f = Feature::new(Geometry::Point(Coordinate::new(1.0, 1.0)));
        let index = FrequencyIndex::build([&f]);
        assert_eq!(index.count(&Coordinate::new(1.000_000_1, 1.0)), 0);
        assert_eq!(index.count(&Coordinate::new(1.0, 1.0)), 1);
    }

    #[test]
    fn test_negative_zero_merged() {
        let f = Feature::new(Geometry::Point(Coordinate::new(-0.0, 0.0)));
        let index = FrequencyIndex::build([&f]);
        assert_eq!(index.count(&Coordinate::new(0.0, 0.0)), 1);
    }

    #[test]
    fn test_merge() {
        let f = Feature::new(Geometry::Point(Coordinate::new(1.0, 1.0)));
        let mut a = FrequencyIndex::build([&f]);
        a.merge(FrequencyIndex::build([&f]));
        assert_eq!(a.count(&Coordinate::new(1.0, 1.0)), 2);
    }
}
