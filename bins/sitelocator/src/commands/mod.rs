//! CLI command implementations

pub mod analyze;
pub mod batch;
pub mod centers;
pub mod parse;
pub mod sites;

use crate::{DataArgs, QueryArgs};
use anyhow::{bail, Context, Result};
use sitelocator_geo::{parse_coordinates, AnnotatedDataset, Coordinate, EngineConfig, FeatureCollection};

/// Reads, parses and annotates the GeoJSON dataset named by `args`.
pub fn load_dataset(args: &DataArgs, config: &EngineConfig) -> Result<AnnotatedDataset> {
    let text = std::fs::read_to_string(&args.data)
        .with_context(|| format!("Failed to read {}", args.data.display()))?;
    let collection = FeatureCollection::from_geojson_str(&text)
        .with_context(|| format!("Failed to parse GeoJSON in {}", args.data.display()))?;

    let source = args.source.clone().unwrap_or_else(|| {
        args.data
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.data.display().to_string())
    });

    Ok(AnnotatedDataset::from_collection(collection, config).with_source(source))
}

/// Resolves the query point from free text or `--lat/--lng`.
pub fn resolve_query(args: &QueryArgs) -> Result<Coordinate> {
    match (&args.query, args.lat, args.lng) {
        (Some(text), _, _) => parse_coordinates(text)
            .with_context(|| format!("Could not parse coordinates from {:?}", text)),
        (None, Some(lat), Some(lng)) => {
            let coordinate = Coordinate::new(lat, lng);
            if !coordinate.is_valid() {
                bail!("Coordinates out of range: {}, {}", lat, lng);
            }
            Ok(coordinate)
        }
        _ => bail!("A query point is required: pass \"lat,lng\" or --lat/--lng"),
    }
}

/// Formats an angle for display.
pub fn degrees(value: f64) -> String {
    format!("{:.1}°", value)
}
