//! WASM bindings for the geo crate.
//!
//! Every entrypoint takes and returns JSON strings so the engine can be
//! driven from JavaScript/TypeScript in browsers and Deno.

use crate::batch::Query;
use crate::{analyze, analyze_batch, haversine_distance, AnnotatedDataset, Coordinate, EngineConfig, FeatureCollection};
use wasm_bindgen::prelude::*;

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn load(geojson: &str) -> Result<AnnotatedDataset, JsValue> {
    let collection = FeatureCollection::from_geojson_str(geojson).map_err(|e| js_error("GeoJSON parse error", e))?;
    Ok(AnnotatedDataset::from_collection(collection, &EngineConfig::default()))
}

/// Great-circle distance in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance(&Coordinate::new(lat1, lng1), &Coordinate::new(lat2, lng2))
}

/// Annotates `geojson` and analyzes one query.
///
/// # Returns
/// JSON string of the analysis result
#[wasm_bindgen]
pub fn analyze_geojson(lat: f64, lng: f64, geojson: &str, rank: u32) -> Result<String, JsValue> {
    let dataset = load(geojson)?;
    let result = analyze(lat, lng, &dataset, rank as usize).map_err(|e| js_error("Analysis error", e))?;
    serde_json::to_string(&result).map_err(|e| js_error("JSON serialize error", e))
}

/// Annotates `geojson` once and analyzes every query in `queries_json`
/// (an array of `{lat, lng, rank?}`).
#[wasm_bindgen]
pub fn analyze_geojson_batch(geojson: &str, queries_json: &str) -> Result<String, JsValue> {
    let dataset = load(geojson)?;
    let queries: Vec<Query> = serde_json::from_str(queries_json).map_err(|e| js_error("JSON parse error", e))?;
    serde_json::to_string(&analyze_batch(&queries, &dataset)).map_err(|e| js_error("JSON serialize error", e))
}

/// Parses free-text coordinates.
///
/// # Returns
/// JSON string with latitude/longitude, or `null` if the text does not parse
#[wasm_bindgen]
pub fn parse_coordinates(text: &str) -> String {
    match crate::parse_coordinates(text) {
        Some(coord) => serde_json::json!({
            "latitude": coord.latitude,
            "longitude": coord.longitude
        })
        .to_string(),
        None => "null".to_string(),
    }
}
