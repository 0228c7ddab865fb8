//! Batch command - many queries against one dataset

use super::{degrees, load_dataset};
use crate::DataArgs;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sitelocator_geo::{analyze_batch, EngineConfig, Query};
use std::path::Path;

/// Run batch command
pub fn run(data: &DataArgs, queries_path: &Path, config: &EngineConfig, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(queries_path)
        .with_context(|| format!("Failed to read {}", queries_path.display()))?;
    let queries: Vec<Query> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse queries in {}", queries_path.display()))?;
    let dataset = load_dataset(data, config)?;

    let outcomes = analyze_batch(&queries, &dataset);
    tracing::info!(queries = outcomes.len(), failed = outcomes.iter().filter(|o| !o.is_ok()).count(), "batch complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    println!();
    for outcome in &outcomes {
        let q = outcome.query;
        let label = format!("{:.6},{:.6}", q.lat, q.lng);
        match (&outcome.result, &outcome.error) {
            (Some(r), _) => println!(
                "  {:<24} {} {:<20} {:>9.3} km  dev {}",
                label,
                "✓".green(),
                r.feature_id,
                r.distance_km,
                degrees(r.deviation)
            ),
            (None, Some(e)) => println!("  {:<24} {} {}", label, "✗".red(), e),
            (None, None) => {}
        }
    }
    println!();
    Ok(())
}
