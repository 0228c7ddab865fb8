//! Centers command - inferred anchor per feature

use super::load_dataset;
use crate::DataArgs;
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use sitelocator_geo::center::AnchorSource;
use sitelocator_geo::{Coordinate, EngineConfig};

#[derive(Debug, Serialize)]
struct CenterRow {
    id: String,
    anchor: Option<Coordinate>,
    anchor_source: Option<AnchorSource>,
}

/// Run centers command
pub fn run(data: &DataArgs, config: &EngineConfig, json: bool) -> Result<()> {
    let dataset = load_dataset(data, config)?;
    let rows: Vec<_> = dataset
        .features()
        .iter()
        .map(|f| CenterRow { id: f.id.clone(), anchor: f.anchor, anchor_source: f.anchor_source })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let stats = dataset.stats();
    println!();
    println!(
        "  {} {}",
        format!("{} features", stats.annotated).bold(),
        format!("({} duplicates dropped, {} unanchored)", stats.duplicates, stats.unanchored).dimmed()
    );
    println!("  {}", "─".repeat(60).dimmed());
    for row in &rows {
        match (row.anchor, row.anchor_source) {
            (Some(anchor), Some(source)) => println!(
                "  {:<24} {:>11.6} {:>12.6} {}",
                row.id,
                anchor.latitude,
                anchor.longitude,
                format!("{:?}", source).dimmed()
            ),
            _ => println!("  {:<24} {}", row.id, "no anchor".yellow()),
        }
    }
    println!();
    Ok(())
}
