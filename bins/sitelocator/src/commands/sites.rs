//! Sites command - ranked site list

use super::{load_dataset, resolve_query};
use crate::{DataArgs, QueryArgs};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use sitelocator_geo::{rank_sites, Coordinate, EngineConfig};

/// JSON output for one site
#[derive(Debug, Serialize)]
struct SiteSummary {
    rank: usize,
    key: String,
    anchor: Coordinate,
    distance_km: f64,
    members: Vec<String>,
}

/// Run sites command
pub fn run(data: &DataArgs, query: &QueryArgs, limit: usize, config: &EngineConfig, json: bool) -> Result<()> {
    let dataset = load_dataset(data, config)?;
    let point = resolve_query(query)?;
    let sites = rank_sites(point.latitude, point.longitude, &dataset)?;

    let summaries: Vec<_> = sites
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, site)| SiteSummary {
            rank: i + 1,
            key: site.key.to_string(),
            anchor: site.anchor,
            distance_km: site.distance_km,
            members: site.members.iter().map(|f| f.id.clone()).collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!();
    println!("  {:<5} {:<24} {:>12} {}", "Rank".dimmed(), "Site".dimmed(), "Distance".dimmed(), "Members".dimmed());
    println!("  {}", "─".repeat(60).dimmed());
    for s in &summaries {
        println!(
            "  {:<5} {:<24} {:>9.3} km {}",
            s.rank.to_string().bold(),
            s.key,
            s.distance_km,
            s.members.join(", ")
        );
    }
    if sites.len() > summaries.len() {
        println!("  {}", format!("… {} more", sites.len() - summaries.len()).dimmed());
    }
    println!();
    Ok(())
}
