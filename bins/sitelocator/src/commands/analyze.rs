//! Analyze command - best sector for one query point

use super::{degrees, load_dataset, resolve_query};
use crate::{DataArgs, QueryArgs};
use anyhow::Result;
use owo_colors::OwoColorize;
use sitelocator_geo::{analyze, AnalysisResult, EngineConfig};

/// Run analyze command
pub fn run(data: &DataArgs, query: &QueryArgs, rank: usize, config: &EngineConfig, json: bool) -> Result<()> {
    let dataset = load_dataset(data, config)?;
    let point = resolve_query(query)?;
    let result = analyze(point.latitude, point.longitude, &dataset, rank)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &AnalysisResult) {
    println!();
    println!(
        "  {} {} {}",
        "Site".blue().bold(),
        result.site_key.bold(),
        format!("(rank {} of {})", result.rank, result.total_sites).dimmed()
    );
    println!("  {:<12} {:.3} km, bearing {}", "Distance".dimmed(), result.distance_km, degrees(result.bearing));
    println!();

    println!("  {} {}", "Sector".green().bold(), result.feature_id.bold());
    if result.is_omni {
        println!("  {:<12} {}", "Coverage".dimmed(), "omnidirectional".yellow());
    } else {
        println!(
            "  {:<12} azimuth {}, beamwidth {} ({} → {})",
            "Coverage".dimmed(),
            degrees(result.azimuth),
            degrees(result.beamwidth),
            degrees(result.start_angle),
            degrees(result.end_angle)
        );
    }
    println!("  {:<12} {}", "Deviation".dimmed(), degrees(result.deviation));
    println!("  {:<12} {:?} (score {:.2})", "Match".dimmed(), result.tier, result.score);

    if let Some(value) = &result.custom_value {
        println!("  {:<12} {}", "Custom".dimmed(), value.to_json());
    }
    if let Some(source) = &result.source {
        println!("  {:<12} {}", "Source".dimmed(), source);
    }

    if result.candidates.len() > 1 {
        println!();
        println!("  {:<24} {:>9} {:>9} {:>9} {:>10}", "Candidate".dimmed(), "Azimuth".dimmed(), "Width".dimmed(), "Dev".dimmed(), "Score".dimmed());
        println!("  {}", "─".repeat(66).dimmed());
        for c in &result.candidates {
            let marker = if c.is_inside { "inside" } else if c.is_in_beam { "beam" } else { "" };
            println!(
                "  {:<24} {:>9} {:>9} {:>9} {:>10.2} {}",
                c.id,
                degrees(c.azimuth),
                degrees(c.beamwidth),
                degrees(c.deviation),
                c.score,
                marker.cyan()
            );
        }
    }
    println!();
}
