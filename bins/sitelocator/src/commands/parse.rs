//! Parse command - free-text coordinates

use anyhow::{bail, Result};
use sitelocator_geo::parse_coordinates;

/// Run parse command
pub fn run(text: &str, json: bool) -> Result<()> {
    let Some(coordinate) = parse_coordinates(text) else {
        bail!("No coordinates found in {:?}", text);
    };

    if json {
        println!("{}", serde_json::to_string(&coordinate)?);
    } else {
        println!("{}, {}", coordinate.latitude, coordinate.longitude);
    }
    Ok(())
}
