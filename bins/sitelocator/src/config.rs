//! Configuration file loading

use anyhow::{Context, Result};
use serde::Deserialize;
use sitelocator_geo::EngineConfig;
use std::path::Path;

/// Candidate locations, checked in order, when `--config` is not given
const CONFIG_CANDIDATES: [&str; 3] = [".sitelocator.toml", "sitelocator.toml", ".config/sitelocator.toml"];

/// `[general]` table
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: "warn".to_string() }
    }
}

/// Parsed configuration file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigSchema {
    pub general: GeneralConfig,
    pub engine: EngineConfig,
}

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or the standard locations, falling back to defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };
        schema
            .engine
            .validate()
            .with_context(|| format!("Invalid [engine] section in {}", config_path.as_deref().unwrap_or("defaults")))?;

        Ok(Self { schema, path: config_path })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    CONFIG_CANDIDATES
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.general.log_level, "warn");
        assert_eq!(config.schema.engine, EngineConfig::default());
    }

    #[test]
    fn test_partial_engine_section() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [general]
            log_level = "debug"

            [engine]
            near_field_m = 50.0
            custom_field = "cell_name"
            "#,
        )
        .unwrap();
        assert_eq!(schema.general.log_level, "debug");
        assert_eq!(schema.engine.near_field_m, 50.0);
        assert_eq!(schema.engine.custom_field.as_deref(), Some("cell_name"));
        assert_eq!(schema.engine.synthetic_beamwidth, 65.0);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Config::load(Some("/nonexistent/sitelocator.toml")).is_err());
    }
}
