//! sitelocator: match locations to antenna sites and sectors from the command line.

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{analyze, batch, centers, parse, sites};
use config::Config;

/// Antenna site and sector locator
#[derive(Parser)]
#[command(name = "sitelocator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to .sitelocator.toml, sitelocator.toml, .config/sitelocator.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// GeoJSON input shared by the dataset commands
#[derive(Args)]
pub struct DataArgs {
    /// GeoJSON file (FeatureCollection, Feature, or array of features)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Provenance name reported with results (defaults to the file name)
    #[arg(short, long)]
    pub source: Option<String>,
}

/// Query point, as free text or explicit coordinates
#[derive(Args)]
pub struct QueryArgs {
    /// Query as "lat,lng" text
    #[arg(allow_hyphen_values = true, conflicts_with_all = ["lat", "lng"])]
    pub query: Option<String>,

    /// Query latitude
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Query longitude
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lng: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best sector of the nearest (or ranked) site
    Analyze {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// 1-based site rank; out-of-range values are clamped
        #[arg(short, long, default_value = "1")]
        rank: usize,
    },

    /// List sites ranked by distance from the query point
    Sites {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Maximum number of sites to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show the inferred anchor of every feature
    Centers {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Analyze a JSON array of {lat, lng, rank} queries
    Batch {
        #[command(flatten)]
        data: DataArgs,

        /// JSON file with the queries
        #[arg(short, long)]
        queries: PathBuf,
    },

    /// Parse free-text coordinates
    Parse {
        /// Text such as "48.137, 11.575"
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
}

fn init_logging(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("sitelocator=debug,sitelocator_geo=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.schema.general.log_level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_logging(cli.verbose, &level);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = &config.path {
        tracing::debug!(path = %path, "loaded configuration");
    }
    let engine = &config.schema.engine;

    let result = match cli.command {
        Commands::Analyze { data, query, rank } => analyze::run(&data, &query, rank, engine, cli.json),
        Commands::Sites { data, query, limit } => sites::run(&data, &query, limit, engine, cli.json),
        Commands::Centers { data } => centers::run(&data, engine, cli.json),
        Commands::Batch { data, queries } => batch::run(&data, &queries, engine, cli.json),
        Commands::Parse { text } => parse::run(&text, cli.json),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
