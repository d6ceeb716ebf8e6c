//! Eco score batch report.
//!
//! Scores a tract grid, a single point, or a pair of points and prints the
//! result as JSON on stdout. Logs go to stderr.

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use eco_common::BoundingBox;
use eco_score::{generate_grid, to_feature_collection, EcoScoreService, ScoringConfig, ScoringStrategy};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use report::{parse_location, GridSummary};

#[derive(Parser, Debug)]
#[command(name = "eco-report")]
#[command(about = "Environmental health scores and decline projections for map tracts")]
struct Args {
    /// Scoring strategy: spectral_index or direct_estimate
    #[arg(long, env = "ECO_SCORING_STRATEGY")]
    strategy: Option<String>,

    /// Seed for simulated noise
    #[arg(long, env = "ECO_RNG_SEED")]
    seed: Option<u64>,

    /// Band scene JSON used before falling back to simulation
    #[arg(long, env = "ECO_RASTER_PATH")]
    raster: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and project a grid of tracts over a bounding box
    Grid {
        /// Bounding box as minlon,minlat,maxlon,maxlat
        #[arg(long, default_value = "-123.0,38.3,-122.8,38.7", allow_hyphen_values = true)]
        bbox: String,

        #[arg(long, default_value = "10")]
        rows: usize,

        #[arg(long, default_value = "10")]
        cols: usize,

        /// Projection horizon in years
        #[arg(long, env = "ECO_PREDICTION_YEARS")]
        years: Option<u32>,

        /// Only output tracts needing intervention, most urgent first
        #[arg(long)]
        at_risk_only: bool,

        #[arg(long, value_enum, default_value = "geojson")]
        format: OutputFormat,
    },

    /// Score a single location
    Point {
        /// Location as lat,lon
        #[arg(allow_hyphen_values = true)]
        location: String,

        /// Acquisition date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Compare two locations
    Compare {
        /// First location as lat,lon
        #[arg(allow_hyphen_values = true)]
        first: String,

        /// Second location as lat,lon
        #[arg(allow_hyphen_values = true)]
        second: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// GeoJSON FeatureCollection
    Geojson,
    /// Aggregate counts only
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    let mut config = ScoringConfig::from_env();
    if let Some(strategy) = &args.strategy {
        config.strategy = ScoringStrategy::from_str(strategy);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(raster) = &args.raster {
        config.raster_path = Some(raster.clone());
    }

    let service = EcoScoreService::from_config(config).context("invalid scoring configuration")?;

    let output = match args.command {
        Command::Grid {
            bbox,
            rows,
            cols,
            years,
            at_risk_only,
            format,
        } => {
            let bbox = BoundingBox::parse(&bbox)?;
            info!(?bbox, rows, cols, "building tract grid");

            let tracts = generate_grid(&bbox, rows, cols)?;
            let scored = service.score_batch(tracts).await?;
            let tracts = if at_risk_only {
                service.predict_batch(scored, years).await?
            } else {
                service.annotate_predictions(scored, years).await?
            };

            let stats = service.cache_stats().await;
            info!(
                band_hit_rate = stats.bands.hit_rate(),
                predictions = stats.predictions.entries,
                "report complete"
            );

            match format {
                OutputFormat::Geojson => to_feature_collection(&tracts),
                OutputFormat::Summary => serde_json::to_value(GridSummary::from_tracts(&tracts))?,
            }
        }
        Command::Point { location, date } => {
            let location = parse_location(&location)?;
            let score = service.score_location(location.lat, location.lon, date).await?;
            serde_json::to_value(score)?
        }
        Command::Compare { first, second } => {
            let first = parse_location(&first)?;
            let second = parse_location(&second)?;
            serde_json::to_value(service.compare_locations(first, second, None).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
