//! Ribbonline CLI - centreline widths for parcel and building polygons

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ribbonline_algorithms::pipeline::{process, PipelineParams};
use ribbonline_api::{
    ApiClientBlocking, ApiClientOptions, ApiConfig, AreasQuery, ExportFormat,
    DEFAULT_CLASSIFICATION_CODES,
};
use ribbonline_core::io::{collection_from_str, read_geojson, write_geojson};
use ribbonline_core::FeatureCollection;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ribbonline")]
#[command(author, version, about = "Centreline widths for parcel and building polygons", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process polygons from a GeoJSON file
    File {
        /// Input GeoJSON file
        input: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Prefix for the output layer files
        #[arg(short, long, default_value = "ribbonline")]
        prefix: String,
        /// Boundary sampling distance for skeletonization
        #[arg(long, default_value = "0.5")]
        interpolation_distance: f64,
        /// Finer sampling distance for the skeletonization retry
        #[arg(long, default_value = "0.2")]
        retry_interpolation_distance: f64,
        /// Dead-end parts at or below this length are pruned
        #[arg(long, default_value = "5.0")]
        prune_threshold: f64,
        /// Simplification tolerance
        #[arg(long, default_value = "1.0")]
        simplify_tolerance: f64,
        /// Spacing of width sample points along each segment
        #[arg(long, default_value = "1.0")]
        sample_step: f64,
    },
    /// Pull polygons from the parcel-data API, then process them
    Fetch {
        /// JSON file with API url, username and password
        #[arg(short, long, default_value = "api_config.json")]
        config: PathBuf,
        /// Area aggregation scale
        #[arg(long, default_value = "oa")]
        scale: String,
        /// Comma-separated area codes
        #[arg(long, default_value = "E00042673")]
        area_codes: String,
        /// Comma-separated classification codes
        #[arg(long, default_value = DEFAULT_CLASSIFICATION_CODES)]
        classification_codes: String,
        /// Request the gzip-compressed response mode
        #[arg(long)]
        gzip: bool,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Prefix for the output layer files
        #[arg(short, long, default_value = "ribbonline")]
        prefix: String,
        /// Boundary sampling distance for skeletonization
        #[arg(long, default_value = "0.5")]
        interpolation_distance: f64,
        /// Finer sampling distance for the skeletonization retry
        #[arg(long, default_value = "0.2")]
        retry_interpolation_distance: f64,
        /// Dead-end parts at or below this length are pruned
        #[arg(long, default_value = "5.0")]
        prune_threshold: f64,
        /// Simplification tolerance
        #[arg(long, default_value = "1.0")]
        simplify_tolerance: f64,
        /// Spacing of width sample points along each segment
        #[arg(long, default_value = "1.0")]
        sample_step: f64,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn pipeline_params(
    interpolation_distance: f64,
    retry_interpolation_distance: f64,
    prune_threshold: f64,
    simplify_tolerance: f64,
    sample_step: f64,
) -> PipelineParams {
    PipelineParams {
        interpolation_distance,
        retry_interpolation_distance,
        prune_threshold,
        simplify_tolerance,
        sample_step,
        ..PipelineParams::default()
    }
}

fn read_features(path: &PathBuf) -> Result<FeatureCollection> {
    let pb = spinner("Reading features...");
    let collection = read_geojson(path).context("Failed to read input file")?;
    pb.finish_and_clear();
    info!("Input: {} features", collection.len());
    Ok(collection)
}

fn run_pipeline(
    collection: &FeatureCollection,
    params: &PipelineParams,
    output_dir: &PathBuf,
    prefix: &str,
) -> Result<()> {
    let start = Instant::now();
    let (ribbons, centrelines) = process(collection, params);

    let pb = spinner("Writing output...");
    let widths_path = output_dir.join(format!("{}_widths.geojson", prefix));
    let centrelines_path = output_dir.join(format!("{}_centrelines.geojson", prefix));
    write_geojson(&ribbons, &widths_path).context("Failed to write widths layer")?;
    write_geojson(&centrelines, &centrelines_path)
        .context("Failed to write centrelines layer")?;
    pb.finish_and_clear();

    done("Widths", &widths_path, start.elapsed());
    done("Centrelines", &centrelines_path, start.elapsed());
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::File {
            input,
            output_dir,
            prefix,
            interpolation_distance,
            retry_interpolation_distance,
            prune_threshold,
            simplify_tolerance,
            sample_step,
        } => {
            let collection = read_features(&input)?;
            let params = pipeline_params(
                interpolation_distance,
                retry_interpolation_distance,
                prune_threshold,
                simplify_tolerance,
                sample_step,
            );
            run_pipeline(&collection, &params, &output_dir, &prefix)?;
        }

        Commands::Fetch {
            config,
            scale,
            area_codes,
            classification_codes,
            gzip,
            output_dir,
            prefix,
            interpolation_distance,
            retry_interpolation_distance,
            prune_threshold,
            simplify_tolerance,
            sample_step,
        } => {
            let api_config =
                ApiConfig::from_file(&config).context("Failed to load API config")?;
            let client = ApiClientBlocking::new(api_config, ApiClientOptions::default())
                .context("Failed to build API client")?;

            let query = AreasQuery::new()
                .scale(&scale)
                .area_codes(&area_codes)
                .classification_codes(&classification_codes)
                .export_format(if gzip {
                    ExportFormat::GeoJsonGz
                } else {
                    ExportFormat::GeoJson
                });

            // A failed pull is fatal: no partial output is written.
            let pb = spinner("Fetching features...");
            let text = client
                .fetch_areas_text(&query)
                .context("Data acquisition failed")?;
            pb.finish_and_clear();

            let raw_path = output_dir.join("data.geojson");
            std::fs::write(&raw_path, &text).context("Failed to save fetched data")?;
            info!("Fetched data saved to: {}", raw_path.display());

            let collection =
                collection_from_str(&text).context("Failed to parse fetched GeoJSON")?;
            info!("Input: {} features", collection.len());

            let params = pipeline_params(
                interpolation_distance,
                retry_interpolation_distance,
                prune_threshold,
                simplify_tolerance,
                sample_step,
            );
            run_pipeline(&collection, &params, &output_dir, &prefix)?;
        }
    }

    Ok(())
}
