//! Exocensus - exoplanet catalog census
//!
//! A CLI tool that downloads the exoplanet catalog and reports the
//! number of orphan planets, the planet orbiting the hottest star,
//! and a discovery timeline grouped by planet size.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, download or decode failure)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use dataset::{DatasetFetcher, FetchOptions};
use models::{CensusReport, PlanetRecord, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so `general.verbose` can raise the level
    let loaded = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(log_level(&args, &loaded.config))?;

    info!("Exocensus v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    loaded.origin.log();

    let mut config = loaded.config;
    config.merge_with_args(&args);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_census(&args, &config).await {
        error!("Census failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .exocensus.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the dataset URL, timeout, or report format.");
    Ok(())
}

/// Effective log level from flags and config.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging. Logs go to stderr so reports on stdout stay clean.
fn init_logging(level: tracing::Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Where the configuration came from.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Defaults,
    DefaultFileInvalid(String),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigOrigin::Defaults => debug!("No config file found, using defaults"),
            ConfigOrigin::DefaultFileInvalid(reason) => {
                warn!("Failed to load config: {}", reason)
            }
        }
    }
}

struct LoadedConfig {
    config: Config,
    origin: ConfigOrigin,
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` that cannot be read is an error; a broken
/// default file only produces a warning.
fn load_config(args: &Args) -> Result<LoadedConfig> {
    if let Some(ref config_path) = args.config {
        return Ok(LoadedConfig {
            config: Config::load(config_path)?,
            origin: ConfigOrigin::Explicit(config_path.clone()),
        });
    }

    Ok(match Config::load_default() {
        Ok(Some(config)) => LoadedConfig {
            config,
            origin: ConfigOrigin::DefaultFile,
        },
        Ok(None) => LoadedConfig {
            config: Config::default(),
            origin: ConfigOrigin::Defaults,
        },
        Err(e) => LoadedConfig {
            config: Config::default(),
            origin: ConfigOrigin::DefaultFileInvalid(format!("{:#}", e)),
        },
    })
}

/// Run the complete census: acquire records, aggregate, report.
async fn run_census(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Get the records
    let (source, records) = acquire_records(args, config).await?;

    // Step 2: Aggregate
    let orphan_count = analysis::count_orphans(&records);
    let hottest_star_planet = analysis::hottest_star_planet(&records);
    let timeline = analysis::build_timeline(&records);
    debug!("Timeline covers {} discovery years", timeline.len());

    // Step 3: Build and emit the report
    let report = CensusReport {
        metadata: ReportMetadata {
            source,
            generated_at: Utc::now(),
            records_analyzed: records.len(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        orphan_count,
        hottest_star_planet,
        timeline,
    };

    let output = report::render(&report, config.report.format)?;

    match config.report.output_path() {
        Some(path) => {
            report::write_report(&output, &path)?;
            if !args.quiet {
                println!("✅ Report saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load records from `--input` or download them from the configured URL.
async fn acquire_records(args: &Args, config: &Config) -> Result<(String, Vec<PlanetRecord>)> {
    if let Some(ref input) = args.input {
        let records = dataset::load_records(input)?;
        return Ok((input.display().to_string(), records));
    }

    let fetcher = DatasetFetcher::new(FetchOptions {
        timeout_seconds: config.dataset.timeout_seconds,
        show_progress: !args.quiet,
    })?;

    let url = config.dataset.url.clone();
    match fetcher.fetch(&url).await? {
        Some(records) => {
            info!("JSON formatted exoplanet dataset received successfully");
            Ok((url, records))
        }
        None => {
            warn!("No dataset URL configured; nothing to analyze");
            Ok((url, Vec::new()))
        }
    }
}
