use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use runrs::config::RunRsConfig;
use runrs::duration::{format_duration, parse_duration_strict};
use runrs::error::RunRsError;
use runrs::import::{read_heart_rate_series, HistoryImporter, ImportSummary};
use runrs::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use runrs::models::{HeartRateZones, RacePredictions, TrainingPaces, Units, ZoneTally};
use runrs::riegel::RiegelPredictor;
use runrs::vdot::VdotAnalyzer;
use runrs::zones::ZoneAggregator;

/// RunRS - Running Performance Analytics CLI
///
/// A Rust-based tool for race-time prediction, VDOT fitness estimation,
/// training pace derivation and heart rate time-in-zone analysis.
#[derive(Parser)]
#[command(name = "runrs")]
#[command(author = "RunRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Running Performance Analytics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Emit results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict race times from a single known performance
    Predict {
        /// Known race distance in kilometers
        #[arg(short, long)]
        distance: f64,

        /// Known finish time (H:MM:SS or M:SS)
        #[arg(short, long)]
        time: String,

        /// Prediction model (riegel, daniels)
        #[arg(short, long, default_value = "riegel")]
        method: String,
    },

    /// Estimate VDOT from a performance, with predictions and training paces
    Vdot {
        /// Race distance in kilometers
        #[arg(short, long)]
        distance: f64,

        /// Finish time (H:MM:SS or M:SS)
        #[arg(short, long)]
        time: String,
    },

    /// Derive training paces from a known VDOT score
    Paces {
        /// VDOT score (typically 20-85)
        #[arg(long)]
        vdot: f64,
    },

    /// Tally heart rate time in zone from a sample series
    Zones {
        /// Heart rate series file (one bpm value per line, 1 Hz)
        #[arg(short, long)]
        file: PathBuf,

        /// Max heart rate, used when no custom zone bounds are configured
        #[arg(short, long)]
        max_hr: Option<u16>,
    },

    /// Analyze a performance history: best recent VDOT and race outlook
    Analyze {
        /// History CSV with distance_km, time and date columns
        #[arg(short, long)]
        file: PathBuf,

        /// Analysis date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Predicted Time")]
    time: String,
}

#[derive(Tabled)]
struct PaceRow {
    #[tabled(rename = "Intensity")]
    intensity: String,
    #[tabled(rename = "Pace")]
    pace: String,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Range (bpm)")]
    range: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Full report emitted by the analyze command
#[derive(Serialize)]
struct AnalyzeReport {
    as_of: NaiveDate,
    import: ImportSummary,
    vdot: Option<f64>,
    daniels_predictions: Option<RacePredictions>,
    training_paces: Option<TrainingPaces>,
    riegel_predictions: Option<RacePredictions>,
}

fn main() {
    if let Err(err) = run() {
        let message = match err.downcast_ref::<RunRsError>() {
            Some(e) => e.user_message(),
            None => err.to_string(),
        };
        eprintln!("{} {}", "error:".red().bold(), message);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        format: cli.log_format,
    };
    init_logging(&log_config)?;

    let config = RunRsConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Predict {
            distance,
            time,
            method,
        } => cmd_predict(distance, &time, &method, cli.json),
        Commands::Vdot { distance, time } => cmd_vdot(distance, &time, &config, cli.json),
        Commands::Paces { vdot } => cmd_paces(vdot, &config, cli.json),
        Commands::Zones { file, max_hr } => cmd_zones(&file, max_hr, &config, cli.json),
        Commands::Analyze { file, as_of } => cmd_analyze(&file, as_of.as_deref(), &config, cli.json),
    }
}

fn cmd_predict(distance: f64, time: &str, method: &str, json: bool) -> Result<()> {
    let known_seconds = parse_time_arg(time)?;

    let predictions = match method {
        "riegel" => RiegelPredictor::predict_standard_distances(distance, known_seconds)?,
        "daniels" => {
            let vdot = VdotAnalyzer::estimate_vdot(distance, known_seconds)?;
            VdotAnalyzer::derive_race_predictions(vdot)?
        }
        other => bail!("unknown prediction method: {} (expected riegel or daniels)", other),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Race predictions ({}) from {} over {} km",
            method,
            format_duration(known_seconds),
            distance
        )
        .blue()
        .bold()
    );
    print_predictions_table(&predictions);
    Ok(())
}

fn cmd_vdot(distance: f64, time: &str, config: &RunRsConfig, json: bool) -> Result<()> {
    let seconds = parse_time_arg(time)?;
    let vdot = VdotAnalyzer::estimate_vdot(distance, seconds)?;
    let predictions = VdotAnalyzer::derive_race_predictions(vdot)?;
    let paces = VdotAnalyzer::derive_training_paces(vdot)?;

    if json {
        #[derive(Serialize)]
        struct VdotReport {
            vdot: f64,
            predictions: RacePredictions,
            training_paces: TrainingPaces,
        }
        let report = VdotReport {
            vdot,
            predictions,
            training_paces: paces,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "VDOT".green().bold(), format!("{:.1}", vdot).green().bold());
    println!();
    println!("{}", "Equivalent race performances".blue().bold());
    print_predictions_table(&predictions);
    println!();
    println!("{}", "Training paces".blue().bold());
    print_paces_table(&paces, config.athlete.preferred_units);
    Ok(())
}

fn cmd_paces(vdot: f64, config: &RunRsConfig, json: bool) -> Result<()> {
    let paces = VdotAnalyzer::derive_training_paces(vdot)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&paces)?);
        return Ok(());
    }

    println!("{}", format!("Training paces for VDOT {:.1}", vdot).blue().bold());
    print_paces_table(&paces, config.athlete.preferred_units);
    Ok(())
}

fn cmd_zones(
    file: &std::path::Path,
    max_hr: Option<u16>,
    config: &RunRsConfig,
    json: bool,
) -> Result<()> {
    let mut settings = config.athlete.clone();
    if let Some(hr) = max_hr {
        settings.max_hr = Some(hr);
    }

    let zones = ZoneAggregator::resolve_thresholds(&settings)?;
    let samples = read_heart_rate_series(file)?;
    let tally = ZoneAggregator::tally_zones(&samples, &zones);

    if json {
        #[derive(Serialize)]
        struct ZoneReport {
            zones: HeartRateZones,
            tally: ZoneTally,
        }
        let report = ZoneReport { zones, tally };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Time in heart rate zones".blue().bold());
    print_zone_table(&tally, &zones);
    println!(
        "{}",
        format!(
            "Total: {} ({} samples at 1 Hz)",
            format_duration(tally.total()),
            tally.total()
        )
        .dimmed()
    );
    Ok(())
}

fn cmd_analyze(
    file: &std::path::Path,
    as_of: Option<&str>,
    config: &RunRsConfig,
    json: bool,
) -> Result<()> {
    let as_of = match as_of {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date {:?}, expected YYYY-MM-DD", text))?,
        None => chrono::Local::now().date_naive(),
    };

    let importer = HistoryImporter::new();
    let (samples, summary) = importer.import_file(file)?;

    let best_vdot = VdotAnalyzer::best_recent_vdot(&samples, as_of);
    let (daniels_predictions, training_paces) = match best_vdot {
        Some(vdot) => (
            Some(VdotAnalyzer::derive_race_predictions(vdot)?),
            Some(VdotAnalyzer::derive_training_paces(vdot)?),
        ),
        None => (None, None),
    };
    let riegel_predictions = match RiegelPredictor::best_reference(&samples) {
        Some(reference) => Some(RiegelPredictor::predict_standard_distances(
            reference.distance_km,
            reference.seconds,
        )?),
        None => None,
    };

    if json {
        let report = AnalyzeReport {
            as_of,
            import: summary,
            vdot: best_vdot,
            daniels_predictions,
            training_paces,
            riegel_predictions,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Imported {} performances ({} skipped)",
            summary.imported, summary.skipped
        )
        .dimmed()
    );

    match best_vdot {
        Some(vdot) => {
            println!(
                "{} {}",
                "Best VDOT in the 30 days before".green().bold(),
                format!("{}: {:.1}", as_of, vdot).green().bold()
            );
            if let Some(predictions) = &daniels_predictions {
                println!();
                println!("{}", "Race outlook (Daniels)".blue().bold());
                print_predictions_table(predictions);
            }
            if let Some(paces) = &training_paces {
                println!();
                println!("{}", "Training paces".blue().bold());
                print_paces_table(paces, config.athlete.preferred_units);
            }
        }
        None => {
            println!(
                "{}",
                format!("No usable performances in the 30 days before {}", as_of).yellow()
            );
        }
    }

    if let Some(predictions) = &riegel_predictions {
        println!();
        println!("{}", "Race outlook (Riegel, from best performance on record)".blue().bold());
        print_predictions_table(predictions);
    }

    Ok(())
}

fn parse_time_arg(text: &str) -> Result<u32> {
    let seconds = parse_duration_strict(text).map_err(RunRsError::Parse)?;
    if seconds == 0 {
        bail!("time must be greater than zero");
    }
    Ok(seconds)
}

fn print_predictions_table(predictions: &RacePredictions) {
    let rows: Vec<PredictionRow> = predictions
        .entries()
        .iter()
        .map(|(label, seconds)| PredictionRow {
            distance: label.to_string(),
            time: format_duration(*seconds),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_paces_table(paces: &TrainingPaces, units: Units) {
    let rows: Vec<PaceRow> = paces
        .entries()
        .iter()
        .map(|(label, seconds_per_km)| PaceRow {
            intensity: label.to_string(),
            pace: format_pace(*seconds_per_km, units),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_zone_table(tally: &ZoneTally, zones: &HeartRateZones) {
    let ranges = [
        format!("≤ {}", zones.zone1_max),
        format!("{}-{}", zones.zone1_max + 1, zones.zone2_max),
        format!("{}-{}", zones.zone2_max + 1, zones.zone3_max),
        format!("{}-{}", zones.zone3_max + 1, zones.zone4_max),
        format!("> {}", zones.zone4_max),
    ];
    let total = tally.total();

    let rows: Vec<ZoneRow> = tally
        .entries()
        .iter()
        .zip(ranges)
        .map(|((zone, count), range)| ZoneRow {
            zone: format!("Z{}", zone),
            range,
            time: format_duration(*count),
            share: if total == 0 {
                "0.0%".to_string()
            } else {
                format!("{:.1}%", f64::from(*count) * 100.0 / f64::from(total))
            },
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
}

/// Seconds per kilometer rendered in the athlete's preferred units
fn format_pace(seconds_per_km: u32, units: Units) -> String {
    match units {
        Units::Metric => format!("{}/km", format_duration(seconds_per_km)),
        Units::Imperial => {
            let per_mile = (f64::from(seconds_per_km) * 1.609_344).round() as u32;
            format!("{}/mi", format_duration(per_mile))
        }
    }
}
