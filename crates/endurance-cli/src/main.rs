use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use endurance_core::{analyze, Analysis, FlashCounters, ParameterInput, SnapshotSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Debug, Parser)]
#[command(name = "ssd-endurance")]
#[command(about = "Estimate SSD wear and remaining life from two smartctl snapshots")]
struct Cli {
    /// First smartctl output file (earlier timestamp)
    #[arg(long)]
    snapshot1: PathBuf,

    /// Second smartctl output file (later timestamp)
    #[arg(long)]
    snapshot2: PathBuf,

    /// KiB per host data unit count (e.g. 0.5)
    #[arg(long)]
    host_unit_size: f64,

    /// KiB per flash write unit count (e.g. 32)
    #[arg(long)]
    flash_unit_size: f64,

    /// Manufacturer rated P/E cycles (e.g. 3000 for TLC)
    #[arg(long)]
    rated_pe_cycles: u64,

    /// Drive capacity in GiB; read from snapshot 2 when omitted
    #[arg(long)]
    capacity: Option<f64>,

    /// Flash write counter at snapshot 1
    #[arg(long, requires = "flash_units_after")]
    flash_units_before: Option<u64>,

    /// Flash write counter at snapshot 2
    #[arg(long, requires = "flash_units_before")]
    flash_units_after: Option<u64>,

    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let first_text = read_snapshot(&cli.snapshot1)?;
    let second_text = read_snapshot(&cli.snapshot2)?;

    let input = ParameterInput {
        host_unit_size_kib: cli.host_unit_size,
        flash_unit_size_kib: cli.flash_unit_size,
        rated_endurance_cycles: cli.rated_pe_cycles,
        capacity_gib: cli.capacity,
    };
    let flash = cli
        .flash_units_before
        .zip(cli.flash_units_after)
        .map(|(before, after)| FlashCounters { before, after });

    info!("parsing smartctl outputs and calculating endurance metrics");
    let first_name = cli.snapshot1.display().to_string();
    let second_name = cli.snapshot2.display().to_string();
    let analysis = analyze(
        SnapshotSource {
            name: &first_name,
            text: &first_text,
        },
        SnapshotSource {
            name: &second_name,
            text: &second_text,
        },
        &input,
        flash,
    )?;

    let rendered = render(&analysis, cli.format)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "report saved");
        }
        None => println!("{rendered}"),
    }

    info!("analysis complete");
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn render(analysis: &Analysis, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(report::render_report(analysis, Local::now().naive_local())),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(analysis)?),
    }
}
