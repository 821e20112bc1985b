//! Synthetic demand history
//!
//! Generates seeded historical demand records for exercising forecaster
//! training. Demand centres on each type's default level, scaled by severity
//! and affected area, with multiplicative Gaussian noise.
//!
//! # Usage
//! ```bash
//! ./synth-history --rows-per-type 200 --seed 7 --output history.json
//! ./relief-engine --history history.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::io::Write;
use std::path::PathBuf;

use relief_engine::config::defaults::{default_demand, DEFAULT_SEVERITY};
use relief_engine::types::{HistoricalRecord, ResourceType};

/// Weekend demand uplift (Saturday/Sunday)
const WEEKEND_FACTOR: f64 = 1.15;
/// Monsoon-season uplift (June-September)
const MONSOON_FACTOR: f64 = 1.25;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "synth-history")]
#[command(about = "Synthetic demand history for relief-engine training")]
#[command(version)]
struct Args {
    /// Records generated per forecastable resource type
    #[arg(short, long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..=100_000))]
    rows_per_type: u32,

    /// Random seed for reproducibility
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Relative standard deviation of the demand noise
    #[arg(long, default_value = "0.1")]
    noise: f64,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn expected_demand(resource_type: ResourceType, day_of_week: u32, month: u32, affected_area: f64, severity: f64) -> f64 {
    let base = default_demand(resource_type) as f64;
    let severity_factor = severity / DEFAULT_SEVERITY as f64;
    let area_factor = 0.5 + affected_area / 10.0;
    let weekday_factor = if day_of_week >= 5 { WEEKEND_FACTOR } else { 1.0 };
    let season_factor = if (6..=9).contains(&month) { MONSOON_FACTOR } else { 1.0 };
    base * severity_factor * area_factor * weekday_factor * season_factor
}

fn generate(args: &Args) -> Result<Vec<HistoricalRecord>> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let noise = Normal::new(1.0, args.noise).context("Invalid noise level")?;

    let mut records = Vec::with_capacity(args.rows_per_type as usize * ResourceType::FORECASTABLE.len());
    for resource_type in ResourceType::FORECASTABLE {
        for _ in 0..args.rows_per_type {
            let day_of_week = rng.gen_range(0..7u32);
            let month = rng.gen_range(1..=12u32);
            let affected_area = f64::from(rng.gen_range(1..=20u32));
            let severity = f64::from(rng.gen_range(1..=5u32));

            let mean = expected_demand(resource_type, day_of_week, month, affected_area, severity);
            let quantity = (mean * noise.sample(&mut rng)).max(0.0).round();

            records.push(HistoricalRecord {
                resource_type,
                day_of_week: f64::from(day_of_week),
                month: f64::from(month),
                affected_area,
                severity,
                quantity,
            });
        }
    }
    Ok(records)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let records = generate(&args)?;
    let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} records to {}", records.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
