use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use fbref_scout::config::init_logging;
use fbref_scout::synthetic::synthetic_season;

/// Writes a seeded synthetic season table as CSV.
#[derive(Parser)]
#[command(name = "synth_season")]
struct Args {
    #[arg(long, default_value = "data/synthetic_season.csv")]
    out: PathBuf,
    #[arg(long, default_value_t = 2500)]
    players: usize,
    #[arg(long, default_value_t = 2024)]
    seed: u64,
}

fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();

    let table = synthetic_season(args.players, args.seed);
    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent).ok();
    }
    let mut wtr = csv::Writer::from_path(&args.out)
        .with_context(|| format!("create {}", args.out.display()))?;
    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    println!("Synthetic season written");
    println!("File: {}", args.out.display());
    println!("Players: {} (seed {})", table.len(), args.seed);
    Ok(())
}
