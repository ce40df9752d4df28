//! `scout`: query a season table from the command line.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use fbref_scout::aggregate::{league_summary, top_players};
use fbref_scout::config::{ScoutConfig, init_logging};
use fbref_scout::dataset::{self, EnrichedTable};
use fbref_scout::export::{ExportRequest, export_records_json, export_workbook, write_enriched_csv};
use fbref_scout::filter::{PlayerFilter, filter};
use fbref_scout::percentile::{compare, percentiles};
use fbref_scout::position::radar_metrics;
use fbref_scout::raw_table::RawTable;
use fbref_scout::similarity::{SimilarityOptions, similar_with};
use fbref_scout::{Metric, SimplifiedPosition};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Per-90 scouting queries over an FBref season table", long_about = None)]
struct Cli {
    /// Season table (.csv or .parquet); defaults to SCOUT_DATA_PATH
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Minimum minutes played to keep a row
    #[arg(long, global = true)]
    min_minutes: Option<u32>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Players most similar to one player
    Similar {
        player: String,
        #[arg(short, long)]
        n: Option<usize>,
        /// Compare against every position, not just the player's own
        #[arg(long)]
        all_positions: bool,
        /// Comma-separated metric keys or labels
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<Metric>,
    },
    /// Percentile ranks within the player's position group
    Percentiles {
        player: String,
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<Metric>,
    },
    /// Two players ranked against the first player's position group
    Compare {
        left: String,
        right: String,
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<Metric>,
    },
    /// List players matching a selection, or write them as CSV
    Filter {
        #[arg(long)]
        league: Vec<String>,
        #[arg(long)]
        position: Vec<SimplifiedPosition>,
        #[arg(long)]
        team: Vec<String>,
        #[arg(long)]
        age_min: Option<f64>,
        #[arg(long)]
        age_max: Option<f64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Leaders on one metric
    Top {
        metric: Metric,
        #[arg(short, long)]
        n: Option<usize>,
        #[arg(long)]
        position: Option<SimplifiedPosition>,
    },
    /// Per-league distribution of one metric (outfield players)
    Leagues { metric: Metric },
    /// Write the enriched table; .xlsx, .json and .csv are supported
    Export {
        /// Output file; defaults to <SCOUT_EXPORT_DIR>/scout.xlsx
        #[arg(long)]
        out: Option<PathBuf>,
        /// Players to add to the Similar sheet
        #[arg(long)]
        similar: Vec<String>,
        /// Players to add to the Percentiles sheet
        #[arg(long)]
        percentiles: Vec<String>,
    },
    /// Content hash of the enriched table
    Fingerprint,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });

    let config = ScoutConfig::from_env();
    let data_path = cli.data.clone().unwrap_or(config.data_path.clone());
    let min_minutes = cli.min_minutes.unwrap_or(config.min_minutes);
    let table = load_table(&data_path, min_minutes)?;

    match cli.command {
        Commands::Similar {
            player,
            n,
            all_positions,
            metrics,
        } => {
            let mut opts = SimilarityOptions::top(n.unwrap_or(config.top_n));
            opts.position_filter = !all_positions;
            if !metrics.is_empty() {
                opts.metrics = metrics;
            }
            let rows = similar_with(&table, &player, &opts)?;
            if cli.json {
                return print_json(&rows);
            }
            println!("Players similar to {player}");
            for (idx, s) in rows.iter().enumerate() {
                println!(
                    "{:>2}. {:<28} {:<22} {:<18} {:<3} {:.3}",
                    idx + 1,
                    s.name,
                    s.team,
                    s.league,
                    s.position,
                    s.similarity
                );
            }
        }
        Commands::Percentiles { player, metrics } => {
            let record = table.find_player(&player)?;
            let metrics = if metrics.is_empty() {
                radar_metrics(record.position).to_vec()
            } else {
                metrics
            };
            let ranks = percentiles(&table, &player, &metrics)?;
            if cli.json {
                return print_json(&ranks);
            }
            println!("{} ({}, {})", record.name, record.team, record.position);
            print_percentiles(&ranks);
        }
        Commands::Compare {
            left,
            right,
            metrics,
        } => {
            let metrics = (!metrics.is_empty()).then_some(metrics);
            let cmp = compare(&table, &left, &right, metrics.as_deref())?;
            if cli.json {
                return print_json(&cmp);
            }
            println!(
                "{:<28} {:>8} {:>8}   (vs {} group)",
                "Metric", "A", "B", cmp.group
            );
            for metric in &cmp.metrics {
                let cell = |ranks: &BTreeMap<Metric, f64>| {
                    ranks
                        .get(metric)
                        .map(|p| format!("{p:.1}"))
                        .unwrap_or_else(|| "-".to_string())
                };
                println!(
                    "{:<28} {:>8} {:>8}",
                    metric.label(),
                    cell(&cmp.left.percentiles),
                    cell(&cmp.right.percentiles)
                );
            }
            println!(
                "A = {} ({}), B = {} ({})",
                cmp.left.name, cmp.left.team, cmp.right.name, cmp.right.team
            );
        }
        Commands::Filter {
            league,
            position,
            team,
            age_min,
            age_max,
            out,
        } => {
            let selection = PlayerFilter {
                leagues: league,
                positions: position,
                teams: team,
                age_min,
                age_max,
                min_minutes: None,
            };
            let subset = filter(&table, &selection);
            if let Some(out) = out {
                let file = fs::File::create(&out)
                    .with_context(|| format!("create {}", out.display()))?;
                write_enriched_csv(&subset, file)?;
                println!("Wrote {} players to {}", subset.len(), out.display());
            } else if cli.json {
                return print_json(&subset.records());
            } else {
                for r in subset.records() {
                    println!("{:<28} {:<22} {:<18} {}", r.name, r.team, r.league, r.position);
                }
                println!("{} players", subset.len());
            }
        }
        Commands::Top {
            metric,
            n,
            position,
        } => {
            let rows = top_players(&table, metric, n.unwrap_or(config.top_n), position);
            if cli.json {
                return print_json(&rows);
            }
            println!("Top {}", metric.label());
            for (idx, r) in rows.iter().enumerate() {
                println!("{:>2}. {:<28} {:<22} {:>6.2}", idx + 1, r.name, r.team, r.value);
            }
        }
        Commands::Leagues { metric } => {
            let summary = league_summary(&table, metric);
            if cli.json {
                return print_json(&summary);
            }
            println!(
                "{:<18} {:>5} {:>7} {:>7} {:>7} {:>7}",
                "League", "n", "mean", "q1", "median", "q3"
            );
            for (league, d) in &summary {
                println!(
                    "{:<18} {:>5} {:>7.2} {:>7.2} {:>7.2} {:>7.2}",
                    league, d.count, d.mean, d.q1, d.median, d.q3
                );
            }
        }
        Commands::Export {
            out,
            similar,
            percentiles,
        } => {
            let out = out.unwrap_or_else(|| config.export_dir.join("scout.xlsx"));
            run_export(&table, &out, similar, percentiles, config.top_n)?;
        }
        Commands::Fingerprint => {
            let fingerprint = table.fingerprint();
            if cli.json {
                return print_json(&serde_json::json!({
                    "players": table.len(),
                    "fingerprint": fingerprint,
                }));
            }
            println!("{fingerprint}");
        }
    }

    Ok(())
}

fn load_table(path: &Path, min_minutes: u32) -> Result<EnrichedTable> {
    let raw = match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => RawTable::from_parquet_path(path)?,
        _ => RawTable::from_csv_path(path)?,
    };
    let table = dataset::load(&raw, min_minutes)
        .with_context(|| format!("load {}", path.display()))?;
    Ok(table)
}

fn run_export(
    table: &EnrichedTable,
    out: &Path,
    similar_for: Vec<String>,
    percentiles_for: Vec<String>,
    top_n: usize,
) -> Result<()> {
    match out.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let count = export_records_json(table, out)?;
            println!("Wrote {count} records to {}", out.display());
        }
        Some("csv") => {
            let file =
                fs::File::create(out).with_context(|| format!("create {}", out.display()))?;
            write_enriched_csv(table, file)?;
            println!("Wrote {} players to {}", table.len(), out.display());
        }
        Some("xlsx") => {
            let request = ExportRequest {
                similar_for,
                percentiles_for,
                top_n,
                metrics: Vec::new(),
            };
            let report = export_workbook(table, out, &request)?;
            println!("Export complete: {}", out.display());
            println!("Players: {}", report.players);
            println!("Similar rows: {}", report.similar_rows);
            println!("Percentile rows: {}", report.percentile_rows);
            if !report.errors.is_empty() {
                println!("Errors: {}", report.errors.len());
                for err in report.errors.iter().take(8) {
                    println!(" - {err}");
                }
            }
        }
        other => bail!("unsupported export format {other:?} (use .xlsx, .json or .csv)"),
    }
    Ok(())
}

fn print_percentiles(ranks: &BTreeMap<Metric, f64>) {
    for (metric, pct) in ranks {
        println!("{:<34} {:>6.1}", metric.display_name(), pct);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(io::stdout().lock(), value).context("write json")?;
    println!();
    Ok(())
}
