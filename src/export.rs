use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::dataset::{EnrichedTable, PlayerRecord, format_metric};
use crate::percentile::percentiles;
use crate::position::radar_metrics;
use crate::similarity::{SimilarityOptions, similarity_report};
use crate::stats::{Metric, RawStat};

#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub similar_for: Vec<String>,
    pub percentiles_for: Vec<String>,
    pub top_n: usize,
    /// Percentile metrics; empty = each player's radar profile.
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub players: usize,
    pub similar_rows: usize,
    pub percentile_rows: usize,
    pub errors: Vec<String>,
}

pub fn write_enriched_csv<W: Write>(table: &EnrichedTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.output_headers())
        .context("write csv header")?;
    for row in table.output_rows() {
        wtr.write_record(&row).context("write csv row")?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct WebRecord<'a> {
    player: &'a str,
    squad: &'a str,
    league: &'a str,
    position: &'a str,
    pos: Option<&'a str>,
    age: Option<f64>,
    min: u32,
    gls: Option<f64>,
    ast: Option<f64>,
    ga: Option<f64>,
    xg: Option<f64>,
    xag: Option<f64>,
    #[serde(flatten)]
    metrics: &'a BTreeMap<Metric, f64>,
}

impl<'a> WebRecord<'a> {
    fn from_record(r: &'a PlayerRecord) -> Self {
        Self {
            player: &r.name,
            squad: &r.team,
            league: &r.league,
            position: r.position.as_str(),
            pos: r.raw_position.as_deref(),
            age: r.age,
            min: r.minutes,
            gls: r.raw_stat(RawStat::Goals),
            ast: r.raw_stat(RawStat::Assists),
            ga: r.raw_stat(RawStat::GoalsAssists),
            xg: r.raw_stat(RawStat::Xg),
            xag: r.raw_stat(RawStat::Xag),
            metrics: &r.metrics,
        }
    }
}

pub fn export_records_json(table: &EnrichedTable, path: &Path) -> Result<usize> {
    let records: Vec<WebRecord<'_>> = table.records().iter().map(WebRecord::from_record).collect();
    let json = serde_json::to_string(&records).context("serialize player records")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(records.len())
}

pub fn export_workbook(
    table: &EnrichedTable,
    path: &Path,
    request: &ExportRequest,
) -> Result<ExportReport> {
    let mut errors = Vec::new();

    let mut players_rows = vec![table.output_headers()];
    players_rows.extend(table.output_rows());

    let mut similar_rows = vec![vec![
        "Query".to_string(),
        "Rank".to_string(),
        "Player".to_string(),
        "Team".to_string(),
        "League".to_string(),
        "Position".to_string(),
        "Age".to_string(),
        "Similarity".to_string(),
    ]];
    let opts = SimilarityOptions::top(request.top_n.max(1));
    for entry in similarity_report(table, &request.similar_for, &opts) {
        if let Some(err) = entry.error {
            errors.push(format!("similar {}: {err}", entry.player));
            continue;
        }
        for (rank, s) in entry.similar.iter().enumerate() {
            similar_rows.push(vec![
                entry.player.clone(),
                (rank + 1).to_string(),
                s.name.clone(),
                s.team.clone(),
                s.league.clone(),
                s.position.to_string(),
                s.age.map(|a| a.to_string()).unwrap_or_default(),
                format!("{:.4}", s.similarity),
            ]);
        }
    }

    let mut percentile_rows = vec![vec![
        "Player".to_string(),
        "Position".to_string(),
        "Metric".to_string(),
        "Value".to_string(),
        "Percentile".to_string(),
    ]];
    for name in &request.percentiles_for {
        let record = match table.find_player(name) {
            Ok(r) => r,
            Err(err) => {
                errors.push(format!("percentiles {name}: {err}"));
                continue;
            }
        };
        let metrics = if request.metrics.is_empty() {
            radar_metrics(record.position).to_vec()
        } else {
            request.metrics.clone()
        };
        match percentiles(table, name, &metrics) {
            Ok(ranks) => {
                for (metric, pct) in ranks {
                    percentile_rows.push(vec![
                        record.name.clone(),
                        record.position.to_string(),
                        metric.label().to_string(),
                        format_metric(record.metric(metric)),
                        format!("{pct:.1}"),
                    ]);
                }
            }
            Err(err) => errors.push(format!("percentiles {name}: {err}")),
        }
    }

    let meta_rows = vec![
        vec!["Key".to_string(), "Value".to_string()],
        vec!["Generated At".to_string(), Utc::now().to_rfc3339()],
        vec!["Players".to_string(), table.len().to_string()],
        vec!["Min Minutes".to_string(), table.min_minutes().to_string()],
        vec![
            "Metrics".to_string(),
            table
                .metrics()
                .iter()
                .map(|m| m.label())
                .collect::<Vec<_>>()
                .join(", "),
        ],
        vec![
            "Raw Stats".to_string(),
            table
                .raw_stats()
                .iter()
                .map(|s| s.column())
                .collect::<Vec<_>>()
                .join(", "),
        ],
        vec!["Fingerprint".to_string(), table.fingerprint()],
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &players_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Similar")?;
        write_rows(sheet, &similar_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Percentiles")?;
        write_rows(sheet, &percentile_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Meta")?;
        write_rows(sheet, &meta_rows)?;
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    for err in &errors {
        log::warn!("export: {err}");
    }
    log::info!("wrote workbook {} ({} players)", path.display(), table.len());

    Ok(ExportReport {
        players: table.len(),
        similar_rows: similar_rows.len().saturating_sub(1),
        percentile_rows: percentile_rows.len().saturating_sub(1),
        errors,
    })
}

// Numeric-looking cells go in as numbers so spreadsheet sorting works.
fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value.parse::<f64>() {
                Ok(num) if row_idx > 0 && num.is_finite() => worksheet.write_number(r, c, num),
                _ => worksheet.write_string(r, c, value),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
