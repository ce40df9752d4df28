use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::derive::{active_derivations, derive_row};
use crate::error::{ScoutError, ScoutResult};
use crate::position::{SimplifiedPosition, classify};
use crate::raw_table::{RawTable, parse_number, parse_text};
use crate::stats::{Metric, RawStat};

pub const DEFAULT_MIN_MINUTES: u32 = 450;

pub const COL_PLAYER: &str = "Player";
pub const COL_POS: &str = "Pos";
pub const COL_MINUTES: &str = "Min";
pub const COL_NINETIES: &str = "90s";
pub const COL_AGE: &str = "Age";
pub const COL_COMP: &str = "Comp";
pub const COL_SQUAD: &str = "Squad";

const REQUIRED_COLUMNS: [&str; 4] = [COL_PLAYER, COL_POS, COL_MINUTES, COL_NINETIES];

// Competition labels carry a country code prefix ("eng Premier League").
const COMP_PREFIXES: [&str; 5] = ["eng ", "es ", "de ", "it ", "fr "];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "U21")]
    Under21,
    #[serde(rename = "21-23")]
    From21To23,
    #[serde(rename = "24-27")]
    From24To27,
    #[serde(rename = "28-32")]
    From28To32,
    #[serde(rename = "33+")]
    Over32,
}

impl AgeGroup {
    /// Right-inclusive buckets (0,21], (21,23], (23,27], (27,32], (32,50].
    pub fn from_age(age: f64) -> Option<Self> {
        if !(age > 0.0 && age <= 50.0) {
            return None;
        }
        Some(if age <= 21.0 {
            AgeGroup::Under21
        } else if age <= 23.0 {
            AgeGroup::From21To23
        } else if age <= 27.0 {
            AgeGroup::From24To27
        } else if age <= 32.0 {
            AgeGroup::From28To32
        } else {
            AgeGroup::Over32
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under21 => "U21",
            AgeGroup::From21To23 => "21-23",
            AgeGroup::From24To27 => "24-27",
            AgeGroup::From28To32 => "28-32",
            AgeGroup::Over32 => "33+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub competition: String,
    pub league: String,
    pub raw_position: Option<String>,
    pub position: SimplifiedPosition,
    pub age: Option<f64>,
    pub age_group: Option<AgeGroup>,
    pub minutes: u32,
    pub played_90s: Option<f64>,
    pub raw: BTreeMap<RawStat, f64>,
    /// Absent key = metric undefined for this row.
    pub metrics: BTreeMap<Metric, f64>,
    /// Input cells, untouched, in input column order.
    #[serde(skip)]
    pub input: Vec<String>,
}

impl PlayerRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    pub fn raw_stat(&self, stat: RawStat) -> Option<f64> {
        self.raw.get(&stat).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTable {
    input_headers: Vec<String>,
    raw_stats: Vec<RawStat>,
    metrics: Vec<Metric>,
    min_minutes: u32,
    records: Vec<PlayerRecord>,
}

/// Filters by minutes, derives metrics and classifies positions.
///
/// Fails only when a required identity column is absent. Per-row problems (unparseable
/// minutes, zero 90s, blank stats) degrade to exclusion or missing metrics.
pub fn load(raw: &RawTable, min_minutes: u32) -> ScoutResult<EnrichedTable> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !raw.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ScoutError::Schema { missing });
    }

    let col = |name: &str| raw.column_index(name);
    let (Some(player_col), Some(pos_col), Some(min_col), Some(nineties_col)) = (
        col(COL_PLAYER),
        col(COL_POS),
        col(COL_MINUTES),
        col(COL_NINETIES),
    ) else {
        return Err(ScoutError::Schema {
            missing: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        });
    };
    let age_col = col(COL_AGE);
    let comp_col = col(COL_COMP);
    let squad_col = col(COL_SQUAD);

    let stat_cols: Vec<(RawStat, usize)> = RawStat::ALL
        .iter()
        .filter_map(|s| col(s.column()).map(|idx| (*s, idx)))
        .collect();
    let raw_stats: Vec<RawStat> = stat_cols.iter().map(|(s, _)| *s).collect();
    let derivations = active_derivations(&raw_stats);
    let metrics: Vec<Metric> = derivations.iter().map(|d| d.metric).collect();

    let threshold = f64::from(min_minutes);
    let mut records = Vec::new();
    let mut below_threshold = 0usize;
    for row in raw.rows() {
        let cell = move |idx: usize| row.get(idx).map(|s| s.as_str()).unwrap_or("");
        let Some(minutes) = parse_number(cell(min_col)) else {
            log::debug!("dropping row with unreadable minutes: {:?}", cell(player_col));
            below_threshold += 1;
            continue;
        };
        if minutes < threshold {
            below_threshold += 1;
            continue;
        }

        let raw_position = parse_text(cell(pos_col)).map(str::to_string);
        let position = classify(raw_position.as_deref());
        let played_90s = parse_number(cell(nineties_col));
        let age = age_col.and_then(|idx| parse_age(cell(idx)));
        let competition = comp_col
            .map(|idx| cell(idx).trim().to_string())
            .unwrap_or_default();
        let stats: BTreeMap<RawStat, f64> = stat_cols
            .iter()
            .filter_map(|(stat, idx)| parse_number(cell(*idx)).map(|v| (*stat, v)))
            .collect();
        let derived = derive_row(&derivations, &stats, played_90s);

        records.push(PlayerRecord {
            name: cell(player_col).trim().to_string(),
            team: squad_col
                .map(|idx| cell(idx).trim().to_string())
                .unwrap_or_default(),
            league: league_label(&competition),
            competition,
            raw_position,
            position,
            age,
            age_group: age.and_then(AgeGroup::from_age),
            minutes: minutes.max(0.0) as u32,
            played_90s,
            raw: stats,
            metrics: derived,
            input: row.clone(),
        });
    }

    log::info!(
        "loaded {} of {} rows (min minutes {}, {} excluded), {} metrics derived",
        records.len(),
        raw.len(),
        min_minutes,
        below_threshold,
        metrics.len()
    );

    Ok(EnrichedTable {
        input_headers: raw.headers().to_vec(),
        raw_stats,
        metrics,
        min_minutes,
        records,
    })
}

pub fn league_label(competition: &str) -> String {
    let trimmed = competition.trim();
    COMP_PREFIXES
        .iter()
        .find_map(|p| trimmed.strip_prefix(p))
        .unwrap_or(trimmed)
        .to_string()
}

// Some exports write age as "years-days" ("24-187").
fn parse_age(raw: &str) -> Option<f64> {
    let s = raw.trim();
    match s.split_once('-') {
        Some((years, _)) if !years.is_empty() => parse_number(years),
        _ => parse_number(s),
    }
}

impl EnrichedTable {
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn input_headers(&self) -> &[String] {
        &self.input_headers
    }

    pub fn raw_stats(&self) -> &[RawStat] {
        &self.raw_stats
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn has_metric(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    pub fn min_minutes(&self) -> u32 {
        self.min_minutes
    }

    /// Exact (trimmed) name match; the first row wins when a name repeats.
    pub fn find_player(&self, name: &str) -> ScoutResult<&PlayerRecord> {
        self.find_player_index(name).map(|idx| &self.records[idx])
    }

    pub fn find_player_index(&self, name: &str) -> ScoutResult<usize> {
        let needle = name.trim();
        self.records
            .iter()
            .position(|r| r.name == needle)
            .ok_or_else(|| ScoutError::PlayerNotFound(name.to_string()))
    }

    pub fn search_players(&self, query: &str) -> Vec<&PlayerRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn leagues(&self) -> Vec<String> {
        sorted_unique(self.records.iter().map(|r| r.league.as_str()))
    }

    pub fn teams(&self, league: Option<&str>) -> Vec<String> {
        sorted_unique(
            self.records
                .iter()
                .filter(|r| league.is_none_or(|l| r.league == l))
                .map(|r| r.team.as_str()),
        )
    }

    pub fn positions(&self) -> Vec<SimplifiedPosition> {
        let mut out: Vec<SimplifiedPosition> = self
            .records
            .iter()
            .map(|r| r.position)
            .filter(|p| *p != SimplifiedPosition::Unknown)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        out.sort_by_key(|p| p.as_str());
        out
    }

    pub fn player_names(
        &self,
        position: Option<SimplifiedPosition>,
        league: Option<&str>,
    ) -> Vec<String> {
        sorted_unique(
            self.records
                .iter()
                .filter(|r| position.is_none_or(|p| r.position == p))
                .filter(|r| league.is_none_or(|l| r.league == l))
                .map(|r| r.name.as_str()),
        )
    }

    pub fn filter(&self, predicate: impl Fn(&PlayerRecord) -> bool) -> EnrichedTable {
        EnrichedTable {
            input_headers: self.input_headers.clone(),
            raw_stats: self.raw_stats.clone(),
            metrics: self.metrics.clone(),
            min_minutes: self.min_minutes,
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// SHA-256 over every value in the table, hex encoded. Two loads of the same input
    /// produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for header in self.output_headers() {
            hasher.update(header.as_bytes());
            hasher.update([0x1f_u8]);
        }
        for row in self.output_rows() {
            for cell in row {
                hasher.update(cell.as_bytes());
                hasher.update([0x1f_u8]);
            }
            hasher.update([0x1e_u8]);
        }
        for record in &self.records {
            for value in record.metrics.values() {
                hasher.update(value.to_le_bytes());
            }
        }
        format!("{:x}", hasher.finalize())
    }

    /// Input columns followed by the derived ones. An input column sharing a name with a
    /// derived column is overwritten in place.
    pub fn output_headers(&self) -> Vec<String> {
        let mut out = self.input_headers.clone();
        for name in self.added_columns() {
            if !out.iter().any(|h| h == &name) {
                out.push(name);
            }
        }
        out
    }

    pub fn output_rows(&self) -> Vec<Vec<String>> {
        let headers = self.output_headers();
        self.records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| {
                        self.added_value(header, record).unwrap_or_else(|| {
                            record.input.get(idx).cloned().unwrap_or_default()
                        })
                    })
                    .collect()
            })
            .collect()
    }

    fn added_columns(&self) -> Vec<String> {
        let mut out: Vec<String> = self.metrics.iter().map(|m| m.label().to_string()).collect();
        out.push("Position".to_string());
        out.push("League".to_string());
        out.push("Age Group".to_string());
        out
    }

    fn added_value(&self, header: &str, record: &PlayerRecord) -> Option<String> {
        match header {
            "Position" => Some(record.position.as_str().to_string()),
            "League" => Some(record.league.clone()),
            "Age Group" => Some(
                record
                    .age_group
                    .map(|g| g.label().to_string())
                    .unwrap_or_default(),
            ),
            other => {
                let metric = self.metrics.iter().find(|m| m.label() == other)?;
                Some(format_metric(record.metric(*metric)))
            }
        }
    }
}

pub fn format_metric(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
