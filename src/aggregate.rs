use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{EnrichedTable, PlayerRecord};
use crate::position::SimplifiedPosition;
use crate::stats::Metric;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub name: String,
    pub team: String,
    pub league: String,
    pub position: SimplifiedPosition,
    pub value: f64,
}

/// Highest `n` values of `metric`, optionally within one position. Players missing the
/// metric are left out; ties keep table order.
pub fn top_players(
    table: &EnrichedTable,
    metric: Metric,
    n: usize,
    position: Option<SimplifiedPosition>,
) -> Vec<RankedPlayer> {
    let mut rows: Vec<(&PlayerRecord, f64)> = table
        .records()
        .iter()
        .filter(|r| position.is_none_or(|p| r.position == p))
        .filter_map(|r| r.metric(metric).map(|v| (r, v)))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows.truncate(n);
    rows.into_iter()
        .map(|(r, value)| RankedPlayer {
            name: r.name.clone(),
            team: r.team.clone(),
            league: r.league.clone(),
            position: r.position,
            value,
        })
        .collect()
}

pub fn sort_by_metric(table: &EnrichedTable, metric: Metric) -> Vec<&PlayerRecord> {
    let mut rows: Vec<&PlayerRecord> = table.records().iter().collect();
    rows.sort_by(|a, b| match (a.metric(metric), b.metric(metric)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Distribution {
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        Some(Self {
            count,
            mean,
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[count - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn league_summary(table: &EnrichedTable, metric: Metric) -> BTreeMap<String, Distribution> {
    let mut by_league: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in table.records() {
        if r.position == SimplifiedPosition::GK || r.league.is_empty() {
            continue;
        }
        if let Some(v) = r.metric(metric) {
            by_league.entry(r.league.clone()).or_default().push(v);
        }
    }
    by_league
        .into_iter()
        .filter_map(|(league, values)| Distribution::from_values(values).map(|d| (league, d)))
        .collect()
}

pub fn mean_by_age(table: &EnrichedTable, metric: Metric) -> Vec<(u32, f64)> {
    let mut by_age: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for r in table.records() {
        let (Some(age), Some(v)) = (r.age, r.metric(metric)) else {
            continue;
        };
        let slot = by_age.entry(age.floor().max(0.0) as u32).or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }
    by_age
        .into_iter()
        .map(|(age, (sum, n))| (age, sum / n as f64))
        .collect()
}
