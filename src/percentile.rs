use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{EnrichedTable, PlayerRecord};
use crate::error::{ScoutError, ScoutResult};
use crate::normalize::ComparisonGroup;
use crate::position::{SimplifiedPosition, radar_metrics};
use crate::stats::Metric;

pub fn percentile(table: &EnrichedTable, player: &str, metric: Metric) -> ScoutResult<f64> {
    let record = table.find_player(player)?;
    if !table.has_metric(metric) {
        return Err(ScoutError::MetricUnavailable(metric));
    }
    let group = ComparisonGroup::for_position(table, record.position);
    Ok(rank_in_group(&group, record, metric))
}

/// Batch form. Metrics the dataset never derived are left out of the result.
pub fn percentiles(
    table: &EnrichedTable,
    player: &str,
    metrics: &[Metric],
) -> ScoutResult<BTreeMap<Metric, f64>> {
    let record = table.find_player(player)?;
    let group = ComparisonGroup::for_position(table, record.position);
    Ok(percentiles_against(&group, record, metrics, table))
}

fn percentiles_against(
    group: &ComparisonGroup<'_>,
    record: &PlayerRecord,
    metrics: &[Metric],
    table: &EnrichedTable,
) -> BTreeMap<Metric, f64> {
    metrics
        .iter()
        .copied()
        .filter(|m| table.has_metric(*m))
        .map(|m| (m, rank_in_group(group, record, m)))
        .collect()
}

/// Share of the group strictly below the player's value, 0..=100, no interpolation.
///
/// A player whose value is missing ranks at 0. Group members with missing values still
/// count toward the group size but never toward the numerator.
pub fn rank_in_group(group: &ComparisonGroup<'_>, record: &PlayerRecord, metric: Metric) -> f64 {
    let Some(value) = record.metric(metric) else {
        return 0.0;
    };
    strict_percentile(group.values(metric), value)
}

pub fn strict_percentile(values: impl Iterator<Item = Option<f64>>, value: f64) -> f64 {
    let mut size = 0usize;
    let mut below = 0usize;
    for v in values {
        size += 1;
        if v.is_some_and(|v| v < value) {
            below += 1;
        }
    }
    if size == 0 {
        return 0.0;
    }
    below as f64 / size as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerComparison {
    pub group: SimplifiedPosition,
    pub metrics: Vec<Metric>,
    pub left: ComparedPlayer,
    pub right: ComparedPlayer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedPlayer {
    pub name: String,
    pub team: String,
    pub league: String,
    pub position: SimplifiedPosition,
    pub percentiles: BTreeMap<Metric, f64>,
}

/// Side-by-side percentiles. Both players are ranked against the first player's
/// position group so the two profiles share one scale.
pub fn compare(
    table: &EnrichedTable,
    left: &str,
    right: &str,
    metrics: Option<&[Metric]>,
) -> ScoutResult<PlayerComparison> {
    let l = table.find_player(left)?;
    let r = table.find_player(right)?;
    let group = ComparisonGroup::for_position(table, l.position);
    let metrics: Vec<Metric> = match metrics {
        Some(list) => list.to_vec(),
        None => radar_metrics(l.position).to_vec(),
    };
    let compared = |record: &PlayerRecord| ComparedPlayer {
        name: record.name.clone(),
        team: record.team.clone(),
        league: record.league.clone(),
        position: record.position,
        percentiles: percentiles_against(&group, record, &metrics, table),
    };
    Ok(PlayerComparison {
        group: l.position,
        left: compared(l),
        right: compared(r),
        metrics,
    })
}

pub fn radar(table: &EnrichedTable, player: &str) -> ScoutResult<BTreeMap<Metric, f64>> {
    let record = table.find_player(player)?;
    percentiles(table, player, &radar_metrics(record.position))
}
