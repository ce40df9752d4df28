use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::dataset::EnrichedTable;
use crate::error::ScoutResult;
use crate::normalize::{ComparisonGroup, standardize};
use crate::position::SimplifiedPosition;
use crate::stats::{Metric, SIMILARITY_METRICS};

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityOptions {
    pub n: usize,
    /// Off: compare against the whole table instead of the player's position group.
    pub position_filter: bool,
    pub metrics: Vec<Metric>,
}

impl SimilarityOptions {
    pub fn top(n: usize) -> Self {
        Self {
            n,
            position_filter: true,
            metrics: SIMILARITY_METRICS.to_vec(),
        }
    }
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self::top(5)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPlayer {
    pub name: String,
    pub team: String,
    pub league: String,
    pub position: SimplifiedPosition,
    pub age: Option<f64>,
    pub similarity: f64,
    pub metrics: BTreeMap<Metric, Option<f64>>,
}

pub fn similar(table: &EnrichedTable, player: &str, n: usize) -> ScoutResult<Vec<SimilarPlayer>> {
    similar_with(table, player, &SimilarityOptions::top(n))
}

pub fn similar_with(
    table: &EnrichedTable,
    player: &str,
    opts: &SimilarityOptions,
) -> ScoutResult<Vec<SimilarPlayer>> {
    let query_idx = table.find_player_index(player)?;
    let query = &table.records()[query_idx];

    let group = if opts.position_filter {
        ComparisonGroup::for_position(table, query.position)
    } else {
        ComparisonGroup::whole(table)
    };
    // Metrics the dataset never derived are dropped for every member alike.
    let metrics: Vec<Metric> = opts
        .metrics
        .iter()
        .copied()
        .filter(|m| table.has_metric(*m))
        .collect();

    let matrix = standardize(&group, &metrics);
    let Some(query_vec) = matrix.row_for(query_idx) else {
        return Ok(Vec::new());
    };

    let mut scored: Vec<(usize, f64)> = matrix
        .index
        .iter()
        .zip(matrix.rows.iter())
        .filter(|(idx, _)| table.records()[**idx].name != query.name)
        .map(|(idx, row)| (*idx, cosine_similarity(query_vec, row)))
        .collect();
    // Stable sort: ties keep table order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(opts.n);

    log::debug!(
        "similar({}): group {} of {} players, {} metrics",
        query.name,
        query.position,
        group.len(),
        metrics.len()
    );

    Ok(scored
        .into_iter()
        .map(|(idx, similarity)| {
            let r = &table.records()[idx];
            SimilarPlayer {
                name: r.name.clone(),
                team: r.team.clone(),
                league: r.league.clone(),
                position: r.position,
                age: r.age,
                similarity,
                metrics: metrics.iter().map(|m| (*m, r.metric(*m))).collect(),
            }
        })
        .collect())
}

/// `dot(a, b) / (|a| |b|)`, or 0 when either vector has zero length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut mag_a = 0.0;
    let mut mag_b = 0.0;
    for (&ai, &bi) in a.iter().zip(b.iter()) {
        dot += ai * bi;
        mag_a += ai * ai;
        mag_b += bi * bi;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReportEntry {
    pub player: String,
    pub similar: Vec<SimilarPlayer>,
    pub error: Option<String>,
}

/// Runs `similar` for every requested player on the rayon pool. Each query builds its own
/// matrix, so they are independent; a missing player fails only its own entry.
pub fn similarity_report(
    table: &EnrichedTable,
    players: &[String],
    opts: &SimilarityOptions,
) -> Vec<SimilarityReportEntry> {
    players
        .par_iter()
        .map(|name| match similar_with(table, name, opts) {
            Ok(similar) => SimilarityReportEntry {
                player: name.clone(),
                similar,
                error: None,
            },
            Err(err) => SimilarityReportEntry {
                player: name.clone(),
                similar: Vec::new(),
                error: Some(err.to_string()),
            },
        })
        .collect()
}
