use crate::dataset::{EnrichedTable, PlayerRecord};
use crate::position::SimplifiedPosition;
use crate::stats::Metric;

const STD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct ComparisonGroup<'a> {
    pub position: Option<SimplifiedPosition>,
    members: Vec<(usize, &'a PlayerRecord)>,
}

impl<'a> ComparisonGroup<'a> {
    /// `Unknown` is a group like any other.
    pub fn for_position(table: &'a EnrichedTable, position: SimplifiedPosition) -> Self {
        Self {
            position: Some(position),
            members: table
                .records()
                .iter()
                .enumerate()
                .filter(|(_, r)| r.position == position)
                .collect(),
        }
    }

    pub fn whole(table: &'a EnrichedTable) -> Self {
        Self {
            position: None,
            members: table.records().iter().enumerate().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[(usize, &'a PlayerRecord)] {
        &self.members
    }

    pub fn values(&self, metric: Metric) -> impl Iterator<Item = Option<f64>> + '_ {
        self.members.iter().map(move |(_, r)| r.metric(metric))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedMatrix {
    pub metrics: Vec<Metric>,
    pub rows: Vec<Vec<f64>>,
    pub index: Vec<usize>,
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

impl StandardizedMatrix {
    pub fn row_for(&self, table_index: usize) -> Option<&[f64]> {
        let pos = self.index.iter().position(|i| *i == table_index)?;
        Some(&self.rows[pos])
    }
}

/// Builds the group's metric matrix (missing → 0) and scales each column to zero mean
/// and unit variance. Parameters are fitted here, on this group only.
pub fn standardize(group: &ComparisonGroup<'_>, metrics: &[Metric]) -> StandardizedMatrix {
    // Missing values become 0 before fitting, so they shift the column mean and std.
    // Filling after scaling (0 = group mean) would give different vectors.
    let mut rows: Vec<Vec<f64>> = group
        .members()
        .iter()
        .map(|(_, r)| metrics.iter().map(|m| r.metric(*m).unwrap_or(0.0)).collect())
        .collect();
    let index = group.members().iter().map(|(idx, _)| *idx).collect();

    let mut means = Vec::with_capacity(metrics.len());
    let mut stds = Vec::with_capacity(metrics.len());
    for col in 0..metrics.len() {
        let (mean, std) = column_dist(rows.iter().map(|row| row[col]));
        means.push(mean);
        stds.push(std);
        for row in rows.iter_mut() {
            row[col] = if std <= STD_EPSILON {
                0.0
            } else {
                (row[col] - mean) / std
            };
        }
    }

    StandardizedMatrix {
        metrics: metrics.to_vec(),
        rows,
        index,
        means,
        stds,
    }
}

fn column_dist(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let mut n = 0usize;
    let mut sum = 0.0;
    for v in values.clone() {
        sum += v;
        n += 1;
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / n as f64;
    let var = values
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;
    (mean, var.sqrt())
}
