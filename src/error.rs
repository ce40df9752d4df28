use thiserror::Error;

use crate::stats::Metric;

/// Failures surfaced by the core. A failed query never touches the enriched table,
/// so callers can keep serving other queries after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoutError {
    #[error("raw table is missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("metric {} was not derived for this dataset", .0.label())]
    MetricUnavailable(Metric),

    #[error("invalid position: {0} (expected GK, FW, MF, DF or Unknown)")]
    InvalidPosition(String),
}

pub type ScoutResult<T> = std::result::Result<T, ScoutError>;
