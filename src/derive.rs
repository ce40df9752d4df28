use std::collections::BTreeMap;

use crate::stats::{Metric, RawStat};

#[derive(Debug, Clone, Copy)]
pub enum Formula {
    Per90(&'static [RawStat]),
    Difference(RawStat, RawStat),
}

#[derive(Debug, Clone, Copy)]
pub struct Derivation {
    pub metric: Metric,
    pub formula: Formula,
}

impl Derivation {
    const fn per90(metric: Metric, inputs: &'static [RawStat]) -> Self {
        Self {
            metric,
            formula: Formula::Per90(inputs),
        }
    }

    pub fn inputs(&self) -> Vec<RawStat> {
        match self.formula {
            Formula::Per90(stats) => stats.to_vec(),
            Formula::Difference(a, b) => vec![a, b],
        }
    }

    /// `None` when any input is missing, or when 90s played is missing or not positive
    /// for a rate metric. Never zero-fills and never yields `inf`.
    pub fn evaluate(&self, raw: &BTreeMap<RawStat, f64>, played_90s: Option<f64>) -> Option<f64> {
        let value = match self.formula {
            Formula::Per90(stats) => {
                let nineties = played_90s.filter(|n| *n > 0.0)?;
                let mut total = 0.0;
                for stat in stats {
                    total += raw.get(stat).copied()?;
                }
                total / nineties
            }
            Formula::Difference(a, b) => raw.get(&a).copied()? - raw.get(&b).copied()?,
        };
        value.is_finite().then(|| round2(value))
    }
}

pub const DERIVATIONS: [Derivation; 19] = [
    Derivation::per90(Metric::GoalsPer90, &[RawStat::Goals]),
    Derivation::per90(Metric::AssistsPer90, &[RawStat::Assists]),
    Derivation::per90(Metric::XgPer90, &[RawStat::Xg]),
    Derivation::per90(Metric::XagPer90, &[RawStat::Xag]),
    Derivation::per90(Metric::GoalsAssistsPer90, &[RawStat::Goals, RawStat::Assists]),
    Derivation::per90(Metric::XgXagPer90, &[RawStat::Xg, RawStat::Xag]),
    Derivation::per90(Metric::ProgCarriesPer90, &[RawStat::ProgCarries]),
    Derivation::per90(Metric::ProgPassesPer90, &[RawStat::ProgPasses]),
    Derivation::per90(Metric::TacklesPer90, &[RawStat::Tackles]),
    Derivation::per90(Metric::InterceptionsPer90, &[RawStat::Interceptions]),
    Derivation::per90(Metric::ShotCreatingPer90, &[RawStat::ShotCreating]),
    Derivation::per90(Metric::BlocksPer90, &[RawStat::Blocks]),
    Derivation::per90(Metric::ShotsPer90, &[RawStat::Shots]),
    Derivation::per90(Metric::ShotsOnTargetPer90, &[RawStat::ShotsOnTarget]),
    Derivation::per90(Metric::TouchesPer90, &[RawStat::Touches]),
    Derivation::per90(Metric::CrossesIntoBoxPer90, &[RawStat::CrossesIntoBox]),
    Derivation::per90(Metric::CarriesPer90, &[RawStat::Carries]),
    Derivation {
        metric: Metric::GoalsMinusXg,
        formula: Formula::Difference(RawStat::Goals, RawStat::Xg),
    },
    Derivation {
        metric: Metric::AssistsMinusXag,
        formula: Formula::Difference(RawStat::Assists, RawStat::Xag),
    },
];

pub fn active_derivations(available: &[RawStat]) -> Vec<Derivation> {
    DERIVATIONS
        .iter()
        .filter(|d| {
            let missing: Vec<&str> = d
                .inputs()
                .into_iter()
                .filter(|s| !available.contains(s))
                .map(|s| s.column())
                .collect();
            if missing.is_empty() {
                true
            } else {
                log::debug!(
                    "skipping {}: column(s) {} not in schema",
                    d.metric.label(),
                    missing.join(", ")
                );
                false
            }
        })
        .copied()
        .collect()
}

pub fn derive_row(
    derivations: &[Derivation],
    raw: &BTreeMap<RawStat, f64>,
    played_90s: Option<f64>,
) -> BTreeMap<Metric, f64> {
    derivations
        .iter()
        .filter_map(|d| d.evaluate(raw, played_90s).map(|v| (d.metric, v)))
        .collect()
}

/// Two-decimal rounding, ties to even on the scaled value (matches numpy's `round`).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
