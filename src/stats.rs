use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawStat {
    Goals,
    Assists,
    /// Carried through to web records; `G+A per 90` is derived from Gls + Ast.
    GoalsAssists,
    Xg,
    Xag,
    ProgCarries,
    ProgPasses,
    Tackles,
    Interceptions,
    ShotCreating,
    Blocks,
    Shots,
    ShotsOnTarget,
    Touches,
    CrossesIntoBox,
    Carries,
}

impl RawStat {
    pub const ALL: [RawStat; 16] = [
        RawStat::Goals,
        RawStat::Assists,
        RawStat::GoalsAssists,
        RawStat::Xg,
        RawStat::Xag,
        RawStat::ProgCarries,
        RawStat::ProgPasses,
        RawStat::Tackles,
        RawStat::Interceptions,
        RawStat::ShotCreating,
        RawStat::Blocks,
        RawStat::Shots,
        RawStat::ShotsOnTarget,
        RawStat::Touches,
        RawStat::CrossesIntoBox,
        RawStat::Carries,
    ];

    pub fn column(self) -> &'static str {
        match self {
            RawStat::Goals => "Gls",
            RawStat::Assists => "Ast",
            RawStat::GoalsAssists => "G+A",
            RawStat::Xg => "xG",
            RawStat::Xag => "xAG",
            RawStat::ProgCarries => "PrgC",
            RawStat::ProgPasses => "PrgP",
            RawStat::Tackles => "Tkl",
            RawStat::Interceptions => "Int",
            RawStat::ShotCreating => "SCA",
            RawStat::Blocks => "Blocks",
            RawStat::Shots => "Sh",
            RawStat::ShotsOnTarget => "SoT",
            RawStat::Touches => "Touches",
            RawStat::CrossesIntoBox => "CrsPA",
            RawStat::Carries => "Carries",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    GoalsPer90,
    AssistsPer90,
    XgPer90,
    XagPer90,
    GoalsAssistsPer90,
    XgXagPer90,
    ProgCarriesPer90,
    ProgPassesPer90,
    TacklesPer90,
    InterceptionsPer90,
    ShotCreatingPer90,
    BlocksPer90,
    ShotsPer90,
    ShotsOnTargetPer90,
    TouchesPer90,
    CrossesIntoBoxPer90,
    CarriesPer90,
    GoalsMinusXg,
    AssistsMinusXag,
}

pub const SIMILARITY_METRICS: [Metric; 8] = [
    Metric::GoalsPer90,
    Metric::AssistsPer90,
    Metric::XgPer90,
    Metric::XagPer90,
    Metric::ProgCarriesPer90,
    Metric::ProgPassesPer90,
    Metric::TacklesPer90,
    Metric::InterceptionsPer90,
];

impl Metric {
    pub const ALL: [Metric; 19] = [
        Metric::GoalsPer90,
        Metric::AssistsPer90,
        Metric::XgPer90,
        Metric::XagPer90,
        Metric::GoalsAssistsPer90,
        Metric::XgXagPer90,
        Metric::ProgCarriesPer90,
        Metric::ProgPassesPer90,
        Metric::TacklesPer90,
        Metric::InterceptionsPer90,
        Metric::ShotCreatingPer90,
        Metric::BlocksPer90,
        Metric::ShotsPer90,
        Metric::ShotsOnTargetPer90,
        Metric::TouchesPer90,
        Metric::CrossesIntoBoxPer90,
        Metric::CarriesPer90,
        Metric::GoalsMinusXg,
        Metric::AssistsMinusXag,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::GoalsPer90 => "Goals per 90",
            Metric::AssistsPer90 => "Assists per 90",
            Metric::XgPer90 => "xG per 90",
            Metric::XagPer90 => "xAG per 90",
            Metric::GoalsAssistsPer90 => "G+A per 90",
            Metric::XgXagPer90 => "xG+xAG per 90",
            Metric::ProgCarriesPer90 => "Prog Carries per 90",
            Metric::ProgPassesPer90 => "Prog Passes per 90",
            Metric::TacklesPer90 => "Tackles per 90",
            Metric::InterceptionsPer90 => "Interceptions per 90",
            Metric::ShotCreatingPer90 => "Shot Creating per 90",
            Metric::BlocksPer90 => "Blocks per 90",
            Metric::ShotsPer90 => "Shots per 90",
            Metric::ShotsOnTargetPer90 => "Shots on Target per 90",
            Metric::TouchesPer90 => "Touches per 90",
            Metric::CrossesIntoBoxPer90 => "Crosses into PA per 90",
            Metric::CarriesPer90 => "Carries per 90",
            Metric::GoalsMinusXg => "Goals - xG",
            Metric::AssistsMinusXag => "Assists - xAG",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::XgPer90 => "Expected Goals per 90",
            Metric::XagPer90 => "Expected Assists per 90",
            Metric::GoalsAssistsPer90 => "Goals + Assists per 90",
            Metric::XgXagPer90 => "Expected Goal Involvement per 90",
            Metric::ProgCarriesPer90 => "Progressive Carries per 90",
            Metric::ProgPassesPer90 => "Progressive Passes per 90",
            Metric::ShotCreatingPer90 => "Shot Creating Actions per 90",
            Metric::CrossesIntoBoxPer90 => "Crosses into Penalty Area per 90",
            Metric::GoalsMinusXg => "Goals minus Expected Goals",
            Metric::AssistsMinusXag => "Assists minus Expected Assists",
            other => other.label(),
        }
    }

    pub fn from_label(raw: &str) -> Result<Metric, ScoutError> {
        let needle = raw.trim();
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(needle) || m.key() == needle)
            .ok_or_else(|| ScoutError::UnknownMetric(raw.to_string()))
    }

    pub fn key(self) -> &'static str {
        match self {
            Metric::GoalsPer90 => "goals",
            Metric::AssistsPer90 => "assists",
            Metric::XgPer90 => "xg",
            Metric::XagPer90 => "xag",
            Metric::GoalsAssistsPer90 => "ga",
            Metric::XgXagPer90 => "xgxag",
            Metric::ProgCarriesPer90 => "prog_carries",
            Metric::ProgPassesPer90 => "prog_passes",
            Metric::TacklesPer90 => "tackles",
            Metric::InterceptionsPer90 => "interceptions",
            Metric::ShotCreatingPer90 => "sca",
            Metric::BlocksPer90 => "blocks",
            Metric::ShotsPer90 => "shots",
            Metric::ShotsOnTargetPer90 => "shots_on_target",
            Metric::TouchesPer90 => "touches",
            Metric::CrossesIntoBoxPer90 => "crosses_into_box",
            Metric::CarriesPer90 => "carries",
            Metric::GoalsMinusXg => "goals_minus_xg",
            Metric::AssistsMinusXag => "assists_minus_xag",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::from_label(s)
    }
}

// Metrics travel as their column label so JSON output reads like the table headers.
impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Metric::from_label(&raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for RawStat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_label(metric.label()).unwrap(), metric);
            assert_eq!(Metric::from_label(metric.key()).unwrap(), metric);
        }
    }

    #[test]
    fn display_name_spells_out_abbreviations() {
        assert_eq!(Metric::XgPer90.display_name(), "Expected Goals per 90");
        assert_eq!(Metric::GoalsMinusXg.display_name(), "Goals minus Expected Goals");
        assert_eq!(Metric::GoalsPer90.display_name(), Metric::GoalsPer90.label());
    }

    #[test]
    fn from_label_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(
            Metric::from_label("goals PER 90").unwrap(),
            Metric::GoalsPer90
        );
        assert_eq!(
            Metric::from_label("Dribbles per 90"),
            Err(ScoutError::UnknownMetric("Dribbles per 90".to_string()))
        );
    }

    #[test]
    fn similarity_set_is_rate_metrics_only() {
        assert!(SIMILARITY_METRICS.iter().all(|m| m.label().ends_with("per 90")));
    }
}
