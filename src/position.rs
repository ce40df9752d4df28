use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::stats::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SimplifiedPosition {
    GK,
    FW,
    MF,
    DF,
    Unknown,
}

impl SimplifiedPosition {
    pub const ALL: [SimplifiedPosition; 5] = [
        SimplifiedPosition::GK,
        SimplifiedPosition::FW,
        SimplifiedPosition::MF,
        SimplifiedPosition::DF,
        SimplifiedPosition::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SimplifiedPosition::GK => "GK",
            SimplifiedPosition::FW => "FW",
            SimplifiedPosition::MF => "MF",
            SimplifiedPosition::DF => "DF",
            SimplifiedPosition::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SimplifiedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimplifiedPosition {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimplifiedPosition::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScoutError::InvalidPosition(s.to_string()))
    }
}

/// Maps an FBref position string ("FW,MF", "DF", ...) to a single category.
///
/// Case-sensitive substring match in the order GK, FW, MF, DF; first hit wins.
/// Never fails: absent or unrecognised input is `Unknown`.
pub fn classify(raw: Option<&str>) -> SimplifiedPosition {
    let Some(raw) = raw else {
        return SimplifiedPosition::Unknown;
    };
    const ORDER: [SimplifiedPosition; 4] = [
        SimplifiedPosition::GK,
        SimplifiedPosition::FW,
        SimplifiedPosition::MF,
        SimplifiedPosition::DF,
    ];
    ORDER
        .into_iter()
        .find(|p| raw.contains(p.as_str()))
        .unwrap_or(SimplifiedPosition::Unknown)
}

pub fn radar_metrics(position: SimplifiedPosition) -> [Metric; 6] {
    match position {
        SimplifiedPosition::MF => [
            Metric::GoalsPer90,
            Metric::AssistsPer90,
            Metric::ProgPassesPer90,
            Metric::ProgCarriesPer90,
            Metric::TacklesPer90,
            Metric::InterceptionsPer90,
        ],
        SimplifiedPosition::DF => [
            Metric::TacklesPer90,
            Metric::InterceptionsPer90,
            Metric::ProgPassesPer90,
            Metric::ProgCarriesPer90,
            Metric::GoalsPer90,
            Metric::AssistsPer90,
        ],
        // Keepers have no dedicated per-90 set here; they get the attacking default.
        SimplifiedPosition::FW | SimplifiedPosition::GK | SimplifiedPosition::Unknown => [
            Metric::GoalsPer90,
            Metric::AssistsPer90,
            Metric::XgPer90,
            Metric::XagPer90,
            Metric::ShotCreatingPer90,
            Metric::ProgCarriesPer90,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_gk_fw_mf_df() {
        assert_eq!(classify(Some("DF,FW")), SimplifiedPosition::FW);
        assert_eq!(classify(Some("MF,DF")), SimplifiedPosition::MF);
        assert_eq!(classify(Some("FW,GK")), SimplifiedPosition::GK);
        assert_eq!(classify(Some("DF")), SimplifiedPosition::DF);
    }

    #[test]
    fn missing_or_unmatched_is_unknown() {
        assert_eq!(classify(None), SimplifiedPosition::Unknown);
        assert_eq!(classify(Some("")), SimplifiedPosition::Unknown);
        assert_eq!(classify(Some("Winger")), SimplifiedPosition::Unknown);
        // Matching is case-sensitive.
        assert_eq!(classify(Some("fw")), SimplifiedPosition::Unknown);
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("mf".parse::<SimplifiedPosition>().unwrap(), SimplifiedPosition::MF);
        assert!("striker".parse::<SimplifiedPosition>().is_err());
    }
}
