use serde::{Deserialize, Serialize};

use crate::dataset::{EnrichedTable, PlayerRecord};
use crate::position::SimplifiedPosition;

/// Selection used by the presentation layer to scope later queries.
///
/// Empty lists and `None` bounds don't constrain. A player with no recorded age fails
/// any age bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerFilter {
    #[serde(default)]
    pub leagues: Vec<String>,
    #[serde(default)]
    pub positions: Vec<SimplifiedPosition>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub age_min: Option<f64>,
    #[serde(default)]
    pub age_max: Option<f64>,
    #[serde(default)]
    pub min_minutes: Option<u32>,
}

impl PlayerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn league(mut self, league: impl Into<String>) -> Self {
        self.leagues.push(league.into());
        self
    }

    pub fn position(mut self, position: SimplifiedPosition) -> Self {
        self.positions.push(position);
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.teams.push(team.into());
        self
    }

    pub fn age_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.age_min = min;
        self.age_max = max;
        self
    }

    pub fn min_minutes(mut self, minutes: u32) -> Self {
        self.min_minutes = Some(minutes);
        self
    }

    pub fn matches(&self, record: &PlayerRecord) -> bool {
        if !self.positions.is_empty() && !self.positions.contains(&record.position) {
            return false;
        }
        if !self.leagues.is_empty() && !self.leagues.iter().any(|l| *l == record.league) {
            return false;
        }
        if !self.teams.is_empty() && !self.teams.iter().any(|t| *t == record.team) {
            return false;
        }
        if let Some(min) = self.age_min {
            if !record.age.is_some_and(|a| a >= min) {
                return false;
            }
        }
        if let Some(max) = self.age_max {
            if !record.age.is_some_and(|a| a <= max) {
                return false;
            }
        }
        if let Some(minutes) = self.min_minutes {
            if record.minutes < minutes {
                return false;
            }
        }
        true
    }
}

pub fn filter(table: &EnrichedTable, filter: &PlayerFilter) -> EnrichedTable {
    let out = table.filter(|r| filter.matches(r));
    log::debug!("filter kept {} of {} players", out.len(), table.len());
    out
}
