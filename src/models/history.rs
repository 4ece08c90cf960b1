//! Canonical historical match record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MatchId;

/// Outcome of a match from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl MatchOutcome {
    /// Outcome for the side that scored `scored` and conceded `conceded`.
    pub fn from_goals(scored: u32, conceded: u32) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Win => write!(f, "W"),
            MatchOutcome::Draw => write!(f, "D"),
            MatchOutcome::Loss => write!(f, "L"),
        }
    }
}

/// A finished match in absolute home/away terms.
///
/// Produced once per normalization pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMatch {
    pub home_player: String,
    pub away_player: String,
    pub league_name: String,
    pub score_home: u32,
    pub score_away: u32,
    pub halftime_score_home: u32,
    pub halftime_score_away: u32,

    /// Kick-off time
    #[serde(rename = "data_realizacao")]
    pub played_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team: Option<String>,
}

impl HistoryMatch {
    /// Create a match with full-time and half-time scores.
    pub fn new(
        home_player: impl Into<String>,
        away_player: impl Into<String>,
        league_name: impl Into<String>,
        full_time: (u32, u32),
        half_time: (u32, u32),
        played_at: DateTime<Utc>,
    ) -> Self {
        Self {
            home_player: home_player.into(),
            away_player: away_player.into(),
            league_name: league_name.into(),
            score_home: full_time.0,
            score_away: full_time.1,
            halftime_score_home: half_time.0,
            halftime_score_away: half_time.1,
            played_at,
            home_team: None,
            away_team: None,
        }
    }

    /// Builder method to set the clubs each player controlled.
    pub fn with_teams(mut self, home_team: Option<String>, away_team: Option<String>) -> Self {
        self.home_team = home_team;
        self.away_team = away_team;
        self
    }

    /// Deterministic identity of this match.
    pub fn match_id(&self) -> MatchId {
        MatchId::generate(&[
            &self.home_player,
            &self.away_player,
            &self.league_name,
            &self.played_at.to_rfc3339(),
            &format!(
                "{}-{}/{}-{}",
                self.score_home, self.score_away, self.halftime_score_home, self.halftime_score_away
            ),
        ])
    }

    pub fn total_goals_ft(&self) -> u32 {
        self.score_home + self.score_away
    }

    pub fn total_goals_ht(&self) -> u32 {
        self.halftime_score_home + self.halftime_score_away
    }

    /// Half-time scores never exceed full-time scores.
    pub fn is_consistent(&self) -> bool {
        self.halftime_score_home <= self.score_home && self.halftime_score_away <= self.score_away
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> HistoryMatch {
        HistoryMatch::new(
            "Neo",
            "Zion",
            "GT League",
            (3, 1),
            (1, 0),
            Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_outcome_from_goals() {
        assert_eq!(MatchOutcome::from_goals(2, 1), MatchOutcome::Win);
        assert_eq!(MatchOutcome::from_goals(1, 1), MatchOutcome::Draw);
        assert_eq!(MatchOutcome::from_goals(0, 4), MatchOutcome::Loss);
    }

    #[test]
    fn test_totals_and_consistency() {
        let m = sample();
        assert_eq!(m.total_goals_ft(), 4);
        assert_eq!(m.total_goals_ht(), 1);
        assert!(m.is_consistent());

        let mut broken = sample();
        broken.halftime_score_away = 2;
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_serializes_timestamp_as_data_realizacao() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["data_realizacao"], "2025-06-15T10:00:00Z");
        assert!(json.get("home_team").is_none());

        let parsed: HistoryMatch = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_match_id_changes_with_score() {
        let mut other = sample();
        other.score_home = 4;
        assert_ne!(sample().match_id(), other.match_id());
        assert_eq!(sample().match_id(), sample().match_id());
    }
}
