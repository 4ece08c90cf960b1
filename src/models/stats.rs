//! Derived statistics models.
//!
//! Everything here is recomputed from the in-memory history window on every
//! request; none of it is persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{HistoryMatch, MatchOutcome};

/// A phase index at or above this marks a league as hot.
pub const HOT_THRESHOLD: f64 = 85.0;

/// Highest 0-0 rate a phase may show and still count as hot.
pub const HOT_MAX_SCORELESS_RATE: f64 = 0.0;

/// FT over 2.5 rate at which a league is at least warm.
pub const WARM_FT_OVER25_THRESHOLD: f64 = 60.0;

/// HT over 0.5 rate at which a league is at least warm.
pub const WARM_HT_OVER05_THRESHOLD: f64 = 80.0;

/// FT over 1.5 rate below which a league is cold.
pub const COLD_THRESHOLD: f64 = 50.0;

/// Goal-line rates shared by player and league aggregates, in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateMetrics {
    pub ht05: f64,
    pub ht15: f64,
    pub ht25: f64,
    pub ht_btts: f64,
    pub ht0x0: f64,
    pub ft15: f64,
    pub ft25: f64,
    pub ft35: f64,
    pub ft_btts: f64,
    pub ft0x0: f64,
}

impl RateMetrics {
    /// Mean of the HT scoring lines (over 0.5/1.5/2.5 and BTTS).
    pub fn ht_index(&self) -> f64 {
        (self.ht05 + self.ht15 + self.ht25 + self.ht_btts) / 4.0
    }

    /// Mean of the FT scoring lines (over 1.5/2.5/3.5 and BTTS).
    pub fn ft_index(&self) -> f64 {
        (self.ft15 + self.ft25 + self.ft35 + self.ft_btts) / 4.0
    }

    /// Field-wise mean of two rate bags.
    pub fn combined(&self, other: &RateMetrics) -> RateMetrics {
        let avg = |a: f64, b: f64| (a + b) / 2.0;
        RateMetrics {
            ht05: avg(self.ht05, other.ht05),
            ht15: avg(self.ht15, other.ht15),
            ht25: avg(self.ht25, other.ht25),
            ht_btts: avg(self.ht_btts, other.ht_btts),
            ht0x0: avg(self.ht0x0, other.ht0x0),
            ft15: avg(self.ft15, other.ft15),
            ft25: avg(self.ft25, other.ft25),
            ft35: avg(self.ft35, other.ft35),
            ft_btts: avg(self.ft_btts, other.ft_btts),
            ft0x0: avg(self.ft0x0, other.ft0x0),
        }
    }

    pub fn values(&self) -> [f64; 10] {
        [
            self.ht05,
            self.ht15,
            self.ht25,
            self.ht_btts,
            self.ht0x0,
            self.ft15,
            self.ft25,
            self.ft35,
            self.ft_btts,
            self.ft0x0,
        ]
    }
}

/// Share of matches in which one player alone reached a goal count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalLines {
    pub over05: f64,
    pub over15: f64,
    pub over25: f64,
    pub over35: f64,
}

/// A history match re-oriented to one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveMatch {
    #[serde(flatten)]
    pub record: HistoryMatch,
    pub result: MatchOutcome,
    pub scored_ft: u32,
    pub conceded_ft: u32,
    pub scored_ht: u32,
    pub conceded_ht: u32,
}

/// Rolling statistics for one player over a bounded window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,

    /// Matches in the window actually used
    pub matches_played: u32,

    /// Matches available for the player before windowing
    pub total_matches: u32,

    pub wins: u32,
    pub draws: u32,
    pub losses: u32,

    /// Win rate (0 to 100)
    pub win_rate: f64,

    /// Draw rate (0 to 100)
    pub draw_rate: f64,

    /// Most recent first
    pub last5: Vec<MatchOutcome>,

    pub rates: RateMetrics,

    pub avg_goals_scored_ht: f64,
    pub avg_goals_scored_ft: f64,
    pub avg_goals_conceded_ht: f64,
    pub avg_goals_conceded_ft: f64,

    pub ht_goal_lines: GoalLines,
    pub ft_goal_lines: GoalLines,

    pub recent_matches: Vec<PerspectiveMatch>,
}

impl PlayerStats {
    /// Statistics for a player with no matches in the window.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn has_history(&self) -> bool {
        self.matches_played > 0
    }
}

/// Head-to-head aggregate between two players, from player 1's side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct H2HStats {
    pub player1: String,
    pub player2: String,
    pub count: u32,
    pub p1_wins: u32,
    pub draws: u32,
    pub p2_wins: u32,
    pub p1_win_prob: f64,
    pub draw_prob: f64,
    pub p2_win_prob: f64,
    pub p1_avg_goals_ht: f64,
    pub p1_avg_goals_ft: f64,
    pub p2_avg_goals_ht: f64,
    pub p2_avg_goals_ft: f64,

    /// Most recent meetings, for drill-down
    pub recent_games: Vec<HistoryMatch>,
}

/// League temperature tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

/// Which phase of play made a league hot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotPhase {
    HalfTime,
    FullTime,
    Both,
}

impl Temperature {
    /// Classify a league from its rate bag.
    ///
    /// Hot wins over everything; the warm signals are checked before the
    /// cold cut so a league with a strong HT start is never reported cold.
    pub fn from_metrics(metrics: &RateMetrics) -> (Self, Option<HotPhase>) {
        let ht_hot =
            metrics.ht_index() >= HOT_THRESHOLD && metrics.ht0x0 <= HOT_MAX_SCORELESS_RATE;
        let ft_hot =
            metrics.ft_index() >= HOT_THRESHOLD && metrics.ft0x0 <= HOT_MAX_SCORELESS_RATE;

        match (ht_hot, ft_hot) {
            (true, true) => return (Temperature::Hot, Some(HotPhase::Both)),
            (true, false) => return (Temperature::Hot, Some(HotPhase::HalfTime)),
            (false, true) => return (Temperature::Hot, Some(HotPhase::FullTime)),
            (false, false) => {}
        }

        if metrics.ft25 >= WARM_FT_OVER25_THRESHOLD || metrics.ht05 >= WARM_HT_OVER05_THRESHOLD {
            (Temperature::Warm, None)
        } else if metrics.ft15 < COLD_THRESHOLD {
            (Temperature::Cold, None)
        } else {
            (Temperature::Warm, None)
        }
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Temperature::Hot => write!(f, "hot"),
            Temperature::Warm => write!(f, "warm"),
            Temperature::Cold => write!(f, "cold"),
        }
    }
}

/// Thermometer snapshot for one league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStats {
    pub league_name: String,
    pub metrics: RateMetrics,
    pub ht_index: f64,
    pub ft_index: f64,
    pub temperature: Temperature,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_phase: Option<HotPhase>,

    /// The window the metrics were computed from, most recent first
    pub sample_games: Vec<HistoryMatch>,
}

/// Sample size outside the thermometer's fixed choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid thermometer sample size {0} (allowed: 5, 10, 15, 20, 30, 40)")]
pub struct InvalidSampleSize(pub usize);

/// Per-league window size for the thermometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SampleSize(usize);

impl SampleSize {
    pub const ALLOWED: [usize; 6] = [5, 10, 15, 20, 30, 40];

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for SampleSize {
    fn default() -> Self {
        Self(15)
    }
}

impl TryFrom<usize> for SampleSize {
    type Error = InvalidSampleSize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidSampleSize(value))
        }
    }
}

impl From<SampleSize> for usize {
    fn from(size: SampleSize) -> Self {
        size.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(ht: f64, ht0x0: f64, ft: f64, ft0x0: f64) -> RateMetrics {
        RateMetrics {
            ht05: ht,
            ht15: ht,
            ht25: ht,
            ht_btts: ht,
            ht0x0,
            ft15: ft,
            ft25: ft,
            ft35: ft,
            ft_btts: ft,
            ft0x0,
        }
    }

    #[test]
    fn test_temperature_hot_phases() {
        assert_eq!(
            Temperature::from_metrics(&metrics(90.0, 0.0, 90.0, 0.0)),
            (Temperature::Hot, Some(HotPhase::Both))
        );
        assert_eq!(
            Temperature::from_metrics(&metrics(90.0, 0.0, 70.0, 10.0)),
            (Temperature::Hot, Some(HotPhase::HalfTime))
        );
        assert_eq!(
            Temperature::from_metrics(&metrics(40.0, 20.0, 85.0, 0.0)),
            (Temperature::Hot, Some(HotPhase::FullTime))
        );
    }

    #[test]
    fn test_temperature_scoreless_blocks_hot() {
        let (temp, phase) = Temperature::from_metrics(&metrics(95.0, 10.0, 95.0, 5.0));
        assert_eq!(temp, Temperature::Warm);
        assert!(phase.is_none());
    }

    #[test]
    fn test_temperature_cold_and_neutral() {
        assert_eq!(
            Temperature::from_metrics(&metrics(30.0, 60.0, 40.0, 30.0)).0,
            Temperature::Cold
        );
        // Neutral band folds into warm
        assert_eq!(
            Temperature::from_metrics(&metrics(50.0, 20.0, 55.0, 10.0)).0,
            Temperature::Warm
        );
    }

    #[test]
    fn test_warm_checked_before_cold() {
        let mut m = metrics(10.0, 50.0, 10.0, 50.0);
        m.ht05 = WARM_HT_OVER05_THRESHOLD;
        assert_eq!(Temperature::from_metrics(&m).0, Temperature::Warm);
    }

    #[test]
    fn test_rate_indices_and_combination() {
        let a = metrics(100.0, 0.0, 50.0, 0.0);
        let b = metrics(50.0, 20.0, 50.0, 40.0);
        assert_eq!(a.ht_index(), 100.0);
        let c = a.combined(&b);
        assert_eq!(c.ht05, 75.0);
        assert_eq!(c.ht0x0, 10.0);
        assert_eq!(c.ft0x0, 20.0);
    }

    #[test]
    fn test_sample_size_choices() {
        for n in SampleSize::ALLOWED {
            assert_eq!(SampleSize::try_from(n).unwrap().get(), n);
        }
        assert_eq!(SampleSize::try_from(7), Err(InvalidSampleSize(7)));
        assert_eq!(SampleSize::default().get(), 15);
    }

    #[test]
    fn test_sample_size_serde() {
        let size: SampleSize = serde_json::from_str("20").unwrap();
        assert_eq!(size.get(), 20);
        assert!(serde_json::from_str::<SampleSize>("25").is_err());
        assert_eq!(serde_json::to_string(&size).unwrap(), "20");
    }

    #[test]
    fn test_temperature_serialization() {
        assert_eq!(serde_json::to_string(&Temperature::Hot).unwrap(), "\"hot\"");
        assert_eq!(
            serde_json::to_string(&HotPhase::HalfTime).unwrap(),
            "\"half_time\""
        );
    }
}
