//! Player form score.
//!
//! A 0 to 100 score built from four factors over the player's window:
//!
//! | factor                         | points |
//! |--------------------------------|--------|
//! | FT goal consistency (std dev)  | 40     |
//! | average FT goals               | 30     |
//! | trend, last 3 vs earlier       | 20     |
//! | HT over 0.5 rate               | 10     |

use serde::{Deserialize, Serialize};

use crate::models::PlayerStats;

/// Fewer matches than this scores zero.
pub const MIN_FORM_MATCHES: usize = 3;

const TREND_EPSILON: f64 = 1e-9;

/// Direction of a player's recent scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Heating,
    Stable,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormScore {
    pub score: u32,
    pub trend: Trend,
    pub std_dev: f64,
}

impl FormScore {
    fn insufficient() -> Self {
        Self {
            score: 0,
            trend: Trend::Stable,
            std_dev: 0.0,
        }
    }

    pub fn cooling(&self) -> bool {
        self.trend == Trend::Cooling
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn consistency_points(std_dev: f64) -> u32 {
    match std_dev {
        s if s <= 0.5 => 40,
        s if s <= 1.0 => 30,
        s if s <= 1.5 => 20,
        s if s <= 2.0 => 10,
        _ => 0,
    }
}

fn average_points(avg: f64) -> u32 {
    match avg {
        a if a >= 3.5 => 30,
        a if a >= 3.0 => 25,
        a if a >= 2.5 => 20,
        a if a >= 2.0 => 15,
        a if a >= 1.5 => 10,
        _ => 0,
    }
}

fn ht_points(rate: f64) -> u32 {
    match rate {
        r if r >= 100.0 => 10,
        r if r >= 80.0 => 7,
        r if r >= 60.0 => 5,
        r if r >= 40.0 => 3,
        _ => 0,
    }
}

/// Form score of a player from their windowed statistics.
pub fn form_score(stats: &PlayerStats) -> FormScore {
    let goals: Vec<f64> = stats
        .recent_matches
        .iter()
        .map(|p| p.scored_ft as f64)
        .collect();

    if goals.len() < MIN_FORM_MATCHES {
        return FormScore::insufficient();
    }

    let avg = mean(&goals);
    let variance = goals.iter().map(|g| (g - avg).powi(2)).sum::<f64>() / goals.len() as f64;
    let std_dev = variance.sqrt();

    let (last3, earlier) = goals.split_at(3);
    let last3_avg = mean(last3);
    let earlier_avg = if earlier.is_empty() {
        last3_avg
    } else {
        mean(earlier)
    };

    let trend = if (last3_avg - earlier_avg).abs() < TREND_EPSILON {
        Trend::Stable
    } else if last3_avg > earlier_avg {
        Trend::Heating
    } else {
        Trend::Cooling
    };
    let trend_points = match trend {
        Trend::Heating => 20,
        Trend::Stable => 10,
        Trend::Cooling => 0,
    };

    FormScore {
        score: consistency_points(std_dev)
            + average_points(stats.avg_goals_scored_ft)
            + trend_points
            + ht_points(stats.rates.ht05),
        trend,
        std_dev,
    }
}
