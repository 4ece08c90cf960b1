//! Statistics calculation engine.
//!
//! Computes derived statistics from the in-memory match history:
//! - Rolling per-player windows
//! - Head-to-head aggregates
//! - League thermometer snapshots
//!
//! Every window is ordered most recent first. Nothing here caches results
//! between calls.

pub mod h2h;
pub mod league;
pub mod player;

pub use h2h::{h2h_stats, H2H_RECENT_GAMES};
pub use league::{league_key, league_sample, league_stats, UNKNOWN_LEAGUE};
pub use player::{perspective, player_stats};

use crate::models::{HistoryMatch, RateMetrics};
use crate::normalize::normalize_name;

/// Default rolling window for player statistics.
pub const DEFAULT_PLAYER_WINDOW: usize = 5;

/// Percentage of `count` over `total` (0 to 100). Zero when `total` is zero.
pub fn calculate_rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Mean of `sum` over `total`. Zero when `total` is zero.
pub fn calculate_average(sum: u32, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        sum as f64 / total as f64
    }
}

/// Stable sort, most recent kick-off first.
pub fn sort_most_recent_first(matches: &mut [&HistoryMatch]) {
    matches.sort_by(|a, b| b.played_at.cmp(&a.played_at));
}

/// Whether the player (already normalized) is on either side.
pub fn involves(m: &HistoryMatch, normalized: &str) -> bool {
    normalize_name(&m.home_player) == normalized || normalize_name(&m.away_player) == normalized
}

/// All of a player's matches, most recent first.
pub fn player_matches<'a>(name: &str, history: &'a [HistoryMatch]) -> Vec<&'a HistoryMatch> {
    let target = normalize_name(name);
    let mut matches: Vec<&HistoryMatch> = history.iter().filter(|m| involves(m, &target)).collect();
    sort_most_recent_first(&mut matches);
    matches
}

/// Number of matches a player has in the history.
pub fn count_player_matches(name: &str, history: &[HistoryMatch]) -> usize {
    let target = normalize_name(name);
    history.iter().filter(|m| involves(m, &target)).count()
}

/// Whole-match goal-line rates over a set of matches.
///
/// Both sides of every match count, so the same figures serve a player's
/// window and a league sample.
pub fn rate_metrics(matches: &[&HistoryMatch]) -> RateMetrics {
    let total = matches.len();
    let rate = |pred: &dyn Fn(&HistoryMatch) -> bool| {
        calculate_rate(matches.iter().filter(|&m| pred(m)).count(), total)
    };

    RateMetrics {
        ht05: rate(&|m| m.total_goals_ht() > 0),
        ht15: rate(&|m| m.total_goals_ht() > 1),
        ht25: rate(&|m| m.total_goals_ht() > 2),
        ht_btts: rate(&|m| m.halftime_score_home > 0 && m.halftime_score_away > 0),
        ht0x0: rate(&|m| m.total_goals_ht() == 0),
        ft15: rate(&|m| m.total_goals_ft() > 1),
        ft25: rate(&|m| m.total_goals_ft() > 2),
        ft35: rate(&|m| m.total_goals_ft() > 3),
        ft_btts: rate(&|m| m.score_home > 0 && m.score_away > 0),
        ft0x0: rate(&|m| m.total_goals_ft() == 0),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::models::HistoryMatch;

    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()
    }

    /// A match `minute` minutes after the base time.
    pub fn game(
        home: &str,
        away: &str,
        full_time: (u32, u32),
        half_time: (u32, u32),
        minute: i64,
    ) -> HistoryMatch {
        game_in("GT League", home, away, full_time, half_time, minute)
    }

    pub fn game_in(
        league: &str,
        home: &str,
        away: &str,
        full_time: (u32, u32),
        half_time: (u32, u32),
        minute: i64,
    ) -> HistoryMatch {
        HistoryMatch::new(
            home,
            away,
            league,
            full_time,
            half_time,
            base_time() + Duration::minutes(minute),
        )
    }
}
