//! Score tooltip parsing.
//!
//! Some upstream pages only hand out pre-rendered strings such as
//! `"Neo 3 - Zion 1"` plus a half-time string `"1-0"`. This module turns
//! those into a verified tuple seen from one player's side.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{fit_halftime, normalize_name};
use crate::models::RateMetrics;

/// `-` or `x` between the two sides.
///
/// An `x` inside a player name also splits, so "Alex 3 - Max 1" loses the
/// home score. Tooltips with such names do not parse reliably.
fn side_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*-\s*|\s*[xX]\s*").expect("static regex"))
}

fn digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// A score parsed from a tooltip. `home` is the query player's side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedScore {
    pub ft_home: u32,
    pub ft_away: u32,
    pub ht_home: u32,
    pub ht_away: u32,
    pub btts: bool,
    pub ht_btts: bool,
}

impl ParsedScore {
    fn new(full_time: (u32, u32), half_time: (u32, u32)) -> Self {
        Self {
            ft_home: full_time.0,
            ft_away: full_time.1,
            ht_home: half_time.0,
            ht_away: half_time.1,
            btts: full_time.0 > 0 && full_time.1 > 0,
            ht_btts: half_time.0 > 0 && half_time.1 > 0,
        }
    }

    pub fn total_ft(&self) -> u32 {
        self.ft_home + self.ft_away
    }

    pub fn total_ht(&self) -> u32 {
        self.ht_home + self.ht_away
    }
}

/// Every integer in `s`, in order. Oversized runs of digits are skipped.
fn numbers(s: &str) -> Vec<u32> {
    digits()
        .find_iter(s)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Parse a tooltip (and optional half-time string) from `player`'s side.
///
/// The last integer of each outer segment is that side's score, which keeps
/// dates or ids earlier in a segment out of the result. Unparseable input
/// gives the all-zero tuple.
pub fn parse_score_string(tooltip: &str, half_time: Option<&str>, player: &str) -> ParsedScore {
    let parts: Vec<&str> = side_separator().split(tooltip).map(str::trim).collect();
    if parts.len() < 2 {
        return ParsedScore::default();
    }

    let side_a = parts[0];
    let side_b = parts[parts.len() - 1];
    let (score_a, score_b) = match (numbers(side_a).last(), numbers(side_b).last()) {
        (None, None) => return ParsedScore::default(),
        (a, b) => (a.copied().unwrap_or(0), b.copied().unwrap_or(0)),
    };

    let player = normalize_name(player);
    let side_a_lower = side_a.to_lowercase();
    let player_is_a = side_a_lower.contains(&player) || player.contains(&side_a_lower);

    let full_time = if player_is_a {
        (score_a, score_b)
    } else {
        (score_b, score_a)
    };

    let ht_numbers = half_time.map(numbers).unwrap_or_default();
    let ht_a = ht_numbers.first().copied().unwrap_or(0);
    let ht_b = ht_numbers.get(1).copied().unwrap_or(0);
    let raw_half_time = if player_is_a { (ht_a, ht_b) } else { (ht_b, ht_a) };

    // Keep the raw pair when swapping does not make it possible either.
    let half_time = fit_halftime(full_time, raw_half_time).unwrap_or(raw_half_time);

    ParsedScore::new(full_time, half_time)
}

/// Aggregate figures over a list of parsed tooltips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipMetrics {
    pub matches: u32,
    pub rates: RateMetrics,
    pub ft45: f64,
    pub ft55: f64,
    pub avg_goals_ft: f64,
    pub avg_goals_ht: f64,
    pub avg_scored_ft: f64,
    pub avg_conceded_ft: f64,
    pub avg_scored_ht: f64,
    pub avg_conceded_ht: f64,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub draw_pct: f64,
    pub loss_pct: f64,
}

/// Summarize parsed tooltips the same way player statistics are summarized.
pub fn summarize_parsed(scores: &[ParsedScore]) -> TooltipMetrics {
    if scores.is_empty() {
        return TooltipMetrics::default();
    }

    let total = scores.len() as f64;
    let pct = |pred: &dyn Fn(&ParsedScore) -> bool| {
        scores.iter().filter(|&s| pred(s)).count() as f64 / total * 100.0
    };
    let count =
        |pred: &dyn Fn(&ParsedScore) -> bool| scores.iter().filter(|&s| pred(s)).count() as u32;
    let avg =
        |f: &dyn Fn(&ParsedScore) -> u32| scores.iter().map(|s| f(s) as f64).sum::<f64>() / total;

    let rates = RateMetrics {
        ht05: pct(&|s| s.total_ht() > 0),
        ht15: pct(&|s| s.total_ht() > 1),
        ht25: pct(&|s| s.total_ht() > 2),
        ht_btts: pct(&|s| s.ht_btts),
        ht0x0: pct(&|s| s.total_ht() == 0),
        ft15: pct(&|s| s.total_ft() > 1),
        ft25: pct(&|s| s.total_ft() > 2),
        ft35: pct(&|s| s.total_ft() > 3),
        ft_btts: pct(&|s| s.btts),
        ft0x0: pct(&|s| s.total_ft() == 0),
    };

    TooltipMetrics {
        matches: scores.len() as u32,
        rates,
        ft45: pct(&|s| s.total_ft() > 4),
        ft55: pct(&|s| s.total_ft() > 5),
        avg_goals_ft: avg(&|s| s.total_ft()),
        avg_goals_ht: avg(&|s| s.total_ht()),
        avg_scored_ft: avg(&|s| s.ft_home),
        avg_conceded_ft: avg(&|s| s.ft_away),
        avg_scored_ht: avg(&|s| s.ht_home),
        avg_conceded_ht: avg(&|s| s.ht_away),
        wins: count(&|s| s.ft_home > s.ft_away),
        draws: count(&|s| s.ft_home == s.ft_away),
        losses: count(&|s| s.ft_home < s.ft_away),
        win_pct: pct(&|s| s.ft_home > s.ft_away),
        draw_pct: pct(&|s| s.ft_home == s.ft_away),
        loss_pct: pct(&|s| s.ft_home < s.ft_away),
    }
}
