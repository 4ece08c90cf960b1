//! Strategy backtest report.
//!
//! Replays the history in kick-off order and classifies each match using only
//! the matches played before it, then checks the signal against the real
//! result.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculate::league_key;
use crate::models::{HistoryMatch, StrategyKey};

use super::StrategyClassifier;

/// Fewer matches than this produce an empty report.
pub const MIN_REPORT_HISTORY: usize = 20;

/// Matches skipped at the start so every replayed match has some history.
pub const REPORT_WARMUP: usize = 15;

/// Only signals at or above this confidence are tallied.
pub const REPORT_MIN_CONFIDENCE: u8 = 85;

/// Whether a strategy would have won on a finished match.
pub fn strategy_hit(key: StrategyKey, m: &HistoryMatch) -> bool {
    let both_scored_ft = m.score_home > 0 && m.score_away > 0;
    match key {
        StrategyKey::HtPro => m.total_goals_ht() > 0,
        StrategyKey::FtPro => m.total_goals_ft() > 2,
        StrategyKey::BttsProHt => m.halftime_score_home > 0 && m.halftime_score_away > 0,
        StrategyKey::BttsProFt => both_scored_ft,
        StrategyKey::CasaPro => m.score_home > m.score_away,
        StrategyKey::ForaPro => m.score_away > m.score_home,
        StrategyKey::CasaEnginePro => m.score_home >= 2,
        StrategyKey::ForaEnginePro => m.score_away >= 2,
        StrategyKey::TopClash => m.total_goals_ft() > 2 && both_scored_ft,
        StrategyKey::None => false,
    }
}

/// Hits and misses of one strategy in one (date, league) bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyTally {
    pub total: u32,
    pub green: u32,
    pub red: u32,
    pub sum_confidence: u32,
}

impl StrategyTally {
    fn record(&mut self, hit: bool, confidence: u8) {
        self.total += 1;
        if hit {
            self.green += 1;
        } else {
            self.red += 1;
        }
        self.sum_confidence += confidence as u32;
    }

    pub fn hit_rate(&self) -> f64 {
        crate::calculate::calculate_rate(self.green as usize, self.total as usize)
    }

    pub fn avg_confidence(&self) -> f64 {
        crate::calculate::calculate_average(self.sum_confidence, self.total as usize)
    }
}

/// One (date, league) row of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReportRow {
    pub date: NaiveDate,
    pub league: String,
    pub strategies: BTreeMap<StrategyKey, StrategyTally>,
}

type Buckets = HashMap<(NaiveDate, String), BTreeMap<StrategyKey, StrategyTally>>;

/// Indices (into the chronological list) of the last `limit` matches of each
/// league.
fn latest_per_league(sorted: &[HistoryMatch], limit: usize) -> HashSet<usize> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut keep = HashSet::new();
    for (i, m) in sorted.iter().enumerate().rev() {
        let count = seen.entry(league_key(m)).or_default();
        if *count < limit {
            keep.insert(i);
            *count += 1;
        }
    }
    keep
}

fn into_rows(buckets: Buckets) -> Vec<StrategyReportRow> {
    let mut rows: Vec<StrategyReportRow> = buckets
        .into_iter()
        .map(|((date, league), strategies)| StrategyReportRow {
            date,
            league,
            strategies,
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.league.cmp(&b.league)));
    rows
}

/// Backtest every strategy over the history.
///
/// `limit_per_league` restricts the replay to each league's most recent
/// matches; earlier matches still serve as history.
pub fn strategy_report(
    history: &[HistoryMatch],
    limit_per_league: Option<usize>,
    classifier: &StrategyClassifier,
) -> Vec<StrategyReportRow> {
    if history.len() < MIN_REPORT_HISTORY {
        debug!(matches = history.len(), "Not enough history for a report");
        return Vec::new();
    }

    let mut sorted = history.to_vec();
    sorted.sort_by(|a, b| a.played_at.cmp(&b.played_at));

    let selected = limit_per_league.map(|limit| latest_per_league(&sorted, limit));

    let mut buckets = Buckets::new();
    let mut signals = 0usize;

    for i in REPORT_WARMUP..sorted.len() {
        if matches!(&selected, Some(keep) if !keep.contains(&i)) {
            continue;
        }

        let m = &sorted[i];
        let signal = classifier.classify(&m.home_player, &m.away_player, None, &sorted[..i]);
        if signal.is_none() || signal.confidence < REPORT_MIN_CONFIDENCE {
            continue;
        }

        signals += 1;
        buckets
            .entry((m.played_at.date_naive(), league_key(m).to_string()))
            .or_default()
            .entry(signal.key)
            .or_default()
            .record(strategy_hit(signal.key, m), signal.confidence);
    }

    info!(
        replayed = sorted.len() - REPORT_WARMUP,
        signals,
        rows = buckets.len(),
        "Built strategy report"
    );

    into_rows(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, game_in};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strategy_hit() {
        let m = game("A", "B", (2, 1), (1, 0), 0);
        assert!(strategy_hit(StrategyKey::HtPro, &m));
        assert!(strategy_hit(StrategyKey::FtPro, &m));
        assert!(!strategy_hit(StrategyKey::BttsProHt, &m));
        assert!(strategy_hit(StrategyKey::BttsProFt, &m));
        assert!(strategy_hit(StrategyKey::CasaPro, &m));
        assert!(!strategy_hit(StrategyKey::ForaPro, &m));
        assert!(strategy_hit(StrategyKey::CasaEnginePro, &m));
        assert!(!strategy_hit(StrategyKey::ForaEnginePro, &m));
        assert!(strategy_hit(StrategyKey::TopClash, &m));
        assert!(!strategy_hit(StrategyKey::None, &m));

        let blank = game("A", "B", (0, 3), (0, 0), 0);
        assert!(!strategy_hit(StrategyKey::HtPro, &blank));
        assert!(strategy_hit(StrategyKey::FtPro, &blank));
        assert!(!strategy_hit(StrategyKey::TopClash, &blank));
        assert!(strategy_hit(StrategyKey::ForaEnginePro, &blank));
    }

    /// Neo always wins 4-0, Zion always loses 0-4, then they meet three times.
    fn history() -> Vec<HistoryMatch> {
        let mut history = Vec::new();
        for i in 0..16 {
            if i % 2 == 0 {
                history.push(game("Neo", &format!("o{}", i), (4, 0), (1, 0), i));
            } else {
                history.push(game(&format!("z{}", i), "Zion", (4, 0), (1, 0), i));
            }
        }
        for i in 16..19 {
            history.push(game("Neo", "Zion", (4, 0), (1, 0), i));
        }
        for i in 19..22 {
            history.push(game(&format!("x{}", i), &format!("y{}", i), (1, 1), (0, 0), i));
        }
        // Reverse so the report has to sort
        history.reverse();
        history
    }

    #[test]
    fn test_report_tallies_high_confidence_signals() {
        let report = strategy_report(&history(), None, &StrategyClassifier::default());

        // Only the third meeting has the H2H bonus that lifts it to 90
        assert_eq!(report.len(), 1);
        let row = &report[0];
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(row.league, "GT League");

        let tally = row.strategies[&StrategyKey::CasaPro];
        assert_eq!(
            tally,
            StrategyTally {
                total: 1,
                green: 1,
                red: 0,
                sum_confidence: 90
            }
        );
        assert_eq!(tally.hit_rate(), 100.0);
        assert_eq!(tally.avg_confidence(), 90.0);
    }

    #[test]
    fn test_limit_per_league() {
        let classifier = StrategyClassifier::default();
        assert!(strategy_report(&history(), Some(2), &classifier).is_empty());
        assert_eq!(strategy_report(&history(), Some(4), &classifier).len(), 1);
    }

    #[test]
    fn test_short_history_is_empty() {
        let history: Vec<HistoryMatch> = history().into_iter().take(MIN_REPORT_HISTORY - 1).collect();
        assert!(strategy_report(&history, None, &StrategyClassifier::default()).is_empty());
    }

    #[test]
    fn test_latest_per_league() {
        let sorted = vec![
            game_in("A", "p", "q", (0, 0), (0, 0), 0),
            game_in("B", "p", "q", (0, 0), (0, 0), 1),
            game_in("A", "p", "q", (0, 0), (0, 0), 2),
            game_in("A", "p", "q", (0, 0), (0, 0), 3),
        ];
        let keep = latest_per_league(&sorted, 2);
        assert_eq!(keep, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_rows_sorted_by_date_desc_then_league() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
        let mut buckets = Buckets::new();
        for (date, league) in [(day(14), "Volta"), (day(15), "Volta"), (day(15), "Battle"), (day(14), "Adriatic")] {
            buckets
                .entry((date, league.to_string()))
                .or_default()
                .entry(StrategyKey::FtPro)
                .or_default()
                .record(true, 90);
        }

        let order: Vec<(NaiveDate, String)> = into_rows(buckets)
            .into_iter()
            .map(|r| (r.date, r.league))
            .collect();
        assert_eq!(
            order,
            vec![
                (day(15), "Battle".to_string()),
                (day(15), "Volta".to_string()),
                (day(14), "Adriatic".to_string()),
                (day(14), "Volta".to_string()),
            ]
        );
    }
}
