//! League thermometer.

use std::collections::BTreeMap;

use crate::models::{HistoryMatch, LeagueStats, SampleSize, Temperature};

use super::{rate_metrics, sort_most_recent_first};

/// Grouping name for matches with an empty league.
pub const UNKNOWN_LEAGUE: &str = "Unknown League";

/// Grouping key of a match's league.
pub fn league_key(m: &HistoryMatch) -> &str {
    let name = m.league_name.trim();
    if name.is_empty() {
        UNKNOWN_LEAGUE
    } else {
        name
    }
}

/// The `n` most recent matches of one league.
pub fn league_sample<'a>(league: &str, history: &'a [HistoryMatch], n: usize) -> Vec<&'a HistoryMatch> {
    let league = league.trim();
    let mut games: Vec<&HistoryMatch> = history.iter().filter(|m| league_key(m) == league).collect();
    sort_most_recent_first(&mut games);
    games.truncate(n);
    games
}

fn snapshot(league_name: &str, mut games: Vec<&HistoryMatch>, sample: usize) -> LeagueStats {
    sort_most_recent_first(&mut games);
    games.truncate(sample);

    let metrics = rate_metrics(&games);
    let (temperature, hot_phase) = Temperature::from_metrics(&metrics);

    LeagueStats {
        league_name: league_name.to_string(),
        metrics,
        ht_index: metrics.ht_index(),
        ft_index: metrics.ft_index(),
        temperature,
        hot_phase,
        sample_games: games.into_iter().cloned().collect(),
    }
}

/// Thermometer snapshot for every league in the history, ordered by name.
pub fn league_stats(history: &[HistoryMatch], sample: SampleSize) -> Vec<LeagueStats> {
    let mut leagues: BTreeMap<&str, Vec<&HistoryMatch>> = BTreeMap::new();
    for m in history {
        leagues.entry(league_key(m)).or_default().push(m);
    }

    leagues
        .into_iter()
        .map(|(name, games)| snapshot(name, games, sample.get()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::game_in;
    use crate::models::HotPhase;
    use pretty_assertions::assert_eq;

    fn size(n: usize) -> SampleSize {
        SampleSize::try_from(n).unwrap()
    }

    #[test]
    fn test_groups_by_league_in_name_order() {
        let history = vec![
            game_in("Volta", "A", "B", (1, 0), (0, 0), 0),
            game_in("Battle", "A", "B", (1, 0), (0, 0), 1),
            game_in("", "A", "B", (1, 0), (0, 0), 2),
            game_in("Volta", "C", "D", (1, 0), (0, 0), 3),
        ];

        let stats = league_stats(&history, size(5));
        let names: Vec<&str> = stats.iter().map(|s| s.league_name.as_str()).collect();
        assert_eq!(names, vec!["Battle", UNKNOWN_LEAGUE, "Volta"]);
        assert_eq!(stats[2].sample_games.len(), 2);
    }

    #[test]
    fn test_sample_takes_most_recent() {
        let mut history: Vec<HistoryMatch> = (0..10)
            .map(|i| game_in("Battle", "A", "B", (0, 0), (0, 0), i))
            .collect();
        // The five most recent are all high scoring
        for i in 10..15 {
            history.push(game_in("Battle", "A", "B", (3, 2), (1, 1), i));
        }

        let stats = league_stats(&history, size(5));
        assert_eq!(stats[0].sample_games.len(), 5);
        assert_eq!(stats[0].metrics.ft25, 100.0);
        assert_eq!(stats[0].metrics.ft0x0, 0.0);
        assert_eq!(stats[0].sample_games[0].played_at, history[14].played_at);

        let wide = league_stats(&history, size(15));
        assert_eq!(wide[0].metrics.ft0x0, 10.0 / 15.0 * 100.0);
    }

    #[test]
    fn test_hot_league() {
        let history: Vec<HistoryMatch> = (0..5)
            .map(|i| game_in("Battle", "A", "B", (3, 2), (2, 1), i))
            .collect();

        let stats = &league_stats(&history, size(5))[0];
        assert_eq!(stats.temperature, Temperature::Hot);
        assert_eq!(stats.hot_phase, Some(HotPhase::Both));
        assert_eq!(stats.ft_index, 100.0);
    }

    #[test]
    fn test_cold_league() {
        let history: Vec<HistoryMatch> = (0..5)
            .map(|i| game_in("Battle", "A", "B", (1, 0), (0, 0), i))
            .collect();

        let stats = &league_stats(&history, size(5))[0];
        assert_eq!(stats.temperature, Temperature::Cold);
        assert_eq!(stats.hot_phase, None);
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let history: Vec<HistoryMatch> = (0..20)
            .map(|i| game_in(if i % 2 == 0 { "Battle" } else { "Volta" }, "A", "B", (i as u32 % 4, 1), (0, 1), i))
            .collect();

        let first = league_stats(&history, size(10));
        let second = league_stats(&history, size(10));
        assert_eq!(first, second);
    }

    #[test]
    fn test_league_sample() {
        let history = vec![
            game_in("Battle", "A", "B", (1, 0), (0, 0), 0),
            game_in("Battle", "A", "B", (2, 0), (0, 0), 5),
            game_in("Volta", "A", "B", (3, 0), (0, 0), 10),
        ];
        let sample = league_sample(" Battle ", &history, 15);
        assert_eq!(sample.len(), 2);
        assert_eq!(sample[0].score_home, 2);
        assert!(league_sample("Nope", &history, 15).is_empty());
    }

    #[test]
    fn test_empty_history() {
        assert!(league_stats(&[], SampleSize::default()).is_empty());
    }
}
