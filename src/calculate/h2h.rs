//! Head-to-head aggregation.

use crate::models::{H2HStats, HistoryMatch};
use crate::normalize::normalize_name;

use super::{calculate_average, calculate_rate, perspective, sort_most_recent_first};

/// Meetings kept in `recent_games` for drill-down.
pub const H2H_RECENT_GAMES: usize = 5;

/// Aggregate the mutual meetings between two players, from player 1's side.
///
/// Only matches where the two met each other count, in either orientation.
/// `limit` caps the window to the most recent meetings.
pub fn h2h_stats(
    player1: &str,
    player2: &str,
    history: &[HistoryMatch],
    limit: Option<usize>,
) -> H2HStats {
    let n1 = normalize_name(player1);
    let n2 = normalize_name(player2);

    let mut meetings: Vec<&HistoryMatch> = history
        .iter()
        .filter(|m| {
            let home = normalize_name(&m.home_player);
            let away = normalize_name(&m.away_player);
            (home == n1 && away == n2) || (home == n2 && away == n1)
        })
        .collect();
    sort_most_recent_first(&mut meetings);
    if let Some(limit) = limit {
        meetings.truncate(limit);
    }

    let count = meetings.len();
    let mut stats = H2HStats {
        player1: player1.to_string(),
        player2: player2.to_string(),
        count: count as u32,
        recent_games: meetings
            .iter()
            .take(H2H_RECENT_GAMES)
            .map(|m| (*m).clone())
            .collect(),
        ..Default::default()
    };

    let (mut p1_ht, mut p1_ft, mut p2_ht, mut p2_ft) = (0, 0, 0, 0);
    for m in &meetings {
        let p1 = perspective(m, &n1);
        match p1.scored_ft.cmp(&p1.conceded_ft) {
            std::cmp::Ordering::Greater => stats.p1_wins += 1,
            std::cmp::Ordering::Equal => stats.draws += 1,
            std::cmp::Ordering::Less => stats.p2_wins += 1,
        }
        p1_ht += p1.scored_ht;
        p1_ft += p1.scored_ft;
        p2_ht += p1.conceded_ht;
        p2_ft += p1.conceded_ft;
    }

    stats.p1_win_prob = calculate_rate(stats.p1_wins as usize, count);
    stats.draw_prob = calculate_rate(stats.draws as usize, count);
    stats.p2_win_prob = calculate_rate(stats.p2_wins as usize, count);
    stats.p1_avg_goals_ht = calculate_average(p1_ht, count);
    stats.p1_avg_goals_ft = calculate_average(p1_ft, count);
    stats.p2_avg_goals_ht = calculate_average(p2_ht, count);
    stats.p2_avg_goals_ft = calculate_average(p2_ft, count);

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::game;

    fn history() -> Vec<HistoryMatch> {
        vec![
            game("Neo", "Zion", (3, 1), (1, 0), 0),
            game("Zion", "Neo", (2, 2), (0, 1), 10),
            game("Neo", "Trinity", (4, 0), (2, 0), 20),
            game("Zion", "Neo", (3, 0), (1, 0), 30),
            game("Neo", "Zion", (1, 0), (1, 0), 40),
        ]
    }

    #[test]
    fn test_only_mutual_meetings_count() {
        let stats = h2h_stats("Neo", "Zion", &history(), None);
        assert_eq!(stats.count, 4);
        assert_eq!((stats.p1_wins, stats.draws, stats.p2_wins), (2, 1, 1));
        assert_eq!(stats.p1_win_prob, 50.0);
        assert_eq!(stats.draw_prob, 25.0);
        assert_eq!(stats.p2_win_prob, 25.0);
    }

    #[test]
    fn test_probabilities_sum_to_100() {
        let history = vec![
            game("Neo", "Zion", (3, 1), (1, 0), 0),
            game("Zion", "Neo", (2, 2), (0, 1), 10),
            game("Zion", "Neo", (3, 0), (1, 0), 30),
        ];
        let stats = h2h_stats("neo", "ZION", &history, None);
        let total = stats.p1_win_prob + stats.draw_prob + stats.p2_win_prob;
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_averages_per_player() {
        let stats = h2h_stats("Neo", "Zion", &history(), None);
        // Neo FT: 3 + 2 + 0 + 1 = 6, HT: 1 + 1 + 0 + 1 = 3
        assert_eq!(stats.p1_avg_goals_ft, 1.5);
        assert_eq!(stats.p1_avg_goals_ht, 0.75);
        // Zion FT: 1 + 2 + 3 + 0 = 6, HT: 0 + 0 + 1 + 0 = 1
        assert_eq!(stats.p2_avg_goals_ft, 1.5);
        assert_eq!(stats.p2_avg_goals_ht, 0.25);
    }

    #[test]
    fn test_perspective_flips_with_argument_order() {
        let a = h2h_stats("Neo", "Zion", &history(), None);
        let b = h2h_stats("Zion", "Neo", &history(), None);
        assert_eq!(a.p1_wins, b.p2_wins);
        assert_eq!(a.p1_avg_goals_ht, b.p2_avg_goals_ht);
    }

    #[test]
    fn test_limit_and_recent_games() {
        let stats = h2h_stats("Neo", "Zion", &history(), Some(2));
        assert_eq!(stats.count, 2);
        // Most recent two: Neo 1-0 Zion, Zion 3-0 Neo
        assert_eq!((stats.p1_wins, stats.p2_wins), (1, 1));
        assert_eq!(stats.recent_games.len(), 2);
        assert_eq!(stats.recent_games[0].score_home, 1);
    }

    #[test]
    fn test_no_meetings() {
        let stats = h2h_stats("Neo", "Morpheus", &history(), None);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.p1_win_prob, 0.0);
        assert_eq!(stats.p1_avg_goals_ft, 0.0);
        assert!(stats.recent_games.is_empty());
    }
}
