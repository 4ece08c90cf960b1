//! Rolling player statistics.

use crate::models::{GoalLines, HistoryMatch, MatchOutcome, PerspectiveMatch, PlayerStats};
use crate::normalize::normalize_name;

use super::{calculate_average, calculate_rate, player_matches, rate_metrics};

/// Re-orient a match so that "scored" is the player's side.
///
/// `normalized` must already be passed through [`normalize_name`]. When the
/// player is not the home side they are taken to be the away side.
pub fn perspective(m: &HistoryMatch, normalized: &str) -> PerspectiveMatch {
    let is_home = normalize_name(&m.home_player) == normalized;
    let (scored_ft, conceded_ft, scored_ht, conceded_ht) = if is_home {
        (
            m.score_home,
            m.score_away,
            m.halftime_score_home,
            m.halftime_score_away,
        )
    } else {
        (
            m.score_away,
            m.score_home,
            m.halftime_score_away,
            m.halftime_score_home,
        )
    };

    PerspectiveMatch {
        record: m.clone(),
        result: MatchOutcome::from_goals(scored_ft, conceded_ft),
        scored_ft,
        conceded_ft,
        scored_ht,
        conceded_ht,
    }
}

fn goal_lines(goals: &[u32]) -> GoalLines {
    let share = |at_least: u32| calculate_rate(goals.iter().filter(|&&g| g >= at_least).count(), goals.len());
    GoalLines {
        over05: share(1),
        over15: share(2),
        over25: share(3),
        over35: share(4),
    }
}

/// Statistics for one player over their `limit` most recent matches.
///
/// A player with no matches gets all-zero statistics.
pub fn player_stats(name: &str, history: &[HistoryMatch], limit: usize) -> PlayerStats {
    let target = normalize_name(name);
    let all = player_matches(name, history);
    let window: Vec<&HistoryMatch> = all.iter().take(limit).copied().collect();

    if window.is_empty() {
        return PlayerStats::empty(name);
    }

    let recent: Vec<PerspectiveMatch> = window.iter().map(|m| perspective(m, &target)).collect();
    let played = recent.len();

    let count = |outcome: MatchOutcome| recent.iter().filter(|p| p.result == outcome).count();
    let wins = count(MatchOutcome::Win);
    let draws = count(MatchOutcome::Draw);
    let losses = count(MatchOutcome::Loss);

    let sum = |f: fn(&PerspectiveMatch) -> u32| recent.iter().map(f).sum::<u32>();

    let scored_ht: Vec<u32> = recent.iter().map(|p| p.scored_ht).collect();
    let scored_ft: Vec<u32> = recent.iter().map(|p| p.scored_ft).collect();

    PlayerStats {
        name: name.to_string(),
        matches_played: played as u32,
        total_matches: all.len() as u32,
        wins: wins as u32,
        draws: draws as u32,
        losses: losses as u32,
        win_rate: calculate_rate(wins, played),
        draw_rate: calculate_rate(draws, played),
        last5: recent.iter().take(5).map(|p| p.result).collect(),
        rates: rate_metrics(&window),
        avg_goals_scored_ht: calculate_average(sum(|p| p.scored_ht), played),
        avg_goals_scored_ft: calculate_average(sum(|p| p.scored_ft), played),
        avg_goals_conceded_ht: calculate_average(sum(|p| p.conceded_ht), played),
        avg_goals_conceded_ft: calculate_average(sum(|p| p.conceded_ft), played),
        ht_goal_lines: goal_lines(&scored_ht),
        ft_goal_lines: goal_lines(&scored_ft),
        recent_matches: recent,
    }
}
