//! Record normalization.
//!
//! Turns raw upstream payloads into canonical [`HistoryMatch`] and
//! [`LiveEvent`] records. Every function here is pure: the caller supplies
//! the fallback timestamp instead of this module reading the clock.

pub mod league;
pub mod payload;
pub mod score_string;

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{HistoryMatch, LiveEvent, MatchTimer};
use payload::lenient_u32;

pub use payload::normalize_record;

pub use league::{canonical_league_name, league_display_name};
pub use score_string::{parse_score_string, summarize_parsed, ParsedScore, TooltipMetrics};

/// Comparison form of a player name: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn parenthesized() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((.*?)\)").expect("static regex"))
}

/// Player name from a display string, `"Team (Player)"` -> `"Player"`.
pub fn extract_player_name(raw: &str) -> String {
    parenthesized()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| raw.trim())
        .to_string()
}

/// Half-time pair that fits under the full-time pair.
///
/// Returns the pair unchanged when it already fits, the swapped pair when
/// only swapping makes it fit, and `None` when neither ordering is possible.
pub(crate) fn fit_halftime(full_time: (u32, u32), half_time: (u32, u32)) -> Option<(u32, u32)> {
    let fits = |ht: (u32, u32)| ht.0 <= full_time.0 && ht.1 <= full_time.1;
    if fits(half_time) {
        return Some(half_time);
    }
    let swapped = (half_time.1, half_time.0);
    fits(swapped).then_some(swapped)
}

/// The record array inside a payload envelope.
///
/// Accepts a bare array or an object wrapping it under `value`, `results`,
/// `data.results`, `data`, or `events`. Anything else yields no records.
pub fn extract_records(payload: &Value) -> &[Value] {
    fn as_slice(value: Option<&Value>) -> Option<&[Value]> {
        value.and_then(Value::as_array).map(Vec::as_slice)
    }

    if let Some(records) = payload.as_array() {
        return records;
    }

    as_slice(payload.get("value"))
        .or_else(|| as_slice(payload.get("results")))
        .or_else(|| as_slice(payload.get("data").and_then(|d| d.get("results"))))
        .or_else(|| as_slice(payload.get("data")))
        .or_else(|| as_slice(payload.get("events")))
        .unwrap_or(&[])
}

/// Normalize a history payload.
///
/// Records that do not yield both player names are dropped without failing
/// the batch. A half-time score that cannot fit under the full-time score is
/// clamped. `fallback` is used for records with no usable timestamp.
pub fn normalize_history(payload: &Value, fallback: DateTime<Utc>) -> Vec<HistoryMatch> {
    let records = extract_records(payload);
    let matches: Vec<HistoryMatch> = records
        .iter()
        .filter_map(|record| normalize_record(record, fallback))
        .collect();

    let dropped = records.len() - matches.len();
    if dropped > 0 {
        debug!(
            "Dropped {} of {} history records during normalization",
            dropped,
            records.len()
        );
    }

    matches
}

/// Drop repeated matches, keeping the first occurrence.
///
/// Overlapping upstream pages return the same match more than once.
pub fn dedup_matches(matches: Vec<HistoryMatch>) -> Vec<HistoryMatch> {
    let mut seen = HashSet::new();
    let before = matches.len();
    let unique: Vec<HistoryMatch> = matches
        .into_iter()
        .filter(|m| seen.insert(m.match_id()))
        .collect();

    if unique.len() < before {
        debug!("Removed {} duplicate matches", before - unique.len());
    }
    unique
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamLiveScore {
    #[serde(default, deserialize_with = "lenient_u32")]
    home: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    away: u32,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamTimer {
    #[serde(default, deserialize_with = "lenient_u32")]
    minute: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    second: u32,
}

/// Live feed record, in either camel-case or snake-case field naming.
#[derive(Debug, Deserialize)]
struct UpstreamLiveEvent {
    id: Value,

    #[serde(default, alias = "leagueName")]
    league_name: Option<String>,

    #[serde(alias = "homePlayer")]
    home_player: String,

    #[serde(alias = "awayPlayer")]
    away_player: String,

    #[serde(default)]
    score: Option<UpstreamLiveScore>,

    #[serde(default)]
    timer: Option<UpstreamTimer>,

    #[serde(default = "default_is_live", alias = "isLive")]
    is_live: bool,

    #[serde(default, alias = "homeTeamName", alias = "homeTeam")]
    home_team: Option<String>,

    #[serde(default, alias = "awayTeamName", alias = "awayTeam")]
    away_team: Option<String>,

    #[serde(default, alias = "bet365EventId")]
    bet365_event_id: Option<Value>,
}

fn default_is_live() -> bool {
    true
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl UpstreamLiveEvent {
    fn into_live_event(self) -> Option<LiveEvent> {
        let id = id_string(&self.id)?;
        let home_player = extract_player_name(&self.home_player);
        let away_player = extract_player_name(&self.away_player);
        if home_player.is_empty() || away_player.is_empty() {
            return None;
        }

        let score = self.score.unwrap_or_default();
        let timer = self.timer.unwrap_or_default();

        let mut event = LiveEvent::new(
            id,
            self.league_name.unwrap_or_default().trim(),
            home_player,
            away_player,
        )
        .with_score(score.home, score.away)
        .with_timer(MatchTimer::new(timer.minute, timer.second));

        event.is_live = self.is_live;
        event.home_team = self.home_team.filter(|t| !t.trim().is_empty());
        event.away_team = self.away_team.filter(|t| !t.trim().is_empty());
        event.bet365_event_id = self.bet365_event_id.as_ref().and_then(id_string);
        Some(event)
    }
}

/// Normalize a live feed payload into point-in-time event snapshots.
///
/// Uses the same envelope rules as [`normalize_history`].
pub fn normalize_live_events(payload: &Value) -> Vec<LiveEvent> {
    let records = extract_records(payload);
    let events: Vec<LiveEvent> = records
        .iter()
        .filter_map(|record| {
            serde_json::from_value::<UpstreamLiveEvent>(record.clone())
                .ok()
                .and_then(UpstreamLiveEvent::into_live_event)
        })
        .collect();

    if events.len() < records.len() {
        debug!(
            "Dropped {} of {} live records during normalization",
            records.len() - events.len(),
            records.len()
        );
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LiveScore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fallback() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn results_record(home: &str, away: &str, time: &str) -> Value {
        json!({
            "player_home_name": home,
            "player_away_name": away,
            "total_goals_home": 2,
            "total_goals_away": 1,
            "ht_goals_home": 1,
            "ht_goals_away": 0,
            "time": time,
            "league_name": "Battle 8m"
        })
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  NeO "), "neo");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_extract_player_name() {
        assert_eq!(extract_player_name("Arsenal (Neo)"), "Neo");
        assert_eq!(extract_player_name("  Zion  "), "Zion");
        assert_eq!(extract_player_name("Arsenal ( Neo )"), "Neo");
        assert_eq!(extract_player_name("Arsenal ()"), "Arsenal ()");
        assert_eq!(extract_player_name(""), "");
    }

    #[test]
    fn test_fit_halftime() {
        assert_eq!(fit_halftime((2, 1), (1, 1)), Some((1, 1)));
        assert_eq!(fit_halftime((1, 3), (2, 0)), Some((0, 2)));
        assert_eq!(fit_halftime((1, 1), (3, 0)), None);
    }

    #[test]
    fn test_envelopes() {
        let record = results_record("Neo", "Zion", "2025-06-15T10:00:00Z");
        let payloads = vec![
            json!([record.clone()]),
            json!({ "value": [record.clone()] }),
            json!({ "results": [record.clone()] }),
            json!({ "data": { "results": [record.clone()] } }),
            json!({ "data": [record.clone()] }),
            json!({ "events": [record.clone()] }),
        ];

        for payload in payloads {
            assert_eq!(normalize_history(&payload, fallback()).len(), 1, "{}", payload);
        }

        assert!(normalize_history(&json!({ "value": "nope" }), fallback()).is_empty());
        assert!(normalize_history(&Value::Null, fallback()).is_empty());
    }

    #[test]
    fn test_malformed_records_do_not_abort_batch() {
        let payload = json!([
            results_record("Neo", "Zion", "2025-06-15T10:00:00Z"),
            { "player_home_name": "Ghost" },
            "not even an object",
            results_record("Trinity", "Morpheus", "2025-06-15T11:00:00Z"),
        ]);

        let matches = normalize_history(&payload, fallback());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].home_player, "Trinity");
    }

    #[test]
    fn test_records_with_both_names_survive() {
        let payload = json!([
            {
                "homeTeam": "Neo",
                "awayTeam": "Zion",
                "home_score_ft": 3,
                "away_score_ft": 1,
                "home_score_ht": 1,
                "away_score_ht": 0,
                "time": "2025-06-15T10:00:00Z"
            },
            {
                "player_home_name": "Trinity",
                "player_away_name": "Morpheus",
                "total_goals_home": 2,
                "total_goals_away": 2,
                "league_name": 7
            },
            {
                "home": { "name": "Smith" },
                "away": { "name": "Oracle" },
                "score": { "home": 0, "away": 1 },
                "league": { "name": "GT Leagues" }
            },
        ]);

        let matches = normalize_history(&payload, fallback());
        assert_eq!(matches.len(), 3);
        assert_eq!((matches[0].score_home, matches[0].score_away), (3, 1));
        assert_eq!(matches[0].halftime_score_home, 1);
        assert_eq!(matches[1].home_player, "Trinity");
        assert_eq!(matches[2].league_name, "GT Leagues");
    }

    #[test]
    fn test_names_keep_case() {
        let payload = json!([results_record("  Arsenal (NeO) ", "ZION", "2025-06-15T10:00:00Z")]);
        let matches = normalize_history(&payload, fallback());
        assert_eq!(matches[0].home_player, "NeO");
        assert_eq!(matches[0].away_player, "ZION");
    }

    #[test]
    fn test_dedup_matches() {
        let payload = json!([
            results_record("Neo", "Zion", "2025-06-15T10:00:00Z"),
            results_record("Neo", "Zion", "2025-06-15T10:00:00Z"),
            results_record("Neo", "Zion", "2025-06-15T10:10:00Z"),
        ]);
        let matches = dedup_matches(normalize_history(&payload, fallback()));
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_normalize_live_events_camel_case() {
        let payload = json!({
            "events": [
                {
                    "id": "9001",
                    "leagueName": "E-Soccer - Battle - 8 minutos de jogo",
                    "homePlayer": "Arsenal (Neo)",
                    "awayPlayer": "Zion",
                    "homeTeamName": "Arsenal",
                    "score": { "home": 1, "away": "0" },
                    "timer": { "minute": 3, "second": 5, "formatted": "03:05" },
                    "isLive": true,
                    "bet365EventId": 123456
                },
                { "id": 2, "homePlayer": "Solo" }
            ]
        });

        let events = normalize_live_events(&payload);
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, "9001");
        assert_eq!(event.home_player, "Neo");
        assert_eq!(event.score, LiveScore { home: 1, away: 0 });
        assert_eq!(event.timer.formatted, "03:05");
        assert_eq!(event.home_team.as_deref(), Some("Arsenal"));
        assert_eq!(event.bet365_event_id.as_deref(), Some("123456"));
    }

    #[test]
    fn test_normalize_live_events_reads_own_output() {
        let event = LiveEvent::new("7", "GT", "Neo", "Zion").with_score(2, 2);
        let payload = serde_json::to_value(vec![event.clone()]).unwrap();
        assert_eq!(normalize_live_events(&payload), vec![event]);
    }
}
