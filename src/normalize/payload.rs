//! Upstream record shapes and their conversion into [`HistoryMatch`].
//!
//! Every known upstream shape is one variant of [`UpstreamMatch`]. Serde
//! picks the first variant whose player-name fields are present; every other
//! field is optional and a mistyped value reads as missing. Values a shape
//! does not carry are then looked up across the other shapes' keys, so a
//! record mixing key families keeps its scores. A record that fits no shape
//! still normalizes when both player names can be found that way.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::league::canonical_league_name;
use super::{extract_player_name, fit_halftime};
use crate::models::HistoryMatch;

const HOME_NAME_KEYS: [&str; 5] = ["homeTeam", "home_player", "player_home_name", "player_name_1", "home"];
const AWAY_NAME_KEYS: [&str; 5] = ["awayTeam", "away_player", "player_away_name", "player_name_2", "away"];
const HOME_FT_KEYS: [&str; 4] = ["homeFT", "home_score_ft", "total_goals_home", "score_home"];
const AWAY_FT_KEYS: [&str; 4] = ["awayFT", "away_score_ft", "total_goals_away", "score_away"];
const HOME_HT_KEYS: [&str; 4] = ["homeHT", "home_score_ht", "ht_goals_home", "halftime_score_home"];
const AWAY_HT_KEYS: [&str; 4] = ["awayHT", "away_score_ht", "ht_goals_away", "halftime_score_away"];
const LEAGUE_KEYS: [&str; 3] = ["league", "league_name", "competition"];
const TIME_KEYS: [&str; 5] = ["matchTime", "time", "data_realizacao", "startTime", "start_time"];
const HOME_TEAM_KEYS: [&str; 3] = ["homeClub", "home_team", "player_home_team_name"];
const AWAY_TEAM_KEYS: [&str; 3] = ["awayClub", "away_team", "player_away_team_name"];

/// One upstream match record in any of the known shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamMatch {
    /// Our own serialized `HistoryMatch` (re-reading normalized output)
    Canonical(CanonicalRecord),

    /// Provider shape with nested `home`/`away`/`score`/`scoreHT` objects
    Provider(ProviderRecord),

    /// Flat camel-case feed (`homeTeam`, `homeFT`, ...)
    Feed(FeedRecord),

    /// Paginated "results" shape with flat snake-case score fields
    Results(ResultsRecord),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalRecord {
    pub home_player: String,
    pub away_player: String,

    #[serde(default, deserialize_with = "lenient_name")]
    pub league_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_goals")]
    pub score_home: Option<u32>,
    #[serde(default, deserialize_with = "lenient_goals")]
    pub score_away: Option<u32>,
    #[serde(default, deserialize_with = "lenient_goals")]
    pub halftime_score_home: Option<u32>,
    #[serde(default, deserialize_with = "lenient_goals")]
    pub halftime_score_away: Option<u32>,

    #[serde(default)]
    pub data_realizacao: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub home_team: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub away_team: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSide {
    #[serde(alias = "player")]
    pub name: String,

    #[serde(default, alias = "teamName", alias = "team", deserialize_with = "lenient")]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderScore {
    #[serde(default, deserialize_with = "lenient_goals")]
    pub home: Option<u32>,
    #[serde(default, deserialize_with = "lenient_goals")]
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRecord {
    pub home: ProviderSide,
    pub away: ProviderSide,

    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<ProviderScore>,

    #[serde(default, rename = "scoreHT", alias = "score_ht", deserialize_with = "lenient")]
    pub score_ht: Option<ProviderScore>,

    /// League as a string or a `{ "name": .. }` object
    #[serde(default, deserialize_with = "lenient_name")]
    pub league: Option<String>,

    #[serde(default, deserialize_with = "lenient_name")]
    pub competition: Option<String>,

    #[serde(default, rename = "startTime", alias = "start_time")]
    pub start_time: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedRecord {
    #[serde(rename = "homeTeam")]
    pub home_team: String,
    #[serde(rename = "awayTeam")]
    pub away_team: String,

    #[serde(default, rename = "homeFT", deserialize_with = "lenient_goals")]
    pub home_ft: Option<u32>,
    #[serde(default, rename = "awayFT", deserialize_with = "lenient_goals")]
    pub away_ft: Option<u32>,
    #[serde(default, rename = "homeHT", deserialize_with = "lenient_goals")]
    pub home_ht: Option<u32>,
    #[serde(default, rename = "awayHT", deserialize_with = "lenient_goals")]
    pub away_ht: Option<u32>,

    #[serde(default, rename = "homeClub", deserialize_with = "lenient")]
    pub home_club: Option<String>,
    #[serde(default, rename = "awayClub", deserialize_with = "lenient")]
    pub away_club: Option<String>,

    #[serde(default, deserialize_with = "lenient_name")]
    pub league: Option<String>,

    #[serde(default, rename = "matchTime")]
    pub match_time: Option<Value>,

    /// Split date/time pair some feed pages use instead of `matchTime`
    #[serde(default, deserialize_with = "lenient")]
    pub match_date: Option<String>,
    #[serde(default, rename = "match_time", deserialize_with = "lenient")]
    pub match_clock: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsRecord {
    #[serde(alias = "player_name_1")]
    pub player_home_name: String,
    #[serde(alias = "player_name_2")]
    pub player_away_name: String,

    #[serde(default, alias = "home_score_ft", deserialize_with = "lenient_goals")]
    pub total_goals_home: Option<u32>,
    #[serde(default, alias = "away_score_ft", deserialize_with = "lenient_goals")]
    pub total_goals_away: Option<u32>,
    #[serde(default, alias = "home_score_ht", deserialize_with = "lenient_goals")]
    pub ht_goals_home: Option<u32>,
    #[serde(default, alias = "away_score_ht", deserialize_with = "lenient_goals")]
    pub ht_goals_away: Option<u32>,

    #[serde(default)]
    pub time: Option<Value>,

    #[serde(default, deserialize_with = "lenient_name")]
    pub league_name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub player_home_team_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub player_away_team_name: Option<String>,
}

/// Fields common to every shape once pulled out of the raw record.
struct Extracted {
    home_player: String,
    away_player: String,
    league: Option<String>,
    full_time: (Option<u32>, Option<u32>),
    half_time: (Option<u32>, Option<u32>),
    played_at: Option<DateTime<Utc>>,
    home_team: Option<String>,
    away_team: Option<String>,
}

/// Normalize one raw upstream record.
///
/// Returns `None` only when the record does not yield both player names.
/// `fallback` stands in for a missing or unparseable timestamp.
pub fn normalize_record(record: &Value, fallback: DateTime<Utc>) -> Option<HistoryMatch> {
    let extracted = match UpstreamMatch::deserialize(record) {
        Ok(shape) => shape.extract(),
        Err(_) => Extracted::from_raw(record)?,
    };
    extracted.fill_from(record).build(fallback)
}

impl UpstreamMatch {
    fn extract(self) -> Extracted {
        match self {
            UpstreamMatch::Canonical(r) => r.extract(),
            UpstreamMatch::Provider(r) => r.extract(),
            UpstreamMatch::Feed(r) => r.extract(),
            UpstreamMatch::Results(r) => r.extract(),
        }
    }
}

impl CanonicalRecord {
    fn extract(self) -> Extracted {
        Extracted {
            home_player: self.home_player,
            away_player: self.away_player,
            league: self.league_name,
            full_time: (self.score_home, self.score_away),
            half_time: (self.halftime_score_home, self.halftime_score_away),
            played_at: self.data_realizacao.as_ref().and_then(parse_timestamp),
            home_team: self.home_team,
            away_team: self.away_team,
        }
    }
}

impl ProviderRecord {
    fn extract(self) -> Extracted {
        let (ft_home, ft_away) = self.score.map_or((None, None), |s| (s.home, s.away));
        let (ht_home, ht_away) = self.score_ht.map_or((None, None), |s| (s.home, s.away));

        Extracted {
            home_player: self.home.name,
            away_player: self.away.name,
            league: self.league.or(self.competition),
            full_time: (ft_home, ft_away),
            half_time: (ht_home, ht_away),
            played_at: self.start_time.as_ref().and_then(parse_timestamp),
            home_team: self.home.team_name,
            away_team: self.away.team_name,
        }
    }
}

impl FeedRecord {
    fn extract(self) -> Extracted {
        let played_at = self
            .match_time
            .as_ref()
            .and_then(parse_timestamp)
            .or_else(|| match (&self.match_date, &self.match_clock) {
                (Some(date), Some(clock)) => parse_timestamp_str(&format!("{}T{}", date, clock)),
                (Some(date), None) => parse_timestamp_str(date),
                _ => None,
            });

        Extracted {
            home_player: self.home_team,
            away_player: self.away_team,
            league: self.league,
            full_time: (self.home_ft, self.away_ft),
            half_time: (self.home_ht, self.away_ht),
            played_at,
            home_team: self.home_club,
            away_team: self.away_club,
        }
    }
}

impl ResultsRecord {
    fn extract(self) -> Extracted {
        Extracted {
            home_player: self.player_home_name,
            away_player: self.player_away_name,
            league: self.league_name,
            full_time: (self.total_goals_home, self.total_goals_away),
            half_time: (self.ht_goals_home, self.ht_goals_away),
            played_at: self.time.as_ref().and_then(parse_timestamp),
            home_team: self.player_home_team_name,
            away_team: self.player_away_team_name,
        }
    }
}

/// First non-null value under any of `keys`.
fn first_present<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find(|value| !value.is_null())
}

fn goals_under(record: &Value, keys: &[&str]) -> Option<u32> {
    first_present(record, keys).map(|value| value_to_u32(value).unwrap_or(0))
}

fn name_under(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find_map(name_of)
        .filter(|name| !name.trim().is_empty())
}

impl Extracted {
    /// Build from loose keys when the record fits none of the shapes.
    fn from_raw(record: &Value) -> Option<Self> {
        Some(Self {
            home_player: name_under(record, &HOME_NAME_KEYS)?,
            away_player: name_under(record, &AWAY_NAME_KEYS)?,
            league: None,
            full_time: (None, None),
            half_time: (None, None),
            played_at: None,
            home_team: None,
            away_team: None,
        })
    }

    /// Fill anything the shape did not carry from the other shapes' keys.
    fn fill_from(mut self, record: &Value) -> Self {
        let (ft_home, ft_away) = self.full_time;
        let (ht_home, ht_away) = self.half_time;
        self.full_time = (
            ft_home.or_else(|| goals_under(record, &HOME_FT_KEYS)),
            ft_away.or_else(|| goals_under(record, &AWAY_FT_KEYS)),
        );
        self.half_time = (
            ht_home.or_else(|| goals_under(record, &HOME_HT_KEYS)),
            ht_away.or_else(|| goals_under(record, &AWAY_HT_KEYS)),
        );

        self.league = self.league.or_else(|| name_under(record, &LEAGUE_KEYS));
        self.played_at = self.played_at.or_else(|| {
            TIME_KEYS
                .iter()
                .filter_map(|key| record.get(key))
                .find_map(parse_timestamp)
        });
        self.home_team = self.home_team.or_else(|| name_under(record, &HOME_TEAM_KEYS));
        self.away_team = self.away_team.or_else(|| name_under(record, &AWAY_TEAM_KEYS));
        self
    }

    fn build(self, fallback: DateTime<Utc>) -> Option<HistoryMatch> {
        let home_player = extract_player_name(&self.home_player);
        let away_player = extract_player_name(&self.away_player);
        if home_player.is_empty() || away_player.is_empty() {
            return None;
        }

        let full_time = (self.full_time.0.unwrap_or(0), self.full_time.1.unwrap_or(0));
        let raw_half_time = (self.half_time.0.unwrap_or(0), self.half_time.1.unwrap_or(0));
        let half_time = fit_halftime(full_time, raw_half_time).unwrap_or_else(|| {
            let clamped = (raw_half_time.0.min(full_time.0), raw_half_time.1.min(full_time.1));
            warn!(
                home = %home_player,
                away = %away_player,
                ?full_time,
                ?raw_half_time,
                ?clamped,
                "Half-time score exceeds full-time, clamping"
            );
            clamped
        });

        let league = self
            .league
            .map(|l| canonical_league_name(l.trim()))
            .unwrap_or_default();

        Some(
            HistoryMatch::new(
                home_player,
                away_player,
                league,
                full_time,
                half_time,
                self.played_at.unwrap_or(fallback),
            )
            .with_teams(non_empty(self.home_team), non_empty(self.away_team)),
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Optional field that reads as `None` when missing, null, or mistyped.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let val: Option<Value> = Option::deserialize(deserializer)?;
    Ok(val.and_then(|v| serde_json::from_value(v).ok()))
}

/// A name given as a bare string or as a `{ "name": .. }` object.
fn lenient_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<Value> = Option::deserialize(deserializer)?;
    Ok(val.as_ref().and_then(name_of))
}

fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Goal count that is `None` when missing or null.
///
/// A present but non-numeric or negative value counts as 0.
fn lenient_goals<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<Value> = Option::deserialize(deserializer)?;
    Ok(val.map(|v| value_to_u32(&v).unwrap_or(0)))
}

/// Deserialize a goal count that may be a number, a numeric string, or null.
///
/// Anything missing, negative, or non-numeric becomes 0.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_goals(deserializer)?.unwrap_or(0))
}

fn value_to_u32(value: &Value) -> Option<u32> {
    let as_float = match value {
        Value::Number(n) => {
            if let Some(x) = n.as_u64() {
                return Some(x.min(u32::MAX as u64) as u32);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (as_float.is_finite() && as_float >= 0.0).then(|| as_float.min(u32::MAX as f64) as u32)
}

/// Parse a timestamp from a JSON string or epoch number.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        _ => None,
    }
}

/// Parse RFC 3339, naive ISO (taken as UTC), `YYYY-MM-DD HH:MM:SS`, a bare
/// date, or an epoch number in a string.
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }

    s.parse::<i64>().ok().and_then(from_epoch)
}

/// Epoch seconds or milliseconds, told apart by magnitude.
fn from_epoch(n: i64) -> Option<DateTime<Utc>> {
    if n.abs() >= 100_000_000_000 {
        Utc.timestamp_millis_opt(n).single()
    } else {
        Utc.timestamp_opt(n, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn convert(value: Value) -> Option<HistoryMatch> {
        normalize_record(&value, fallback())
    }

    #[test]
    fn test_results_shape() {
        let m = convert(json!({
            "id": 1,
            "player_home_name": "Neo",
            "player_away_name": "Zion",
            "player_home_team_name": "Arsenal",
            "total_goals_home": 3,
            "total_goals_away": "2",
            "ht_goals_home": 1,
            "ht_goals_away": null,
            "time": "2025-06-15T10:00:00Z",
            "league_name": "Esoccer Battle - 8 mins play"
        }))
        .unwrap();

        assert_eq!(m.home_player, "Neo");
        assert_eq!((m.score_home, m.score_away), (3, 2));
        assert_eq!((m.halftime_score_home, m.halftime_score_away), (1, 0));
        assert_eq!(m.league_name, "E-Soccer - Battle - 8 minutos de jogo");
        assert_eq!(m.home_team.as_deref(), Some("Arsenal"));
        assert_eq!(m.away_team, None);
        assert_eq!(m.played_at, Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_provider_shape() {
        let m = convert(json!({
            "id": 3027555,
            "score": { "home": 1, "away": 1 },
            "scoreHT": { "home": 0, "away": 1 },
            "competition": { "name": "Esoccer H2H GG League - 8 mins play" },
            "home": { "name": "demolishor", "teamName": "A.Madrid" },
            "away": { "name": "dart", "teamName": "Liverpool" },
            "startTime": "2026-02-16T12:57:00.000Z",
            "status": "ended"
        }))
        .unwrap();

        assert_eq!(m.home_player, "demolishor");
        assert_eq!(m.score_home, 1);
        assert_eq!(m.halftime_score_away, 1);
        assert_eq!(m.league_name, "E-Soccer - H2H GG League - 8 minutos de jogo");
        assert_eq!(m.away_team.as_deref(), Some("Liverpool"));
    }

    #[test]
    fn test_feed_shape_with_split_date() {
        let m = convert(json!({
            "homeTeam": "Arsenal (Neo)",
            "awayTeam": "Chelsea (Zion)",
            "homeFT": 2,
            "awayFT": 2,
            "homeHT": 1,
            "awayHT": 0,
            "league": "GT League",
            "match_date": "2025-06-15",
            "match_time": "10:30:00"
        }))
        .unwrap();

        assert_eq!(m.home_player, "Neo");
        assert_eq!(m.away_player, "Zion");
        assert_eq!(m.league_name, "E-Soccer - GT Leagues - 12 minutos de jogo");
        assert_eq!(m.played_at, Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_missing_scores_default_to_zero_and_timestamp_falls_back() {
        let m = convert(json!({
            "player_name_1": "Neo",
            "player_name_2": "Zion"
        }))
        .unwrap();

        assert_eq!(m.total_goals_ft(), 0);
        assert_eq!(m.total_goals_ht(), 0);
        assert_eq!(m.played_at, fallback());
        assert_eq!(m.league_name, "");
    }

    #[test]
    fn test_negative_and_garbage_numbers_become_zero() {
        let m = convert(json!({
            "player_home_name": "Neo",
            "player_away_name": "Zion",
            "total_goals_home": -2,
            "total_goals_away": "abc",
            "ht_goals_home": [],
        }))
        .unwrap();

        assert_eq!((m.score_home, m.score_away), (0, 0));
        assert_eq!(m.halftime_score_home, 0);
    }

    #[test]
    fn test_record_without_players_is_rejected() {
        assert!(serde_json::from_value::<UpstreamMatch>(json!({ "score_home": 3 })).is_err());
        assert!(convert(json!({ "score_home": 3 })).is_none());
        assert!(convert(json!({ "homeTeam": 7, "awayTeam": "Zion" })).is_none());
        assert!(convert(json!({ "player_home_name": "  ", "player_away_name": "Zion" })).is_none());
    }

    #[test]
    fn test_swapped_halftime_is_repaired() {
        let m = convert(json!({
            "home_player": "Neo",
            "away_player": "Zion",
            "score_home": 0,
            "score_away": 2,
            "halftime_score_home": 1,
            "halftime_score_away": 0,
        }))
        .unwrap();

        assert_eq!((m.halftime_score_home, m.halftime_score_away), (0, 1));
    }

    #[test]
    fn test_impossible_halftime_is_clamped() {
        let m = convert(json!({
            "home_player": "Neo",
            "away_player": "Zion",
            "score_home": 1,
            "score_away": 1,
            "halftime_score_home": 3,
            "halftime_score_away": 0,
        }))
        .unwrap();

        assert_eq!((m.score_home, m.score_away), (1, 1));
        assert_eq!((m.halftime_score_home, m.halftime_score_away), (1, 0));
    }

    #[test]
    fn test_mixed_key_families_keep_scores() {
        let m = convert(json!({
            "homeTeam": "Neo",
            "awayTeam": "Zion",
            "home_score_ft": 3,
            "away_score_ft": 1,
            "home_score_ht": 1,
            "away_score_ht": 0,
            "time": "2025-06-15T10:00:00Z",
            "league_name": "GT League"
        }))
        .unwrap();

        assert_eq!((m.score_home, m.score_away), (3, 1));
        assert_eq!((m.halftime_score_home, m.halftime_score_away), (1, 0));
        assert_eq!(m.played_at, Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap());
        assert_eq!(m.league_name, canonical_league_name("GT League"));
    }

    #[test]
    fn test_shape_scores_win_over_other_families() {
        let m = convert(json!({
            "homeTeam": "Neo",
            "awayTeam": "Zion",
            "homeFT": 2,
            "awayFT": 2,
            "score_home": 9,
            "home_score_ht": 1
        }))
        .unwrap();

        assert_eq!((m.score_home, m.score_away), (2, 2));
        assert_eq!(m.halftime_score_home, 1);
    }

    #[test]
    fn test_mistyped_league_keeps_record() {
        let m = convert(json!({
            "player_home_name": "Neo",
            "player_away_name": "Zion",
            "total_goals_home": 2,
            "total_goals_away": 0,
            "league_name": 7,
            "player_home_team_name": ["Arsenal"]
        }))
        .unwrap();

        assert_eq!((m.score_home, m.score_away), (2, 0));
        assert_eq!(m.league_name, "");
        assert_eq!(m.home_team, None);
    }

    #[test]
    fn test_provider_league_object() {
        let m = convert(json!({
            "home": { "name": "Neo", "teamName": 12 },
            "away": { "name": "Zion" },
            "score": { "home": 3, "away": 2 },
            "scoreHT": "2-1",
            "league": { "name": "GT Leagues" }
        }))
        .unwrap();

        assert_eq!(m.home_player, "Neo");
        assert_eq!((m.score_home, m.score_away), (3, 2));
        assert_eq!(m.total_goals_ht(), 0);
        assert_eq!(m.league_name, canonical_league_name("GT Leagues"));
        assert_eq!(m.home_team, None);
    }

    #[test]
    fn test_names_found_across_shapes() {
        let m = convert(json!({
            "home_player": "Neo",
            "awayTeam": "Chelsea (Zion)",
            "homeFT": 1,
            "away_score_ft": 4
        }))
        .unwrap();

        assert_eq!(m.home_player, "Neo");
        assert_eq!(m.away_player, "Zion");
        assert_eq!((m.score_home, m.score_away), (1, 4));
    }

    #[test]
    fn test_canonical_round_trip() {
        let original = HistoryMatch::new(
            "Neo",
            "Zion",
            "GT League",
            (2, 1),
            (1, 1),
            Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap(),
        );
        let value = serde_json::to_value(&original).unwrap();
        let mut expected = original.clone();
        expected.league_name = canonical_league_name("GT League");
        assert_eq!(convert(value).unwrap(), expected);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp_str("2025-06-15T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp_str("2025-06-15T13:00:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp_str("2025-06-15T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp_str("2025-06-15 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp_str("2025-06-15T10:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp(&json!(expected.timestamp())), Some(expected));
        assert_eq!(parse_timestamp(&json!(expected.timestamp_millis())), Some(expected));
        assert_eq!(parse_timestamp_str("yesterday"), None);
        assert_eq!(parse_timestamp(&Value::Null), None);
    }
}
