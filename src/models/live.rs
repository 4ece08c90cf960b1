//! Point-in-time snapshot of a match in play.

use serde::{Deserialize, Serialize};

/// Current score of a live match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveScore {
    pub home: u32,
    pub away: u32,
}

/// Elapsed match clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTimer {
    pub minute: u32,
    pub second: u32,
    pub formatted: String,
}

impl MatchTimer {
    pub fn new(minute: u32, second: u32) -> Self {
        Self {
            minute,
            second,
            formatted: format!("{:02}:{:02}", minute, second),
        }
    }
}

/// A live event as seen by one poll of the live feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEvent {
    pub id: String,
    pub league_name: String,
    pub home_player: String,
    pub away_player: String,
    pub score: LiveScore,
    pub timer: MatchTimer,
    pub is_live: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team: Option<String>,

    /// Bookmaker event reference, used for deep links in notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet365_event_id: Option<String>,
}

impl LiveEvent {
    pub fn new(
        id: impl Into<String>,
        league_name: impl Into<String>,
        home_player: impl Into<String>,
        away_player: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            league_name: league_name.into(),
            home_player: home_player.into(),
            away_player: away_player.into(),
            score: LiveScore::default(),
            timer: MatchTimer::new(0, 0),
            is_live: true,
            home_team: None,
            away_team: None,
            bet365_event_id: None,
        }
    }

    /// Builder method to set the current score.
    pub fn with_score(mut self, home: u32, away: u32) -> Self {
        self.score = LiveScore { home, away };
        self
    }

    /// Builder method to set the match clock.
    pub fn with_timer(mut self, timer: MatchTimer) -> Self {
        self.timer = timer;
        self
    }
}
