//! Live strategy classifier.
//!
//! Turns two players' rolling statistics into exactly one named strategy
//! signal with a confidence score:
//!
//! 1. Both windows are synchronized to the shorter history (at most
//!    [`MAX_SYNC_LIMIT`] matches) so a deep history is never compared with a
//!    shallow one.
//! 2. The optional league guard vetoes leagues that are scoring too little.
//! 3. The rule table in [`rules`] picks the first matching strategy.
//! 4. Confidence blends the players' form, the rule margin and an H2H bonus.
//!
//! Classification is pure and recomputed on every refresh.

pub mod backtest;
pub mod form;
pub mod rules;

pub use backtest::{strategy_hit, strategy_report, StrategyReportRow, StrategyTally};
pub use form::{form_score, FormScore, Trend};
pub use rules::{first_match, matching_rules, Condition, RuleInputs, RuleMatch};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculate::{count_player_matches, h2h_stats, league_sample, player_stats, rate_metrics};
use crate::models::{HistoryMatch, LiveEvent, SignalMetrics, StrategyKey, StrategySignal};

/// Cap on the synchronized player window.
pub const MAX_SYNC_LIMIT: usize = 5;

/// Smallest synchronized window a strategy is classified on.
pub const MIN_CLASSIFY_SAMPLE: usize = 3;

/// League guard only applies to leagues with at least this many matches.
pub const LEAGUE_GUARD_MIN_GAMES: usize = 10;

/// Most recent league matches the guard looks at.
pub const LEAGUE_GUARD_SAMPLE: usize = 15;

pub const LEAGUE_GUARD_MAX_HT_SCORELESS: f64 = 35.0;
pub const LEAGUE_GUARD_MAX_FT_SCORELESS: f64 = 25.0;
pub const LEAGUE_GUARD_MIN_FT_OVER25: f64 = 45.0;

/// Mutual meetings needed before the H2H bonus applies.
pub const H2H_MIN_MEETINGS: u32 = 2;
pub const H2H_BONUS: f64 = 10.0;
pub const H2H_MIN_WIN_PROB: f64 = 60.0;
pub const H2H_MIN_HT_GOALS: f64 = 1.5;

/// Points per form point. Form carries up to 80 of the 100 points: the
/// rules decide whether a match-up qualifies, form decides how far to trust
/// the players to repeat it.
pub const FORM_WEIGHT: f64 = 0.8;

/// Points for clearing every threshold with full headroom. A rule that only
/// just passes adds nothing, so with perfect form it still scores 80.
pub const MARGIN_WEIGHT: f64 = 20.0;

/// Confidence from the mean form (0 to 100), the rule margin (0 to 1) and
/// any H2H bonus, clamped to 0..=100.
pub fn blend_confidence(form: f64, margin: f64, bonus: f64) -> u8 {
    let raw = FORM_WEIGHT * form + MARGIN_WEIGHT * margin + bonus;
    raw.clamp(0.0, 100.0).round() as u8
}

/// Shared window for two players.
///
/// Never below 1, even when one side has no history.
pub fn sync_limit(count1: usize, count2: usize) -> usize {
    count1.min(count2).min(MAX_SYNC_LIMIT).max(1)
}

fn default_league_guard() -> bool {
    false
}

/// Classifier options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Veto leagues with a low scoring profile
    #[serde(default = "default_league_guard")]
    pub league_guard: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            league_guard: default_league_guard(),
        }
    }
}

/// Live strategy classifier.
#[derive(Debug, Clone, Default)]
pub struct StrategyClassifier {
    config: ClassifierConfig,
}

impl StrategyClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a live event against the history.
    pub fn classify_event(&self, event: &LiveEvent, history: &[HistoryMatch]) -> StrategySignal {
        self.classify(
            &event.home_player,
            &event.away_player,
            Some(&event.league_name),
            history,
        )
    }

    /// Classify a match-up between `home` and `away`.
    ///
    /// `league` is only consulted by the league guard.
    pub fn classify(
        &self,
        home: &str,
        away: &str,
        league: Option<&str>,
        history: &[HistoryMatch],
    ) -> StrategySignal {
        let window = sync_limit(
            count_player_matches(home, history),
            count_player_matches(away, history),
        );

        if self.config.league_guard {
            if let Some(reason) = league.and_then(|l| league_guard(l, history)) {
                debug!(home, away, reason = %reason, "League guard vetoed match");
                return none_with_reason(window, reason);
            }
        }

        if window < MIN_CLASSIFY_SAMPLE {
            return none_with_reason(
                window,
                format!("insufficient history ({} of {} matches)", window, MIN_CLASSIFY_SAMPLE),
            );
        }

        let p1 = player_stats(home, history, window);
        let p2 = player_stats(away, history, window);
        let inputs = RuleInputs::new(&p1, &p2);
        let metrics = SignalMetrics {
            ht05: inputs.combined.ht05,
            ft25: inputs.combined.ft25,
            ft_btts: inputs.combined.ft_btts,
        };

        let Some(rule) = first_match(&inputs) else {
            return StrategySignal {
                metrics,
                ..StrategySignal::none(window)
            };
        };

        let form1 = form_score(&p1);
        let form2 = form_score(&p2);
        let form = (form1.score + form2.score) as f64 / 2.0;

        let mut reasons = rule.reasons();
        let mut bonus = 0.0;

        let h2h = h2h_stats(home, away, history, None);
        if h2h.count >= H2H_MIN_MEETINGS {
            if rule.key.is_home_side() && h2h.p1_win_prob >= H2H_MIN_WIN_PROB {
                bonus += H2H_BONUS;
                reasons.push(format!("H2H favours the home side ({:.0}% wins)", h2h.p1_win_prob));
            }
            let h2h_ht_goals = h2h.p1_avg_goals_ht + h2h.p2_avg_goals_ht;
            if rule.key == StrategyKey::HtPro && h2h_ht_goals >= H2H_MIN_HT_GOALS {
                bonus += H2H_BONUS;
                reasons.push(format!("H2H averages {:.2} HT goals", h2h_ht_goals));
            }
        }

        for (name, f) in [(home, form1), (away, form2)] {
            if f.cooling() {
                reasons.push(format!("{} scoring is cooling", name));
            }
        }

        let confidence = blend_confidence(form, rule.margin(), bonus);

        debug!(
            home,
            away,
            key = %rule.key,
            confidence,
            form,
            margin = rule.margin(),
            "Classified match"
        );

        StrategySignal {
            key: rule.key,
            confidence,
            reasons,
            sample_size: window,
            metrics,
        }
    }
}

fn none_with_reason(window: usize, reason: String) -> StrategySignal {
    StrategySignal {
        reasons: vec![reason],
        ..StrategySignal::none(window)
    }
}

/// Reason the league's recent scoring vetoes classification, if any.
fn league_guard(league: &str, history: &[HistoryMatch]) -> Option<String> {
    let games = league_sample(league, history, usize::MAX);
    if games.len() < LEAGUE_GUARD_MIN_GAMES {
        return None;
    }

    let sample = &games[..games.len().min(LEAGUE_GUARD_SAMPLE)];
    let metrics = rate_metrics(sample);

    if metrics.ht0x0 > LEAGUE_GUARD_MAX_HT_SCORELESS {
        Some(format!("league guard: HT 0-0 rate {:.0}%", metrics.ht0x0))
    } else if metrics.ft0x0 > LEAGUE_GUARD_MAX_FT_SCORELESS {
        Some(format!("league guard: FT 0-0 rate {:.0}%", metrics.ft0x0))
    } else if metrics.ft25 < LEAGUE_GUARD_MIN_FT_OVER25 {
        Some(format!("league guard: FT over 2.5 rate {:.0}%", metrics.ft25))
    } else {
        None
    }
}
