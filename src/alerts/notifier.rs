//! Outbound notifier seam.
//!
//! The engine only decides whether to notify. Transport and retries belong to
//! the [`Notifier`] implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{ConfidenceBand, LiveEvent, SignalMetrics, StrategyKey, StrategySignal};
use crate::normalize::league_display_name;

/// Errors a notifier may report.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notifier transport failed: {0}")]
    Transport(String),

    #[error("Notifier rejected alert: {0}")]
    Rejected(String),
}

/// Payload handed to the notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundAlert {
    pub event: LiveEvent,
    pub strategy_key: StrategyKey,
    pub metrics: SignalMetrics,
    pub confidence: u8,
}

impl OutboundAlert {
    pub fn new(event: &LiveEvent, signal: &StrategySignal) -> Self {
        Self {
            event: event.clone(),
            strategy_key: signal.key,
            metrics: signal.metrics,
            confidence: signal.confidence,
        }
    }
}

/// Delivers alerts somewhere outside the process.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier identifier for logging.
    fn name(&self) -> &str;

    async fn notify(&self, alert: &OutboundAlert) -> Result<(), NotifyError>;
}

/// What to back for a strategy.
pub fn suggestion(key: StrategyKey, event: &LiveEvent) -> String {
    match key {
        StrategyKey::HtPro => "OVER 0.5 HT goals (first half)".to_string(),
        StrategyKey::FtPro => "OVER 2.5 FT goals (match)".to_string(),
        StrategyKey::BttsProHt => "BOTH TEAMS TO SCORE HT (first half)".to_string(),
        StrategyKey::BttsProFt => "BOTH TEAMS TO SCORE FT (match)".to_string(),
        StrategyKey::CasaPro => format!("WIN: {}", event.home_player),
        StrategyKey::ForaPro => format!("WIN: {}", event.away_player),
        StrategyKey::CasaEnginePro => format!("OVER 1.5 goals: {}", event.home_player),
        StrategyKey::ForaEnginePro => format!("OVER 1.5 goals: {}", event.away_player),
        StrategyKey::TopClash => "BOTH TEAMS TO SCORE / OVER 2.5 FT".to_string(),
        StrategyKey::None => "Check the available markets".to_string(),
    }
}

/// Render the human-readable alert text.
pub fn format_alert_message(alert: &OutboundAlert) -> String {
    let event = &alert.event;
    let band = ConfidenceBand::from_score(alert.confidence);

    let mut message = format!(
        "SIGNAL CONFIRMED\n\n\
         League: {}\n\
         Match: {} vs {}\n\
         Strategy: {}\n\
         Confidence: {}% {}\n\n\
         Time: {}\n\
         Score: {} - {}\n\n\
         Indicators:\n\
         - Over 0.5 HT: {:.0}%\n\
         - Over 2.5 FT: {:.0}%\n\
         - Both teams score: {:.0}%\n\n\
         Suggestion: {}",
        league_display_name(&event.league_name),
        event.home_player,
        event.away_player,
        alert.strategy_key.label(),
        alert.confidence,
        band.marker(),
        event.timer.formatted,
        event.score.home,
        event.score.away,
        alert.metrics.ht05,
        alert.metrics.ft25,
        alert.metrics.ft_btts,
        suggestion(alert.strategy_key, event),
    );

    if let Some(id) = &event.bet365_event_id {
        message.push_str(&format!("\n\nEvent: #/IP/EV{}", id));
    }

    message
}

/// Notifier that writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, alert: &OutboundAlert) -> Result<(), NotifyError> {
        info!(
            event_id = %alert.event.id,
            strategy = %alert.strategy_key,
            confidence = alert.confidence,
            "\n{}",
            format_alert_message(alert)
        );
        Ok(())
    }
}
