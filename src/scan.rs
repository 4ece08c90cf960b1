//! Live scan loop.
//!
//! Each pass classifies every live event against the current history, offers
//! the signals to the alert gate and hands emitted alerts to the notifier.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::alerts::{AlertDecision, AlertGate, Notifier, OutboundAlert};
use crate::models::{HistoryMatch, LiveEvent, StrategySignal};
use crate::storage::{load_history, load_live_events, StorageConfig, StorageError};
use crate::strategy::StrategyClassifier;

/// Errors that can occur during a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// What happened to an emitted alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Sent,
    Suppressed,
    Failed,
}

/// One live event with its signal.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedEvent {
    pub event: LiveEvent,
    pub signal: StrategySignal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertStatus>,
}

/// Counts for one scan pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub events: usize,
    pub signals: usize,
    pub sent: usize,
    pub suppressed: usize,
    pub failed: usize,
}

impl ScanSummary {
    pub fn from_events(analyzed: &[AnalyzedEvent]) -> Self {
        let count = |status: AlertStatus| analyzed.iter().filter(|a| a.alert == Some(status)).count();
        Self {
            events: analyzed.len(),
            signals: analyzed.iter().filter(|a| !a.signal.is_none()).count(),
            sent: count(AlertStatus::Sent),
            suppressed: count(AlertStatus::Suppressed),
            failed: count(AlertStatus::Failed),
        }
    }
}

/// Drives classification and alerting for the live feed.
pub struct LiveScanner {
    classifier: StrategyClassifier,
    gate: AlertGate,
    notifier: Arc<dyn Notifier>,
    alerts_enabled: bool,
}

impl LiveScanner {
    pub fn new(classifier: StrategyClassifier, gate: AlertGate, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            classifier,
            gate,
            notifier,
            alerts_enabled: true,
        }
    }

    /// Builder method to turn notifications off; signals are still computed.
    pub fn with_alerts(mut self, enabled: bool) -> Self {
        self.alerts_enabled = enabled;
        self
    }

    pub fn gate(&self) -> &AlertGate {
        &self.gate
    }

    /// Classify every event and notify on the ones the gate lets through.
    ///
    /// A failing notifier is logged and the scan carries on.
    pub async fn scan(&mut self, history: &[HistoryMatch], events: &[LiveEvent]) -> Vec<AnalyzedEvent> {
        let mut analyzed: Vec<AnalyzedEvent> = events
            .iter()
            .map(|event| AnalyzedEvent {
                event: event.clone(),
                signal: self.classifier.classify_event(event, history),
                alert: None,
            })
            .collect();

        if !self.alerts_enabled {
            return analyzed;
        }

        self.gate.evict_expired();

        for item in analyzed.iter_mut() {
            match self.gate.check(&item.event.id, &item.signal) {
                AlertDecision::Emit { .. } => {
                    let alert = OutboundAlert::new(&item.event, &item.signal);
                    item.alert = Some(match self.notifier.notify(&alert).await {
                        Ok(()) => AlertStatus::Sent,
                        Err(e) => {
                            warn!(
                                notifier = self.notifier.name(),
                                event_id = %item.event.id,
                                "Failed to send alert: {}",
                                e
                            );
                            AlertStatus::Failed
                        }
                    });
                }
                AlertDecision::Suppressed { .. } => item.alert = Some(AlertStatus::Suppressed),
                AlertDecision::BelowThreshold | AlertDecision::NoSignal => {}
            }
        }

        analyzed
    }

    /// Reload both payloads from disk and scan once.
    pub async fn scan_files(&mut self, storage: &StorageConfig) -> Result<Vec<AnalyzedEvent>, ScanError> {
        let history = load_history(storage)?;
        let events = load_live_events(storage)?;
        Ok(self.scan(&history, &events).await)
    }

    /// Scan on a fixed interval until Ctrl-C.
    ///
    /// A failed pass is logged and retried on the next tick.
    pub async fn run_periodic(mut self, storage: StorageConfig, every: Duration) {
        let mut ticker = interval(every);

        info!("Starting live scan every {:?}", every);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Live scan stopped");
                    break;
                }
            }

            match self.scan_files(&storage).await {
                Ok(analyzed) => {
                    let summary = ScanSummary::from_events(&analyzed);
                    info!(
                        events = summary.events,
                        signals = summary.signals,
                        sent = summary.sent,
                        suppressed = summary.suppressed,
                        failed = summary.failed,
                        "Live scan completed"
                    );
                }
                Err(e) => {
                    error!("Live scan failed: {}", e);
                }
            }
        }
    }
}
