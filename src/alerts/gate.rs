//! Alert de-duplication gate.
//!
//! Keeps one expiry per `match_id:strategy_key` so a signal that stays on for
//! the whole match notifies once. State is in memory only; a restart re-arms
//! every key.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::models::{StrategyKey, StrategySignal};

/// Confidence a signal needs before it is considered for an alert.
pub const DEFAULT_MIN_CONFIDENCE: u8 = 80;

/// How long an emitted key stays suppressed.
pub const DEFAULT_ALERT_TTL_MINUTES: i64 = 120;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Outcome of offering a signal to the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDecision {
    /// Notify; the key is now suppressed until `expires_at`
    Emit { expires_at: DateTime<Utc> },

    /// Already notified and not yet expired
    Suppressed { expires_at: DateTime<Utc> },

    BelowThreshold,

    NoSignal,
}

impl AlertDecision {
    pub fn should_emit(&self) -> bool {
        matches!(self, AlertDecision::Emit { .. })
    }
}

/// Key under which a (match, strategy) pair is de-duplicated.
pub fn dedupe_key(match_id: &str, key: StrategyKey) -> String {
    format!("{}:{}", match_id, key)
}

/// In-memory alert gate.
pub struct AlertGate {
    clock: Arc<dyn Clock>,
    entries: HashMap<String, DateTime<Utc>>,
    min_confidence: u8,
    ttl: Duration,
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_CONFIDENCE,
            Duration::minutes(DEFAULT_ALERT_TTL_MINUTES),
        )
    }
}

impl std::fmt::Debug for AlertGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertGate")
            .field("entries", &self.entries.len())
            .field("min_confidence", &self.min_confidence)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl AlertGate {
    pub fn new(min_confidence: u8, ttl: Duration) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            entries: HashMap::new(),
            min_confidence,
            ttl,
        }
    }

    /// Builder method to replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Decide whether a signal for `match_id` should notify.
    ///
    /// Emitting records the key; an expired entry is replaced as if absent.
    pub fn check(&mut self, match_id: &str, signal: &StrategySignal) -> AlertDecision {
        if signal.is_none() {
            return AlertDecision::NoSignal;
        }
        if signal.confidence < self.min_confidence {
            return AlertDecision::BelowThreshold;
        }

        let key = dedupe_key(match_id, signal.key);
        let now = self.clock.now();

        if let Some(&expires_at) = self.entries.get(&key) {
            if now < expires_at {
                debug!(key = %key, %expires_at, "Alert suppressed");
                return AlertDecision::Suppressed { expires_at };
            }
        }

        let expires_at = now + self.ttl;
        self.entries.insert(key.clone(), expires_at);
        info!(key = %key, confidence = signal.confidence, "Alert armed");
        AlertDecision::Emit { expires_at }
    }

    /// Drop expired entries, returning how many were removed.
    pub fn evict_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| now < *expires_at);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "Evicted expired alerts");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
