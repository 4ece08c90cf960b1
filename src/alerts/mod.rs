//! Alerting: the de-duplication gate and the outbound notifier seam.

pub mod gate;
pub mod notifier;

pub use gate::{
    dedupe_key, AlertDecision, AlertGate, Clock, SystemClock, DEFAULT_ALERT_TTL_MINUTES,
    DEFAULT_MIN_CONFIDENCE,
};
pub use notifier::{format_alert_message, LogNotifier, Notifier, NotifyError, OutboundAlert};
