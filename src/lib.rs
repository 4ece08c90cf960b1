//! # esoccer-signals
//!
//! Statistics and signal engine for fast e-soccer matches.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, live events, stats, signals)
//! - **normalize**: Upstream payload shapes, league naming, score tooltips
//! - **calculate**: Rolling player stats, head-to-head, league thermometer
//! - **strategy**: Live strategy classifier and backtest report
//! - **alerts**: Alert de-duplication gate and notifier seam
//! - **scan**: Periodic live scan loop
//! - **storage**: Payload files (JSON / JSONL)
//! - **config**: Configuration loading and validation

pub mod alerts;
pub mod calculate;
pub mod config;
pub mod models;
pub mod normalize;
pub mod scan;
pub mod storage;
pub mod strategy;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "2h", "120m", "10s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.trim().parse().ok()?;
    Some(Duration::from_secs(num.checked_mul(multiplier)?))
}
