//! Confidence bands for strategy signals.

use serde::{Deserialize, Serialize};

/// Coarse band a numeric confidence falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Low,
    Fair,
    Good,
    Strong,
    Elite,
}

impl ConfidenceBand {
    pub fn from_score(confidence: u8) -> Self {
        match confidence {
            90.. => ConfidenceBand::Elite,
            85..=89 => ConfidenceBand::Strong,
            80..=84 => ConfidenceBand::Good,
            75..=79 => ConfidenceBand::Fair,
            _ => ConfidenceBand::Low,
        }
    }

    /// Marker used in notification text.
    pub fn marker(&self) -> &'static str {
        match self {
            ConfidenceBand::Elite => "\u{1f7e3}",  // purple circle
            ConfidenceBand::Strong => "\u{1f7e2}", // green circle
            ConfidenceBand::Good => "\u{1f7e1}",   // yellow circle
            ConfidenceBand::Fair => "\u{1f7e0}",   // orange circle
            ConfidenceBand::Low => "\u{1f534}",    // red circle
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceBand::Elite => write!(f, "elite"),
            ConfidenceBand::Strong => write!(f, "strong"),
            ConfidenceBand::Good => write!(f, "good"),
            ConfidenceBand::Fair => write!(f, "fair"),
            ConfidenceBand::Low => write!(f, "low"),
        }
    }
}
