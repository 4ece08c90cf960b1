//! Live strategy signal model.

use serde::{Deserialize, Serialize};

/// Named strategy a live match can be classified into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKey {
    HtPro,
    FtPro,
    BttsProHt,
    BttsProFt,
    CasaPro,
    ForaPro,
    CasaEnginePro,
    ForaEnginePro,
    TopClash,
    #[default]
    None,
}

impl StrategyKey {
    /// Every real strategy, in classifier precedence order.
    pub const PRECEDENCE: [StrategyKey; 9] = [
        StrategyKey::HtPro,
        StrategyKey::FtPro,
        StrategyKey::BttsProHt,
        StrategyKey::BttsProFt,
        StrategyKey::CasaPro,
        StrategyKey::ForaPro,
        StrategyKey::CasaEnginePro,
        StrategyKey::ForaEnginePro,
        StrategyKey::TopClash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKey::HtPro => "ht_pro",
            StrategyKey::FtPro => "ft_pro",
            StrategyKey::BttsProHt => "btts_pro_ht",
            StrategyKey::BttsProFt => "btts_pro_ft",
            StrategyKey::CasaPro => "casa_pro",
            StrategyKey::ForaPro => "fora_pro",
            StrategyKey::CasaEnginePro => "casa_engine_pro",
            StrategyKey::ForaEnginePro => "fora_engine_pro",
            StrategyKey::TopClash => "top_clash",
            StrategyKey::None => "none",
        }
    }

    /// Display label shown on cards and in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKey::HtPro => "HT PRO SNIPER",
            StrategyKey::FtPro => "FT PRO ENGINE",
            StrategyKey::BttsProHt => "BTTS HT PRO",
            StrategyKey::BttsProFt => "BTTS FT PRO",
            StrategyKey::CasaPro => "CASA DOMINANTE",
            StrategyKey::ForaPro => "FORA DOMINANTE",
            StrategyKey::CasaEnginePro => "CASA ENGINE",
            StrategyKey::ForaEnginePro => "FORA ENGINE",
            StrategyKey::TopClash => "ELITE CLASH",
            StrategyKey::None => "",
        }
    }

    /// Strategies that back the home side.
    pub fn is_home_side(&self) -> bool {
        matches!(self, StrategyKey::CasaPro | StrategyKey::CasaEnginePro)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, StrategyKey::None)
    }
}

impl std::fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StrategyKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKey::PRECEDENCE
            .iter()
            .chain(std::iter::once(&StrategyKey::None))
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown strategy key: {}", s))
    }
}

/// Combined indicators reported alongside a signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalMetrics {
    pub ht05: f64,
    pub ft25: f64,
    pub ft_btts: f64,
}

/// Classification of one live match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategySignal {
    pub key: StrategyKey,

    /// 0 to 100
    pub confidence: u8,

    pub reasons: Vec<String>,

    /// Window used for both players
    pub sample_size: usize,

    pub metrics: SignalMetrics,
}

impl StrategySignal {
    /// The "no strategy" signal.
    pub fn none(sample_size: usize) -> Self {
        Self {
            sample_size,
            ..Default::default()
        }
    }

    pub fn is_none(&self) -> bool {
        self.key.is_none()
    }
}
