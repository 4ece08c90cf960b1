//! The strategy rule table.
//!
//! Each strategy is a list of named threshold conditions over the two
//! players' windowed statistics. Rules are evaluated in
//! [`StrategyKey::PRECEDENCE`] order and the first one whose conditions all
//! hold wins, so more specific goal-line strategies shadow the broader
//! win-rate ones.

use crate::models::{PlayerStats, RateMetrics, StrategyKey};

use self::Unit::{Goals, Percent};

/// Direction of a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    AtLeast,
    AtMost,
}

/// What a condition measures, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Goals,
}

/// One named threshold check.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub label: &'static str,
    pub observed: f64,
    pub threshold: f64,
    pub bound: Bound,
    pub unit: Unit,

    /// Headroom that counts as a full margin. Zero means the threshold is
    /// the ceiling itself, so holding it is already the full margin.
    pub scale: f64,
}

impl Condition {
    pub fn at_least(label: &'static str, observed: f64, threshold: f64, unit: Unit, scale: f64) -> Self {
        Self {
            label,
            observed,
            threshold,
            bound: Bound::AtLeast,
            unit,
            scale,
        }
    }

    pub fn at_most(label: &'static str, observed: f64, threshold: f64, unit: Unit, scale: f64) -> Self {
        Self {
            label,
            observed,
            threshold,
            bound: Bound::AtMost,
            unit,
            scale,
        }
    }

    /// A rate that must be 100%.
    pub fn perfect(label: &'static str, observed: f64) -> Self {
        Self::at_least(label, observed, 100.0, Unit::Percent, 0.0)
    }

    pub fn holds(&self) -> bool {
        match self.bound {
            Bound::AtLeast => self.observed >= self.threshold,
            Bound::AtMost => self.observed <= self.threshold,
        }
    }

    fn headroom(&self) -> f64 {
        match self.bound {
            Bound::AtLeast => self.observed - self.threshold,
            Bound::AtMost => self.threshold - self.observed,
        }
    }

    /// Normalized headroom over the threshold in `[0, 1]`.
    pub fn margin(&self) -> f64 {
        if !self.holds() {
            return 0.0;
        }
        if self.scale <= 0.0 {
            return 1.0;
        }
        (self.headroom() / self.scale).clamp(0.0, 1.0)
    }

    /// Human-readable explanation, e.g. `home win rate 80% (>= 70%)`.
    pub fn reason(&self) -> String {
        let op = match self.bound {
            Bound::AtLeast => ">=",
            Bound::AtMost => "<=",
        };
        match self.unit {
            Unit::Percent => format!(
                "{} {:.0}% ({} {:.0}%)",
                self.label, self.observed, op, self.threshold
            ),
            Unit::Goals => format!(
                "{} {:.2} ({} {:.2})",
                self.label, self.observed, op, self.threshold
            ),
        }
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInputs<'a> {
    pub home: &'a PlayerStats,
    pub away: &'a PlayerStats,
    pub combined: RateMetrics,
}

impl<'a> RuleInputs<'a> {
    pub fn new(home: &'a PlayerStats, away: &'a PlayerStats) -> Self {
        Self {
            home,
            away,
            combined: home.rates.combined(&away.rates),
        }
    }
}

/// A strategy whose conditions all held.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub key: StrategyKey,
    pub conditions: Vec<Condition>,
}

impl RuleMatch {
    /// Mean margin of the conditions, in `[0, 1]`.
    pub fn margin(&self) -> f64 {
        if self.conditions.is_empty() {
            return 0.0;
        }
        self.conditions.iter().map(Condition::margin).sum::<f64>() / self.conditions.len() as f64
    }

    pub fn reasons(&self) -> Vec<String> {
        self.conditions.iter().map(Condition::reason).collect()
    }
}

fn engine_conditions(strong: &PlayerStats, weak: &PlayerStats, side: Side) -> Vec<Condition> {
    let (strong_label, weak_label) = side.labels();
    vec![
        Condition::at_least(strong_label.ht_goals, strong.avg_goals_scored_ht, 2.5, Goals, 1.0),
        Condition::at_least(strong_label.ft_goals, strong.avg_goals_scored_ft, 3.7, Goals, 1.0),
        Condition::at_most(weak_label.ht_goals, weak.avg_goals_scored_ht, 0.7, Goals, 0.7),
        Condition::at_most(weak_label.ft_goals, weak.avg_goals_scored_ft, 1.7, Goals, 1.0),
    ]
}

fn dominance_conditions(strong: &PlayerStats, weak: &PlayerStats, side: Side) -> Vec<Condition> {
    let (strong_label, weak_label) = side.labels();
    vec![
        Condition::at_least(strong_label.win_rate, strong.win_rate, 70.0, Percent, 30.0),
        Condition::at_most(weak_label.win_rate, weak.win_rate, 20.0, Percent, 20.0),
    ]
}

#[derive(Clone, Copy)]
enum Side {
    Home,
    Away,
}

struct SideLabels {
    win_rate: &'static str,
    ht_goals: &'static str,
    ft_goals: &'static str,
}

const HOME_LABELS: SideLabels = SideLabels {
    win_rate: "home win rate",
    ht_goals: "home avg HT goals",
    ft_goals: "home avg FT goals",
};

const AWAY_LABELS: SideLabels = SideLabels {
    win_rate: "away win rate",
    ht_goals: "away avg HT goals",
    ft_goals: "away avg FT goals",
};

impl Side {
    /// Labels for the strong side first, then the weak side.
    fn labels(self) -> (&'static SideLabels, &'static SideLabels) {
        match self {
            Side::Home => (&HOME_LABELS, &AWAY_LABELS),
            Side::Away => (&AWAY_LABELS, &HOME_LABELS),
        }
    }
}

/// The conditions that make up one strategy.
pub fn conditions_for(key: StrategyKey, inputs: &RuleInputs<'_>) -> Vec<Condition> {
    let RuleInputs {
        home,
        away,
        combined,
    } = *inputs;

    match key {
        StrategyKey::HtPro => vec![
            Condition::perfect("home HT over 0.5", home.rates.ht05),
            Condition::perfect("away HT over 0.5", away.rates.ht05),
            Condition::at_least("combined HT over 1.5", combined.ht15, 80.0, Percent, 20.0),
            Condition::at_least("home avg HT goals", home.avg_goals_scored_ht, 1.5, Goals, 1.0),
            Condition::at_least("away avg HT goals", away.avg_goals_scored_ht, 1.5, Goals, 1.0),
            Condition::at_most("combined FT over 2.5", combined.ft25, 75.0, Percent, 75.0),
        ],
        StrategyKey::FtPro => vec![
            Condition::perfect("home FT over 2.5", home.rates.ft25),
            Condition::perfect("away FT over 2.5", away.rates.ft25),
            Condition::at_least("combined FT over 3.5", combined.ft35, 88.0, Percent, 12.0),
            Condition::at_least("home avg FT goals", home.avg_goals_scored_ft, 2.5, Goals, 1.0),
            Condition::at_least("away avg FT goals", away.avg_goals_scored_ft, 2.5, Goals, 1.0),
            Condition::at_most("combined HT over 2.5", combined.ht25, 60.0, Percent, 60.0),
        ],
        StrategyKey::BttsProHt => vec![
            Condition::perfect("home HT BTTS", home.rates.ht_btts),
            Condition::perfect("away HT BTTS", away.rates.ht_btts),
            Condition::at_least("home avg HT goals", home.avg_goals_scored_ht, 1.8, Goals, 1.0),
            Condition::at_least("away avg HT goals", away.avg_goals_scored_ht, 1.8, Goals, 1.0),
            Condition::at_most("combined HT over 2.5", combined.ht25, 60.0, Percent, 60.0),
        ],
        StrategyKey::BttsProFt => vec![
            Condition::perfect("home FT BTTS", home.rates.ft_btts),
            Condition::perfect("away FT BTTS", away.rates.ft_btts),
            Condition::at_least("home avg FT goals", home.avg_goals_scored_ft, 2.0, Goals, 1.0),
            Condition::at_least("away avg FT goals", away.avg_goals_scored_ft, 2.0, Goals, 1.0),
            Condition::at_most("combined FT over 2.5", combined.ft25, 88.0, Percent, 88.0),
        ],
        StrategyKey::CasaPro => dominance_conditions(home, away, Side::Home),
        StrategyKey::ForaPro => dominance_conditions(away, home, Side::Away),
        StrategyKey::CasaEnginePro => engine_conditions(home, away, Side::Home),
        StrategyKey::ForaEnginePro => engine_conditions(away, home, Side::Away),
        StrategyKey::TopClash => vec![
            Condition::at_least("home win rate", home.win_rate, 60.0, Percent, 40.0),
            Condition::at_least("away win rate", away.win_rate, 60.0, Percent, 40.0),
            Condition::at_most("home draw rate", home.draw_rate, 25.0, Percent, 25.0),
            Condition::at_most("away draw rate", away.draw_rate, 25.0, Percent, 25.0),
        ],
        StrategyKey::None => Vec::new(),
    }
}

/// Every strategy whose conditions all hold, in precedence order.
pub fn matching_rules(inputs: &RuleInputs<'_>) -> Vec<StrategyKey> {
    StrategyKey::PRECEDENCE
        .into_iter()
        .filter(|&key| conditions_for(key, inputs).iter().all(Condition::holds))
        .collect()
}

/// The highest-precedence strategy whose conditions all hold.
pub fn first_match(inputs: &RuleInputs<'_>) -> Option<RuleMatch> {
    StrategyKey::PRECEDENCE.into_iter().find_map(|key| {
        let conditions = conditions_for(key, inputs);
        conditions
            .iter()
            .all(Condition::holds)
            .then_some(RuleMatch { key, conditions })
    })
}
