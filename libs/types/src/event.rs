//! Outcome event variants
//!
//! Two mutually exclusive shapes describe what a position is betting on:
//! a categorical event (one of an open set of named categories) and a
//! threshold event (price direction relative to an integer level). Both
//! implement the capability set settlement needs: winner determination,
//! a category key for reporting, and a distance-weighting factor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which settlement algorithm a pool runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    /// Proportional redistribution among winners of one named category.
    Categorical,
    /// Distance-weighted redistribution among winners of a price direction.
    Threshold,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Categorical => write!(f, "categorical"),
            PoolKind::Threshold => write!(f, "threshold"),
        }
    }
}

/// Direction of a threshold position.
///
/// Long wins when the outcome resolves above the staked level, Short when
/// it resolves below. Equality loses for both sides, and there is no
/// neutral variant, so a resolved stake can never carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "Long"),
            Side::Short => write!(f, "Short"),
        }
    }
}

/// What a position is betting on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolEvent {
    /// A bet on one of an open set of named categories.
    Categorical { category: String },
    /// A bet on price direction relative to an integer level.
    Threshold { side: Side, level: i64 },
}

/// A realized outcome, or a probe point when sweeping payoff curves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The category that resolved true.
    Category(String),
    /// The closing price level.
    Level(i64),
}

impl Outcome {
    /// The pool kind this outcome shape belongs to.
    pub fn kind(&self) -> PoolKind {
        match self {
            Outcome::Category(_) => PoolKind::Categorical,
            Outcome::Level(_) => PoolKind::Threshold,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Category(label) => write!(f, "{label}"),
            Outcome::Level(level) => write!(f, "{level}"),
        }
    }
}

impl PoolEvent {
    /// Convenience constructor for a categorical event.
    pub fn categorical(category: impl Into<String>) -> Self {
        PoolEvent::Categorical {
            category: category.into(),
        }
    }

    /// Convenience constructor for a threshold event.
    pub fn threshold(side: Side, level: i64) -> Self {
        PoolEvent::Threshold { side, level }
    }

    /// The pool kind this event belongs to.
    pub fn kind(&self) -> PoolKind {
        match self {
            PoolEvent::Categorical { .. } => PoolKind::Categorical,
            PoolEvent::Threshold { .. } => PoolKind::Threshold,
        }
    }

    /// Does this event win at the given outcome?
    ///
    /// Kind-mismatched outcomes never win. A threshold outcome exactly at
    /// the staked level loses for both sides; there is no push case.
    pub fn is_winner(&self, outcome: &Outcome) -> bool {
        match (self, outcome) {
            (PoolEvent::Categorical { category }, Outcome::Category(label)) => category == label,
            (PoolEvent::Threshold { side, level }, Outcome::Level(closing)) => match side {
                Side::Long => closing > level,
                Side::Short => closing < level,
            },
            _ => false,
        }
    }

    /// Grouping key for category breakdowns.
    ///
    /// Derived from the side of the bet, not from a settlement, so it is
    /// well-defined before any outcome resolves.
    pub fn category_key(&self) -> &str {
        match self {
            PoolEvent::Categorical { category } => category,
            PoolEvent::Threshold {
                side: Side::Long, ..
            } => "Long",
            PoolEvent::Threshold {
                side: Side::Short, ..
            } => "Short",
        }
    }

    /// Weighting factor used to reweight the winners' pool.
    ///
    /// Threshold events weight by `1 / |outcome_level - stake_level|`.
    /// Categorical redistribution is pure pro-rata, so the weight is
    /// uniform. Returns the sentinel `1` when the event is not a winner at
    /// `outcome` or when the distance would otherwise be zero.
    pub fn inverse_distance_weight(&self, outcome: &Outcome) -> Decimal {
        match (self, outcome) {
            (PoolEvent::Threshold { level, .. }, Outcome::Level(closing))
                if self.is_winner(outcome) =>
            {
                let distance = closing.abs_diff(*level);
                if distance == 0 {
                    return Decimal::ONE;
                }
                Decimal::ONE / Decimal::from(distance)
            }
            _ => Decimal::ONE,
        }
    }

    /// The level this event was staked at, as an outcome probe point.
    pub fn stake_level(&self) -> Outcome {
        match self {
            PoolEvent::Categorical { category } => Outcome::Category(category.clone()),
            PoolEvent::Threshold { level, .. } => Outcome::Level(*level),
        }
    }
}
