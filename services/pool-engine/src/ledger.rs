//! The risk ledger
//!
//! Single source of truth for staked positions: a `BTreeMap` keyed by
//! transaction id, so iteration is deterministic in ascending id order.
//! Aggregates are pure folds over the entries; nothing here mutates a
//! stored position.

use std::collections::{BTreeMap, BTreeSet};

use pool_types::event::{Outcome, PoolEvent};
use pool_types::ids::TxId;
use pool_types::stake::{Position, Stake};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ledger of one pool's staked positions.
///
/// `Clone` is cheap enough at pool sizes and is what gives pro-forma
/// simulation its isolation: the scratch copy carries its own id counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    next_id: u64,
    entries: BTreeMap<TxId, Stake>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a stake and return its assigned id.
    ///
    /// Amount and kind validation happen at the engine boundary; the
    /// ledger only assigns ids and stores.
    pub fn insert(
        &mut self,
        event: PoolEvent,
        amount: Decimal,
        owner_account: impl Into<String>,
        fee_account: impl Into<String>,
    ) -> TxId {
        let id = TxId::new(self.next_id);
        self.next_id += 1;

        let position = Position::new(id, amount, owner_account, fee_account);
        debug!(id = %id, amount = %amount, "stake recorded");
        self.entries.insert(id, Stake::new(event, position));
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The id the next insert will be assigned.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, id: TxId) -> Option<&Stake> {
        self.entries.get(&id)
    }

    /// Entries in ascending id order.
    pub fn stakes(&self) -> impl Iterator<Item = (&TxId, &Stake)> {
        self.entries.iter()
    }

    /// Sum of all stored amounts.
    pub fn total_pool(&self) -> Decimal {
        self.entries
            .values()
            .fold(Decimal::ZERO, |acc, stake| acc + stake.position.amount)
    }

    /// Sum of the amounts that win at `outcome`.
    pub fn total_winning_amount(&self, outcome: &Outcome) -> Decimal {
        self.entries
            .values()
            .fold(Decimal::ZERO, |acc, stake| acc + stake.winning_amount(outcome))
    }

    /// Number of positions that win at `outcome`.
    pub fn count_winning(&self, outcome: &Outcome) -> usize {
        self.entries
            .values()
            .filter(|stake| stake.event.is_winner(outcome))
            .count()
    }

    /// Amounts grouped by category key.
    ///
    /// Category keys derive from the side of each bet, not from a
    /// settlement, so no resolved outcome is needed.
    pub fn category_breakdown(&self) -> BTreeMap<String, Decimal> {
        let mut breakdown: BTreeMap<String, Decimal> = BTreeMap::new();
        for stake in self.entries.values() {
            *breakdown
                .entry(stake.event.category_key().to_string())
                .or_insert(Decimal::ZERO) += stake.position.amount;
        }
        breakdown
    }

    /// Distinct stake levels present in the ledger.
    ///
    /// For numeric (threshold) levels, one probe point `tick` under the
    /// minimum and one over the maximum are added so a payoff sweep
    /// crosses every regime change. An empty ledger yields an empty set.
    pub fn outcome_levels(&self, tick: i64) -> BTreeSet<Outcome> {
        let mut levels: BTreeSet<Outcome> = self
            .entries
            .values()
            .map(|stake| stake.event.stake_level())
            .collect();

        let numeric: Vec<i64> = levels
            .iter()
            .filter_map(|outcome| match outcome {
                Outcome::Level(level) => Some(*level),
                Outcome::Category(_) => None,
            })
            .collect();

        if let (Some(&min), Some(&max)) = (numeric.iter().min(), numeric.iter().max()) {
            levels.insert(Outcome::Level(min - tick));
            levels.insert(Outcome::Level(max + tick));
        }

        levels
    }
}
