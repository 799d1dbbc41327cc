//! Settlement result records
//!
//! Derived, transient values attached to winning positions once an outcome
//! is known. Records are handed back to the caller and never stored in the
//! ledger, so a pool can be settled (or simulated) any number of times.

use crate::stake::Position;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Distance-weighting detail carried by threshold settlement records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceWeighting {
    /// Payoff multiple before reweighting (flat pro-rata).
    pub prima_facie_payoff: Decimal,
    /// Absolute payout before reweighting.
    pub prima_facie_payout: Decimal,
    /// `1 / |outcome_level - stake_level|`.
    pub raw_inverse_distance: Decimal,
    /// Raw weight over the sum of raw weights across all winners.
    pub normalized_inverse_distance: Decimal,
    /// Share of the winning stake this position receives after reweighting.
    pub redistributed_amount: Decimal,
}

/// The computed result for one position at a resolved outcome.
///
/// Invariant: `position.payout = position.amount × payoff_multiple`, with
/// `payoff_multiple ≥ 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Copy of the staked position with `payout` set.
    pub position: Position,
    /// This position's amount over the distributable pool.
    pub pool_share: Decimal,
    /// This position's amount over the total stake on the winning side.
    pub winnings_share: Decimal,
    /// Payout per unit staked.
    pub payoff_multiple: Decimal,
    /// Populated by distance-weighted (threshold) settlement only.
    pub weighting: Option<DistanceWeighting>,
}

impl SettlementRecord {
    /// Zero-valued record for a position that did not win.
    pub fn lost(position: Position) -> Self {
        Self {
            position: Position {
                payout: Decimal::ZERO,
                ..position
            },
            pool_share: Decimal::ZERO,
            winnings_share: Decimal::ZERO,
            payoff_multiple: Decimal::ZERO,
            weighting: None,
        }
    }

    /// Absolute payout for this record.
    pub fn payout(&self) -> Decimal {
        self.position.payout
    }
}
