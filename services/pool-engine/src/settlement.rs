//! Settlement algorithms
//!
//! Winner determination and payout computation for both pool kinds:
//! proportional redistribution for categorical pools and the two-pass
//! distance-weighted redistribution for threshold pools. Both produce a
//! `Settlement` carrying the per-position records plus the totals the
//! conservation checks re-derive.

use std::collections::BTreeMap;

use pool_types::errors::SettlementError;
use pool_types::event::{Outcome, PoolEvent};
use pool_types::ids::TxId;
use pool_types::settlement::{DistanceWeighting, SettlementRecord};
use pool_types::stake::Position;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::ledger::Ledger;

/// Result of settling a pool at a resolved outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub outcome: Outcome,
    /// Records for the winning positions, keyed by transaction id.
    pub records: BTreeMap<TxId, SettlementRecord>,
    pub total_pool: Decimal,
    pub fees: Decimal,
    /// Pool value after fees, the amount actually paid out.
    pub distributable: Decimal,
    /// Total stake on the winning side.
    pub winning_stake: Decimal,
    /// Sum of final payouts over the winners.
    pub total_payout: Decimal,
    /// Sum of pre-reweighting payouts; equals `total_payout` for
    /// proportional settlement.
    pub total_prima_facie_payout: Decimal,
}

impl Settlement {
    /// Settlement with no winners: empty record set, nothing paid out.
    fn degenerate(outcome: Outcome, total_pool: Decimal, fees: Decimal) -> Self {
        Self {
            outcome,
            records: BTreeMap::new(),
            total_pool,
            fees,
            distributable: total_pool - fees,
            winning_stake: Decimal::ZERO,
            total_payout: Decimal::ZERO,
            total_prima_facie_payout: Decimal::ZERO,
        }
    }

    /// Did any position win?
    pub fn has_winners(&self) -> bool {
        !self.records.is_empty()
    }

    /// Re-derive the conservation sums from the records and fail if they
    /// drift beyond `tolerance`.
    ///
    /// Two invariants: the pre-reweighting payouts plus fees must account
    /// for the whole pool, and reweighting must be a zero-sum transfer
    /// among the winners. Vacuous for a degenerate settlement.
    pub fn verify(&self, tolerance: Decimal) -> Result<(), SettlementError> {
        if !self.has_winners() {
            return Ok(());
        }

        let paid: Decimal = self.records.values().map(|r| r.payout()).sum();
        let prima_facie: Decimal = self
            .records
            .values()
            .map(|r| {
                r.weighting
                    .as_ref()
                    .map_or(r.payout(), |w| w.prima_facie_payout)
            })
            .sum();

        if !close(prima_facie + self.fees, self.total_pool, tolerance) {
            return Err(SettlementError::ConservationViolation {
                expected: self.total_pool,
                actual: prima_facie + self.fees,
                tolerance,
            });
        }
        if !close(paid, prima_facie, tolerance) {
            return Err(SettlementError::ConservationViolation {
                expected: prima_facie,
                actual: paid,
                tolerance,
            });
        }
        Ok(())
    }
}

/// Are two amounts equal within `tolerance`?
pub fn close(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() < tolerance
}

/// Proportional (pro-rata) settlement for categorical pools: every winner
/// receives the same multiple of their stake.
pub(crate) fn settle_proportional(
    ledger: &Ledger,
    outcome: &Outcome,
    fee_rate: Decimal,
) -> Settlement {
    let total_pool = ledger.total_pool();
    let fees = total_pool * fee_rate;
    let distributable = total_pool - fees;
    let winning_stake = ledger.total_winning_amount(outcome);

    if winning_stake <= Decimal::ZERO {
        return Settlement::degenerate(outcome.clone(), total_pool, fees);
    }

    let payoff_multiple = distributable / winning_stake;

    let mut records = BTreeMap::new();
    let mut total_payout = Decimal::ZERO;

    for (id, stake) in ledger.stakes() {
        if !stake.event.is_winner(outcome) {
            continue;
        }

        let amount = stake.position.amount;
        let mut position = stake.position.clone();
        position.payout = amount * payoff_multiple;
        total_payout += position.payout;

        records.insert(
            *id,
            SettlementRecord {
                position,
                pool_share: amount / distributable,
                winnings_share: amount / winning_stake,
                payoff_multiple,
                weighting: None,
            },
        );
    }

    Settlement {
        outcome: outcome.clone(),
        records,
        total_pool,
        fees,
        distributable,
        winning_stake,
        total_payout,
        total_prima_facie_payout: total_payout,
    }
}

/// Pass-1 accumulator for distance-weighted settlement; the records are
/// built in pass 2 once the weight total is known.
struct WinnerDraft {
    id: TxId,
    position: Position,
    pool_share: Decimal,
    winnings_share: Decimal,
    prima_facie_payoff: Decimal,
    prima_facie_payout: Decimal,
    raw_inverse_distance: Decimal,
}

/// Distance-weighted settlement for threshold pools.
///
/// Pass 1 computes the flat pro-rata payouts and each winner's inverse
/// distance from the realized level; pass 2 redistributes the winning
/// stake in proportion to the normalized weights and pays it out at the
/// prima facie multiple. The reweighting is a zero-sum transfer among
/// winners; fees are untouched by the second pass.
pub(crate) fn settle_distance_weighted(
    ledger: &Ledger,
    outcome: &Outcome,
    fee_rate: Decimal,
) -> Settlement {
    let total_pool = ledger.total_pool();
    let fees = total_pool * fee_rate;
    let distributable = total_pool - fees;
    let winning_stake = ledger.total_winning_amount(outcome);

    if winning_stake <= Decimal::ZERO {
        return Settlement::degenerate(outcome.clone(), total_pool, fees);
    }

    let prima_facie_payoff = distributable / winning_stake;

    // Pass 1: flat pro-rata payouts and raw inverse-distance weights.
    let mut drafts = Vec::new();
    let mut total_inverse_distance = Decimal::ZERO;
    let mut total_prima_facie_payout = Decimal::ZERO;

    for (id, stake) in ledger.stakes() {
        if !stake.event.is_winner(outcome) {
            continue;
        }

        if let (PoolEvent::Threshold { level, .. }, Outcome::Level(closing)) =
            (&stake.event, outcome)
        {
            if closing == level {
                // Equality is a loss by definition, so a winner at
                // distance zero means the winner predicate regressed.
                let defect = SettlementError::ZeroDistanceWinner { id: *id };
                debug_assert!(false, "{defect}");
                error!(defect = %defect, "applying sentinel weight");
            }
        }

        let amount = stake.position.amount;
        let raw_inverse_distance = stake.event.inverse_distance_weight(outcome);
        total_inverse_distance += raw_inverse_distance;

        let prima_facie_payout = amount * prima_facie_payoff;
        total_prima_facie_payout += prima_facie_payout;

        drafts.push(WinnerDraft {
            id: *id,
            position: stake.position.clone(),
            pool_share: amount / distributable,
            winnings_share: amount / winning_stake,
            prima_facie_payoff,
            prima_facie_payout,
            raw_inverse_distance,
        });
    }

    // Pass 2: redistribute the winning stake by normalized weight.
    let mut records = BTreeMap::new();
    let mut total_payout = Decimal::ZERO;

    for draft in drafts {
        let normalized_inverse_distance = draft.raw_inverse_distance / total_inverse_distance;
        let redistributed_amount = normalized_inverse_distance * winning_stake;
        let payout = redistributed_amount * draft.prima_facie_payoff;
        let payoff_multiple = payout / draft.position.amount;

        let mut position = draft.position;
        position.payout = payout;
        total_payout += payout;

        records.insert(
            draft.id,
            SettlementRecord {
                position,
                pool_share: draft.pool_share,
                winnings_share: draft.winnings_share,
                payoff_multiple,
                weighting: Some(DistanceWeighting {
                    prima_facie_payoff: draft.prima_facie_payoff,
                    prima_facie_payout: draft.prima_facie_payout,
                    raw_inverse_distance: draft.raw_inverse_distance,
                    normalized_inverse_distance,
                    redistributed_amount,
                }),
            },
        );
    }

    Settlement {
        outcome: outcome.clone(),
        records,
        total_pool,
        fees,
        distributable,
        winning_stake,
        total_payout,
        total_prima_facie_payout,
    }
}
