//! Staked positions
//!
//! A `Position` is the immutable record of one staked amount; a `Stake`
//! is the ledger entry pairing that position with the event it bets on.

use crate::event::{Outcome, PoolEvent};
use crate::ids::TxId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One staked amount and the accounts on either side of it.
///
/// Stored positions are never mutated after insertion; settlement sets
/// `payout` only on a copy carried inside a settlement record, so the
/// ledger stays re-playable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: TxId,
    /// Amount of capital at risk. Strictly positive, enforced at the
    /// staking boundary.
    pub amount: Decimal,
    /// Account the stake came from.
    pub owner_account: String,
    /// The pool's own fee-collecting account.
    pub fee_account: String,
    /// Absolute payout. Zero until settled.
    pub payout: Decimal,
}

impl Position {
    /// Create an unsettled position.
    pub fn new(
        id: TxId,
        amount: Decimal,
        owner_account: impl Into<String>,
        fee_account: impl Into<String>,
    ) -> Self {
        Self {
            id,
            amount,
            owner_account: owner_account.into(),
            fee_account: fee_account.into(),
            payout: Decimal::ZERO,
        }
    }
}

/// Ledger entry: an event and the position it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub event: PoolEvent,
    pub position: Position,
}

impl Stake {
    pub fn new(event: PoolEvent, position: Position) -> Self {
        Self { event, position }
    }

    /// The staked amount if the event wins at `outcome`, else zero.
    pub fn winning_amount(&self, outcome: &Outcome) -> Decimal {
        if self.event.is_winner(outcome) {
            self.position.amount
        } else {
            Decimal::ZERO
        }
    }
}
