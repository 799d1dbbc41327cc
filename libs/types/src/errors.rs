//! Error taxonomy for staking and settlement
//!
//! Input validation is rejected synchronously at the boundary; the
//! settlement variants are defect detectors that should never surface to
//! an end user.

use crate::event::PoolKind;
use crate::ids::TxId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors rejected at the staking boundary, before any ledger mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakeError {
    #[error("invalid stake amount {amount}: must be positive")]
    InvalidAmount { amount: Decimal },

    #[error("event kind {event} does not match pool kind {pool}")]
    KindMismatch { pool: PoolKind, event: PoolKind },
}

/// Shape mismatches and defects surfaced during settlement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("outcome kind {outcome} does not match pool kind {pool}")]
    OutcomeKindMismatch { pool: PoolKind, outcome: PoolKind },

    #[error("winner {id} sits exactly at the outcome level; equality must lose")]
    ZeroDistanceWinner { id: TxId },

    #[error("conservation violated: expected {expected}, computed {actual} (tolerance {tolerance})")]
    ConservationViolation {
        expected: Decimal,
        actual: Decimal,
        tolerance: Decimal,
    },
}

/// Top-level error for engine operations that cross both concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("stake error: {0}")]
    Stake(#[from] StakeError),

    #[error("settlement error: {0}")]
    Settlement(#[from] SettlementError),
}
