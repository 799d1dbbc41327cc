//! Identifier types for pool entities
//!
//! Transaction ids are dense integers assigned monotonically by the engine
//! that owns the ledger, so replaying the same stream of stakes reproduces
//! the same ids. Account identifiers stay opaque strings supplied by a
//! collaborator and get no type of their own here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a staked position.
///
/// Issued from a per-pool counter starting at zero. Ordering follows
/// insertion order, which is what makes ledger iteration deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TxId(u64);

impl TxId {
    /// Create from a raw counter value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_id_ordering_follows_counter() {
        let a = TxId::new(0);
        let b = TxId::new(1);
        assert!(a < b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tx_id_display() {
        assert_eq!(TxId::new(42).to_string(), "42");
    }

    #[test]
    fn test_tx_id_serialization_transparent() {
        let id = TxId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");

        let deserialized: TxId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
