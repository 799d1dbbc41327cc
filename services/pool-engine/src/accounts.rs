//! Pool account collaborators
//!
//! The engine never computes account identifiers; a provider supplies the
//! pool's fee-collecting account and the pool manager's account, and the
//! engine records them on positions as opaque strings.

use std::fmt;

/// Supplies the pool's account identifiers.
pub trait PoolAccountProvider: fmt::Debug + Send + Sync {
    /// Account that collects the pool fee.
    fn pool_account(&self) -> String;

    /// Account of the pool's manager.
    fn pool_manager_account(&self) -> String;
}

/// Fixed account identifiers, the common case for a single-pool deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAccounts {
    pool_account: String,
    pool_manager_account: String,
}

impl StaticAccounts {
    pub fn new(
        pool_account: impl Into<String>,
        pool_manager_account: impl Into<String>,
    ) -> Self {
        Self {
            pool_account: pool_account.into(),
            pool_manager_account: pool_manager_account.into(),
        }
    }
}

impl Default for StaticAccounts {
    fn default() -> Self {
        Self::new("pool_account", "pool_manager_account")
    }
}

impl PoolAccountProvider for StaticAccounts {
    fn pool_account(&self) -> String {
        self.pool_account.clone()
    }

    fn pool_manager_account(&self) -> String {
        self.pool_manager_account.clone()
    }
}
