//! Pool engine — orchestrator
//!
//! Owns the ledger, validates stakes at the boundary, runs the
//! variant-specific settlement, and answers pro-forma what-ifs on an
//! isolated copy of its own state.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use pool_types::errors::{PoolError, SettlementError, StakeError};
use pool_types::event::{Outcome, PoolEvent, PoolKind};
use pool_types::ids::TxId;
use pool_types::settlement::SettlementRecord;
use pool_types::stake::Position;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::accounts::PoolAccountProvider;
use crate::ledger::Ledger;
use crate::settlement::{self, Settlement};

/// Owner account recorded on hypothetical pro-forma stakes.
const PRO_FORMA_OWNER: &str = "hypothetical";

/// Pool engine configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Fee retained by the pool, as a fraction of the total pool in [0, 1).
    pub fee_rate: Decimal,
    /// Conservation tolerance in currency units.
    pub tolerance: Decimal,
    /// Step used for the under/over boundary probes when enumerating
    /// threshold outcome levels.
    pub level_tick: i64,
    /// Whether the fee applies on the pro-forma simulation path.
    pub pro_forma_fees: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fee_rate: Decimal::from_str_exact("0.03").unwrap(),
            tolerance: Decimal::from_str_exact("0.01").unwrap(),
            level_tick: 1,
            pro_forma_fees: true,
        }
    }
}

/// The ledger of one pool plus the settlement entry points.
///
/// One engine value is one pool. Independent pools are independent
/// values; there is no shared state between them.
#[derive(Debug, Clone)]
pub struct PoolEngine {
    kind: PoolKind,
    config: PoolConfig,
    accounts: Arc<dyn PoolAccountProvider>,
    ledger: Ledger,
}

impl PoolEngine {
    /// Create an engine with default configuration.
    pub fn new(kind: PoolKind, accounts: Arc<dyn PoolAccountProvider>) -> Self {
        Self::with_config(kind, PoolConfig::default(), accounts)
    }

    /// Create an engine with custom configuration.
    pub fn with_config(
        kind: PoolKind,
        config: PoolConfig,
        accounts: Arc<dyn PoolAccountProvider>,
    ) -> Self {
        Self {
            kind,
            config,
            accounts,
            ledger: Ledger::new(),
        }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Read-only snapshot of the ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Account that collects the pool fee.
    pub fn pool_account(&self) -> String {
        self.accounts.pool_account()
    }

    /// Account of the pool's manager.
    pub fn pool_manager_account(&self) -> String {
        self.accounts.pool_manager_account()
    }

    /// Accept a stake and return its transaction id.
    ///
    /// Rejects non-positive amounts and kind-mismatched events before any
    /// ledger mutation. The fee account comes from the provider at stake
    /// time.
    pub fn stake(
        &mut self,
        event: PoolEvent,
        amount: Decimal,
        owner: impl Into<String>,
    ) -> Result<TxId, StakeError> {
        if amount <= Decimal::ZERO {
            return Err(StakeError::InvalidAmount { amount });
        }
        if event.kind() != self.kind {
            return Err(StakeError::KindMismatch {
                pool: self.kind,
                event: event.kind(),
            });
        }

        let id = self
            .ledger
            .insert(event, amount, owner, self.accounts.pool_account());
        Ok(id)
    }

    /// Sum of all staked amounts.
    pub fn total_pool(&self) -> Decimal {
        self.ledger.total_pool()
    }

    /// Sum of the amounts that would win at `outcome`.
    pub fn total_winning_amount(&self, outcome: &Outcome) -> Decimal {
        self.ledger.total_winning_amount(outcome)
    }

    /// Number of positions that would win at `outcome`.
    pub fn count_winning(&self, outcome: &Outcome) -> usize {
        self.ledger.count_winning(outcome)
    }

    /// `total_pool × fee_rate`.
    pub fn fees(&self) -> Decimal {
        self.ledger.total_pool() * self.config.fee_rate
    }

    /// Staked amounts grouped by category key.
    pub fn category_breakdown(&self) -> BTreeMap<String, Decimal> {
        self.ledger.category_breakdown()
    }

    /// Distinct stake levels plus the configured boundary probes.
    pub fn enumerate_outcome_levels(&self) -> BTreeSet<Outcome> {
        self.ledger.outcome_levels(self.config.level_tick)
    }

    /// Settle the pool at a realized outcome.
    ///
    /// Pure over the ledger: repeated calls on an unchanged ledger return
    /// identical settlements. A settlement with no winners is returned
    /// as-is, with an empty record set.
    pub fn settle(&self, outcome: &Outcome) -> Result<Settlement, SettlementError> {
        self.settle_with_fee(outcome, self.config.fee_rate)
    }

    fn settle_with_fee(
        &self,
        outcome: &Outcome,
        fee_rate: Decimal,
    ) -> Result<Settlement, SettlementError> {
        if outcome.kind() != self.kind {
            return Err(SettlementError::OutcomeKindMismatch {
                pool: self.kind,
                outcome: outcome.kind(),
            });
        }

        let settlement = match self.kind {
            PoolKind::Categorical => {
                settlement::settle_proportional(&self.ledger, outcome, fee_rate)
            }
            PoolKind::Threshold => {
                settlement::settle_distance_weighted(&self.ledger, outcome, fee_rate)
            }
        };

        if let Err(defect) = settlement.verify(self.config.tolerance) {
            debug_assert!(false, "{defect}");
            error!(defect = %defect, "settlement conservation check failed");
        }

        info!(
            outcome = %settlement.outcome,
            winners = settlement.records.len(),
            total_pool = %settlement.total_pool,
            fees = %settlement.fees,
            total_payout = %settlement.total_payout,
            "pool settled"
        );

        Ok(settlement)
    }

    /// What would a hypothetical stake win if the outcome resolved now?
    ///
    /// Runs on an isolated copy of this engine; the live ledger and its
    /// id counter are never touched. A losing hypothetical yields a
    /// zero-valued record, not an error.
    pub fn pro_forma_return(
        &self,
        event: PoolEvent,
        amount: Decimal,
        outcome: &Outcome,
    ) -> Result<SettlementRecord, PoolError> {
        let mut scratch = self.clone();
        let id = scratch.stake(event, amount, PRO_FORMA_OWNER)?;

        let fee_rate = if self.config.pro_forma_fees {
            self.config.fee_rate
        } else {
            Decimal::ZERO
        };
        let settlement = scratch.settle_with_fee(outcome, fee_rate)?;

        if let Some(record) = settlement.records.get(&id) {
            return Ok(record.clone());
        }
        Ok(SettlementRecord::lost(Position::new(
            id,
            amount,
            PRO_FORMA_OWNER,
            self.accounts.pool_account(),
        )))
    }

    /// Sweep a hypothetical stake across every enumerated outcome level,
    /// producing the full payoff profile for display or analysis.
    pub fn payoff_curve(
        &self,
        event: PoolEvent,
        amount: Decimal,
    ) -> Result<BTreeMap<Outcome, Decimal>, PoolError> {
        let mut curve = BTreeMap::new();
        for level in self.enumerate_outcome_levels() {
            let record = self.pro_forma_return(event.clone(), amount, &level)?;
            curve.insert(level, record.payoff_multiple);
        }
        Ok(curve)
    }
}
