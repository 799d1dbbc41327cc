//! Property-based conservation and isolation checks
//!
//! For any ledger and any outcome: settlement never creates or destroys
//! value beyond the stated fee, reweighting stays zero-sum among winners,
//! and the pro-forma path never touches live state.

use std::sync::Arc;

use pool_engine::accounts::StaticAccounts;
use pool_engine::engine::PoolEngine;
use pool_types::event::{Outcome, PoolEvent, PoolKind, Side};
use proptest::prelude::*;
use rust_decimal::Decimal;

const CATEGORIES: [&str; 3] = ["alpha", "beta", "gamma"];

fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < Decimal::from_str_exact("0.01").unwrap()
}

fn categorical_engine(stakes: &[(usize, u32)]) -> PoolEngine {
    let mut engine = PoolEngine::new(PoolKind::Categorical, Arc::new(StaticAccounts::default()));
    for (category, amount) in stakes {
        engine
            .stake(
                PoolEvent::categorical(CATEGORIES[*category]),
                Decimal::from(*amount),
                "prop",
            )
            .unwrap();
    }
    engine
}

fn threshold_engine(stakes: &[(bool, i64, u32)]) -> PoolEngine {
    let mut engine = PoolEngine::new(PoolKind::Threshold, Arc::new(StaticAccounts::default()));
    for (is_long, level, amount) in stakes {
        let side = if *is_long { Side::Long } else { Side::Short };
        engine
            .stake(
                PoolEvent::threshold(side, *level),
                Decimal::from(*amount),
                "prop",
            )
            .unwrap();
    }
    engine
}

proptest! {
    #[test]
    fn categorical_settlement_conserves_the_pool(
        stakes in prop::collection::vec((0usize..3, 1u32..100_000), 1..20),
        winner in 0usize..3,
    ) {
        let engine = categorical_engine(&stakes);
        let outcome = Outcome::Category(CATEGORIES[winner].into());
        let settlement = engine.settle(&outcome).unwrap();

        if settlement.has_winners() {
            let paid: Decimal = settlement.records.values().map(|r| r.payout()).sum();
            prop_assert!(close(paid + settlement.fees, settlement.total_pool));
        } else {
            // Degenerate: nothing staked on the winner, nothing paid
            prop_assert_eq!(engine.total_winning_amount(&outcome), Decimal::ZERO);
            prop_assert_eq!(settlement.total_payout, Decimal::ZERO);
        }
    }

    #[test]
    fn categorical_winners_share_one_multiple(
        stakes in prop::collection::vec((0usize..3, 1u32..100_000), 2..20),
        winner in 0usize..3,
    ) {
        let engine = categorical_engine(&stakes);
        let outcome = Outcome::Category(CATEGORIES[winner].into());
        let settlement = engine.settle(&outcome).unwrap();

        let mut multiples = settlement.records.values().map(|r| r.payoff_multiple);
        if let Some(first) = multiples.next() {
            prop_assert!(multiples.all(|m| m == first));
        }
    }

    #[test]
    fn threshold_settlement_conserves_the_pool(
        stakes in prop::collection::vec((any::<bool>(), -50i64..50, 1u32..100_000), 1..20),
        outcome_level in -60i64..60,
    ) {
        let engine = threshold_engine(&stakes);
        let outcome = Outcome::Level(outcome_level);
        let settlement = engine.settle(&outcome).unwrap();

        if settlement.has_winners() {
            let paid: Decimal = settlement.records.values().map(|r| r.payout()).sum();
            let prima_facie: Decimal = settlement
                .records
                .values()
                .filter_map(|r| r.weighting.as_ref())
                .map(|w| w.prima_facie_payout)
                .sum();

            // Fees come off the pool before redistribution...
            prop_assert!(close(prima_facie + settlement.fees, settlement.total_pool));
            // ...and the distance reweighting is zero-sum among winners
            prop_assert!(close(paid, prima_facie));
        }
    }

    #[test]
    fn threshold_redistribution_repartitions_winning_stake(
        stakes in prop::collection::vec((any::<bool>(), -50i64..50, 1u32..100_000), 1..20),
        outcome_level in -60i64..60,
    ) {
        let engine = threshold_engine(&stakes);
        let settlement = engine.settle(&Outcome::Level(outcome_level)).unwrap();

        if settlement.has_winners() {
            let redistributed: Decimal = settlement
                .records
                .values()
                .filter_map(|r| r.weighting.as_ref())
                .map(|w| w.redistributed_amount)
                .sum();
            prop_assert!(close(redistributed, settlement.winning_stake));
        }
    }

    #[test]
    fn settle_is_idempotent(
        stakes in prop::collection::vec((any::<bool>(), -50i64..50, 1u32..100_000), 1..20),
        outcome_level in -60i64..60,
    ) {
        let engine = threshold_engine(&stakes);
        let outcome = Outcome::Level(outcome_level);
        let first = engine.settle(&outcome).unwrap();
        let second = engine.settle(&outcome).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn pro_forma_never_mutates_live_state(
        stakes in prop::collection::vec((any::<bool>(), -50i64..50, 1u32..100_000), 1..20),
        hypothetical_level in -50i64..50,
        hypothetical_amount in 1u32..100_000,
        outcome_level in -60i64..60,
    ) {
        let engine = threshold_engine(&stakes);
        let before_pool = engine.total_pool();
        let before_len = engine.ledger().len();
        let before_next = engine.ledger().next_id();

        engine
            .pro_forma_return(
                PoolEvent::threshold(Side::Long, hypothetical_level),
                Decimal::from(hypothetical_amount),
                &Outcome::Level(outcome_level),
            )
            .unwrap();

        prop_assert_eq!(engine.total_pool(), before_pool);
        prop_assert_eq!(engine.ledger().len(), before_len);
        prop_assert_eq!(engine.ledger().next_id(), before_next);
    }

    #[test]
    fn equality_at_the_threshold_loses_for_both_sides(
        level in -50i64..50,
        amount in 1u32..100_000,
    ) {
        let stakes = [(true, level, amount), (false, level, amount)];
        let engine = threshold_engine(&stakes);

        let outcome = Outcome::Level(level);
        prop_assert_eq!(engine.count_winning(&outcome), 0);

        let settlement = engine.settle(&outcome).unwrap();
        prop_assert!(!settlement.has_winners());
    }
}
