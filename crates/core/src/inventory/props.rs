//! Property-based tests for moving-average costing.

use granary_shared::types::CommodityId;
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use super::position::InventoryPosition;
use crate::amount::{round_money, COST_SCALE};

/// Quantities from 0.0001 to 100,000 in base units.
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Unit costs from 0.01 to 10,000.
fn unit_cost() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn funded_position() -> impl Strategy<Value = InventoryPosition> {
    (quantity(), unit_cost()).prop_map(|(qty, cost)| {
        let mut pos = InventoryPosition::empty(CommodityId::new());
        // Non-negative inputs never fail.
        let _ = pos.receive(qty, cost);
        pos
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// New average equals the weighted formula, to cost scale.
    #[test]
    fn prop_receipt_matches_weighted_average(
        start in funded_position(),
        qty in quantity(),
        cost in unit_cost(),
    ) {
        let mut pos = start.clone();
        let avg = pos.receive(qty, cost).unwrap();

        let expected = (start.stock * start.average_cost + qty * cost) / (start.stock + qty);
        let tolerance = Decimal::new(5, COST_SCALE + 1);
        prop_assert!((avg - expected).abs() <= tolerance, "avg {} expected {}", avg, expected);
        prop_assert_eq!(pos.stock, start.stock + qty);
        prop_assert_eq!(pos.carrying_value, start.carrying_value + round_money(qty * cost));
    }

    /// The average always lies between the old average and the new cost.
    #[test]
    fn prop_average_is_bounded(
        start in funded_position(),
        qty in quantity(),
        cost in unit_cost(),
    ) {
        let mut pos = start.clone();
        let avg = pos.receive(qty, cost).unwrap();
        let low = start.average_cost.min(cost);
        let high = start.average_cost.max(cost);
        let tolerance = Decimal::new(1, COST_SCALE);
        prop_assert!(avg >= low - tolerance && avg <= high + tolerance);
    }

    /// Issue lowers stock by the quantity, keeps the average unless stock
    /// is exhausted, and charges `qty * average` or, when it empties the
    /// position, the remaining carrying value.
    #[test]
    fn prop_issue_effect(
        start in funded_position(),
        fraction in 1u32..=100u32,
    ) {
        let qty = (start.stock * Decimal::from(fraction) / Decimal::from(100)).round_dp(4);
        prop_assume!(qty <= start.stock);

        let mut pos = start.clone();
        let cogs = pos.issue(qty).unwrap();

        prop_assert_eq!(pos.stock, start.stock - qty);
        prop_assert_eq!(pos.carrying_value, start.carrying_value - cogs);
        if pos.stock.is_zero() {
            prop_assert_eq!(cogs, start.carrying_value);
            prop_assert_eq!(pos.average_cost, Decimal::ZERO);
            prop_assert_eq!(pos.carrying_value, Decimal::ZERO);
        } else {
            prop_assert_eq!(cogs, round_money(qty * start.average_cost).min(start.carrying_value));
            prop_assert_eq!(pos.average_cost, start.average_cost);
        }
    }

    /// Selling everything in several slices relieves exactly the value
    /// that was received.
    #[test]
    fn prop_draining_relieves_all_value(
        start in funded_position(),
        qty in quantity(),
        cost in unit_cost(),
        parts in 1u32..=5u32,
    ) {
        let mut pos = start;
        pos.receive(qty, cost).unwrap();
        let received = pos.carrying_value;

        let slice = (pos.stock / Decimal::from(parts))
            .round_dp_with_strategy(4, RoundingStrategy::ToZero);
        let mut relieved = Decimal::ZERO;
        for _ in 1..parts {
            relieved += pos.issue(slice).unwrap();
        }
        let rest = pos.stock;
        relieved += pos.issue(rest).unwrap();

        prop_assert_eq!(relieved, received);
        prop_assert!(pos.stock.is_zero());
        prop_assert!(pos.carrying_value.is_zero());
        prop_assert!(pos.average_cost.is_zero());
    }

    /// Issuing more than the stock fails and changes nothing.
    #[test]
    fn prop_overdraw_rejected(
        start in funded_position(),
        extra in quantity(),
    ) {
        let mut pos = start.clone();
        prop_assert!(pos.issue(start.stock + extra).is_err());
        prop_assert_eq!(pos, start);
    }
}
