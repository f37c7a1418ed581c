//! Moving-average inventory position for one commodity.

use granary_shared::types::CommodityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InventoryError;
use crate::amount::{round_cost, round_money};

/// Stock on hand, weighted average unit cost and carrying value.
///
/// `stock` and `average_cost` are in base units. `carrying_value` is the
/// money-scale amount this commodity contributes to the inventory account:
/// receipts add what was debited, issues subtract what was credited.
///
/// None of the three is ever negative, and `average_cost` and
/// `carrying_value` are both zero whenever `stock` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPosition {
    /// Commodity this position tracks.
    pub commodity_id: CommodityId,
    /// Quantity on hand.
    pub stock: Decimal,
    /// Weighted average cost per base unit.
    pub average_cost: Decimal,
    /// Value carried on the inventory account for this commodity.
    pub carrying_value: Decimal,
}

impl InventoryPosition {
    /// Creates an empty position.
    #[must_use]
    pub fn empty(commodity_id: CommodityId) -> Self {
        Self {
            commodity_id,
            stock: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            carrying_value: Decimal::ZERO,
        }
    }

    /// Receives stock at `unit_cost`, updating the moving average.
    ///
    /// The carrying value grows by `quantity * unit_cost` at money scale.
    /// Returns the new average cost.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity`, `NegativeCost` or `AmountOutOfRange`.
    pub fn receive(&mut self, quantity: Decimal, unit_cost: Decimal) -> Result<Decimal, InventoryError> {
        let value = quantity
            .checked_mul(unit_cost)
            .map(round_money)
            .ok_or_else(|| self.out_of_range())?;
        self.receive_valued(quantity, unit_cost, value)
    }

    /// Receives stock at `unit_cost`, booking `value` as its carrying value.
    ///
    /// Used when the amount debited to the inventory account was computed
    /// from the quoted rather than the base-unit figures.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity`, `NegativeCost` or `AmountOutOfRange`; the
    /// position is unchanged on error.
    pub fn receive_valued(
        &mut self,
        quantity: Decimal,
        unit_cost: Decimal,
        value: Decimal,
    ) -> Result<Decimal, InventoryError> {
        if quantity < Decimal::ZERO {
            return Err(InventoryError::NegativeQuantity(quantity));
        }
        if unit_cost < Decimal::ZERO {
            return Err(InventoryError::NegativeCost(unit_cost));
        }
        if value < Decimal::ZERO {
            return Err(InventoryError::NegativeCost(value));
        }

        let total_value = self
            .stock
            .checked_mul(self.average_cost)
            .zip(quantity.checked_mul(unit_cost))
            .and_then(|(current, incoming)| current.checked_add(incoming))
            .ok_or_else(|| self.out_of_range())?;
        let new_stock = self
            .stock
            .checked_add(quantity)
            .ok_or_else(|| self.out_of_range())?;
        let carrying_value = self
            .carrying_value
            .checked_add(value)
            .ok_or_else(|| self.out_of_range())?;

        let average_cost = if new_stock > Decimal::ZERO {
            total_value
                .checked_div(new_stock)
                .map(round_cost)
                .ok_or_else(|| self.out_of_range())?
        } else {
            Decimal::ZERO
        };

        self.stock = new_stock;
        self.average_cost = average_cost;
        self.carrying_value = carrying_value;
        Ok(self.average_cost)
    }

    /// Returns true if `quantity` can be issued.
    #[must_use]
    pub fn can_issue(&self, quantity: Decimal) -> bool {
        quantity <= self.stock
    }

    /// Issues stock at the current average cost.
    ///
    /// Returns the cost of goods issued at money scale: `quantity * average`,
    /// or the whole remaining carrying value when the issue empties the
    /// position, so no value outlives the stock.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity`, `InsufficientStock` or `AmountOutOfRange`;
    /// the position is unchanged on error.
    pub fn issue(&mut self, quantity: Decimal) -> Result<Decimal, InventoryError> {
        if quantity < Decimal::ZERO {
            return Err(InventoryError::NegativeQuantity(quantity));
        }
        if !self.can_issue(quantity) {
            return Err(InventoryError::InsufficientStock {
                commodity_id: self.commodity_id,
                requested: quantity,
                available: self.stock,
            });
        }

        let remaining = self.stock - quantity;
        let cogs = if remaining.is_zero() {
            self.carrying_value
        } else {
            quantity
                .checked_mul(self.average_cost)
                .map(round_money)
                .ok_or_else(|| self.out_of_range())?
                .min(self.carrying_value)
        };

        self.stock = remaining;
        self.carrying_value -= cogs;
        if self.stock.is_zero() {
            self.average_cost = Decimal::ZERO;
        }
        Ok(cogs)
    }

    fn out_of_range(&self) -> InventoryError {
        InventoryError::AmountOutOfRange {
            commodity_id: self.commodity_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(stock: Decimal, average_cost: Decimal, carrying_value: Decimal) -> InventoryPosition {
        InventoryPosition {
            commodity_id: CommodityId::new(),
            stock,
            average_cost,
            carrying_value,
        }
    }

    #[test]
    fn test_receipts_average() {
        let mut pos = InventoryPosition::empty(CommodityId::new());
        assert_eq!(pos.receive(dec!(100), dec!(2.00)).unwrap(), dec!(2.00));
        let avg = pos.receive(dec!(50), dec!(4.00)).unwrap();
        assert_eq!(pos.stock, dec!(150));
        assert_eq!(avg, dec!(2.666667));
        assert_eq!(pos.carrying_value, dec!(400.00));
    }

    #[test]
    fn test_receive_valued_books_given_value() {
        let mut pos = InventoryPosition::empty(CommodityId::new());
        // 2 ton at 1,800.01 per ton, costed per kg.
        pos.receive_valued(dec!(2000), dec!(1.800010), dec!(3600.02)).unwrap();
        assert_eq!(pos.average_cost, dec!(1.80001));
        assert_eq!(pos.carrying_value, dec!(3600.02));
    }

    #[test]
    fn test_issue_keeps_average() {
        let mut pos = position(dec!(150), dec!(2.666667), dec!(400.00));
        let cogs = pos.issue(dec!(60)).unwrap();
        assert_eq!(cogs, dec!(160.00));
        assert_eq!(pos.stock, dec!(90));
        assert_eq!(pos.average_cost, dec!(2.666667));
        assert_eq!(pos.carrying_value, dec!(240.00));
    }

    #[test]
    fn test_issue_to_zero_resets_average() {
        let mut pos = position(dec!(90), dec!(2.666667), dec!(240.00));
        let cogs = pos.issue(dec!(90)).unwrap();
        assert_eq!(cogs, dec!(240.00));
        assert_eq!(pos.stock, Decimal::ZERO);
        assert_eq!(pos.average_cost, Decimal::ZERO);
        assert_eq!(pos.carrying_value, Decimal::ZERO);
    }

    #[test]
    fn test_draining_issues_relieve_whole_carrying_value() {
        let mut pos = InventoryPosition::empty(CommodityId::new());
        pos.receive(dec!(1), dec!(0.01)).unwrap();
        pos.receive(dec!(1), dec!(0.01)).unwrap();
        pos.receive(dec!(1), dec!(0.02)).unwrap();
        assert_eq!(pos.average_cost, dec!(0.013333));
        assert_eq!(pos.carrying_value, dec!(0.04));

        let cogs: Vec<_> = (0..3).map(|_| pos.issue(dec!(1)).unwrap()).collect();
        assert_eq!(cogs, vec![dec!(0.01), dec!(0.01), dec!(0.02)]);
        assert_eq!(pos.carrying_value, Decimal::ZERO);
        assert_eq!(pos.average_cost, Decimal::ZERO);
    }

    #[test]
    fn test_insufficient_stock_leaves_position() {
        let mut pos = position(dec!(90), dec!(2.666667), dec!(240.00));
        let before = pos.clone();
        let err = pos.issue(dec!(200)).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientStock { requested, available, .. }
                if requested == dec!(200) && available == dec!(90)
        ));
        assert_eq!(pos, before);
    }

    #[test]
    fn test_zero_receipt_on_empty_position() {
        let mut pos = InventoryPosition::empty(CommodityId::new());
        assert_eq!(pos.receive(Decimal::ZERO, dec!(5)).unwrap(), Decimal::ZERO);
        assert_eq!(pos.stock, Decimal::ZERO);
        assert_eq!(pos.carrying_value, Decimal::ZERO);
    }

    #[test]
    fn test_huge_receipt_is_out_of_range() {
        let mut pos = InventoryPosition::empty(CommodityId::new());
        pos.receive(dec!(100), dec!(2.00)).unwrap();
        let before = pos.clone();

        assert!(matches!(
            pos.receive(Decimal::MAX, dec!(2)),
            Err(InventoryError::AmountOutOfRange { .. })
        ));
        assert!(matches!(
            pos.receive_valued(Decimal::MAX, Decimal::ZERO, Decimal::ZERO),
            Err(InventoryError::AmountOutOfRange { .. })
        ));
        assert_eq!(pos, before);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let mut pos = InventoryPosition::empty(CommodityId::new());
        assert!(matches!(
            pos.receive(dec!(-1), dec!(2)),
            Err(InventoryError::NegativeQuantity(_))
        ));
        assert!(matches!(
            pos.receive(dec!(1), dec!(-2)),
            Err(InventoryError::NegativeCost(_))
        ));
        assert!(matches!(
            pos.issue(dec!(-1)),
            Err(InventoryError::NegativeQuantity(_))
        ));
    }
}
