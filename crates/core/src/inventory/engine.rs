//! In-memory costing engine keyed by commodity.

use std::collections::BTreeMap;

use granary_shared::types::CommodityId;
use rust_decimal::Decimal;

use super::error::InventoryError;
use super::position::InventoryPosition;

/// One inventory position per commodity, created lazily.
#[derive(Debug, Clone, Default)]
pub struct CostingEngine {
    positions: BTreeMap<CommodityId, InventoryPosition>,
}

impl CostingEngine {
    /// Creates an engine with no positions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commodity's position, creating an empty one if absent.
    pub fn get_or_create_position(&mut self, commodity_id: CommodityId) -> &mut InventoryPosition {
        self.positions
            .entry(commodity_id)
            .or_insert_with(|| InventoryPosition::empty(commodity_id))
    }

    /// Returns the commodity's position if one exists.
    #[must_use]
    pub fn position(&self, commodity_id: CommodityId) -> Option<&InventoryPosition> {
        self.positions.get(&commodity_id)
    }

    /// Snapshot of a position, empty if none was created yet.
    #[must_use]
    pub fn snapshot(&self, commodity_id: CommodityId) -> InventoryPosition {
        self.position(commodity_id)
            .cloned()
            .unwrap_or_else(|| InventoryPosition::empty(commodity_id))
    }

    /// Receives stock and returns the new average cost.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity`, `NegativeCost` or `AmountOutOfRange`.
    pub fn record_receipt(
        &mut self,
        commodity_id: CommodityId,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<Decimal, InventoryError> {
        self.get_or_create_position(commodity_id)
            .receive(quantity, unit_cost)
    }

    /// Issues stock and returns the cost of goods issued at money scale.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity`, `InsufficientStock` or `AmountOutOfRange`.
    pub fn record_issue(
        &mut self,
        commodity_id: CommodityId,
        quantity: Decimal,
    ) -> Result<Decimal, InventoryError> {
        self.get_or_create_position(commodity_id).issue(quantity)
    }

    /// Replaces a position wholesale.
    pub fn store(&mut self, position: InventoryPosition) {
        self.positions.insert(position.commodity_id, position);
    }

    /// Every position, in commodity id order.
    pub fn positions(&self) -> impl Iterator<Item = &InventoryPosition> {
        self.positions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lazy_creation() {
        let mut engine = CostingEngine::new();
        let id = CommodityId::new();
        assert!(engine.position(id).is_none());
        assert_eq!(engine.snapshot(id).stock, Decimal::ZERO);

        let pos = engine.get_or_create_position(id);
        assert_eq!(pos.stock, Decimal::ZERO);
        assert_eq!(pos.average_cost, Decimal::ZERO);
        assert_eq!(engine.positions().count(), 1);
    }

    #[test]
    fn test_receipt_then_issue() {
        let mut engine = CostingEngine::new();
        let id = CommodityId::new();

        engine.record_receipt(id, dec!(100), dec!(2.00)).unwrap();
        engine.record_receipt(id, dec!(50), dec!(4.00)).unwrap();
        let cogs = engine.record_issue(id, dec!(60)).unwrap();

        assert_eq!(cogs, dec!(160.00));
        let pos = engine.position(id).unwrap();
        assert_eq!(pos.stock, dec!(90));
        assert_eq!(pos.average_cost, dec!(2.666667));
        assert_eq!(pos.carrying_value, dec!(240.00));
    }

    #[test]
    fn test_positions_are_independent() {
        let mut engine = CostingEngine::new();
        let wheat = CommodityId::new();
        let rice = CommodityId::new();

        engine.record_receipt(wheat, dec!(10), dec!(3)).unwrap();
        assert!(matches!(
            engine.record_issue(rice, dec!(1)),
            Err(InventoryError::InsufficientStock { .. })
        ));
        assert_eq!(engine.snapshot(wheat).stock, dec!(10));
    }
}
