//! Traded commodities and their pricing units.

use std::collections::BTreeMap;

use granary_shared::types::CommodityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InventoryError;
use crate::amount::{round_cost, round_quantity};

/// Default base unit for bulk goods.
pub const DEFAULT_BASE_UNIT: &str = "kg";

/// A traded commodity.
///
/// Stock and average cost are always kept in `base_unit`. Purchases and
/// sales may be quoted in any allowed pricing unit, which is converted
/// through `conversion_factors` (base units per one pricing unit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    /// Unique identifier.
    pub id: CommodityId,
    /// Unique display name.
    pub name: String,
    /// Unit stock is counted in.
    pub base_unit: String,
    /// Units purchases and sales may be quoted in.
    pub allowed_pricing_units: Vec<String>,
    /// Base units per one pricing unit.
    pub conversion_factors: BTreeMap<String, Decimal>,
    /// Inactive commodities cannot be traded.
    pub is_active: bool,
}

impl Commodity {
    /// Creates an active commodity counted in kilograms.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_base_unit(name, DEFAULT_BASE_UNIT)
    }

    /// Creates an active commodity with a custom base unit.
    #[must_use]
    pub fn with_base_unit(name: impl Into<String>, base_unit: impl Into<String>) -> Self {
        let base_unit = base_unit.into();
        Self {
            id: CommodityId::new(),
            name: name.into(),
            allowed_pricing_units: vec![base_unit.clone()],
            conversion_factors: BTreeMap::from([(base_unit.clone(), Decimal::ONE)]),
            base_unit,
            is_active: true,
        }
    }

    /// Registers a pricing unit worth `factor` base units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConversionFactor` if `factor` is not positive.
    pub fn add_unit(&mut self, unit: impl Into<String>, factor: Decimal) -> Result<(), InventoryError> {
        let unit = unit.into();
        if factor <= Decimal::ZERO {
            return Err(InventoryError::InvalidConversionFactor { unit, factor });
        }
        if !self.allowed_pricing_units.contains(&unit) {
            self.allowed_pricing_units.push(unit.clone());
        }
        self.conversion_factors.insert(unit, factor);
        Ok(())
    }

    /// Base units per one `unit`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownUnit` if the unit is not allowed or has no factor.
    pub fn factor_for(&self, unit: &str) -> Result<Decimal, InventoryError> {
        if unit == self.base_unit {
            return Ok(Decimal::ONE);
        }
        self.allowed_pricing_units
            .iter()
            .any(|u| u == unit)
            .then(|| self.conversion_factors.get(unit).copied())
            .flatten()
            .ok_or_else(|| InventoryError::UnknownUnit {
                commodity_id: self.id,
                unit: unit.to_string(),
            })
    }

    /// Converts a quantity quoted in `unit` to base units.
    ///
    /// # Errors
    ///
    /// Returns `UnknownUnit` if the unit is not allowed, or
    /// `AmountOutOfRange` if the converted quantity cannot be represented.
    pub fn to_base_quantity(&self, unit: &str, quantity: Decimal) -> Result<Decimal, InventoryError> {
        quantity
            .checked_mul(self.factor_for(unit)?)
            .map(round_quantity)
            .ok_or(InventoryError::AmountOutOfRange { commodity_id: self.id })
    }

    /// Converts a price per `unit` to a price per base unit.
    ///
    /// # Errors
    ///
    /// Returns `UnknownUnit` if the unit is not allowed, or
    /// `AmountOutOfRange` if the converted price cannot be represented.
    pub fn to_base_price(&self, unit: &str, price: Decimal) -> Result<Decimal, InventoryError> {
        price
            .checked_div(self.factor_for(unit)?)
            .map(round_cost)
            .ok_or(InventoryError::AmountOutOfRange { commodity_id: self.id })
    }
}
