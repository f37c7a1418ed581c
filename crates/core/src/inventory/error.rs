//! Inventory costing errors.

use granary_shared::types::CommodityId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the costing engine and unit conversion.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Quantity below zero.
    #[error("Quantity cannot be negative: {0}")]
    NegativeQuantity(Decimal),

    /// Unit cost below zero.
    #[error("Unit cost cannot be negative: {0}")]
    NegativeCost(Decimal),

    /// Issue larger than stock on hand.
    #[error("Insufficient stock for commodity {commodity_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Commodity being issued.
        commodity_id: CommodityId,
        /// Quantity requested, in base units.
        requested: Decimal,
        /// Stock on hand, in base units.
        available: Decimal,
    },

    /// Pricing unit not allowed for the commodity.
    #[error("Unit '{unit}' is not allowed for commodity {commodity_id}")]
    UnknownUnit {
        /// Commodity the unit was used with.
        commodity_id: CommodityId,
        /// The rejected unit.
        unit: String,
    },

    /// Quantity or value too large to cost.
    #[error("Quantity or value out of range for commodity {commodity_id}")]
    AmountOutOfRange {
        /// Commodity being costed or converted.
        commodity_id: CommodityId,
    },

    /// Conversion factor must be positive.
    #[error("Conversion factor for unit '{unit}' must be positive, got {factor}")]
    InvalidConversionFactor {
        /// Unit being registered.
        unit: String,
        /// The rejected factor.
        factor: Decimal,
    },
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeQuantity(_) => "NEGATIVE_QUANTITY",
            Self::NegativeCost(_) => "NEGATIVE_COST",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::UnknownUnit { .. } => "UNKNOWN_UNIT",
            Self::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            Self::InvalidConversionFactor { .. } => "INVALID_CONVERSION_FACTOR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InsufficientStock { .. } => 422,
            _ => 400,
        }
    }
}
