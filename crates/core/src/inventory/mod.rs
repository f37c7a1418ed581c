//! Commodities and moving-average inventory costing.

pub mod commodity;
pub mod engine;
pub mod error;
pub mod position;

#[cfg(test)]
mod props;

pub use commodity::{Commodity, DEFAULT_BASE_UNIT};
pub use engine::CostingEngine;
pub use error::InventoryError;
pub use position::InventoryPosition;
