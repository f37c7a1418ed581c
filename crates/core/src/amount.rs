//! Decimal scales for stored amounts.
//!
//! Storage columns are `NUMERIC(19, 4)` for money and quantities and
//! `NUMERIC(19, 6)` for unit costs. Values are rounded here, before they
//! reach the ledger or the inventory table, so in-memory and persisted
//! state never disagree.

use rust_decimal::Decimal;

/// Scale for monetary amounts (totals, COGS, debits, credits, balances).
pub const MONEY_SCALE: u32 = 2;

/// Scale for average and per-unit costs.
pub const COST_SCALE: u32 = 6;

/// Scale for commodity quantities.
pub const QUANTITY_SCALE: u32 = 4;

/// Rounds a monetary amount using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(MONEY_SCALE)
}

/// Rounds a unit cost using Banker's Rounding.
#[must_use]
pub fn round_cost(cost: Decimal) -> Decimal {
    cost.round_dp(COST_SCALE)
}

/// Rounds a quantity using Banker's Rounding.
#[must_use]
pub fn round_quantity(quantity: Decimal) -> Decimal {
    quantity.round_dp(QUANTITY_SCALE)
}
