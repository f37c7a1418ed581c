//! Trading domain types: parties, requests, records and results.

use chrono::NaiveDate;
use granary_shared::types::{AccountId, CommodityId, ExpenseId, PartyId, PurchaseId, SaleId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A supplier, a customer, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Unique identifier.
    pub id: PartyId,
    /// Display name.
    pub name: String,
    /// May sell to us.
    pub is_supplier: bool,
    /// May buy from us.
    pub is_customer: bool,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

impl Party {
    /// Creates a party with the given capability flags.
    #[must_use]
    pub fn new(name: impl Into<String>, is_supplier: bool, is_customer: bool) -> Self {
        Self {
            id: PartyId::new(),
            name: name.into(),
            is_supplier,
            is_customer,
            phone: None,
            address: None,
            email: None,
        }
    }

    /// Creates a supplier-only party.
    #[must_use]
    pub fn supplier(name: impl Into<String>) -> Self {
        Self::new(name, true, false)
    }

    /// Creates a customer-only party.
    #[must_use]
    pub fn customer(name: impl Into<String>) -> Self {
        Self::new(name, false, true)
    }
}

/// Settlement state of a purchase or sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing settled yet.
    #[default]
    Pending,
    /// Partly settled.
    Partial,
    /// Fully settled.
    Paid,
}

impl PaymentStatus {
    /// Returns the lowercase label stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

/// Request to buy a commodity from a supplier on credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Commodity bought.
    pub commodity_id: CommodityId,
    /// Selling party; must be a supplier.
    pub supplier_id: PartyId,
    /// Business date.
    pub date: NaiveDate,
    /// Quantity, in `unit` (base unit when absent).
    pub quantity: Decimal,
    /// Price per `unit`.
    pub unit_price: Decimal,
    /// Pricing unit the request is quoted in.
    #[serde(default)]
    pub unit: Option<String>,
}

/// Outcome of a committed purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseResult {
    /// New purchase record.
    pub purchase_id: PurchaseId,
    /// Amount posted to inventory and payables.
    pub total_cost: Decimal,
    /// Average unit cost after the receipt.
    pub average_cost: Decimal,
}

/// Persisted purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Unique identifier.
    pub id: PurchaseId,
    /// Commodity bought.
    pub commodity_id: CommodityId,
    /// Supplier.
    pub supplier_id: PartyId,
    /// Business date.
    pub purchase_date: NaiveDate,
    /// Quantity in base units.
    pub quantity: Decimal,
    /// Price per base unit.
    pub unit_price: Decimal,
    /// Total cost.
    pub total_cost: Decimal,
    /// Settlement state.
    pub payment_status: PaymentStatus,
}

/// Request to sell a commodity to a customer on credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    /// Commodity sold.
    pub commodity_id: CommodityId,
    /// Buying party; must be a customer.
    pub customer_id: PartyId,
    /// Business date.
    pub date: NaiveDate,
    /// Quantity, in `unit` (base unit when absent).
    pub quantity: Decimal,
    /// Price per `unit`.
    pub selling_price: Decimal,
    /// Pricing unit the request is quoted in.
    #[serde(default)]
    pub unit: Option<String>,
}

/// Outcome of a committed sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleResult {
    /// New sale record.
    pub sale_id: SaleId,
    /// Amount posted to receivables and revenue.
    pub total_sale_amount: Decimal,
    /// Cost of goods sold posted.
    pub cogs: Decimal,
}

/// Persisted sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Unique identifier.
    pub id: SaleId,
    /// Commodity sold.
    pub commodity_id: CommodityId,
    /// Customer.
    pub customer_id: PartyId,
    /// Business date.
    pub sale_date: NaiveDate,
    /// Quantity in base units.
    pub quantity: Decimal,
    /// Price per base unit.
    pub unit_price: Decimal,
    /// Total sale amount.
    pub total_amount: Decimal,
    /// Cost of goods sold.
    pub cogs: Decimal,
    /// Settlement state.
    pub payment_status: PaymentStatus,
}

/// Request to record an expense voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRequest {
    /// Business date.
    pub date: NaiveDate,
    /// Free text shown on the ledger lines.
    pub description: String,
    /// Voucher amount.
    pub amount: Decimal,
    /// Expense account debited.
    pub debit_account_id: AccountId,
    /// Cash or bank account credited.
    pub credit_account_id: AccountId,
    /// Supplier the expense was paid to.
    #[serde(default)]
    pub supplier_id: Option<PartyId>,
}

/// Outcome of a committed expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseResult {
    /// New expense record.
    pub expense_id: ExpenseId,
}

/// Persisted expense voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier.
    pub id: ExpenseId,
    /// Business date.
    pub expense_date: NaiveDate,
    /// Free text.
    pub description: String,
    /// Voucher amount.
    pub amount: Decimal,
    /// Expense account debited.
    pub debit_account_id: AccountId,
    /// Cash or bank account credited.
    pub credit_account_id: AccountId,
    /// Supplier paid.
    pub supplier_id: Option<PartyId>,
}
