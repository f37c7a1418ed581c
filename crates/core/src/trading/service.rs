//! Trading service: validation and planning for the trading workflows.
//!
//! The service is pure. It validates a request against the looked-up
//! commodity, party and inventory position, and returns a plan holding
//! the business record, the position after costing and the balanced
//! journal batch. Executors (the in-memory [`TradingBook`](super::TradingBook)
//! and the PostgreSQL repository) apply a plan atomically.

use granary_shared::types::{CommodityId, ExpenseId, PartyId, PurchaseId, SaleId};
use rust_decimal::Decimal;

use super::error::TradingError;
use super::roles::AccountRoles;
use super::types::{
    ExpenseRecord, ExpenseRequest, ExpenseResult, Party, PaymentStatus, PurchaseRecord,
    PurchaseRequest, PurchaseResult, SaleRecord, SaleRequest, SaleResult,
};
use crate::amount::round_money;
use crate::inventory::{Commodity, InventoryPosition};
use crate::ledger::{JournalBatch, JournalTotals, SourceType};

/// Quantity and price converted to base units, plus the money total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeQuantities {
    /// Quantity in base units.
    pub quantity: Decimal,
    /// Price per base unit.
    pub unit_price: Decimal,
    /// `quantity * price` in the quoted unit, rounded to money scale.
    pub total: Decimal,
}

/// Everything a purchase writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasePlan {
    /// Purchase record to persist.
    pub record: PurchaseRecord,
    /// Inventory position after the receipt.
    pub position: InventoryPosition,
    /// Dr Inventory / Cr Accounts Payable.
    pub journal: JournalBatch,
}

impl PurchasePlan {
    /// The caller-facing result.
    #[must_use]
    pub fn result(&self) -> PurchaseResult {
        PurchaseResult {
            purchase_id: self.record.id,
            total_cost: self.record.total_cost,
            average_cost: self.position.average_cost,
        }
    }
}

/// Everything a sale writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    /// Sale record to persist.
    pub record: SaleRecord,
    /// Inventory position after the issue.
    pub position: InventoryPosition,
    /// Dr AR / Cr Revenue, then Dr COGS / Cr Inventory.
    pub journal: JournalBatch,
}

impl SalePlan {
    /// The caller-facing result.
    #[must_use]
    pub fn result(&self) -> SaleResult {
        SaleResult {
            sale_id: self.record.id,
            total_sale_amount: self.record.total_amount,
            cogs: self.record.cogs,
        }
    }
}

/// Everything an expense voucher writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpensePlan {
    /// Expense record to persist.
    pub record: ExpenseRecord,
    /// Dr expense account / Cr cash or bank account.
    pub journal: JournalBatch,
}

impl ExpensePlan {
    /// The caller-facing result.
    #[must_use]
    pub fn result(&self) -> ExpenseResult {
        ExpenseResult {
            expense_id: self.record.id,
        }
    }
}

/// Trading service for workflow validation and planning.
pub struct TradingService;

impl TradingService {
    /// Checks the commodity exists and can be traded.
    ///
    /// # Errors
    ///
    /// Returns `CommodityNotFound` or `CommodityInactive`.
    pub fn require_commodity(
        commodity: Option<&Commodity>,
        id: CommodityId,
    ) -> Result<&Commodity, TradingError> {
        let commodity = commodity
            .filter(|c| c.id == id)
            .ok_or(TradingError::CommodityNotFound(id))?;
        if !commodity.is_active {
            return Err(TradingError::CommodityInactive(id));
        }
        Ok(commodity)
    }

    /// Checks the party exists and is flagged as a supplier.
    ///
    /// # Errors
    ///
    /// Returns `SupplierNotFound`.
    pub fn require_supplier(party: Option<&Party>, id: PartyId) -> Result<&Party, TradingError> {
        party
            .filter(|p| p.id == id && p.is_supplier)
            .ok_or(TradingError::SupplierNotFound(id))
    }

    /// Checks the party exists and is flagged as a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`.
    pub fn require_customer(party: Option<&Party>, id: PartyId) -> Result<&Party, TradingError> {
        party
            .filter(|p| p.id == id && p.is_customer)
            .ok_or(TradingError::CustomerNotFound(id))
    }

    /// Validates a quoted quantity and price and converts them to base units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity`, `InvalidPrice`, `UnknownUnit`,
    /// `InvalidAmount` when the total rounds to zero, or `AmountOutOfRange`
    /// when a figure cannot be represented.
    pub fn normalize(
        commodity: &Commodity,
        quantity: Decimal,
        price: Decimal,
        unit: Option<&str>,
    ) -> Result<TradeQuantities, TradingError> {
        if quantity <= Decimal::ZERO {
            return Err(TradingError::InvalidQuantity(quantity));
        }
        if price <= Decimal::ZERO {
            return Err(TradingError::InvalidPrice(price));
        }

        let unit = unit.unwrap_or(commodity.base_unit.as_str());
        let base_quantity = commodity.to_base_quantity(unit, quantity)?;
        let base_price = commodity.to_base_price(unit, price)?;
        if base_quantity.is_zero() {
            return Err(TradingError::InvalidQuantity(base_quantity));
        }

        let total = quantity
            .checked_mul(price)
            .map(round_money)
            .ok_or(TradingError::AmountOutOfRange(commodity.id))?;
        if total.is_zero() {
            return Err(TradingError::InvalidAmount(total));
        }

        Ok(TradeQuantities {
            quantity: base_quantity,
            unit_price: base_price,
            total,
        })
    }

    /// Checks `quantity` can be issued from `position`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock`.
    pub fn check_stock(position: &InventoryPosition, quantity: Decimal) -> Result<(), TradingError> {
        if position.can_issue(quantity) {
            Ok(())
        } else {
            Err(TradingError::InsufficientStock {
                commodity_id: position.commodity_id,
                requested: quantity,
                available: position.stock,
            })
        }
    }

    /// Plans a purchase: receipt at the purchase price, then
    /// Dr Inventory / Cr Accounts Payable for the total cost.
    ///
    /// # Errors
    ///
    /// Returns a validation error; nothing has been written.
    pub fn plan_purchase(
        commodity: Option<&Commodity>,
        supplier: Option<&Party>,
        position: &InventoryPosition,
        roles: &AccountRoles,
        request: &PurchaseRequest,
    ) -> Result<PurchasePlan, TradingError> {
        let commodity = Self::require_commodity(commodity, request.commodity_id)?;
        let supplier = Self::require_supplier(supplier, request.supplier_id)?;
        let trade = Self::normalize(
            commodity,
            request.quantity,
            request.unit_price,
            request.unit.as_deref(),
        )?;

        let mut position = position.clone();
        position.receive_valued(trade.quantity, trade.unit_price, trade.total)?;

        let record = PurchaseRecord {
            id: PurchaseId::new(),
            commodity_id: commodity.id,
            supplier_id: supplier.id,
            purchase_date: request.date,
            quantity: trade.quantity,
            unit_price: trade.unit_price,
            total_cost: trade.total,
            payment_status: PaymentStatus::Pending,
        };

        let description = format!(
            "Purchase of {}{} of {} from {}",
            trade.quantity.normalize(),
            commodity.base_unit,
            commodity.name,
            supplier.name
        );
        let journal = JournalBatch::new(SourceType::Purchase, record.id.into(), request.date)
            .with_pair(
                roles.inventory,
                roles.accounts_payable,
                trade.total,
                &description,
            );

        Ok(PurchasePlan {
            record,
            position,
            journal,
        })
    }

    /// Plans a sale: stock check, issue at the moving average, then
    /// Dr AR / Cr Revenue for the sale total and Dr COGS / Cr Inventory
    /// for the cost of goods sold.
    ///
    /// The COGS pair is omitted when the cost rounds to zero.
    ///
    /// # Errors
    ///
    /// Returns a validation error or `InsufficientStock`; nothing has been
    /// written.
    pub fn plan_sale(
        commodity: Option<&Commodity>,
        customer: Option<&Party>,
        position: &InventoryPosition,
        roles: &AccountRoles,
        request: &SaleRequest,
    ) -> Result<SalePlan, TradingError> {
        let commodity = Self::require_commodity(commodity, request.commodity_id)?;
        let customer = Self::require_customer(customer, request.customer_id)?;
        let trade = Self::normalize(
            commodity,
            request.quantity,
            request.selling_price,
            request.unit.as_deref(),
        )?;
        Self::check_stock(position, trade.quantity)?;

        let mut position = position.clone();
        let cogs = position.issue(trade.quantity)?;

        let record = SaleRecord {
            id: SaleId::new(),
            commodity_id: commodity.id,
            customer_id: customer.id,
            sale_date: request.date,
            quantity: trade.quantity,
            unit_price: trade.unit_price,
            total_amount: trade.total,
            cogs,
            payment_status: PaymentStatus::Pending,
        };

        let sale_description = format!(
            "Sale of {}{} of {} to {}",
            trade.quantity.normalize(),
            commodity.base_unit,
            commodity.name,
            customer.name
        );
        let mut journal = JournalBatch::new(SourceType::Sale, record.id.into(), request.date)
            .with_pair(
                roles.accounts_receivable,
                roles.sales_revenue,
                trade.total,
                &sale_description,
            );
        if !cogs.is_zero() {
            let cogs_description =
                format!("COGS for sale of {} to {}", commodity.name, customer.name);
            journal.push_pair(
                roles.cost_of_goods_sold,
                roles.inventory,
                cogs,
                &cogs_description,
            );
        }

        Ok(SalePlan {
            record,
            position,
            journal,
        })
    }

    /// Plans an expense voucher: Dr expense account / Cr cash or bank.
    ///
    /// `supplier` is the looked-up party for `request.supplier_id`, if any.
    /// Account existence and activity are checked by the executor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount`, `SameAccount` or `SupplierNotFound`.
    pub fn plan_expense(
        request: &ExpenseRequest,
        supplier: Option<&Party>,
    ) -> Result<ExpensePlan, TradingError> {
        let amount = round_money(request.amount);
        if amount <= Decimal::ZERO {
            return Err(TradingError::InvalidAmount(request.amount));
        }
        if request.debit_account_id == request.credit_account_id {
            return Err(TradingError::SameAccount(request.debit_account_id));
        }
        if let Some(supplier_id) = request.supplier_id {
            Self::require_supplier(supplier, supplier_id)?;
        }

        let record = ExpenseRecord {
            id: ExpenseId::new(),
            expense_date: request.date,
            description: request.description.clone(),
            amount,
            debit_account_id: request.debit_account_id,
            credit_account_id: request.credit_account_id,
            supplier_id: request.supplier_id,
        };

        let description = format!("Expense: {}", request.description);
        let journal = JournalBatch::new(SourceType::Expense, record.id.into(), request.date)
            .with_pair(
                request.debit_account_id,
                request.credit_account_id,
                amount,
                &description,
            );

        Ok(ExpensePlan { record, journal })
    }

    /// Final balance check before commit.
    ///
    /// # Errors
    ///
    /// Returns `ImbalancedEntry` if debits and credits differ.
    pub fn verify_journal(journal: &JournalBatch) -> Result<JournalTotals, TradingError> {
        journal.validate().map_err(TradingError::from)
    }
}
