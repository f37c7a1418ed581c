//! In-memory trading book.
//!
//! Executes trading plans against an [`AccountStore`] and a
//! [`CostingEngine`]. Every workflow runs inside [`TradingBook::transaction`],
//! which restores a savepoint when any step fails, so a failed workflow
//! leaves no record, no ledger entry, no balance change and no stock change.

use std::collections::BTreeMap;

use granary_shared::types::{AccountId, CommodityId, PartyId};
use granary_shared::AccountRoleCodes;

use super::error::TradingError;
use super::roles::{default_chart, AccountRoles};
use super::service::{ExpensePlan, PurchasePlan, SalePlan, TradingService};
use super::types::{
    ExpenseRecord, ExpenseRequest, ExpenseResult, Party, PurchaseRecord, PurchaseRequest,
    PurchaseResult, SaleRecord, SaleRequest, SaleResult,
};
use crate::inventory::{Commodity, CostingEngine, InventoryPosition};
use crate::ledger::{AccountStore, LedgerError, StoreCheckpoint};

/// State captured at the start of a unit of work.
#[derive(Debug)]
struct Savepoint {
    accounts: StoreCheckpoint,
    inventory: CostingEngine,
    purchases: usize,
    sales: usize,
    expenses: usize,
}

/// Accounts, inventory and business records for one trading entity.
#[derive(Debug, Clone)]
pub struct TradingBook {
    accounts: AccountStore,
    inventory: CostingEngine,
    commodities: BTreeMap<CommodityId, Commodity>,
    parties: BTreeMap<PartyId, Party>,
    purchases: Vec<PurchaseRecord>,
    sales: Vec<SaleRecord>,
    expenses: Vec<ExpenseRecord>,
    roles: AccountRoles,
}

impl TradingBook {
    /// Opens a book over an existing chart of accounts.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` if a role code has no account.
    pub fn new(accounts: AccountStore, codes: &AccountRoleCodes) -> Result<Self, LedgerError> {
        let roles = AccountRoles::resolve(codes, |code| {
            accounts.find_by_code(code).ok().map(|a| a.id)
        })?;
        Ok(Self {
            accounts,
            inventory: CostingEngine::new(),
            commodities: BTreeMap::new(),
            parties: BTreeMap::new(),
            purchases: Vec::new(),
            sales: Vec::new(),
            expenses: Vec::new(),
            roles,
        })
    }

    /// Opens a book with the default chart of accounts for `codes`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if two roles share a code or name.
    pub fn with_default_chart(codes: &AccountRoleCodes) -> Result<Self, LedgerError> {
        let mut accounts = AccountStore::new();
        for input in default_chart(codes) {
            accounts.ensure_account(input)?;
        }
        Self::new(accounts, codes)
    }

    /// Registers a commodity.
    pub fn add_commodity(&mut self, commodity: Commodity) -> CommodityId {
        let id = commodity.id;
        self.commodities.insert(id, commodity);
        id
    }

    /// Registers a supplier and/or customer.
    pub fn add_party(&mut self, party: Party) -> PartyId {
        let id = party.id;
        self.parties.insert(id, party);
        id
    }

    /// Activates or deactivates a commodity.
    ///
    /// # Errors
    ///
    /// Returns `CommodityNotFound` if absent.
    pub fn set_commodity_active(
        &mut self,
        id: CommodityId,
        active: bool,
    ) -> Result<(), TradingError> {
        let commodity = self
            .commodities
            .get_mut(&id)
            .ok_or(TradingError::CommodityNotFound(id))?;
        commodity.is_active = active;
        Ok(())
    }

    /// The chart of accounts and journal.
    #[must_use]
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Mutable access to the chart of accounts.
    pub fn accounts_mut(&mut self) -> &mut AccountStore {
        &mut self.accounts
    }

    /// Role to account mapping in use.
    #[must_use]
    pub fn roles(&self) -> &AccountRoles {
        &self.roles
    }

    /// Current position of a commodity, empty if never traded.
    #[must_use]
    pub fn position(&self, commodity_id: CommodityId) -> InventoryPosition {
        self.inventory.snapshot(commodity_id)
    }

    /// Committed purchases.
    #[must_use]
    pub fn purchases(&self) -> &[PurchaseRecord] {
        &self.purchases
    }

    /// Committed sales.
    #[must_use]
    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Committed expense vouchers.
    #[must_use]
    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    /// Runs `work` as one atomic unit.
    ///
    /// On error every change `work` made is undone and the error is
    /// wrapped in `TransactionFailure`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionFailure` carrying the cause.
    pub fn transaction<T, F>(&mut self, work: F) -> Result<T, TradingError>
    where
        F: FnOnce(&mut Self) -> Result<T, TradingError>,
    {
        let savepoint = self.savepoint();
        match work(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.rollback(savepoint);
                Err(err.staged())
            }
        }
    }

    /// Records a purchase on credit.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any change, or
    /// `TransactionFailure` after a rollback.
    pub fn record_purchase(&mut self, request: &PurchaseRequest) -> Result<PurchaseResult, TradingError> {
        let plan = TradingService::plan_purchase(
            self.commodities.get(&request.commodity_id),
            self.parties.get(&request.supplier_id),
            &self.inventory.snapshot(request.commodity_id),
            &self.roles,
            request,
        )?;
        self.transaction(|book| book.apply_purchase(&plan))?;
        Ok(plan.result())
    }

    /// Records a sale on credit.
    ///
    /// # Errors
    ///
    /// Returns a validation error or `InsufficientStock` before any change,
    /// or `TransactionFailure` after a rollback.
    pub fn record_sale(&mut self, request: &SaleRequest) -> Result<SaleResult, TradingError> {
        let plan = TradingService::plan_sale(
            self.commodities.get(&request.commodity_id),
            self.parties.get(&request.customer_id),
            &self.inventory.snapshot(request.commodity_id),
            &self.roles,
            request,
        )?;
        self.transaction(|book| book.apply_sale(&plan))?;
        Ok(plan.result())
    }

    /// Records an expense voucher.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AccountNotFound` or `AccountInactive`
    /// before any change, or `TransactionFailure` after a rollback.
    pub fn record_expense(&mut self, request: &ExpenseRequest) -> Result<ExpenseResult, TradingError> {
        let supplier = request.supplier_id.and_then(|id| self.parties.get(&id));
        let plan = TradingService::plan_expense(request, supplier)?;
        self.require_postable(request.debit_account_id)?;
        self.require_postable(request.credit_account_id)?;

        self.transaction(|book| book.apply_expense(&plan))?;
        Ok(plan.result())
    }

    fn require_postable(&self, id: AccountId) -> Result<(), TradingError> {
        self.accounts.require_active(id)?;
        Ok(())
    }

    fn apply_purchase(&mut self, plan: &PurchasePlan) -> Result<(), TradingError> {
        self.inventory.store(plan.position.clone());
        self.purchases.push(plan.record.clone());
        TradingService::verify_journal(&plan.journal)?;
        self.accounts.post_batch(&plan.journal)?;
        Ok(())
    }

    fn apply_sale(&mut self, plan: &SalePlan) -> Result<(), TradingError> {
        self.inventory.store(plan.position.clone());
        self.sales.push(plan.record.clone());
        TradingService::verify_journal(&plan.journal)?;
        self.accounts.post_batch(&plan.journal)?;
        Ok(())
    }

    fn apply_expense(&mut self, plan: &ExpensePlan) -> Result<(), TradingError> {
        self.expenses.push(plan.record.clone());
        TradingService::verify_journal(&plan.journal)?;
        self.accounts.post_batch(&plan.journal)?;
        Ok(())
    }

    fn savepoint(&self) -> Savepoint {
        Savepoint {
            accounts: self.accounts.checkpoint(),
            inventory: self.inventory.clone(),
            purchases: self.purchases.len(),
            sales: self.sales.len(),
            expenses: self.expenses.len(),
        }
    }

    fn rollback(&mut self, savepoint: Savepoint) {
        self.accounts.restore(savepoint.accounts);
        self.inventory = savepoint.inventory;
        self.purchases.truncate(savepoint.purchases);
        self.sales.truncate(savepoint.sales);
        self.expenses.truncate(savepoint.expenses);
    }
}
