//! Trading repository: PostgreSQL executor for purchases, sales and
//! expense vouchers.
//!
//! Each workflow runs in one database transaction:
//!
//! 1. read the commodity and party, validate
//! 2. lock the inventory position row `FOR UPDATE` (created lazily)
//! 3. plan with [`TradingService`] against the locked position
//! 4. lock every involved account row in ascending id order
//! 5. write the position, the business record, the ledger rows and the
//!    new balances, then commit
//!
//! Anything that fails before step 5 is a rejection; anything that fails
//! during step 5 is a `TransactionFailure`. Both roll back.

use std::collections::BTreeMap;

use chrono::Utc;
use granary_core::inventory::InventoryPosition;
use granary_core::trading::{
    AccountRoles, ExpensePlan, ExpenseRecord, ExpenseRequest, ExpenseResult, PurchasePlan,
    PurchaseRecord, PurchaseRequest, PurchaseResult, SalePlan, SaleRecord, SaleRequest,
    SaleResult, TradingError, TradingService,
};
use granary_shared::types::AccountId;
use granary_shared::{AccountRoleCodes, AppError};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, Set, TransactionTrait,
};

use super::account::{
    lock_accounts, post_locked_batch, require_active, AccountError, AccountRepository,
};
use super::commodity::load_commodity;
use super::inventory::{lock_position, save_position};
use super::party::load_party;
use crate::entities::{accounts, expenses, inventory_positions, purchases, sales};

/// Error types for trading workflows.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// Rejected before anything was written.
    #[error(transparent)]
    Rejected(#[from] TradingError),

    /// Failed while writing; every change was rolled back.
    #[error("Transaction failed and was rolled back: {0}")]
    TransactionFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TradeError {
    /// Wraps a cause raised while writing.
    pub fn failure<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::TransactionFailure(Box::new(cause))
    }

    /// True when the request was refused without side effects.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(e) if e.is_rejection())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(e) => e.error_code(),
            Self::TransactionFailure(_) => "TRANSACTION_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Rejected(e) => e.http_status_code(),
            Self::TransactionFailure(_) => 500,
        }
    }
}

impl From<DbErr> for TradeError {
    fn from(err: DbErr) -> Self {
        Self::failure(err)
    }
}

impl From<AccountError> for TradeError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Ledger(e) => Self::failure(TradingError::from(e)),
            AccountError::Database(e) => Self::failure(e),
        }
    }
}

impl From<TradeError> for AppError {
    fn from(err: TradeError) -> Self {
        match err {
            TradeError::Rejected(e) => e.into(),
            TradeError::TransactionFailure(cause) => Self::Internal(format!(
                "Transaction failed and was rolled back: {cause}"
            )),
        }
    }
}

/// Trading repository executing workflows against PostgreSQL.
#[derive(Debug, Clone)]
pub struct TradingRepository {
    db: DatabaseConnection,
    roles: AccountRoles,
}

impl TradingRepository {
    /// Creates a trading repository with already resolved account roles.
    #[must_use]
    pub const fn new(db: DatabaseConnection, roles: AccountRoles) -> Self {
        Self { db, roles }
    }

    /// Resolves the configured role codes and creates the repository.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` if a role code has no account.
    pub async fn from_codes(
        db: DatabaseConnection,
        codes: &AccountRoleCodes,
    ) -> Result<Self, AccountError> {
        let roles = AccountRepository::new(db.clone()).resolve_roles(codes).await?;
        Ok(Self::new(db, roles))
    }

    /// Role to account mapping in use.
    #[must_use]
    pub const fn roles(&self) -> &AccountRoles {
        &self.roles
    }

    /// Records a purchase on credit: Dr Inventory / Cr Accounts Payable.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for validation errors, or `TransactionFailure`
    /// after a rollback.
    #[tracing::instrument(
        skip_all,
        fields(commodity_id = %request.commodity_id, supplier_id = %request.supplier_id)
    )]
    pub async fn record_purchase(
        &self,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResult, TradeError> {
        let txn = self.db.begin().await?;
        let outcome = match self.stage_purchase(&txn, request).await {
            Ok((plan, row)) => apply_purchase(&txn, &plan, row).await.map(|()| plan),
            Err(err) => Err(err),
        };
        let plan = finish(txn, outcome).await?;

        tracing::info!(
            purchase_id = %plan.record.id,
            total_cost = %plan.record.total_cost,
            average_cost = %plan.position.average_cost,
            "purchase committed"
        );
        Ok(plan.result())
    }

    /// Records a sale on credit: Dr AR / Cr Revenue, Dr COGS / Cr Inventory.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for validation errors and `InsufficientStock`, or
    /// `TransactionFailure` after a rollback.
    #[tracing::instrument(
        skip_all,
        fields(commodity_id = %request.commodity_id, customer_id = %request.customer_id)
    )]
    pub async fn record_sale(&self, request: &SaleRequest) -> Result<SaleResult, TradeError> {
        let txn = self.db.begin().await?;
        let outcome = match self.stage_sale(&txn, request).await {
            Ok((plan, row)) => apply_sale(&txn, &plan, row).await.map(|()| plan),
            Err(err) => Err(err),
        };
        let plan = finish(txn, outcome).await?;

        tracing::info!(
            sale_id = %plan.record.id,
            total_amount = %plan.record.total_amount,
            cogs = %plan.record.cogs,
            "sale committed"
        );
        Ok(plan.result())
    }

    /// Records an expense voucher: Dr expense account / Cr cash or bank.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for validation errors and missing or inactive
    /// accounts, or `TransactionFailure` after a rollback.
    #[tracing::instrument(skip_all, fields(amount = %request.amount))]
    pub async fn record_expense(
        &self,
        request: &ExpenseRequest,
    ) -> Result<ExpenseResult, TradeError> {
        let txn = self.db.begin().await?;
        let outcome = match stage_expense(&txn, request).await {
            Ok((plan, locked)) => apply_expense(&txn, &plan, locked).await.map(|()| plan),
            Err(err) => Err(err),
        };
        let plan = finish(txn, outcome).await?;

        tracing::info!(
            expense_id = %plan.record.id,
            amount = %plan.record.amount,
            "expense committed"
        );
        Ok(plan.result())
    }

    async fn stage_purchase(
        &self,
        txn: &DatabaseTransaction,
        request: &PurchaseRequest,
    ) -> Result<(PurchasePlan, inventory_positions::Model), TradeError> {
        let commodity = load_commodity(txn, request.commodity_id).await?;
        TradingService::require_commodity(commodity.as_ref(), request.commodity_id)?;
        let supplier = load_party(txn, request.supplier_id).await?;

        let row = lock_position(txn, request.commodity_id).await?;
        let plan = TradingService::plan_purchase(
            commodity.as_ref(),
            supplier.as_ref(),
            &InventoryPosition::from(row.clone()),
            &self.roles,
            request,
        )?;
        Ok((plan, row))
    }

    async fn stage_sale(
        &self,
        txn: &DatabaseTransaction,
        request: &SaleRequest,
    ) -> Result<(SalePlan, inventory_positions::Model), TradeError> {
        let commodity = load_commodity(txn, request.commodity_id).await?;
        TradingService::require_commodity(commodity.as_ref(), request.commodity_id)?;
        let customer = load_party(txn, request.customer_id).await?;

        let row = lock_position(txn, request.commodity_id).await?;
        let plan = TradingService::plan_sale(
            commodity.as_ref(),
            customer.as_ref(),
            &InventoryPosition::from(row.clone()),
            &self.roles,
            request,
        )?;
        Ok((plan, row))
    }
}

async fn stage_expense(
    txn: &DatabaseTransaction,
    request: &ExpenseRequest,
) -> Result<(ExpensePlan, BTreeMap<AccountId, accounts::Model>), TradeError> {
    let supplier = match request.supplier_id {
        Some(id) => load_party(txn, id).await?,
        None => None,
    };
    let plan = TradingService::plan_expense(request, supplier.as_ref())?;

    let locked = lock_accounts(txn, &plan.journal.accounts()).await?;
    for id in [request.debit_account_id, request.credit_account_id] {
        require_active(&locked, id).map_err(TradingError::from)?;
    }
    Ok((plan, locked))
}

async fn apply_purchase(
    txn: &DatabaseTransaction,
    plan: &PurchasePlan,
    row: inventory_positions::Model,
) -> Result<(), TradeError> {
    let mut locked = lock_accounts(txn, &plan.journal.accounts()).await?;
    save_position(txn, row, &plan.position).await?;
    insert_purchase(txn, &plan.record).await?;
    TradingService::verify_journal(&plan.journal).map_err(TradeError::failure)?;
    post_locked_batch(txn, &mut locked, &plan.journal).await?;
    Ok(())
}

async fn apply_sale(
    txn: &DatabaseTransaction,
    plan: &SalePlan,
    row: inventory_positions::Model,
) -> Result<(), TradeError> {
    let mut locked = lock_accounts(txn, &plan.journal.accounts()).await?;
    save_position(txn, row, &plan.position).await?;
    insert_sale(txn, &plan.record).await?;
    TradingService::verify_journal(&plan.journal).map_err(TradeError::failure)?;
    post_locked_batch(txn, &mut locked, &plan.journal).await?;
    Ok(())
}

async fn apply_expense(
    txn: &DatabaseTransaction,
    plan: &ExpensePlan,
    mut locked: BTreeMap<AccountId, accounts::Model>,
) -> Result<(), TradeError> {
    insert_expense(txn, &plan.record).await?;
    TradingService::verify_journal(&plan.journal).map_err(TradeError::failure)?;
    post_locked_batch(txn, &mut locked, &plan.journal).await?;
    Ok(())
}

/// Commits on success, rolls back and logs on failure.
async fn finish<T>(
    txn: DatabaseTransaction,
    outcome: Result<T, TradeError>,
) -> Result<T, TradeError> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            if err.is_rejection() {
                tracing::warn!(code = err.error_code(), error = %err, "request rejected");
            } else {
                tracing::warn!(code = err.error_code(), error = %err, "transaction rolled back");
            }
            Err(err)
        }
    }
}

async fn insert_purchase(txn: &DatabaseTransaction, record: &PurchaseRecord) -> Result<(), DbErr> {
    let model = purchases::ActiveModel {
        id: Set(record.id.into_inner()),
        commodity_id: Set(record.commodity_id.into_inner()),
        supplier_id: Set(record.supplier_id.into_inner()),
        purchase_date: Set(record.purchase_date),
        quantity: Set(record.quantity),
        unit_price: Set(record.unit_price),
        total_cost: Set(record.total_cost),
        payment_status: Set(record.payment_status.into()),
        created_at: Set(Utc::now().into()),
    };
    model.insert(txn).await?;
    Ok(())
}

async fn insert_sale(txn: &DatabaseTransaction, record: &SaleRecord) -> Result<(), DbErr> {
    let model = sales::ActiveModel {
        id: Set(record.id.into_inner()),
        commodity_id: Set(record.commodity_id.into_inner()),
        customer_id: Set(record.customer_id.into_inner()),
        sale_date: Set(record.sale_date),
        quantity: Set(record.quantity),
        unit_price: Set(record.unit_price),
        total_amount: Set(record.total_amount),
        cogs: Set(record.cogs),
        payment_status: Set(record.payment_status.into()),
        created_at: Set(Utc::now().into()),
    };
    model.insert(txn).await?;
    Ok(())
}

async fn insert_expense(txn: &DatabaseTransaction, record: &ExpenseRecord) -> Result<(), DbErr> {
    let model = expenses::ActiveModel {
        id: Set(record.id.into_inner()),
        expense_date: Set(record.expense_date),
        description: Set(record.description.clone()),
        amount: Set(record.amount),
        debit_account_id: Set(record.debit_account_id.into_inner()),
        credit_account_id: Set(record.credit_account_id.into_inner()),
        supplier_id: Set(record.supplier_id.map(|id| id.into_inner())),
        created_at: Set(Utc::now().into()),
    };
    model.insert(txn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use granary_core::ledger::LedgerError;
    use granary_shared::types::CommodityId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rejections_keep_domain_codes() {
        let err = TradeError::from(TradingError::InsufficientStock {
            commodity_id: CommodityId::new(),
            requested: dec!(200),
            available: dec!(90),
        });
        assert!(err.is_rejection());
        assert_eq!(err.error_code(), "INSUFFICIENT_STOCK");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_database_errors_are_failures() {
        let err = TradeError::from(DbErr::Custom("serialization failure".into()));
        assert!(!err.is_rejection());
        assert_eq!(err.error_code(), "TRANSACTION_FAILURE");
        assert_eq!(err.http_status_code(), 500);
        assert!(matches!(AppError::from(err), AppError::Internal(_)));
    }

    #[test]
    fn test_posting_errors_while_writing_are_failures() {
        let id = AccountId::new();
        let err = TradeError::from(AccountError::Ledger(LedgerError::AccountInactive(id)));
        match &err {
            TradeError::TransactionFailure(cause) => {
                let cause = cause.downcast_ref::<TradingError>();
                assert!(matches!(cause, Some(TradingError::AccountInactive(a)) if *a == id));
            }
            TradeError::Rejected(_) => panic!("expected TransactionFailure"),
        }
        assert!(!err.is_rejection());
    }
}
