//! Account repository for chart of accounts and ledger operations.
//!
//! Balances are stored on the account row and changed only together with
//! the ledger rows that justify them. Writers lock the involved account
//! rows with `SELECT ... FOR UPDATE` in ascending id order.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use granary_core::ledger::{
    validate_posting_amounts, Account, BalanceCheck, CreateAccountInput, JournalBatch,
    JournalTotals, LedgerEntry, LedgerError, SourceType,
};
use granary_core::trading::AccountRoles;
use granary_shared::types::{AccountId, LedgerEntryId};
use granary_shared::{AccountRoleCodes, AppError};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{accounts, ledger_entries, sea_orm_active_enums};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Ledger rule violated (duplicate, missing or inactive account, bad amounts).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Ledger(e) => e.into(),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Account repository for chart of accounts and ledger operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the code or the name is taken.
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Account, AccountError> {
        let existing = accounts::Entity::find()
            .filter(
                accounts::Column::Code
                    .eq(&input.code)
                    .or(accounts::Column::Name.eq(&input.name)),
            )
            .one(&self.db)
            .await?;

        if let Some(existing) = existing {
            let clash = if existing.code == input.code {
                input.code
            } else {
                input.name
            };
            return Err(LedgerError::DuplicateAccount(clash).into());
        }

        let account = Account::open(AccountId::new(), input);
        let now = Utc::now().into();
        let model = accounts::ActiveModel {
            id: Set(account.id.into_inner()),
            code: Set(account.code),
            name: Set(account.name),
            account_type: Set(account.account_type.into()),
            account_subtype: Set(account.account_subtype.map(Into::into)),
            normal_side: Set(account.normal_side.into()),
            balance: Set(account.balance),
            version: Set(account.version),
            is_active: Set(account.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await?;
        tracing::debug!(code = %model.code, "account created");
        Ok(model.into())
    }

    /// Creates the account unless one with the same code exists.
    ///
    /// Returns the account and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if only the name clashes.
    pub async fn ensure_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<(Account, bool), AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => Ok((model.into(), false)),
            None => Ok((self.create_account(input).await?, true)),
        }
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AccountError> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;
        Ok(model.into())
    }

    /// Finds an account by its code.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` if absent.
    pub async fn find_by_code(&self, code: &str) -> Result<Account, AccountError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))?;
        Ok(model.into())
    }

    /// Lists the chart of accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Activates or deactivates an account. Accounts are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent.
    pub async fn set_active(&self, id: AccountId, active: bool) -> Result<Account, AccountError> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;

        let mut model: accounts::ActiveModel = model.into();
        model.is_active = Set(active);
        model.updated_at = Set(Utc::now().into());

        let model = model.update(&self.db).await?;
        Ok(model.into())
    }

    /// Maps the configured role codes to account ids.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` for the first role whose code is missing.
    pub async fn resolve_roles(&self, codes: &AccountRoleCodes) -> Result<AccountRoles, AccountError> {
        let models = accounts::Entity::find().all(&self.db).await?;
        let by_code: BTreeMap<String, AccountId> = models
            .into_iter()
            .map(|m| (m.code, AccountId::from_uuid(m.id)))
            .collect();

        let roles = AccountRoles::resolve(codes, |code| by_code.get(code).copied())?;
        Ok(roles)
    }

    /// Appends one ledger entry without touching the balance.
    ///
    /// # Errors
    ///
    /// Returns an amount error, `AccountNotFound` or `AccountInactive`.
    #[allow(clippy::too_many_arguments)]
    pub async fn post_entry(
        &self,
        account_id: AccountId,
        debit: Decimal,
        credit: Decimal,
        entry_date: NaiveDate,
        description: &str,
        source_type: SourceType,
        source_id: Uuid,
    ) -> Result<LedgerEntryId, AccountError> {
        validate_posting_amounts(debit, credit)?;

        let txn = self.db.begin().await?;
        let locked = lock_accounts(&txn, &[account_id]).await?;
        require_active(&locked, account_id)?;

        let id = insert_entry(
            &txn,
            account_id,
            debit,
            credit,
            entry_date,
            description,
            source_type,
            source_id,
        )
        .await?;

        txn.commit().await?;
        Ok(id)
    }

    /// Adds a raw signed delta to an account balance.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent, or `BalanceOutOfRange`.
    pub async fn adjust_balance(&self, id: AccountId, delta: Decimal) -> Result<Decimal, AccountError> {
        let txn = self.db.begin().await?;
        let mut locked = lock_accounts(&txn, &[id]).await?;
        let model = locked.remove(&id).ok_or(LedgerError::AccountNotFound(id))?;

        let mut account = Account::from(model.clone());
        account.adjust_balance(delta)?;
        let model = store_balance(&txn, model, &account).await?;

        txn.commit().await?;
        Ok(model.balance)
    }

    /// Applies a posting to an account balance using its normal side.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent, or `BalanceOutOfRange`.
    pub async fn apply_posting(
        &self,
        id: AccountId,
        debit: Decimal,
        credit: Decimal,
    ) -> Result<Decimal, AccountError> {
        let txn = self.db.begin().await?;
        let mut locked = lock_accounts(&txn, &[id]).await?;
        let model = locked.remove(&id).ok_or(LedgerError::AccountNotFound(id))?;

        let mut account = Account::from(model.clone());
        account.apply_posting(debit, credit)?;
        let model = store_balance(&txn, model, &account).await?;

        txn.commit().await?;
        Ok(model.balance)
    }

    /// Posts a balanced journal batch and updates every touched balance
    /// in one database transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AccountNotFound` or `AccountInactive`;
    /// nothing is written in that case.
    pub async fn post_batch(&self, batch: &JournalBatch) -> Result<JournalTotals, AccountError> {
        let txn = self.db.begin().await?;
        let mut locked = lock_accounts(&txn, &batch.accounts()).await?;
        let totals = post_locked_batch(&txn, &mut locked, batch).await?;
        txn.commit().await?;
        Ok(totals)
    }

    /// All entries posted by one business transaction, in posting order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn entries_for_source(
        &self,
        source_type: SourceType,
        source_id: Uuid,
    ) -> Result<Vec<LedgerEntry>, AccountError> {
        let models = ledger_entries::Entity::find()
            .filter(
                ledger_entries::Column::SourceType
                    .eq(sea_orm_active_enums::SourceType::from(source_type)),
            )
            .filter(ledger_entries::Column::SourceId.eq(source_id))
            .order_by_asc(ledger_entries::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// All entries posted to one account, in posting order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn entries_for_account(&self, id: AccountId) -> Result<Vec<LedgerEntry>, AccountError> {
        let models = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(id.into_inner()))
            .order_by_asc(ledger_entries::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Recomputes an account balance from its ledger entries and compares
    /// it with the stored balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent.
    pub async fn verify_balance(&self, id: AccountId) -> Result<BalanceCheck, AccountError> {
        let account = self.get_account(id).await?;
        let entries = self.entries_for_account(id).await?;

        let (debit_total, credit_total) =
            entries
                .iter()
                .try_fold((Decimal::ZERO, Decimal::ZERO), |(d, c), e| {
                    d.checked_add(e.debit)
                        .zip(c.checked_add(e.credit))
                        .ok_or(LedgerError::BalanceOutOfRange(id))
                })?;

        Ok(BalanceCheck::new(
            id,
            account.normal_side,
            account.balance,
            debit_total,
            credit_total,
        ))
    }
}

/// Locks the given accounts `FOR UPDATE` in ascending id order.
///
/// Missing ids are simply absent from the result.
pub(crate) async fn lock_accounts<C: ConnectionTrait>(
    conn: &C,
    ids: &[AccountId],
) -> Result<BTreeMap<AccountId, accounts::Model>, DbErr> {
    let mut ids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();
    ids.sort_unstable();
    ids.dedup();

    let models = accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(ids))
        .order_by_asc(accounts::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await?;

    Ok(models
        .into_iter()
        .map(|m| (AccountId::from_uuid(m.id), m))
        .collect())
}

/// Checks a locked account exists and is active.
pub(crate) fn require_active(
    locked: &BTreeMap<AccountId, accounts::Model>,
    id: AccountId,
) -> Result<(), LedgerError> {
    let model = locked.get(&id).ok_or(LedgerError::AccountNotFound(id))?;
    if model.is_active {
        Ok(())
    } else {
        Err(LedgerError::AccountInactive(id))
    }
}

/// Posts every line of `batch` against accounts the caller has locked,
/// keeping `locked` in step with the stored rows.
pub(crate) async fn post_locked_batch<C: ConnectionTrait>(
    conn: &C,
    locked: &mut BTreeMap<AccountId, accounts::Model>,
    batch: &JournalBatch,
) -> Result<JournalTotals, AccountError> {
    let totals = batch.validate()?;
    for id in batch.accounts() {
        require_active(locked, id)?;
    }

    for line in &batch.lines {
        let (debit, credit) = line.columns();
        insert_entry(
            conn,
            line.account_id,
            debit,
            credit,
            batch.entry_date,
            &line.description,
            batch.source_type,
            batch.source_id,
        )
        .await?;

        let model = locked
            .remove(&line.account_id)
            .ok_or(LedgerError::AccountNotFound(line.account_id))?;
        let mut account = Account::from(model.clone());
        account.apply_posting(debit, credit)?;
        let model = store_balance(conn, model, &account).await?;
        locked.insert(line.account_id, model);
    }

    Ok(totals)
}

#[allow(clippy::too_many_arguments)]
async fn insert_entry<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
    debit: Decimal,
    credit: Decimal,
    entry_date: NaiveDate,
    description: &str,
    source_type: SourceType,
    source_id: Uuid,
) -> Result<LedgerEntryId, DbErr> {
    let id = LedgerEntryId::new();
    let entry = ledger_entries::ActiveModel {
        id: Set(id.into_inner()),
        entry_date: Set(entry_date),
        account_id: Set(account_id.into_inner()),
        debit: Set(debit),
        credit: Set(credit),
        description: Set(description.to_string()),
        source_type: Set(source_type.into()),
        source_id: Set(source_id),
        created_at: Set(Utc::now().into()),
    };
    entry.insert(conn).await?;
    Ok(id)
}

async fn store_balance<C: ConnectionTrait>(
    conn: &C,
    model: accounts::Model,
    account: &Account,
) -> Result<accounts::Model, DbErr> {
    let mut model: accounts::ActiveModel = model.into();
    model.balance = Set(account.balance);
    model.version = Set(account.version);
    model.updated_at = Set(Utc::now().into());
    model.update(conn).await
}
