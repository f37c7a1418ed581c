//! In-memory account store and journal.
//!
//! Holds the chart of accounts with running balances plus the append-only
//! ledger. The PostgreSQL repositories in `granary-db` implement the same
//! operations against the `accounts` and `ledger_entries` tables.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use granary_shared::types::{AccountId, LedgerEntryId};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::account::{Account, CreateAccountInput};
use super::balance::BalanceCheck;
use super::entry::{LedgerEntry, SourceType};
use super::error::LedgerError;
use super::journal::JournalBatch;
use super::validation::{validate_posting_amounts, JournalTotals};

/// Chart of accounts plus the journal posted against it.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: BTreeMap<AccountId, Account>,
    entries: Vec<LedgerEntry>,
}

/// Snapshot used to undo a failed unit of work.
#[derive(Debug, Clone)]
pub struct StoreCheckpoint {
    accounts: BTreeMap<AccountId, Account>,
    entry_count: usize,
}

impl AccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the code or the name is taken.
    pub fn create_account(&mut self, input: CreateAccountInput) -> Result<Account, LedgerError> {
        if let Some(existing) = self
            .accounts
            .values()
            .find(|a| a.code == input.code || a.name == input.name)
        {
            let clash = if existing.code == input.code {
                &input.code
            } else {
                &input.name
            };
            return Err(LedgerError::DuplicateAccount(clash.clone()));
        }

        let account = Account::open(AccountId::new(), input);
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Returns the account with the input's code, creating it if absent.
    ///
    /// The boolean is `true` when the account was created by this call.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the code is free but the name is taken.
    pub fn ensure_account(
        &mut self,
        input: CreateAccountInput,
    ) -> Result<(Account, bool), LedgerError> {
        if let Ok(existing) = self.find_by_code(&input.code) {
            return Ok((existing.clone(), false));
        }
        self.create_account(input).map(|account| (account, true))
    }

    /// Looks up an account by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent.
    pub fn get_account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .get(&id)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Looks up an account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` if no account carries the code.
    pub fn find_by_code(&self, code: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .values()
            .find(|a| a.code == code)
            .ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))
    }

    /// Looks up an account that may be posted to.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `AccountInactive`.
    pub fn require_active(&self, id: AccountId) -> Result<&Account, LedgerError> {
        let account = self.get_account(id)?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(id));
        }
        Ok(account)
    }

    /// Activates or deactivates an account. Accounts are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent.
    pub fn set_active(&mut self, id: AccountId, active: bool) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.is_active = active;
        Ok(())
    }

    /// Appends one immutable entry to the journal.
    ///
    /// Does not touch the account balance; pair with [`apply_posting`](Self::apply_posting).
    ///
    /// # Errors
    ///
    /// Returns an amount error, `AccountNotFound` or `AccountInactive`.
    #[allow(clippy::too_many_arguments)]
    pub fn post_entry(
        &mut self,
        account_id: AccountId,
        debit: Decimal,
        credit: Decimal,
        entry_date: NaiveDate,
        description: &str,
        source_type: SourceType,
        source_id: Uuid,
    ) -> Result<LedgerEntryId, LedgerError> {
        validate_posting_amounts(debit, credit)?;
        self.require_active(account_id)?;

        let id = LedgerEntryId::new();
        self.entries.push(LedgerEntry {
            id,
            entry_date,
            account_id,
            debit,
            credit,
            description: description.to_string(),
            source_type,
            source_id,
        });
        Ok(id)
    }

    /// Adds a raw signed delta to an account balance.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent, or `BalanceOutOfRange`.
    pub fn adjust_balance(&mut self, id: AccountId, delta: Decimal) -> Result<Decimal, LedgerError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.adjust_balance(delta)?;
        Ok(account.balance)
    }

    /// Applies a posting to an account balance using its normal side.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent, or `BalanceOutOfRange`.
    pub fn apply_posting(
        &mut self,
        id: AccountId,
        debit: Decimal,
        credit: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let delta = self
            .get_account(id)?
            .normal_side
            .calculate_balance_change(debit, credit);
        self.adjust_balance(id, delta)
    }

    /// Posts every line of a batch and updates the touched balances.
    ///
    /// The batch and every account are checked before anything is written.
    /// A batch that fails part way is undone, so an error always leaves the
    /// store unchanged.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AccountNotFound`, `AccountInactive` or
    /// `BalanceOutOfRange`.
    pub fn post_batch(&mut self, batch: &JournalBatch) -> Result<JournalTotals, LedgerError> {
        let totals = batch.validate()?;
        for id in batch.accounts() {
            self.require_active(id)?;
        }

        let checkpoint = self.checkpoint();
        if let Err(err) = self.post_lines(batch) {
            self.restore(checkpoint);
            return Err(err);
        }
        Ok(totals)
    }

    fn post_lines(&mut self, batch: &JournalBatch) -> Result<(), LedgerError> {
        for line in &batch.lines {
            let (debit, credit) = line.columns();
            self.post_entry(
                line.account_id,
                debit,
                credit,
                batch.entry_date,
                &line.description,
                batch.source_type,
                batch.source_id,
            )?;
            self.apply_posting(line.account_id, debit, credit)?;
        }
        Ok(())
    }

    /// All entries posted by one business transaction, in posting order.
    #[must_use]
    pub fn entries_for_source(&self, source_type: SourceType, source_id: Uuid) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.source_type == source_type && e.source_id == source_id)
            .collect()
    }

    /// All entries posted to one account, in posting order.
    #[must_use]
    pub fn entries_for_account(&self, id: AccountId) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| e.account_id == id).collect()
    }

    /// Recomputes an account's balance from the journal.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if absent, or `BalanceOutOfRange` if the
    /// journal totals cannot be represented.
    pub fn verify_balance(&self, id: AccountId) -> Result<BalanceCheck, LedgerError> {
        let account = self.get_account(id)?;
        let (debit_total, credit_total) = self.entries_for_account(id).into_iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(d, c), e| {
                d.checked_add(e.debit)
                    .zip(c.checked_add(e.credit))
                    .ok_or(LedgerError::BalanceOutOfRange(id))
            },
        )?;
        Ok(BalanceCheck::new(
            id,
            account.normal_side,
            account.balance,
            debit_total,
            credit_total,
        ))
    }

    /// Every account, in id order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// The full journal, in posting order.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Captures the state needed to undo later writes.
    #[must_use]
    pub fn checkpoint(&self) -> StoreCheckpoint {
        StoreCheckpoint {
            accounts: self.accounts.clone(),
            entry_count: self.entries.len(),
        }
    }

    /// Restores the state captured by [`checkpoint`](Self::checkpoint).
    pub fn restore(&mut self, checkpoint: StoreCheckpoint) {
        self.accounts = checkpoint.accounts;
        self.entries.truncate(checkpoint.entry_count);
    }
}
