//! Ledger entry domain types.

use chrono::NaiveDate;
use granary_shared::types::{AccountId, LedgerEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit entry (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

impl EntryType {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// The business transaction kind that produced a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Commodity purchase from a supplier.
    Purchase,
    /// Commodity sale to a customer.
    Sale,
    /// Expense voucher.
    Expense,
    /// Manual adjustment.
    Adjustment,
}

impl SourceType {
    /// Returns the lowercase label stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
            Self::Expense => "expense",
            Self::Adjustment => "adjustment",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line to be posted, before it becomes a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub entry_type: EntryType,
    /// Positive amount, already rounded to money scale.
    pub amount: Decimal,
    /// Description for this line item.
    pub description: String,
}

impl PostingLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            entry_type: EntryType::Debit,
            amount,
            description: description.into(),
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            entry_type: EntryType::Credit,
            amount,
            description: description.into(),
        }
    }

    /// Returns the `(debit, credit)` column pair for this line.
    #[must_use]
    pub fn columns(&self) -> (Decimal, Decimal) {
        match self.entry_type {
            EntryType::Debit => (self.amount, Decimal::ZERO),
            EntryType::Credit => (Decimal::ZERO, self.amount),
        }
    }
}

/// An immutable, posted journal line.
///
/// Exactly one of `debit` and `credit` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// Business date of the source transaction.
    pub entry_date: NaiveDate,
    /// The account affected by this entry.
    pub account_id: AccountId,
    /// Debit amount (zero for credit entries).
    pub debit: Decimal,
    /// Credit amount (zero for debit entries).
    pub credit: Decimal,
    /// Description for this line item.
    pub description: String,
    /// Kind of business transaction that produced this entry.
    pub source_type: SourceType,
    /// Identifier of the purchase, sale or expense record.
    pub source_id: Uuid,
}

impl LedgerEntry {
    /// Returns which side this entry was posted on.
    #[must_use]
    pub fn entry_type(&self) -> EntryType {
        if self.debit.is_zero() {
            EntryType::Credit
        } else {
            EntryType::Debit
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}
