//! Journal batches: the balanced set of lines one business transaction posts.

use chrono::NaiveDate;
use granary_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::{PostingLine, SourceType};
use super::error::LedgerError;
use super::validation::{validate_entries, JournalTotals};

/// All ledger lines produced by one purchase, sale or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalBatch {
    /// Kind of business transaction.
    pub source_type: SourceType,
    /// Identifier of the business record.
    pub source_id: Uuid,
    /// Business date stamped on every entry.
    pub entry_date: NaiveDate,
    /// Lines in posting order.
    pub lines: Vec<PostingLine>,
}

impl JournalBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new(source_type: SourceType, source_id: Uuid, entry_date: NaiveDate) -> Self {
        Self {
            source_type,
            source_id,
            entry_date,
            lines: Vec::new(),
        }
    }

    /// Appends a debit/credit pair of the same amount.
    pub fn push_pair(
        &mut self,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: Decimal,
        description: &str,
    ) {
        self.lines
            .push(PostingLine::debit(debit_account, amount, description));
        self.lines
            .push(PostingLine::credit(credit_account, amount, description));
    }

    /// Builder form of [`push_pair`](Self::push_pair).
    #[must_use]
    pub fn with_pair(
        mut self,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: Decimal,
        description: &str,
    ) -> Self {
        self.push_pair(debit_account, credit_account, amount, description);
        self
    }

    /// Checks the batch is non-empty, two-sided and balanced.
    ///
    /// # Errors
    ///
    /// Returns the first rule the lines violate.
    pub fn validate(&self) -> Result<JournalTotals, LedgerError> {
        validate_entries(&self.lines)
    }

    /// Distinct accounts touched by the batch, in ascending id order.
    ///
    /// This is the order in which account rows are locked.
    #[must_use]
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.lines.iter().map(|l| l.account_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
