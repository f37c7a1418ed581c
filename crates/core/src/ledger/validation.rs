//! Business rule validation for ledger operations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{EntryType, PostingLine};
use super::error::LedgerError;

/// Debit and credit totals of a validated set of posting lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of all debit lines.
    pub debit: Decimal,
    /// Sum of all credit lines.
    pub credit: Decimal,
}

impl JournalTotals {
    /// Returns true when debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Validates a single `(debit, credit)` pair for `postEntry`.
///
/// Returns the side that carries the amount.
///
/// # Errors
///
/// - `NegativeAmount` if either side is negative
/// - `ZeroAmount` if both sides are zero
/// - `InvalidEntryType` if both sides are non-zero
pub fn validate_posting_amounts(debit: Decimal, credit: Decimal) -> Result<EntryType, LedgerError> {
    if debit < Decimal::ZERO || credit < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }

    match (debit.is_zero(), credit.is_zero()) {
        (true, true) => Err(LedgerError::ZeroAmount),
        (false, true) => Ok(EntryType::Debit),
        (true, false) => Ok(EntryType::Credit),
        (false, false) => Err(LedgerError::InvalidEntryType),
    }
}

/// Validates that a set of posting lines is balanced.
///
/// # Errors
///
/// Returns an error if the lines are not balanced or violate business rules.
pub fn validate_entries(lines: &[PostingLine]) -> Result<JournalTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoEntries);
    }

    let mut totals = JournalTotals {
        debit: Decimal::ZERO,
        credit: Decimal::ZERO,
    };
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        match line.entry_type {
            EntryType::Debit => {
                totals.debit = totals
                    .debit
                    .checked_add(line.amount)
                    .ok_or(LedgerError::AmountOutOfRange)?;
                has_debit = true;
            }
            EntryType::Credit => {
                totals.credit = totals
                    .credit
                    .checked_add(line.amount)
                    .ok_or(LedgerError::AmountOutOfRange)?;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    if !totals.is_balanced() {
        return Err(LedgerError::Unbalanced {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}
