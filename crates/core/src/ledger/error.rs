//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur while maintaining the
//! chart of accounts and posting to the journal.

use granary_shared::types::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A posting batch has no lines.
    #[error("Journal batch must have at least one entry")]
    NoEntries,

    /// A posting batch has only debits or only credits.
    #[error("Journal batch must have both debit and credit entries")]
    SingleSided,

    /// Posting batch is not balanced (debits != credits).
    #[error("Journal batch is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry amount cannot be zero.
    #[error("Entry amount cannot be zero")]
    ZeroAmount,

    /// Entry amount cannot be negative.
    #[error("Entry amount cannot be negative")]
    NegativeAmount,

    /// Entry must specify either debit or credit, not both.
    #[error("Entry must specify either debit or credit, not both")]
    InvalidEntryType,

    /// Journal totals exceed the representable range.
    #[error("Journal totals are out of range")]
    AmountOutOfRange,

    // ========== Account Errors ==========
    /// Account code or name already exists.
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No account carries the given code.
    #[error("Account with code '{0}' not found")]
    AccountCodeNotFound(String),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Posting would push the balance out of the representable range.
    #[error("Balance of account {0} would be out of range")]
    BalanceOutOfRange(AccountId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoEntries => "NO_ENTRIES",
            Self::SingleSided => "SINGLE_SIDED",
            Self::Unbalanced { .. } => "UNBALANCED_TRANSACTION",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidEntryType => "INVALID_ENTRY_TYPE",
            Self::AmountOutOfRange | Self::BalanceOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::AccountNotFound(_) | Self::AccountCodeNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NoEntries
            | Self::SingleSided
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::InvalidEntryType
            | Self::AmountOutOfRange
            | Self::BalanceOutOfRange(_)
            | Self::AccountInactive(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::AccountCodeNotFound(_) => 404,

            // 409 Conflict
            Self::DuplicateAccount(_) => 409,

            // 500 - an unbalanced batch is a bug in the caller
            Self::Unbalanced { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::NoEntries.error_code(), "NO_ENTRIES");
        assert_eq!(
            LedgerError::Unbalanced {
                debit: Decimal::new(100, 2),
                credit: Decimal::new(50, 2),
            }
            .error_code(),
            "UNBALANCED_TRANSACTION"
        );
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(
            LedgerError::AccountCodeNotFound("10103".into()).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InvalidEntryType.http_status_code(), 400);
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::new()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::DuplicateAccount("Cash".into()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::Unbalanced {
                debit: Decimal::ONE,
                credit: Decimal::ZERO,
            }
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Unbalanced {
            debit: Decimal::new(10000, 2),
            credit: Decimal::new(5000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Journal batch is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }
}
