//! Trading workflow errors.

use granary_shared::types::{AccountId, CommodityId, PartyId};
use granary_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::ledger::LedgerError;

/// Errors raised by the purchase, sale and expense workflows.
#[derive(Debug, Error)]
pub enum TradingError {
    // ========== Not Found ==========
    /// Commodity does not exist.
    #[error("Commodity not found: {0}")]
    CommodityNotFound(CommodityId),

    /// Party does not exist or is not flagged as a supplier.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(PartyId),

    /// Party does not exist or is not flagged as a customer.
    #[error("Customer not found: {0}")]
    CustomerNotFound(PartyId),

    /// Account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    // ========== Validation ==========
    /// Commodity is deactivated.
    #[error("Commodity {0} is inactive")]
    CommodityInactive(CommodityId),

    /// Account is deactivated.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Quantity must be positive.
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    /// Price must be positive.
    #[error("Price must be positive, got {0}")]
    InvalidPrice(Decimal),

    /// Amount must be positive once rounded to money scale.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Expense debit and credit accounts are the same.
    #[error("Debit and credit account must differ: {0}")]
    SameAccount(AccountId),

    /// Pricing unit is not allowed for the commodity.
    #[error("Unit '{unit}' is not allowed for commodity {commodity_id}")]
    UnknownUnit {
        /// Commodity the unit was used with.
        commodity_id: CommodityId,
        /// The rejected unit.
        unit: String,
    },

    /// Quantity, price or total too large to represent.
    #[error("Amount out of range for commodity {0}")]
    AmountOutOfRange(CommodityId),

    // ========== Stock ==========
    /// Sale larger than stock on hand.
    #[error("Insufficient stock for commodity {commodity_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Commodity being sold.
        commodity_id: CommodityId,
        /// Quantity requested, in base units.
        requested: Decimal,
        /// Stock on hand, in base units.
        available: Decimal,
    },

    // ========== Invariants ==========
    /// Journal lines for one transaction do not balance.
    #[error("Imbalanced journal entry. Debit: {debit}, Credit: {credit}")]
    ImbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Ledger primitive error.
    #[error(transparent)]
    Ledger(LedgerError),

    /// Costing engine error.
    #[error(transparent)]
    Inventory(InventoryError),

    /// A failure after state was staged; everything was rolled back.
    #[error("Transaction failed and was rolled back: {0}")]
    TransactionFailure(#[source] Box<TradingError>),
}

impl From<LedgerError> for TradingError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(id) => Self::AccountNotFound(id),
            LedgerError::AccountInactive(id) => Self::AccountInactive(id),
            LedgerError::Unbalanced { debit, credit } => Self::ImbalancedEntry { debit, credit },
            other => Self::Ledger(other),
        }
    }
}

impl From<InventoryError> for TradingError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InsufficientStock {
                commodity_id,
                requested,
                available,
            } => Self::InsufficientStock {
                commodity_id,
                requested,
                available,
            },
            InventoryError::UnknownUnit { commodity_id, unit } => {
                Self::UnknownUnit { commodity_id, unit }
            }
            InventoryError::AmountOutOfRange { commodity_id } => {
                Self::AmountOutOfRange(commodity_id)
            }
            other => Self::Inventory(other),
        }
    }
}

impl TradingError {
    /// Wraps an error raised after mutation started.
    #[must_use]
    pub fn staged(self) -> Self {
        match self {
            already @ Self::TransactionFailure(_) => already,
            other => Self::TransactionFailure(Box::new(other)),
        }
    }

    /// Returns true if the error was raised before any state changed.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::TransactionFailure(_) | Self::ImbalancedEntry { .. })
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CommodityNotFound(_) => "COMMODITY_NOT_FOUND",
            Self::SupplierNotFound(_) => "SUPPLIER_NOT_FOUND",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CommodityInactive(_) => "COMMODITY_INACTIVE",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidPrice(_) => "INVALID_PRICE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::SameAccount(_) => "SAME_ACCOUNT",
            Self::UnknownUnit { .. } => "UNKNOWN_UNIT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::ImbalancedEntry { .. } => "IMBALANCED_ENTRY",
            Self::Ledger(e) => e.error_code(),
            Self::Inventory(e) => e.error_code(),
            Self::TransactionFailure(_) => "TRANSACTION_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::CommodityNotFound(_)
            | Self::SupplierNotFound(_)
            | Self::CustomerNotFound(_)
            | Self::AccountNotFound(_) => 404,

            Self::CommodityInactive(_)
            | Self::AccountInactive(_)
            | Self::InvalidQuantity(_)
            | Self::InvalidPrice(_)
            | Self::InvalidAmount(_)
            | Self::SameAccount(_)
            | Self::UnknownUnit { .. }
            | Self::AmountOutOfRange(_) => 400,

            Self::InsufficientStock { .. } => 422,

            Self::Ledger(e) => e.http_status_code(),
            Self::Inventory(e) => e.http_status_code(),

            Self::ImbalancedEntry { .. } | Self::TransactionFailure(_) => 500,
        }
    }
}

impl From<TradingError> for AppError {
    fn from(err: TradingError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            400 => Self::Validation(message),
            _ => Self::Internal(message),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        TradingError::Ledger(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_inventory_errors_lift_to_trading_variants() {
        let id = CommodityId::new();
        let err: TradingError = InventoryError::InsufficientStock {
            commodity_id: id,
            requested: dec!(200),
            available: dec!(90),
        }
        .into();
        assert!(matches!(err, TradingError::InsufficientStock { .. }));
        assert_eq!(err.error_code(), "INSUFFICIENT_STOCK");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_ledger_errors_lift_to_trading_variants() {
        let id = AccountId::new();
        let err: TradingError = LedgerError::AccountInactive(id).into();
        assert!(matches!(err, TradingError::AccountInactive(a) if a == id));

        let err: TradingError = LedgerError::Unbalanced {
            debit: dec!(300),
            credit: dec!(299.99),
        }
        .into();
        assert!(matches!(err, TradingError::ImbalancedEntry { .. }));

        let err: TradingError = LedgerError::ZeroAmount.into();
        assert_eq!(err.error_code(), "ZERO_AMOUNT");
    }

    #[test]
    fn test_staged_wraps_once() {
        let err = TradingError::AccountInactive(AccountId::new()).staged().staged();
        match err {
            TradingError::TransactionFailure(inner) => {
                assert!(matches!(*inner, TradingError::AccountInactive(_)));
            }
            other => panic!("expected TransactionFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_classification() {
        assert!(TradingError::InvalidQuantity(Decimal::ZERO).is_rejection());
        assert!(!TradingError::ImbalancedEntry {
            debit: dec!(1),
            credit: dec!(2),
        }
        .is_rejection());
        assert!(!TradingError::InvalidPrice(dec!(-1)).staged().is_rejection());
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = TradingError::CustomerNotFound(PartyId::new()).into();
        assert!(matches!(app, AppError::NotFound(_)));

        let app: AppError = TradingError::InsufficientStock {
            commodity_id: CommodityId::new(),
            requested: dec!(200),
            available: dec!(90),
        }
        .into();
        assert!(matches!(app, AppError::BusinessRule(_)));

        let app: AppError = TradingError::AmountOutOfRange(CommodityId::new()).into();
        assert!(matches!(app, AppError::Validation(_)));

        let app: AppError = LedgerError::DuplicateAccount("10101".into()).into();
        assert!(matches!(app, AppError::Conflict(_)));

        let app: AppError = TradingError::SameAccount(AccountId::new()).staged().into();
        assert!(matches!(app, AppError::Internal(_)));
    }
}
