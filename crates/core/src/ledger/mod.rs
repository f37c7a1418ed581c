//! Double-entry bookkeeping logic.
//!
//! This module implements the ledger primitive the trading workflows post to:
//! - Chart of accounts with normal balance sides
//! - Ledger entries (debits and credits) tied to a source transaction
//! - Balance calculations and journal reconciliation
//! - Business rule validation for posting batches
//! - An in-memory account store

pub mod account;
pub mod balance;
pub mod entry;
pub mod error;
pub mod journal;
pub mod store;
pub mod validation;

#[cfg(test)]
mod store_props;
#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountSubtype, AccountType, CreateAccountInput};
pub use balance::{BalanceCheck, NormalSide};
pub use entry::{EntryType, LedgerEntry, PostingLine, SourceType};
pub use error::LedgerError;
pub use journal::JournalBatch;
pub use store::{AccountStore, StoreCheckpoint};
pub use validation::{validate_entries, validate_posting_amounts, JournalTotals};
