//! Core business logic for Granary.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Chart of accounts, double-entry postings and balance maintenance
//! - `inventory` - Commodities and moving-average inventory costing
//! - `trading` - Purchase, sale and expense workflows

pub mod amount;
pub mod inventory;
pub mod ledger;
pub mod trading;
