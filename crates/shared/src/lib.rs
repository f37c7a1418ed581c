//! Shared types, errors, and configuration for Granary.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management, including the ledger account role mapping

pub mod config;
pub mod error;
pub mod types;

pub use config::{AccountRoleCodes, AppConfig, DatabaseConfig, LedgerConfig};
pub use error::{AppError, AppResult};
