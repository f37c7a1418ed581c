//! `SeaORM` entity definitions.
//!
//! One module per table, plus the PostgreSQL enum types. Each entity
//! converts its `Model` into the matching `granary-core` domain type.

pub mod accounts;
pub mod commodities;
pub mod expenses;
pub mod inventory_positions;
pub mod ledger_entries;
pub mod parties;
pub mod purchases;
pub mod sales;
pub mod sea_orm_active_enums;
