//! `SeaORM` active enums for the PostgreSQL enum types.
//!
//! Each enum converts to and from its `granary-core` counterpart.

use granary_core::ledger;
use granary_core::trading;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_subtype")]
pub enum AccountSubtype {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank")]
    Bank,
    #[sea_orm(string_value = "inventory")]
    Inventory,
    #[sea_orm(string_value = "accounts_receivable")]
    AccountsReceivable,
    #[sea_orm(string_value = "accounts_payable")]
    AccountsPayable,
    #[sea_orm(string_value = "capital")]
    Capital,
    #[sea_orm(string_value = "operating_revenue")]
    OperatingRevenue,
    #[sea_orm(string_value = "cost_of_goods_sold")]
    CostOfGoodsSold,
    #[sea_orm(string_value = "operating_expense")]
    OperatingExpense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_side")]
pub enum NormalSide {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "source_type")]
pub enum SourceType {
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Generates `From` conversions in both directions between a database enum
/// and its domain enum with identically named variants.
macro_rules! mirror_enum {
    ($db:ident, $domain:ty, [$($variant:ident),+ $(,)?]) => {
        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                type Domain = $domain;
                match value {
                    $(Domain::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(AccountType, ledger::AccountType, [Asset, Liability, Equity, Revenue, Expense]);
mirror_enum!(
    AccountSubtype,
    ledger::AccountSubtype,
    [
        Cash,
        Bank,
        Inventory,
        AccountsReceivable,
        AccountsPayable,
        Capital,
        OperatingRevenue,
        CostOfGoodsSold,
        OperatingExpense,
    ]
);
mirror_enum!(NormalSide, ledger::NormalSide, [Debit, Credit]);
mirror_enum!(SourceType, ledger::SourceType, [Purchase, Sale, Expense, Adjustment]);
mirror_enum!(PaymentStatus, trading::PaymentStatus, [Pending, Partial, Paid]);
