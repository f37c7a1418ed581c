//! Chart of accounts domain types.

use std::str::FromStr;

use granary_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::NormalSide;
use super::error::LedgerError;

/// Top-level classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, inventory, receivables).
    Asset,
    /// Obligations owed (payables).
    Liability,
    /// Owner's equity.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// The side on which accounts of this type normally grow.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalSide::Credit,
        }
    }

    /// Returns the lowercase label stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// Finer classification, for labelling only. It never affects posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubtype {
    /// Cash on hand.
    Cash,
    /// Bank account.
    Bank,
    /// Commodity stock.
    Inventory,
    /// Amounts owed by customers.
    AccountsReceivable,
    /// Amounts owed to suppliers.
    AccountsPayable,
    /// Owner capital.
    Capital,
    /// Income from trading.
    OperatingRevenue,
    /// Cost of goods sold.
    CostOfGoodsSold,
    /// Running costs (rent, transport, wages).
    OperatingExpense,
}

impl AccountSubtype {
    /// Returns the `snake_case` label stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::Inventory => "inventory",
            Self::AccountsReceivable => "accounts_receivable",
            Self::AccountsPayable => "accounts_payable",
            Self::Capital => "capital",
            Self::OperatingRevenue => "operating_revenue",
            Self::CostOfGoodsSold => "cost_of_goods_sold",
            Self::OperatingExpense => "operating_expense",
        }
    }
}

impl FromStr for AccountSubtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            "inventory" => Ok(Self::Inventory),
            "accounts_receivable" => Ok(Self::AccountsReceivable),
            "accounts_payable" => Ok(Self::AccountsPayable),
            "capital" => Ok(Self::Capital),
            "operating_revenue" => Ok(Self::OperatingRevenue),
            "cost_of_goods_sold" => Ok(Self::CostOfGoodsSold),
            "operating_expense" => Ok(Self::OperatingExpense),
            other => Err(format!("unknown account subtype: {other}")),
        }
    }
}

/// An account in the chart of accounts, with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique account code (e.g. `"10103"`).
    pub code: String,
    /// Unique display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Optional label.
    pub account_subtype: Option<AccountSubtype>,
    /// Side on which the balance grows.
    pub normal_side: NormalSide,
    /// Signed running balance.
    pub balance: Decimal,
    /// Incremented on every balance change.
    pub version: i64,
    /// Inactive accounts cannot be posted to.
    pub is_active: bool,
}

impl Account {
    /// Creates a fresh account with a zero balance.
    #[must_use]
    pub fn open(id: AccountId, input: CreateAccountInput) -> Self {
        let normal_side = input
            .normal_side
            .unwrap_or_else(|| input.account_type.normal_side());
        Self {
            id,
            code: input.code,
            name: input.name,
            account_type: input.account_type,
            account_subtype: input.account_subtype,
            normal_side,
            balance: Decimal::ZERO,
            version: 1,
            is_active: true,
        }
    }

    /// Applies a raw signed delta to the balance.
    ///
    /// # Errors
    ///
    /// Returns `BalanceOutOfRange` and leaves the account unchanged if the
    /// new balance cannot be represented.
    pub fn adjust_balance(&mut self, delta: Decimal) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or(LedgerError::BalanceOutOfRange(self.id))?;
        self.version += 1;
        Ok(())
    }

    /// Applies a posting, deriving the delta from the normal side.
    ///
    /// Returns the applied delta.
    ///
    /// # Errors
    ///
    /// Returns `BalanceOutOfRange` if the new balance cannot be represented.
    pub fn apply_posting(&mut self, debit: Decimal, credit: Decimal) -> Result<Decimal, LedgerError> {
        let delta = self.normal_side.calculate_balance_change(debit, credit);
        self.adjust_balance(delta)?;
        Ok(delta)
    }
}

/// Input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountInput {
    /// Unique account code.
    pub code: String,
    /// Unique display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Optional label.
    pub account_subtype: Option<AccountSubtype>,
    /// Overrides the side derived from `account_type`.
    pub normal_side: Option<NormalSide>,
}

impl CreateAccountInput {
    /// Creates an input with the normal side derived from the type.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            account_subtype: None,
            normal_side: None,
        }
    }

    /// Sets the subtype label.
    #[must_use]
    pub fn with_subtype(mut self, subtype: AccountSubtype) -> Self {
        self.account_subtype = Some(subtype);
        self
    }
}
