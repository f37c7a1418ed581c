//! Semantic account roles used by the trading workflows.
//!
//! Workflows never name accounts directly. Each role maps to an account
//! code in configuration, and the codes are resolved to ids once at startup.

use granary_shared::types::AccountId;
use granary_shared::AccountRoleCodes;
use serde::{Deserialize, Serialize};

use crate::ledger::{AccountSubtype, AccountType, CreateAccountInput, LedgerError};

/// A posting role the workflows depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Commodity stock asset.
    Inventory,
    /// Amounts owed to suppliers.
    AccountsPayable,
    /// Amounts owed by customers.
    AccountsReceivable,
    /// Sales income.
    SalesRevenue,
    /// Cost of goods sold.
    CostOfGoodsSold,
    /// Main cash box.
    Cash,
}

impl AccountRole {
    /// Every role, in chart order.
    pub const ALL: [Self; 6] = [
        Self::Cash,
        Self::Inventory,
        Self::AccountsReceivable,
        Self::AccountsPayable,
        Self::SalesRevenue,
        Self::CostOfGoodsSold,
    ];

    /// The configured code for this role.
    #[must_use]
    pub fn code(self, codes: &AccountRoleCodes) -> &str {
        match self {
            Self::Inventory => &codes.inventory,
            Self::AccountsPayable => &codes.accounts_payable,
            Self::AccountsReceivable => &codes.accounts_receivable,
            Self::SalesRevenue => &codes.sales_revenue,
            Self::CostOfGoodsSold => &codes.cost_of_goods_sold,
            Self::Cash => &codes.cash,
        }
    }

    /// The account this role needs in a fresh chart of accounts.
    #[must_use]
    pub fn default_account(self, codes: &AccountRoleCodes) -> CreateAccountInput {
        let (name, account_type, subtype) = match self {
            Self::Inventory => ("Inventory", AccountType::Asset, AccountSubtype::Inventory),
            Self::AccountsPayable => (
                "Accounts Payable (Suppliers)",
                AccountType::Liability,
                AccountSubtype::AccountsPayable,
            ),
            Self::AccountsReceivable => (
                "Accounts Receivable (Customers)",
                AccountType::Asset,
                AccountSubtype::AccountsReceivable,
            ),
            Self::SalesRevenue => (
                "Sales Revenue",
                AccountType::Revenue,
                AccountSubtype::OperatingRevenue,
            ),
            Self::CostOfGoodsSold => (
                "Cost of Goods Sold",
                AccountType::Expense,
                AccountSubtype::CostOfGoodsSold,
            ),
            Self::Cash => ("Main Cash", AccountType::Asset, AccountSubtype::Cash),
        };
        CreateAccountInput::new(self.code(codes), name, account_type).with_subtype(subtype)
    }
}

/// The default chart of accounts: one account per role.
#[must_use]
pub fn default_chart(codes: &AccountRoleCodes) -> Vec<CreateAccountInput> {
    AccountRole::ALL
        .iter()
        .map(|role| role.default_account(codes))
        .collect()
}

/// Role to account id mapping, resolved once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRoles {
    /// Inventory asset account.
    pub inventory: AccountId,
    /// Accounts payable.
    pub accounts_payable: AccountId,
    /// Accounts receivable.
    pub accounts_receivable: AccountId,
    /// Sales revenue.
    pub sales_revenue: AccountId,
    /// Cost of goods sold.
    pub cost_of_goods_sold: AccountId,
    /// Main cash account.
    pub cash: AccountId,
}

impl AccountRoles {
    /// Resolves every role's code to an account id via `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` for the first role whose code `lookup`
    /// cannot find.
    pub fn resolve<F>(codes: &AccountRoleCodes, mut lookup: F) -> Result<Self, LedgerError>
    where
        F: FnMut(&str) -> Option<AccountId>,
    {
        let mut find = |role: AccountRole| {
            let code = role.code(codes);
            lookup(code).ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))
        };

        Ok(Self {
            inventory: find(AccountRole::Inventory)?,
            accounts_payable: find(AccountRole::AccountsPayable)?,
            accounts_receivable: find(AccountRole::AccountsReceivable)?,
            sales_revenue: find(AccountRole::SalesRevenue)?,
            cost_of_goods_sold: find(AccountRole::CostOfGoodsSold)?,
            cash: find(AccountRole::Cash)?,
        })
    }

    /// The account id backing `role`.
    #[must_use]
    pub const fn get(&self, role: AccountRole) -> AccountId {
        match role {
            AccountRole::Inventory => self.inventory,
            AccountRole::AccountsPayable => self.accounts_payable,
            AccountRole::AccountsReceivable => self.accounts_receivable,
            AccountRole::SalesRevenue => self.sales_revenue,
            AccountRole::CostOfGoodsSold => self.cost_of_goods_sold,
            AccountRole::Cash => self.cash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_chart_covers_roles() {
        let codes = AccountRoleCodes::default();
        let chart = default_chart(&codes);
        assert_eq!(chart.len(), 6);

        let revenue = chart.iter().find(|a| a.code == "40101").unwrap();
        assert_eq!(revenue.account_type, AccountType::Revenue);
        let payable = chart.iter().find(|a| a.code == "20101").unwrap();
        assert_eq!(payable.account_type, AccountType::Liability);
    }

    #[test]
    fn test_resolve_maps_every_role() {
        let codes = AccountRoleCodes::default();
        let ids: HashMap<String, AccountId> = AccountRole::ALL
            .iter()
            .map(|r| (r.code(&codes).to_string(), AccountId::new()))
            .collect();

        let roles = AccountRoles::resolve(&codes, |code| ids.get(code).copied()).unwrap();
        for role in AccountRole::ALL {
            assert_eq!(roles.get(role), ids[role.code(&codes)]);
        }
    }

    #[test]
    fn test_resolve_reports_missing_code() {
        let codes = AccountRoleCodes {
            cost_of_goods_sold: "59999".into(),
            ..AccountRoleCodes::default()
        };
        let err = AccountRoles::resolve(&codes, |code| {
            (code != "59999").then(AccountId::new)
        })
        .unwrap_err();
        assert!(matches!(err, LedgerError::AccountCodeNotFound(ref c) if c == "59999"));
    }
}
