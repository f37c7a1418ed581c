//! Account balance calculations.
//!
//! Every balance mutation goes through [`NormalSide::calculate_balance_change`],
//! so the sign convention lives in one place instead of in each workflow.

use granary_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The side on which an account's balance conventionally increases.
///
/// - Asset/Expense: balance += debit - credit (debit-normal)
/// - Liability/Equity/Revenue: balance += credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debit-normal accounts (Asset, Expense)
    Debit,
    /// Credit-normal accounts (Liability, Equity, Revenue)
    Credit,
}

impl NormalSide {
    /// Calculates the balance change for a posting.
    #[must_use]
    pub fn calculate_balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }

    /// Returns the lowercase label stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

/// Result of reconciling an account's stored balance against its journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// The account checked.
    pub account_id: AccountId,
    /// Running balance held on the account.
    pub stored_balance: Decimal,
    /// Balance recomputed from every ledger entry on the account.
    pub journal_balance: Decimal,
    /// Total debits posted to the account.
    pub debit_total: Decimal,
    /// Total credits posted to the account.
    pub credit_total: Decimal,
}

impl BalanceCheck {
    /// Builds a check from journal totals.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        normal_side: NormalSide,
        stored_balance: Decimal,
        debit_total: Decimal,
        credit_total: Decimal,
    ) -> Self {
        Self {
            account_id,
            stored_balance,
            journal_balance: normal_side.calculate_balance_change(debit_total, credit_total),
            debit_total,
            credit_total,
        }
    }

    /// Stored balance minus journal balance.
    #[must_use]
    pub fn drift(&self) -> Decimal {
        self.stored_balance - self.journal_balance
    }

    /// Returns true when the stored balance matches the journal.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.drift().is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_normal_change() {
        let change = NormalSide::Debit.calculate_balance_change(dec!(200), dec!(0));
        assert_eq!(change, dec!(200));
        let change = NormalSide::Debit.calculate_balance_change(dec!(0), dec!(160));
        assert_eq!(change, dec!(-160));
    }

    #[test]
    fn test_credit_normal_change() {
        let change = NormalSide::Credit.calculate_balance_change(dec!(0), dec!(300));
        assert_eq!(change, dec!(300));
        let change = NormalSide::Credit.calculate_balance_change(dec!(50), dec!(0));
        assert_eq!(change, dec!(-50));
    }

    #[test]
    fn test_balance_check_drift() {
        let check = BalanceCheck::new(
            AccountId::new(),
            NormalSide::Credit,
            dec!(250),
            dec!(50),
            dec!(300),
        );
        assert_eq!(check.journal_balance, dec!(250));
        assert!(check.is_consistent());

        let drifted = BalanceCheck::new(
            AccountId::new(),
            NormalSide::Debit,
            dec!(100),
            dec!(90),
            dec!(0),
        );
        assert_eq!(drifted.drift(), dec!(10));
        assert!(!drifted.is_consistent());
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The two normal sides always produce opposite changes.
        #[test]
        fn prop_sides_are_mirror_images(
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            let d = NormalSide::Debit.calculate_balance_change(debit, credit);
            let c = NormalSide::Credit.calculate_balance_change(debit, credit);
            prop_assert_eq!(d, -c);
        }

        /// Summing per-posting changes equals the change of the summed totals.
        #[test]
        fn prop_incremental_equals_journal_total(
            postings in prop::collection::vec((amount_strategy(), any::<bool>()), 1..50),
        ) {
            let side = NormalSide::Credit;
            let mut running = Decimal::ZERO;
            let mut debit_total = Decimal::ZERO;
            let mut credit_total = Decimal::ZERO;
            for (amount, is_debit) in &postings {
                let (debit, credit) = if *is_debit {
                    (*amount, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, *amount)
                };
                running += side.calculate_balance_change(debit, credit);
                debit_total += debit;
                credit_total += credit;
            }
            let check = BalanceCheck::new(AccountId::new(), side, running, debit_total, credit_total);
            prop_assert!(check.is_consistent());
        }
    }
}
