//! Property-based tests for balance maintenance in the account store.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::account::{AccountType, CreateAccountInput};
use super::entry::SourceType;
use super::journal::JournalBatch;
use super::store::AccountStore;

const CHART: [(&str, &str, AccountType); 6] = [
    ("10101", "Cash", AccountType::Asset),
    ("10103", "Inventory", AccountType::Asset),
    ("20101", "Accounts Payable", AccountType::Liability),
    ("30101", "Capital", AccountType::Equity),
    ("40101", "Sales Revenue", AccountType::Revenue),
    ("50101", "Cost of Goods Sold", AccountType::Expense),
];

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// `(debit index, credit index, amount)` triples over the chart.
fn postings() -> impl Strategy<Value = Vec<(usize, usize, Decimal)>> {
    prop::collection::vec((0..CHART.len(), 0..CHART.len(), positive_amount()), 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After any sequence of balanced batches, every stored balance equals
    /// the normal-side-signed sum of its journal entries.
    #[test]
    fn prop_balances_reconcile_with_journal(postings in postings()) {
        let mut store = AccountStore::new();
        let ids: Vec<_> = CHART
            .iter()
            .map(|(code, name, ty)| {
                store.create_account(CreateAccountInput::new(*code, *name, *ty)).unwrap().id
            })
            .collect();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        for (debit, credit, amount) in postings {
            let batch = JournalBatch::new(SourceType::Adjustment, Uuid::now_v7(), date)
                .with_pair(ids[debit], ids[credit], amount, "adjustment");
            store.post_batch(&batch).unwrap();
        }

        let mut debit_total = Decimal::ZERO;
        let mut credit_total = Decimal::ZERO;
        for id in &ids {
            let check = store.verify_balance(*id).unwrap();
            prop_assert!(check.is_consistent(), "drift on {}: {}", id, check.drift());
            debit_total += check.debit_total;
            credit_total += check.credit_total;
        }
        prop_assert_eq!(debit_total, credit_total);
    }

    /// Restoring a checkpoint discards every later posting.
    #[test]
    fn prop_restore_discards_later_postings(
        before in postings(),
        after in postings(),
    ) {
        let mut store = AccountStore::new();
        let ids: Vec<_> = CHART
            .iter()
            .map(|(code, name, ty)| {
                store.create_account(CreateAccountInput::new(*code, *name, *ty)).unwrap().id
            })
            .collect();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let post = |store: &mut AccountStore, postings: Vec<(usize, usize, Decimal)>| {
            for (debit, credit, amount) in postings {
                let batch = JournalBatch::new(SourceType::Adjustment, Uuid::now_v7(), date)
                    .with_pair(ids[debit], ids[credit], amount, "adjustment");
                store.post_batch(&batch).unwrap();
            }
        };

        post(&mut store, before);
        let snapshot: Vec<_> = store.accounts().cloned().collect();
        let entry_count = store.entries().len();
        let checkpoint = store.checkpoint();

        post(&mut store, after);
        store.restore(checkpoint);

        prop_assert_eq!(store.accounts().cloned().collect::<Vec<_>>(), snapshot);
        prop_assert_eq!(store.entries().len(), entry_count);
    }
}
