//! Property-based tests for posting line validation rules.

use granary_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::{EntryType, PostingLine};
use super::error::LedgerError;
use super::validation::{validate_entries, validate_posting_amounts};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Strategy to generate an entry type.
fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

fn make_line(entry_type: EntryType, amount: Decimal) -> PostingLine {
    PostingLine {
        account_id: AccountId::new(),
        entry_type,
        amount,
        description: String::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Zero amount lines are rejected.
    #[test]
    fn prop_zero_amount_rejected(
        entry_type in entry_type_strategy(),
        other_amount in positive_amount(),
    ) {
        let lines = vec![
            make_line(entry_type, Decimal::ZERO),
            make_line(entry_type.opposite(), other_amount),
        ];

        let result = validate_entries(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::ZeroAmount)),
            "Zero amount should be rejected, got: {:?}",
            result
        );
    }

    /// Negative amount lines are rejected.
    #[test]
    fn prop_negative_amount_rejected(
        entry_type in entry_type_strategy(),
        neg_amount in negative_amount(),
        other_amount in positive_amount(),
    ) {
        let lines = vec![
            make_line(entry_type, neg_amount),
            make_line(entry_type.opposite(), other_amount),
        ];

        let result = validate_entries(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::NegativeAmount)),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }

    /// A single line is always single-sided.
    #[test]
    fn prop_single_line_rejected(
        entry_type in entry_type_strategy(),
        amount in positive_amount(),
    ) {
        let result = validate_entries(&[make_line(entry_type, amount)]);
        prop_assert!(matches!(result, Err(LedgerError::SingleSided)));
    }

    /// Split debits against one combined credit balance.
    #[test]
    fn prop_multi_line_balanced_accepted(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let total = amount1 + amount2;
        let lines = vec![
            make_line(EntryType::Debit, amount1),
            make_line(EntryType::Debit, amount2),
            make_line(EntryType::Credit, total),
        ];

        let totals = validate_entries(&lines);
        prop_assert!(totals.is_ok(), "got: {:?}", totals);
        prop_assert_eq!(totals.unwrap().credit, total);
    }

    /// Any difference between the sides is reported with both totals.
    #[test]
    fn prop_off_by_any_amount_unbalanced(
        amount in positive_amount(),
        diff in positive_amount(),
    ) {
        let lines = vec![
            make_line(EntryType::Debit, amount + diff),
            make_line(EntryType::Credit, amount),
        ];

        match validate_entries(&lines) {
            Err(LedgerError::Unbalanced { debit, credit }) => {
                prop_assert_eq!(debit - credit, diff);
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    /// A single entry carries exactly one positive side.
    #[test]
    fn prop_posting_amounts_one_side(
        amount in positive_amount(),
        other in positive_amount(),
    ) {
        prop_assert_eq!(validate_posting_amounts(amount, Decimal::ZERO).unwrap(), EntryType::Debit);
        prop_assert_eq!(validate_posting_amounts(Decimal::ZERO, amount).unwrap(), EntryType::Credit);
        prop_assert!(matches!(
            validate_posting_amounts(amount, other),
            Err(LedgerError::InvalidEntryType)
        ));
    }
}
