//! Property-based tests for the balance check.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::accounts::SystemAccount;
use super::error::LedgerError;
use super::types::EntryLine;
use super::validation::{DEFAULT_TOLERANCE, validate_balance};

/// Amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account() -> impl Strategy<Value = SystemAccount> {
    proptest::sample::select(SystemAccount::ALL.to_vec())
}

/// Debit lines plus one balancing credit line.
fn balanced_lines() -> impl Strategy<Value = Vec<EntryLine>> {
    (prop::collection::vec((account(), positive_amount()), 1..6), account()).prop_map(
        |(debits, credit_account)| {
            let total: Decimal = debits.iter().map(|(_, amount)| *amount).sum();
            let mut lines: Vec<EntryLine> = debits
                .into_iter()
                .map(|(account, amount)| EntryLine::debit(account, amount, "dr"))
                .collect();
            lines.push(EntryLine::credit(credit_account, total, "cr"));
            lines
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced lines always pass and report equal totals.
    #[test]
    fn prop_balanced_lines_pass(lines in balanced_lines()) {
        let totals = validate_balance(&lines, DEFAULT_TOLERANCE).unwrap();
        prop_assert_eq!(totals.total_debit, totals.total_credit);
    }

    /// Skewing one side by more than a cent is rejected.
    #[test]
    fn prop_skew_beyond_tolerance_rejected(
        mut lines in balanced_lines(),
        skew in 2i64..10_000i64,
    ) {
        let last = lines.len() - 1;
        lines[last].credit += Decimal::new(skew, 2);
        let result = validate_balance(&lines, DEFAULT_TOLERANCE);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedTransaction { .. })),
            "expected unbalanced, got {:?}",
            result
        );
    }

    /// Reversing every line keeps the posting balanced.
    #[test]
    fn prop_reversed_lines_stay_balanced(lines in balanced_lines()) {
        let reversed: Vec<_> = lines.iter().map(EntryLine::reversed).collect();
        let original = validate_balance(&lines, DEFAULT_TOLERANCE).unwrap();
        let mirror = validate_balance(&reversed, DEFAULT_TOLERANCE).unwrap();
        prop_assert_eq!(original.total_debit, mirror.total_credit);
    }
}
