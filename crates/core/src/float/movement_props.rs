//! Property-based tests for float movements.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::movement::{AppliedMovement, float_movements, reversal_movements};
use super::types::FloatAccountKind;
use super::FloatTarget;
use crate::test_support::complete_input;
use crate::transaction::ServiceKind;
use branchbook_shared::types::FloatAccountId;

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind() -> impl Strategy<Value = ServiceKind> {
    proptest::sample::select(ServiceKind::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// No movement carries a zero delta and no account is hit twice.
    #[test]
    fn prop_movements_non_zero_and_distinct(kind in kind(), amount in amount(), fee_cents in 0i64..100i64) {
        let fee = Decimal::new(fee_cents, 2).min(amount - Decimal::new(1, 2));
        let movements = float_movements(&complete_input(kind, amount), fee).unwrap();

        prop_assert!(movements.iter().all(|m| !m.delta.is_zero()));
        for (i, a) in movements.iter().enumerate() {
            for b in &movements[i + 1..] {
                prop_assert_ne!(a.target, b.target);
            }
        }
    }

    /// The till moves by exactly the cash that changed hands.
    #[test]
    fn prop_till_delta_matches_cash_flow(kind in kind(), amount in amount()) {
        let movements = float_movements(&complete_input(kind, amount), Decimal::ZERO).unwrap();
        let till: Decimal = movements
            .iter()
            .filter(|m| m.target == FloatTarget::Kind(FloatAccountKind::CashInTill))
            .map(|m| m.delta)
            .sum();

        let expected = match kind {
            ServiceKind::MomoCashIn
            | ServiceKind::AgencyDeposit
            | ServiceKind::EzwichCardIssuance
            | ServiceKind::PowerSale
            | ServiceKind::JumiaCollection => amount,
            ServiceKind::MomoCashOut
            | ServiceKind::AgencyWithdrawal
            | ServiceKind::EzwichWithdrawal
            | ServiceKind::JumiaSettlement
            | ServiceKind::Expense => -amount,
            ServiceKind::EzwichSettlement | ServiceKind::FloatTransfer => Decimal::ZERO,
        };
        prop_assert_eq!(till, expected);
    }

    /// Applying then reverting leaves every account where it started.
    #[test]
    fn prop_reversal_restores_balances(deltas in prop::collection::vec(-100_000i64..100_000i64, 1..6)) {
        let applied: Vec<_> = deltas
            .iter()
            .map(|&cents| AppliedMovement {
                float_account_id: FloatAccountId::new(),
                delta: Decimal::new(cents, 2),
                balance_after: Decimal::ZERO,
            })
            .collect();
        let reverted = reversal_movements(&applied);

        prop_assert_eq!(reverted.len(), applied.len());
        for movement in &applied {
            let undo: Decimal = reverted
                .iter()
                .filter(|r| r.float_account_id == movement.float_account_id)
                .map(|r| r.delta)
                .sum();
            prop_assert_eq!(movement.delta + undo, Decimal::ZERO);
        }
    }
}
