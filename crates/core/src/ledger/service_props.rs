//! Property-based tests for GlPostingService.
//!
//! Every kind must produce a balanced posting whose float movements agree
//! with the GL lines on the float accounts.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::accounts::SystemAccount;
use super::service::GlPostingService;
use super::types::{EntryLine, OriginalPosting};
use crate::float::{AppliedMovement, FloatTarget};
use crate::test_support::complete_input;
use crate::transaction::{ServiceKind, ServiceTransactionStatus};
use branchbook_shared::types::FloatAccountId;

/// Amounts from 200.00 to 100,000.00, above every cash-out minimum fee.
fn amount() -> impl Strategy<Value = Decimal> {
    (20_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind() -> impl Strategy<Value = ServiceKind> {
    proptest::sample::select(ServiceKind::ALL.to_vec())
}

fn net_by_account(lines: &[EntryLine]) -> HashMap<SystemAccount, Decimal> {
    let mut net = HashMap::new();
    for line in lines {
        *net.entry(line.account).or_insert(Decimal::ZERO) += line.balance_change();
    }
    net
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Postings built from the default schedule balance exactly.
    #[test]
    fn prop_every_kind_balances(kind in kind(), amount in amount()) {
        let service = GlPostingService::default();
        let posting = service.prepare(&complete_input(kind, amount)).unwrap();
        prop_assert_eq!(posting.totals.difference(), Decimal::ZERO);
        prop_assert!(posting.lines.len() >= 2);
        prop_assert!(posting.lines.iter().all(|l| l.amount() > Decimal::ZERO));
    }

    /// Each float movement equals the GL balance change on that float's account.
    #[test]
    fn prop_float_movements_match_gl(kind in kind(), amount in amount()) {
        prop_assume!(kind != ServiceKind::FloatTransfer);
        let service = GlPostingService::default();
        let posting = service.prepare(&complete_input(kind, amount)).unwrap();
        let net = net_by_account(&posting.lines);

        for movement in &posting.movements {
            let FloatTarget::Kind(float_kind) = movement.target else {
                continue;
            };
            let gl = net
                .get(&float_kind.gl_account())
                .copied()
                .unwrap_or(Decimal::ZERO);
            prop_assert_eq!(gl, movement.delta, "{:?} on {:?}", kind, float_kind);
        }
    }

    /// A posting plus its reversal nets every account to zero.
    #[test]
    fn prop_reversal_nets_to_zero(kind in kind(), amount in amount()) {
        let service = GlPostingService::default();
        let posting = service.prepare(&complete_input(kind, amount)).unwrap();
        let original = OriginalPosting {
            service_transaction_id: Uuid::now_v7(),
            status: ServiceTransactionStatus::Completed,
            header: posting.header.clone(),
            lines: posting.lines.clone(),
            movements: posting
                .movements
                .iter()
                .map(|m| AppliedMovement {
                    float_account_id: FloatAccountId::new(),
                    delta: m.delta,
                    balance_after: Decimal::ZERO,
                })
                .collect(),
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let reversal = service.prepare_reversal(&original, None, date).unwrap();

        let mut lines = posting.lines.clone();
        lines.extend(reversal.lines);
        prop_assert!(net_by_account(&lines).values().all(Decimal::is_zero));

        let float_net: Decimal = original
            .movements
            .iter()
            .map(|m| m.delta)
            .chain(reversal.movements.iter().map(|m| m.delta))
            .sum();
        prop_assert_eq!(float_net, Decimal::ZERO);
    }
}
