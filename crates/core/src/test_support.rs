//! Builders shared by unit tests across modules.

use branchbook_shared::types::{BranchId, FloatAccountId, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::float::FloatAccountKind;
use crate::transaction::{ExpenseCategory, ServiceKind, ServiceTransactionInput, TransferAccounts};

/// A valid input for `kind` with an `MTN` provider and no explicit fee.
pub(crate) fn make_input(kind: ServiceKind, amount: Decimal) -> ServiceTransactionInput {
    ServiceTransactionInput {
        branch_id: BranchId::new(),
        kind,
        provider: "MTN".to_string(),
        amount,
        fee: None,
        customer_name: Some("Ama Mensah".to_string()),
        phone_number: Some("0241234567".to_string()),
        reference: None,
        expense_category: None,
        transfer: None,
        transaction_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        performed_by: UserId::new(),
    }
}

/// Like [`make_input`], with the category or transfer legs a kind requires.
pub(crate) fn complete_input(kind: ServiceKind, amount: Decimal) -> ServiceTransactionInput {
    let mut input = make_input(kind, amount);
    match kind {
        ServiceKind::Expense => input.expense_category = Some(ExpenseCategory::Other),
        ServiceKind::FloatTransfer => {
            input.transfer = Some(TransferAccounts {
                source_id: FloatAccountId::new(),
                source_kind: FloatAccountKind::CashInTill,
                destination_id: FloatAccountId::new(),
                destination_kind: FloatAccountKind::Momo,
            });
        }
        _ => {}
    }
    input
}
