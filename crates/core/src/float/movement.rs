//! Which float accounts a transaction moves, and by how much.

use branchbook_shared::types::FloatAccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::FloatAccountKind;
use crate::ledger::LedgerError;
use crate::transaction::{ServiceKind, ServiceTransactionInput};

/// Float account a movement applies to, before it is resolved to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloatTarget {
    /// The branch's account of this kind for the input's provider.
    Kind(FloatAccountKind),
    /// A specific account (float transfers).
    Account(FloatAccountId),
}

/// A pending balance change on a float account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatMovement {
    /// Account to move.
    pub target: FloatTarget,
    /// Signed balance change.
    pub delta: Decimal,
}

impl FloatMovement {
    fn kind(kind: FloatAccountKind, delta: Decimal) -> Self {
        Self {
            target: FloatTarget::Kind(kind),
            delta,
        }
    }

    fn account(id: FloatAccountId, delta: Decimal) -> Self {
        Self {
            target: FloatTarget::Account(id),
            delta,
        }
    }
}

/// A movement whose target has been resolved to a stored account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMovement {
    /// Account to move.
    pub float_account_id: FloatAccountId,
    /// Signed balance change.
    pub delta: Decimal,
}

/// A movement that has been written, kept with the transaction for reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMovement {
    /// Account moved.
    pub float_account_id: FloatAccountId,
    /// Signed balance change.
    pub delta: Decimal,
    /// Balance after the change.
    pub balance_after: Decimal,
}

/// Computes the float movements for a transaction.
///
/// `fee` is the fee or commission already quoted for the input. Commission
/// fees (power, Jumia) are paid by the provider and never touch the till.
/// Zero movements are dropped.
///
/// # Errors
///
/// Returns `AmountTooLarge` when amount and fee cannot be combined.
pub fn float_movements(
    input: &ServiceTransactionInput,
    fee: Decimal,
) -> Result<Vec<FloatMovement>, LedgerError> {
    use FloatAccountKind as K;

    let amount = input.amount;
    let too_large = || LedgerError::AmountTooLarge(amount);
    let received = amount.checked_add(fee).ok_or_else(too_large)?;
    let paid = amount.checked_sub(fee).ok_or_else(too_large)?;
    let movements = match input.kind {
        ServiceKind::MomoCashIn => vec![
            FloatMovement::kind(K::Momo, -amount),
            FloatMovement::kind(K::CashInTill, received),
        ],
        ServiceKind::MomoCashOut => vec![
            FloatMovement::kind(K::Momo, amount),
            FloatMovement::kind(K::CashInTill, -paid),
        ],
        ServiceKind::AgencyDeposit => vec![
            FloatMovement::kind(K::AgencyBanking, -amount),
            FloatMovement::kind(K::CashInTill, received),
        ],
        ServiceKind::AgencyWithdrawal => vec![
            FloatMovement::kind(K::AgencyBanking, amount),
            FloatMovement::kind(K::CashInTill, -paid),
        ],
        ServiceKind::EzwichWithdrawal => vec![
            FloatMovement::kind(K::EZwich, amount),
            FloatMovement::kind(K::CashInTill, -paid),
        ],
        ServiceKind::EzwichCardIssuance => vec![FloatMovement::kind(K::CashInTill, amount)],
        ServiceKind::EzwichSettlement => vec![
            FloatMovement::kind(K::EZwich, -amount),
            FloatMovement::kind(K::Bank, amount),
        ],
        ServiceKind::PowerSale => vec![
            FloatMovement::kind(K::Power, -amount),
            FloatMovement::kind(K::CashInTill, amount),
        ],
        ServiceKind::JumiaCollection => vec![
            FloatMovement::kind(K::Jumia, amount),
            FloatMovement::kind(K::CashInTill, amount),
        ],
        ServiceKind::JumiaSettlement => vec![
            FloatMovement::kind(K::Jumia, -amount),
            FloatMovement::kind(K::CashInTill, -amount),
        ],
        ServiceKind::Expense => vec![FloatMovement::kind(K::CashInTill, -amount)],
        ServiceKind::FloatTransfer => match input.transfer {
            Some(t) => vec![
                FloatMovement::account(t.source_id, -amount),
                FloatMovement::account(t.destination_id, amount),
            ],
            None => Vec::new(),
        },
    };

    Ok(movements.into_iter().filter(|m| !m.delta.is_zero()).collect())
}

/// Deltas that undo previously applied movements, in reverse order.
#[must_use]
pub fn reversal_movements(applied: &[AppliedMovement]) -> Vec<ResolvedMovement> {
    applied
        .iter()
        .rev()
        .map(|m| ResolvedMovement {
            float_account_id: m.float_account_id,
            delta: -m.delta,
        })
        .collect()
}
