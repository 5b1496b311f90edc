//! Balance check for journal lines before they are persisted.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryLine, PostingTotals};

/// Largest debit/credit difference accepted as balanced (one cent).
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Validates that a set of journal lines forms a balanced posting.
///
/// # Errors
///
/// Returns an error if there are fewer than two lines, a line is negative
/// or one-sided incorrectly, or the totals differ by more than `tolerance`.
pub fn validate_balance(
    lines: &[EntryLine],
    tolerance: Decimal,
) -> Result<PostingTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientEntries);
    }

    for line in lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeEntryAmount);
        }
        if line.debit.is_zero() == line.credit.is_zero() {
            return Err(LedgerError::InvalidEntryType);
        }
    }

    let totals = PostingTotals::from_lines(lines);
    if !totals.is_balanced(tolerance) {
        return Err(LedgerError::UnbalancedTransaction {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}
