//! Ledger error types for validation and posting errors.
//!
//! This module defines all errors that can occur while preparing a GL
//! posting: input validation, fee errors, entry balancing, chart-of-accounts
//! lookups, float movements and transaction state errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::float::{FloatAccountKind, FloatError};
use crate::transaction::ServiceKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Input Errors ==========
    /// Amount cannot be zero.
    #[error("Amount cannot be zero")]
    ZeroAmount,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amount has more than two decimal places.
    #[error("Amount {0} has more than two decimal places")]
    InvalidAmountScale(Decimal),

    /// Amount does not fit a booked money column.
    #[error("Amount {0} exceeds the largest bookable amount")]
    AmountTooLarge(Decimal),

    /// Fee cannot be negative.
    #[error("Fee cannot be negative")]
    NegativeFee,

    /// Fee would swallow the whole payout.
    #[error("Fee {fee} must be less than amount {amount}")]
    FeeExceedsAmount {
        /// The fee charged.
        fee: Decimal,
        /// The principal amount.
        amount: Decimal,
    },

    /// Provider is required for this kind.
    #[error("Provider is required for {0}")]
    MissingProvider(ServiceKind),

    /// Expense transactions need a category.
    #[error("Expense category is required")]
    MissingExpenseCategory,

    /// Float transfers need both legs.
    #[error("Float transfer requires source and destination accounts")]
    MissingTransferAccounts,

    /// Float transfer source equals destination.
    #[error("Float transfer source and destination must differ")]
    SameTransferAccount,

    /// This float account kind cannot take part in transfers.
    #[error("Float accounts of kind {0} cannot be used in transfers")]
    UnsupportedTransfer(FloatAccountKind),

    /// Unknown transaction kind.
    #[error("Unknown transaction kind: {0}")]
    UnknownKind(String),

    /// Unknown service module.
    #[error("Unknown service module: {0}")]
    UnknownModule(String),

    /// Unknown expense category.
    #[error("Unknown expense category: {0}")]
    UnknownExpenseCategory(String),

    /// Unknown transaction status.
    #[error("Unknown transaction status: {0}")]
    UnknownStatus(String),

    /// Unknown float account kind.
    #[error("Unknown float account kind: {0}")]
    UnknownFloatKind(String),

    /// Fee rule is malformed.
    #[error("Invalid fee rule for {kind}: {reason}")]
    InvalidFeeRule {
        /// The kind being configured.
        kind: String,
        /// What is wrong with it.
        reason: String,
    },

    // ========== Entry Errors ==========
    /// Posting must have at least 2 lines.
    #[error("Posting must have at least 2 entries")]
    InsufficientEntries,

    /// Posting is not balanced (debits != credits).
    #[error("Posting is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedTransaction {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount cannot be negative.
    #[error("Entry amount cannot be negative")]
    NegativeEntryAmount,

    /// Line must specify either debit or credit, not both.
    #[error("Entry must specify either debit or credit, not both")]
    InvalidEntryType,

    /// Account code outside the system chart.
    #[error("Unknown account code: {0}")]
    UnknownAccountCode(String),

    // ========== Float Errors ==========
    /// Float movement failed.
    #[error(transparent)]
    Float(#[from] FloatError),

    // ========== State Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Transaction has already been reversed.
    #[error("Transaction {0} has already been reversed")]
    AlreadyReversed(Uuid),

    /// A transaction with the same reference is already posted.
    #[error("Transaction with reference '{0}' has already been posted")]
    DuplicatePosting(String),

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidAmountScale(_) => "INVALID_AMOUNT_SCALE",
            Self::AmountTooLarge(_) => "AMOUNT_TOO_LARGE",
            Self::NegativeFee => "NEGATIVE_FEE",
            Self::FeeExceedsAmount { .. } => "FEE_EXCEEDS_AMOUNT",
            Self::MissingProvider(_) => "MISSING_PROVIDER",
            Self::MissingExpenseCategory => "MISSING_EXPENSE_CATEGORY",
            Self::MissingTransferAccounts => "MISSING_TRANSFER_ACCOUNTS",
            Self::SameTransferAccount => "SAME_TRANSFER_ACCOUNT",
            Self::UnsupportedTransfer(_) => "UNSUPPORTED_TRANSFER",
            Self::UnknownKind(_) => "UNKNOWN_KIND",
            Self::UnknownModule(_) => "UNKNOWN_MODULE",
            Self::UnknownExpenseCategory(_) => "UNKNOWN_EXPENSE_CATEGORY",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
            Self::UnknownFloatKind(_) => "UNKNOWN_FLOAT_KIND",
            Self::InvalidFeeRule { .. } => "INVALID_FEE_RULE",
            Self::InsufficientEntries => "INSUFFICIENT_ENTRIES",
            Self::UnbalancedTransaction { .. } => "UNBALANCED_TRANSACTION",
            Self::NegativeEntryAmount => "NEGATIVE_ENTRY_AMOUNT",
            Self::InvalidEntryType => "INVALID_ENTRY_TYPE",
            Self::UnknownAccountCode(_) => "UNKNOWN_ACCOUNT_CODE",
            Self::Float(e) => e.error_code(),
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::DuplicatePosting(_) => "DUPLICATE_POSTING",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::ZeroAmount
            | Self::NegativeAmount
            | Self::InvalidAmountScale(_)
            | Self::AmountTooLarge(_)
            | Self::NegativeFee
            | Self::FeeExceedsAmount { .. }
            | Self::MissingProvider(_)
            | Self::MissingExpenseCategory
            | Self::MissingTransferAccounts
            | Self::SameTransferAccount
            | Self::UnsupportedTransfer(_)
            | Self::UnknownKind(_)
            | Self::UnknownModule(_)
            | Self::UnknownExpenseCategory(_)
            | Self::UnknownStatus(_)
            | Self::UnknownFloatKind(_)
            | Self::InsufficientEntries
            | Self::UnbalancedTransaction { .. }
            | Self::NegativeEntryAmount
            | Self::InvalidEntryType
            | Self::UnknownAccountCode(_) => 400,

            Self::Float(e) => e.http_status_code(),

            // 404 Not Found
            Self::TransactionNotFound(_) => 404,

            // 409 Conflict - state errors
            Self::AlreadyReversed(_) | Self::DuplicatePosting(_) => 409,

            // 500 Internal Server Error
            Self::InvalidFeeRule { .. } | Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchbook_shared::types::FloatAccountId;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InsufficientEntries.error_code(), "INSUFFICIENT_ENTRIES");
        assert_eq!(
            LedgerError::UnbalancedTransaction {
                debit: Decimal::new(100, 2),
                credit: Decimal::new(50, 2),
            }
            .error_code(),
            "UNBALANCED_TRANSACTION"
        );
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(
            LedgerError::DuplicatePosting("REF".into()).error_code(),
            "DUPLICATE_POSTING"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::InsufficientEntries.http_status_code(), 400);
        assert_eq!(
            LedgerError::TransactionNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(LedgerError::AlreadyReversed(Uuid::nil()).http_status_code(), 409);
        assert_eq!(
            LedgerError::Database("test".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_float_errors_delegate() {
        let err: LedgerError = FloatError::InsufficientFloat {
            account_id: FloatAccountId::from_uuid(Uuid::nil()),
            available: Decimal::new(1000, 2),
            required: Decimal::new(5000, 2),
        }
        .into();
        assert_eq!(err.error_code(), "INSUFFICIENT_FLOAT");
        assert_eq!(err.http_status_code(), 422);

        let err: LedgerError = FloatError::ConcurrentUpdate(FloatAccountId::from_uuid(Uuid::nil())).into();
        assert_eq!(err.error_code(), "CONCURRENT_MODIFICATION");
        assert_eq!(err.http_status_code(), 409);
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedTransaction {
            debit: Decimal::new(10000, 2),
            credit: Decimal::new(5000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Posting is not balanced. Debit: 100.00, Credit: 50.00"
        );
        assert_eq!(
            LedgerError::MissingProvider(ServiceKind::MomoCashIn).to_string(),
            "Provider is required for momo_cash_in"
        );
    }
}
