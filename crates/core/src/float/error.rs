//! Float-account errors.

use branchbook_shared::types::FloatAccountId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::FloatAccountKind;

/// Errors raised while moving float balances.
#[derive(Debug, Error)]
pub enum FloatError {
    /// No float account exists for the branch/kind/provider.
    #[error("No {kind} float account found for provider '{provider}'")]
    AccountNotFound {
        /// Float kind looked up.
        kind: FloatAccountKind,
        /// Provider looked up (empty for unscoped kinds).
        provider: String,
    },

    /// Float account id does not exist.
    #[error("Float account not found: {0}")]
    AccountIdNotFound(FloatAccountId),

    /// Float account is deactivated.
    #[error("Float account {0} is inactive")]
    AccountInactive(FloatAccountId),

    /// Debit would take the balance below zero.
    #[error("Insufficient float on account {account_id}: available {available}, required {required}")]
    InsufficientFloat {
        /// The account being debited.
        account_id: FloatAccountId,
        /// Balance before the movement.
        available: Decimal,
        /// Amount the movement needs.
        required: Decimal,
    },

    /// Float account already exists for the branch/kind/provider.
    #[error("A {kind} float account for provider '{provider}' already exists")]
    DuplicateAccount {
        /// Float kind.
        kind: FloatAccountKind,
        /// Provider.
        provider: String,
    },

    /// Thresholds are inconsistent.
    #[error("Minimum threshold {min} exceeds maximum threshold {max}")]
    InvalidThresholds {
        /// Minimum threshold.
        min: Decimal,
        /// Maximum threshold.
        max: Decimal,
    },

    /// Thresholds and opening balances cannot be negative.
    #[error("Float amount {0} cannot be negative")]
    NegativeAmount(Decimal),

    /// Balance changed between read and guarded update.
    #[error("Float account {0} was modified concurrently, please retry")]
    ConcurrentUpdate(FloatAccountId),
}

impl FloatError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound { .. } | Self::AccountIdNotFound(_) => "FLOAT_ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "FLOAT_ACCOUNT_INACTIVE",
            Self::InsufficientFloat { .. } => "INSUFFICIENT_FLOAT",
            Self::DuplicateAccount { .. } => "DUPLICATE_FLOAT_ACCOUNT",
            Self::InvalidThresholds { .. } => "INVALID_THRESHOLDS",
            Self::NegativeAmount(_) => "NEGATIVE_FLOAT_AMOUNT",
            Self::ConcurrentUpdate(_) => "CONCURRENT_MODIFICATION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::AccountNotFound { .. } | Self::AccountIdNotFound(_) => 404,
            Self::AccountInactive(_) | Self::InsufficientFloat { .. } => 422,
            Self::InvalidThresholds { .. } | Self::NegativeAmount(_) => 400,
            Self::DuplicateAccount { .. } | Self::ConcurrentUpdate(_) => 409,
        }
    }
}
