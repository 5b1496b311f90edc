//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod branch;
pub mod float_account;
pub mod gl_account;
pub mod posting;

pub use branch::{BranchError, BranchRepository, CreateBranchInput};
pub use float_account::{CreateFloatAccountInput, FloatAccountError, FloatAccountRepository};
pub use gl_account::{GlAccountRepository, TrialBalance, TrialBalanceFilter, TrialBalanceLine};
pub use posting::{
    GlPostingRecord, PostedTransaction, PostingError, PostingRepository, ReverseInput,
    ServiceTransactionDetail, ServiceTransactionFilter,
};

use sea_orm::{DbErr, SqlErr};

/// Whether `err` is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
