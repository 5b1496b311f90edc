//! Double-entry GL posting.
//!
//! - `accounts` - the fixed system chart of accounts
//! - `builder` - journal lines per transaction kind
//! - `validation` - balance check
//! - `service` - posting and reversal preparation
//! - `types` - journal lines, totals and prepared postings
//! - `error` - ledger error types

pub mod accounts;
pub mod builder;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use accounts::SystemAccount;
pub use builder::build_entries;
pub use error::LedgerError;
pub use service::GlPostingService;
pub use types::{
    AccountType, EntryLine, FeeQuote, OriginalPosting, PostingHeader, PostingTotals, PreparedPosting,
    PreparedReversal,
};
pub use validation::{DEFAULT_TOLERANCE, validate_balance};
