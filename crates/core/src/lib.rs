//! Core business logic for Branchbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Everything a branch transaction needs before it reaches the database lives here.
//!
//! # Modules
//!
//! - `transaction` - Operational transaction kinds and their input validation
//! - `fees` - Fee and commission schedules
//! - `ledger` - Chart of accounts, GL entry building and balance checks
//! - `float` - Float-account balance movements

pub mod fees;
pub mod float;
pub mod ledger;
pub mod transaction;

#[cfg(test)]
pub(crate) mod test_support;
