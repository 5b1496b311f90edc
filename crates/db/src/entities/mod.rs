//! `SeaORM` entity definitions.

pub mod prelude;

pub mod branches;
pub mod float_accounts;
pub mod gl_accounts;
pub mod gl_journal_entries;
pub mod gl_transactions;
pub mod service_transactions;
