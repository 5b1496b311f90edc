//! Entity re-exports.

pub use super::branches::Entity as Branches;
pub use super::float_accounts::Entity as FloatAccounts;
pub use super::gl_accounts::Entity as GlAccounts;
pub use super::gl_journal_entries::Entity as GlJournalEntries;
pub use super::gl_transactions::Entity as GlTransactions;
pub use super::service_transactions::Entity as ServiceTransactions;
