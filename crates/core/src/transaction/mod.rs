//! Operational transactions raised by the branch service modules.
//!
//! Every MoMo, agency banking, E-Zwich, power, Jumia, expense or float
//! transfer transaction starts life as a [`ServiceTransactionInput`].

pub mod types;

pub use types::{
    ExpenseCategory, ServiceKind, ServiceModule, ServiceTransactionInput,
    ServiceTransactionStatus, TransferAccounts, validate_amounts,
};
