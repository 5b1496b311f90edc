//! Ledger domain types for GL posting.
//!
//! This module defines the account classification, the journal lines an
//! entry builder produces, and the prepared postings handed to persistence.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accounts::SystemAccount;
use super::error::LedgerError;
use crate::fees::FeeRule;
use crate::float::{AppliedMovement, FloatMovement, ResolvedMovement};
use crate::transaction::{ServiceKind, ServiceModule, ServiceTransactionStatus};

/// Account classification.
///
/// - Asset/Expense: balance += debit - credit (debit-normal)
/// - Liability/Equity/Revenue: balance += credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources the branch holds.
    Asset,
    /// Amounts the branch owes.
    Liability,
    /// Owner's stake.
    Equity,
    /// Fees and commissions earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the stable string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Returns true for debit-normal accounts (asset, expense).
    #[must_use]
    pub const fn is_debit_normal(&self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Calculates the balance change a line causes on an account of this type.
    #[must_use]
    pub fn balance_change(&self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(LedgerError::Internal(format!("unknown account type '{other}'"))),
        }
    }
}

/// A single GL journal line.
///
/// Exactly one of `debit` / `credit` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLine {
    /// The account posted to.
    pub account: SystemAccount,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
    /// Line narration.
    pub description: String,
}

impl EntryLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account: SystemAccount, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account,
            debit: amount,
            credit: Decimal::ZERO,
            description: description.into(),
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account: SystemAccount, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account,
            debit: Decimal::ZERO,
            credit: amount,
            description: description.into(),
        }
    }

    /// Returns the same line on the opposite side.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            account: self.account,
            debit: self.credit,
            credit: self.debit,
            description: format!("Reversal: {}", self.description),
        }
    }

    /// Returns the non-zero side's amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit.max(self.credit)
    }

    /// Balance change this line causes on its account.
    #[must_use]
    pub fn balance_change(&self) -> Decimal {
        self.account
            .account_type()
            .balance_change(self.debit, self.credit)
    }
}

/// Posting totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingTotals {
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
}

impl PostingTotals {
    /// Sums the lines.
    #[must_use]
    pub fn from_lines(lines: &[EntryLine]) -> Self {
        Self {
            total_debit: lines.iter().map(|l| l.debit).sum(),
            total_credit: lines.iter().map(|l| l.credit).sum(),
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Whether the difference is within `tolerance`.
    #[must_use]
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.difference().abs() <= tolerance
    }
}

/// Header data for a GL transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingHeader {
    /// Module that raised the transaction.
    pub source_module: ServiceModule,
    /// Operational transaction kind.
    pub kind: ServiceKind,
    /// Business date.
    pub transaction_date: NaiveDate,
    /// Narration.
    pub description: String,
    /// External reference, if any.
    pub reference: Option<String>,
}

/// A fully validated posting ready to persist.
#[derive(Debug, Clone)]
pub struct PreparedPosting {
    /// GL header.
    pub header: PostingHeader,
    /// Balanced journal lines.
    pub lines: Vec<EntryLine>,
    /// Totals of `lines`.
    pub totals: PostingTotals,
    /// Fee or commission charged.
    pub fee: Decimal,
    /// Float-account movements to apply alongside the GL lines.
    pub movements: Vec<FloatMovement>,
}

/// The fee and counter cash for a prospective transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    /// Transaction kind.
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    /// Principal amount.
    pub amount: Decimal,
    /// Fee or commission that would be charged.
    pub fee: Decimal,
    /// Scheduled rule for the kind.
    pub rule: FeeRule,
    /// Cash that changes hands at the counter.
    pub customer_cash: Decimal,
}

/// A validated reversal of an earlier posting.
#[derive(Debug, Clone)]
pub struct PreparedReversal {
    /// GL header for the reversal transaction.
    pub header: PostingHeader,
    /// Mirror-image journal lines.
    pub lines: Vec<EntryLine>,
    /// Totals of `lines`.
    pub totals: PostingTotals,
    /// Float deltas that undo the original movements.
    pub movements: Vec<ResolvedMovement>,
}

/// A stored posting loaded back for reversal.
#[derive(Debug, Clone)]
pub struct OriginalPosting {
    /// The operational transaction being reversed.
    pub service_transaction_id: Uuid,
    /// Its current status.
    pub status: ServiceTransactionStatus,
    /// The original GL header.
    pub header: PostingHeader,
    /// The original journal lines.
    pub lines: Vec<EntryLine>,
    /// Float movements written by the original posting.
    pub movements: Vec<AppliedMovement>,
}
