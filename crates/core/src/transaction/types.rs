//! Service transaction types and input validation.

use std::fmt;
use std::str::FromStr;

use branchbook_shared::types::{BranchId, FloatAccountId, UserId, has_valid_scale, within_limit};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::float::FloatAccountKind;
use crate::ledger::LedgerError;

/// The back-office module that raised a transaction.
///
/// Used as the GL `source_module` so postings can be traced back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceModule {
    /// Mobile money.
    Momo,
    /// Agency banking.
    AgencyBanking,
    /// E-Zwich card services.
    #[serde(rename = "e_zwich")]
    EZwich,
    /// Power / utility payments.
    Power,
    /// Jumia cash-on-delivery.
    Jumia,
    /// Branch expenses.
    Expenses,
    /// Float management.
    Float,
}

impl ServiceModule {
    /// Returns the stable string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Momo => "momo",
            Self::AgencyBanking => "agency_banking",
            Self::EZwich => "e_zwich",
            Self::Power => "power",
            Self::Jumia => "jumia",
            Self::Expenses => "expenses",
            Self::Float => "float",
        }
    }
}

impl fmt::Display for ServiceModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceModule {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "momo" => Ok(Self::Momo),
            "agency_banking" => Ok(Self::AgencyBanking),
            "e_zwich" => Ok(Self::EZwich),
            "power" => Ok(Self::Power),
            "jumia" => Ok(Self::Jumia),
            "expenses" => Ok(Self::Expenses),
            "float" => Ok(Self::Float),
            other => Err(LedgerError::UnknownModule(other.to_string())),
        }
    }
}

/// Every operational transaction type the GL knows how to post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Customer hands over cash, agent sends e-value.
    MomoCashIn,
    /// Customer sends e-value, agent pays cash.
    MomoCashOut,
    /// Cash deposit into a partner bank account.
    AgencyDeposit,
    /// Cash withdrawal from a partner bank account.
    AgencyWithdrawal,
    /// E-Zwich card withdrawal paid out in cash.
    EzwichWithdrawal,
    /// New E-Zwich card sold.
    EzwichCardIssuance,
    /// Partner bank settles accumulated E-Zwich withdrawals.
    EzwichSettlement,
    /// Prepaid power token sale.
    PowerSale,
    /// Jumia COD package paid in cash.
    JumiaCollection,
    /// Collected COD cash remitted to Jumia.
    JumiaSettlement,
    /// Branch expense paid from the till.
    Expense,
    /// Funds moved between two float accounts.
    FloatTransfer,
}

impl ServiceKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 12] = [
        Self::MomoCashIn,
        Self::MomoCashOut,
        Self::AgencyDeposit,
        Self::AgencyWithdrawal,
        Self::EzwichWithdrawal,
        Self::EzwichCardIssuance,
        Self::EzwichSettlement,
        Self::PowerSale,
        Self::JumiaCollection,
        Self::JumiaSettlement,
        Self::Expense,
        Self::FloatTransfer,
    ];

    /// Returns the module this kind belongs to.
    #[must_use]
    pub const fn module(&self) -> ServiceModule {
        match self {
            Self::MomoCashIn | Self::MomoCashOut => ServiceModule::Momo,
            Self::AgencyDeposit | Self::AgencyWithdrawal => ServiceModule::AgencyBanking,
            Self::EzwichWithdrawal | Self::EzwichCardIssuance | Self::EzwichSettlement => {
                ServiceModule::EZwich
            }
            Self::PowerSale => ServiceModule::Power,
            Self::JumiaCollection | Self::JumiaSettlement => ServiceModule::Jumia,
            Self::Expense => ServiceModule::Expenses,
            Self::FloatTransfer => ServiceModule::Float,
        }
    }

    /// Returns the stable string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MomoCashIn => "momo_cash_in",
            Self::MomoCashOut => "momo_cash_out",
            Self::AgencyDeposit => "agency_deposit",
            Self::AgencyWithdrawal => "agency_withdrawal",
            Self::EzwichWithdrawal => "ezwich_withdrawal",
            Self::EzwichCardIssuance => "ezwich_card_issuance",
            Self::EzwichSettlement => "ezwich_settlement",
            Self::PowerSale => "power_sale",
            Self::JumiaCollection => "jumia_collection",
            Self::JumiaSettlement => "jumia_settlement",
            Self::Expense => "expense",
            Self::FloatTransfer => "float_transfer",
        }
    }

    /// Human readable label used in GL descriptions.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MomoCashIn => "MoMo cash-in",
            Self::MomoCashOut => "MoMo cash-out",
            Self::AgencyDeposit => "Agency banking deposit",
            Self::AgencyWithdrawal => "Agency banking withdrawal",
            Self::EzwichWithdrawal => "E-Zwich withdrawal",
            Self::EzwichCardIssuance => "E-Zwich card issuance",
            Self::EzwichSettlement => "E-Zwich settlement",
            Self::PowerSale => "Power sale",
            Self::JumiaCollection => "Jumia COD collection",
            Self::JumiaSettlement => "Jumia settlement",
            Self::Expense => "Expense",
            Self::FloatTransfer => "Float transfer",
        }
    }

    /// Kinds where the customer walks away with cash and the fee is kept back.
    #[must_use]
    pub const fn is_cash_out(&self) -> bool {
        matches!(
            self,
            Self::MomoCashOut | Self::AgencyWithdrawal | Self::EzwichWithdrawal
        )
    }

    /// Kinds where the fee is a commission paid by the provider, not the customer.
    #[must_use]
    pub const fn fee_is_commission(&self) -> bool {
        matches!(self, Self::PowerSale | Self::JumiaCollection)
    }

    /// Whether a fee or commission is charged at all.
    #[must_use]
    pub const fn charges_fee(&self) -> bool {
        !matches!(
            self,
            Self::EzwichCardIssuance
                | Self::EzwichSettlement
                | Self::JumiaSettlement
                | Self::Expense
                | Self::FloatTransfer
        )
    }

    /// The provider-scoped float account this kind moves, if any.
    #[must_use]
    pub const fn service_float(&self) -> Option<FloatAccountKind> {
        match self {
            Self::MomoCashIn | Self::MomoCashOut => Some(FloatAccountKind::Momo),
            Self::AgencyDeposit | Self::AgencyWithdrawal => Some(FloatAccountKind::AgencyBanking),
            Self::EzwichWithdrawal | Self::EzwichSettlement => Some(FloatAccountKind::EZwich),
            Self::PowerSale => Some(FloatAccountKind::Power),
            Self::JumiaCollection | Self::JumiaSettlement => Some(FloatAccountKind::Jumia),
            Self::EzwichCardIssuance | Self::Expense | Self::FloatTransfer => None,
        }
    }

    /// Whether the input must name a provider (network, bank, utility).
    #[must_use]
    pub const fn requires_provider(&self) -> bool {
        !matches!(
            self,
            Self::EzwichCardIssuance
                | Self::Expense
                | Self::FloatTransfer
                | Self::JumiaCollection
                | Self::JumiaSettlement
        )
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownKind(s.to_string()))
    }
}

/// Expense heads a branch can book against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Premises rent.
    Rent,
    /// Electricity, water, internet.
    Utilities,
    /// Staff salaries.
    Salaries,
    /// Transport and fuel.
    Transport,
    /// Stationery and consumables.
    Stationery,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// Returns the stable string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Salaries => "salaries",
            Self::Transport => "transport",
            Self::Stationery => "stationery",
            Self::Other => "other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rent" => Ok(Self::Rent),
            "utilities" => Ok(Self::Utilities),
            "salaries" => Ok(Self::Salaries),
            "transport" => Ok(Self::Transport),
            "stationery" => Ok(Self::Stationery),
            "other" => Ok(Self::Other),
            other => Err(LedgerError::UnknownExpenseCategory(other.to_string())),
        }
    }
}

/// Source and destination of a float transfer, resolved from stored accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAccounts {
    /// Float account being drawn down.
    pub source_id: FloatAccountId,
    /// Kind of the source account.
    pub source_kind: FloatAccountKind,
    /// Float account being topped up.
    pub destination_id: FloatAccountId,
    /// Kind of the destination account.
    pub destination_kind: FloatAccountKind,
}

/// Lifecycle of an operational transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTransactionStatus {
    /// Posted to the GL and float accounts.
    Completed,
    /// A reversal has been posted.
    Reversed,
}

impl ServiceTransactionStatus {
    /// Returns the stable string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Reversed => "reversed",
        }
    }
}

impl FromStr for ServiceTransactionStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "reversed" => Ok(Self::Reversed),
            other => Err(LedgerError::UnknownStatus(other.to_string())),
        }
    }
}

/// Input for a single operational transaction.
#[derive(Debug, Clone)]
pub struct ServiceTransactionInput {
    /// Branch the transaction happened at.
    pub branch_id: BranchId,
    /// What kind of transaction this is.
    pub kind: ServiceKind,
    /// Network, bank or utility name (`MTN`, `GCB`, `ECG`, ...).
    pub provider: String,
    /// Principal amount (for card issuance, the card price).
    pub amount: Decimal,
    /// Fee typed in by the teller; overrides the schedule when present.
    pub fee: Option<Decimal>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer phone number or card number.
    pub phone_number: Option<String>,
    /// External reference (provider transaction id, invoice number).
    pub reference: Option<String>,
    /// Expense head; required for `Expense`.
    pub expense_category: Option<ExpenseCategory>,
    /// Transfer legs; required for `FloatTransfer`.
    pub transfer: Option<TransferAccounts>,
    /// Business date of the transaction.
    pub transaction_date: NaiveDate,
    /// User who captured the transaction.
    pub performed_by: UserId,
}

impl ServiceTransactionInput {
    /// Validates the input before any fee or entry is computed.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` describing the first rule the input breaks.
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_amounts(self.amount, self.fee)?;

        if self.kind.requires_provider() && self.provider.trim().is_empty() {
            return Err(LedgerError::MissingProvider(self.kind));
        }

        match self.kind {
            ServiceKind::Expense if self.expense_category.is_none() => {
                Err(LedgerError::MissingExpenseCategory)
            }
            ServiceKind::FloatTransfer => match self.transfer {
                None => Err(LedgerError::MissingTransferAccounts),
                Some(t) if t.source_id == t.destination_id => {
                    Err(LedgerError::SameTransferAccount)
                }
                Some(t) => {
                    for kind in [t.source_kind, t.destination_kind] {
                        if !kind.is_transferable() {
                            return Err(LedgerError::UnsupportedTransfer(kind));
                        }
                    }
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }
}

/// Checks an amount and optional explicit fee: positive amount, non-negative
/// fee, two decimal places, and both within [`MAX_AMOUNT`].
///
/// [`MAX_AMOUNT`]: branchbook_shared::types::MAX_AMOUNT
///
/// # Errors
///
/// Returns the first amount rule broken.
pub fn validate_amounts(amount: Decimal, fee: Option<Decimal>) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount);
    }
    if !has_valid_scale(amount) {
        return Err(LedgerError::InvalidAmountScale(amount));
    }
    if !within_limit(amount) {
        return Err(LedgerError::AmountTooLarge(amount));
    }

    if let Some(fee) = fee {
        if fee.is_sign_negative() && !fee.is_zero() {
            return Err(LedgerError::NegativeFee);
        }
        if !has_valid_scale(fee) {
            return Err(LedgerError::InvalidAmountScale(fee));
        }
        if !within_limit(fee) {
            return Err(LedgerError::AmountTooLarge(fee));
        }
    }
    Ok(())
}
