//! The fixed system chart of accounts.
//!
//! Every GL posting debits and credits one of these codes. Rows are created
//! lazily in the database the first time a code is resolved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::AccountType;
use crate::transaction::ExpenseCategory;

/// A chart-of-accounts row known to the posting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemAccount {
    /// 1001
    CashInTill,
    /// 1002
    Bank,
    /// 1101
    MomoFloat,
    /// 1102
    AgencyBankingFloat,
    /// 1103
    EzwichSettlementReceivable,
    /// 1104
    PowerFloat,
    /// 1105
    CommissionReceivable,
    /// 2001
    JumiaCodPayable,
    /// 4001
    MomoFeeIncome,
    /// 4002
    AgencyBankingFeeIncome,
    /// 4003
    EzwichFeeIncome,
    /// 4004
    EzwichCardSales,
    /// 4005
    PowerCommission,
    /// 4006
    JumiaCommission,
    /// 5001
    RentExpense,
    /// 5002
    UtilitiesExpense,
    /// 5003
    SalariesExpense,
    /// 5004
    TransportExpense,
    /// 5005
    StationeryExpense,
    /// 5099
    GeneralExpense,
}

impl SystemAccount {
    /// Every system account, ordered by code.
    pub const ALL: [Self; 20] = [
        Self::CashInTill,
        Self::Bank,
        Self::MomoFloat,
        Self::AgencyBankingFloat,
        Self::EzwichSettlementReceivable,
        Self::PowerFloat,
        Self::CommissionReceivable,
        Self::JumiaCodPayable,
        Self::MomoFeeIncome,
        Self::AgencyBankingFeeIncome,
        Self::EzwichFeeIncome,
        Self::EzwichCardSales,
        Self::PowerCommission,
        Self::JumiaCommission,
        Self::RentExpense,
        Self::UtilitiesExpense,
        Self::SalariesExpense,
        Self::TransportExpense,
        Self::StationeryExpense,
        Self::GeneralExpense,
    ];

    /// The account code as stored in `gl_accounts.code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CashInTill => "1001",
            Self::Bank => "1002",
            Self::MomoFloat => "1101",
            Self::AgencyBankingFloat => "1102",
            Self::EzwichSettlementReceivable => "1103",
            Self::PowerFloat => "1104",
            Self::CommissionReceivable => "1105",
            Self::JumiaCodPayable => "2001",
            Self::MomoFeeIncome => "4001",
            Self::AgencyBankingFeeIncome => "4002",
            Self::EzwichFeeIncome => "4003",
            Self::EzwichCardSales => "4004",
            Self::PowerCommission => "4005",
            Self::JumiaCommission => "4006",
            Self::RentExpense => "5001",
            Self::UtilitiesExpense => "5002",
            Self::SalariesExpense => "5003",
            Self::TransportExpense => "5004",
            Self::StationeryExpense => "5005",
            Self::GeneralExpense => "5099",
        }
    }

    /// The account name shown in reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CashInTill => "Cash in Till",
            Self::Bank => "Bank Account",
            Self::MomoFloat => "MoMo Float",
            Self::AgencyBankingFloat => "Agency Banking Float",
            Self::EzwichSettlementReceivable => "E-Zwich Settlement Receivable",
            Self::PowerFloat => "Power Float",
            Self::CommissionReceivable => "Commission Receivable",
            Self::JumiaCodPayable => "Jumia COD Payable",
            Self::MomoFeeIncome => "MoMo Fee Income",
            Self::AgencyBankingFeeIncome => "Agency Banking Fee Income",
            Self::EzwichFeeIncome => "E-Zwich Fee Income",
            Self::EzwichCardSales => "E-Zwich Card Sales",
            Self::PowerCommission => "Power Commission",
            Self::JumiaCommission => "Jumia Commission",
            Self::RentExpense => "Rent Expense",
            Self::UtilitiesExpense => "Utilities Expense",
            Self::SalariesExpense => "Salaries Expense",
            Self::TransportExpense => "Transport Expense",
            Self::StationeryExpense => "Stationery Expense",
            Self::GeneralExpense => "General Expense",
        }
    }

    /// The account classification, derived from the leading code digit.
    #[must_use]
    pub const fn account_type(&self) -> AccountType {
        match self {
            Self::CashInTill
            | Self::Bank
            | Self::MomoFloat
            | Self::AgencyBankingFloat
            | Self::EzwichSettlementReceivable
            | Self::PowerFloat
            | Self::CommissionReceivable => AccountType::Asset,
            Self::JumiaCodPayable => AccountType::Liability,
            Self::MomoFeeIncome
            | Self::AgencyBankingFeeIncome
            | Self::EzwichFeeIncome
            | Self::EzwichCardSales
            | Self::PowerCommission
            | Self::JumiaCommission => AccountType::Revenue,
            Self::RentExpense
            | Self::UtilitiesExpense
            | Self::SalariesExpense
            | Self::TransportExpense
            | Self::StationeryExpense
            | Self::GeneralExpense => AccountType::Expense,
        }
    }

    /// Looks up a system account by code.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccountCode` for codes outside the fixed chart.
    pub fn from_code(code: &str) -> Result<Self, LedgerError> {
        Self::ALL
            .into_iter()
            .find(|account| account.code() == code)
            .ok_or_else(|| LedgerError::UnknownAccountCode(code.to_string()))
    }

    /// The expense head for a category.
    #[must_use]
    pub const fn for_expense(category: ExpenseCategory) -> Self {
        match category {
            ExpenseCategory::Rent => Self::RentExpense,
            ExpenseCategory::Utilities => Self::UtilitiesExpense,
            ExpenseCategory::Salaries => Self::SalariesExpense,
            ExpenseCategory::Transport => Self::TransportExpense,
            ExpenseCategory::Stationery => Self::StationeryExpense,
            ExpenseCategory::Other => Self::GeneralExpense,
        }
    }
}

impl fmt::Display for SystemAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.name())
    }
}

impl FromStr for SystemAccount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}
