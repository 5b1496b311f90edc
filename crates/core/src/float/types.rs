//! Float account types and balance rules.

use std::fmt;
use std::str::FromStr;

use branchbook_shared::types::FloatAccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FloatError;
use crate::ledger::{LedgerError, SystemAccount};

/// Channel a float account funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatAccountKind {
    /// Physical cash held at the branch.
    CashInTill,
    /// Mobile money e-value with a network.
    Momo,
    /// Agency banking balance with a partner bank.
    AgencyBanking,
    /// E-Zwich withdrawals awaiting settlement by the partner bank.
    #[serde(rename = "e_zwich")]
    EZwich,
    /// Prepaid power float with a utility.
    Power,
    /// COD cash collected on behalf of Jumia.
    Jumia,
    /// Branch bank account.
    Bank,
}

impl FloatAccountKind {
    /// All kinds.
    pub const ALL: [Self; 7] = [
        Self::CashInTill,
        Self::Momo,
        Self::AgencyBanking,
        Self::EZwich,
        Self::Power,
        Self::Jumia,
        Self::Bank,
    ];

    /// Returns the stable string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CashInTill => "cash_in_till",
            Self::Momo => "momo",
            Self::AgencyBanking => "agency_banking",
            Self::EZwich => "e_zwich",
            Self::Power => "power",
            Self::Jumia => "jumia",
            Self::Bank => "bank",
        }
    }

    /// The GL account mirroring this float.
    #[must_use]
    pub const fn gl_account(&self) -> SystemAccount {
        match self {
            Self::CashInTill => SystemAccount::CashInTill,
            Self::Momo => SystemAccount::MomoFloat,
            Self::AgencyBanking => SystemAccount::AgencyBankingFloat,
            Self::EZwich => SystemAccount::EzwichSettlementReceivable,
            Self::Power => SystemAccount::PowerFloat,
            Self::Jumia => SystemAccount::JumiaCodPayable,
            Self::Bank => SystemAccount::Bank,
        }
    }

    /// Whether a branch keeps one account per provider for this kind.
    #[must_use]
    pub const fn is_provider_scoped(&self) -> bool {
        !matches!(self, Self::CashInTill | Self::Jumia)
    }

    /// Whether funds can be moved in or out with a float transfer.
    ///
    /// Jumia collections and E-Zwich receivables only clear through settlement.
    #[must_use]
    pub const fn is_transferable(&self) -> bool {
        !matches!(self, Self::Jumia | Self::EZwich)
    }

    /// Normalises a provider name into the lookup key for this kind.
    #[must_use]
    pub fn provider_key(&self, provider: &str) -> String {
        if self.is_provider_scoped() {
            provider.trim().to_uppercase()
        } else {
            String::new()
        }
    }
}

impl fmt::Display for FloatAccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FloatAccountKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownFloatKind(s.to_string()))
    }
}

/// Snapshot of a float account used to check a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatAccountInfo {
    /// Account id.
    pub id: FloatAccountId,
    /// Channel.
    pub kind: FloatAccountKind,
    /// Provider key.
    pub provider: String,
    /// Balance before the movement.
    pub current_balance: Decimal,
    /// Balance below which the account is flagged low.
    pub min_threshold: Decimal,
    /// Balance above which the account is flagged high.
    pub max_threshold: Option<Decimal>,
    /// Whether the account accepts movements.
    pub is_active: bool,
}

/// Threshold warning raised by a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum FloatAlert {
    /// Balance dropped under the minimum threshold.
    Low {
        /// Account concerned.
        account_id: FloatAccountId,
        /// Balance after the movement.
        balance: Decimal,
        /// Configured minimum.
        threshold: Decimal,
    },
    /// Balance rose above the maximum threshold.
    High {
        /// Account concerned.
        account_id: FloatAccountId,
        /// Balance after the movement.
        balance: Decimal,
        /// Configured maximum.
        threshold: Decimal,
    },
}

/// Outcome of a successful movement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatApplied {
    /// Balance after the movement.
    pub new_balance: Decimal,
    /// Threshold warning, if any.
    pub alert: Option<FloatAlert>,
}

impl FloatAccountInfo {
    /// Checks a balance change against the account rules.
    ///
    /// # Errors
    ///
    /// Returns `AccountInactive` for deactivated accounts and
    /// `InsufficientFloat` when a debit would overdraw the account.
    pub fn apply(&self, delta: Decimal) -> Result<FloatApplied, FloatError> {
        if !self.is_active {
            return Err(FloatError::AccountInactive(self.id));
        }

        let new_balance = self.current_balance + delta;
        if delta < Decimal::ZERO && new_balance < Decimal::ZERO {
            return Err(FloatError::InsufficientFloat {
                account_id: self.id,
                available: self.current_balance,
                required: -delta,
            });
        }

        let alert = if new_balance < self.min_threshold {
            Some(FloatAlert::Low {
                account_id: self.id,
                balance: new_balance,
                threshold: self.min_threshold,
            })
        } else {
            self.max_threshold
                .filter(|max| new_balance > *max)
                .map(|threshold| FloatAlert::High {
                    account_id: self.id,
                    balance: new_balance,
                    threshold,
                })
        };

        Ok(FloatApplied { new_balance, alert })
    }

    /// Validates a pair of thresholds.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` for a negative bound and `InvalidThresholds`
    /// when `min` exceeds `max`.
    pub fn check_thresholds(min: Decimal, max: Option<Decimal>) -> Result<(), FloatError> {
        if let Some(negative) = std::iter::once(min).chain(max).find(|v| *v < Decimal::ZERO) {
            return Err(FloatError::NegativeAmount(negative));
        }
        match max {
            Some(max) if min > max => Err(FloatError::InvalidThresholds { min, max }),
            _ => Ok(()),
        }
    }
}
