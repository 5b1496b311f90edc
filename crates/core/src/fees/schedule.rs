//! Fee rules and the per-kind schedule.

use std::collections::HashMap;

use branchbook_shared::FeeOverride;
use branchbook_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerError;
use crate::transaction::ServiceKind;

/// How a fee is derived from the transaction amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeRule {
    /// No fee.
    None,
    /// Flat fee regardless of amount.
    Fixed {
        /// The fee.
        amount: Decimal,
    },
    /// Percentage of the amount, optionally clamped.
    Percentage {
        /// Rate in percent (1.5 = 1.5 %).
        rate: Decimal,
        /// Lower clamp.
        min: Option<Decimal>,
        /// Upper clamp.
        max: Option<Decimal>,
    },
}

impl FeeRule {
    /// Calculates the fee for `amount`, rounded to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `AmountTooLarge` when the percentage overflows.
    pub fn calculate(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        match *self {
            Self::None => Ok(Decimal::ZERO),
            Self::Fixed { amount: fee } => Ok(fee),
            Self::Percentage { rate, min, max } => {
                let raw = amount
                    .checked_mul(rate)
                    .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                    .ok_or(LedgerError::AmountTooLarge(amount))?;
                let mut fee = round_money(raw);
                if let Some(min) = min {
                    fee = fee.max(min);
                }
                if let Some(max) = max {
                    fee = fee.min(max);
                }
                Ok(fee)
            }
        }
    }

    fn from_override(fee: &FeeOverride) -> Result<Self, LedgerError> {
        let invalid = |reason: &str| LedgerError::InvalidFeeRule {
            kind: fee.kind.clone(),
            reason: reason.to_string(),
        };

        let negative = [fee.fixed, fee.rate, fee.min, fee.max]
            .into_iter()
            .flatten()
            .any(|v| v < Decimal::ZERO);
        if negative {
            return Err(invalid("values must not be negative"));
        }

        match (fee.fixed, fee.rate) {
            (Some(amount), None) => Ok(Self::Fixed {
                amount: round_money(amount),
            }),
            (None, Some(rate)) => {
                if let (Some(min), Some(max)) = (fee.min, fee.max) {
                    if min > max {
                        return Err(invalid("min exceeds max"));
                    }
                }
                Ok(Self::Percentage {
                    rate,
                    min: fee.min,
                    max: fee.max,
                })
            }
            (None, None) => Ok(Self::None),
            (Some(_), Some(_)) => Err(invalid("set either fixed or rate, not both")),
        }
    }
}

/// Fee rule per transaction kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    rules: HashMap<ServiceKind, FeeRule>,
    card_price: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let pct = |rate: i64, rate_scale: u32, min: Option<i64>, max: Option<i64>| {
            FeeRule::Percentage {
                rate: Decimal::new(rate, rate_scale),
                min: min.map(|m| Decimal::new(m, 2)),
                max: max.map(|m| Decimal::new(m, 2)),
            }
        };

        let rules = HashMap::from([
            (ServiceKind::MomoCashIn, pct(5, 1, Some(50), Some(2000))),
            (ServiceKind::MomoCashOut, pct(1, 0, Some(100), Some(5000))),
            (
                ServiceKind::AgencyDeposit,
                FeeRule::Fixed {
                    amount: Decimal::new(500, 2),
                },
            ),
            (ServiceKind::AgencyWithdrawal, pct(1, 0, Some(500), Some(10000))),
            (ServiceKind::EzwichWithdrawal, pct(15, 1, Some(150), None)),
            (ServiceKind::PowerSale, pct(2, 0, None, None)),
            (
                ServiceKind::JumiaCollection,
                FeeRule::Fixed {
                    amount: Decimal::new(250, 2),
                },
            ),
        ]);

        Self {
            rules,
            card_price: Decimal::new(1500, 2),
        }
    }
}

impl FeeSchedule {
    /// Builds the default schedule with configured overrides applied.
    ///
    /// An override for `ezwich_card_issuance` with a `fixed` value sets the card price.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKind` or `InvalidFeeRule` for malformed overrides.
    pub fn with_overrides(overrides: &[FeeOverride]) -> Result<Self, LedgerError> {
        let mut schedule = Self::default();
        for fee in overrides {
            let kind: ServiceKind = fee.kind.parse()?;
            let rule = FeeRule::from_override(fee)?;
            if kind == ServiceKind::EzwichCardIssuance {
                match rule {
                    FeeRule::Fixed { amount } if amount > Decimal::ZERO => {
                        schedule.card_price = amount;
                    }
                    _ => {
                        return Err(LedgerError::InvalidFeeRule {
                            kind: fee.kind.clone(),
                            reason: "card price must be a positive fixed amount".to_string(),
                        });
                    }
                }
                continue;
            }
            schedule.rules.insert(kind, rule);
        }
        Ok(schedule)
    }

    /// The rule for `kind` (`FeeRule::None` when unscheduled).
    #[must_use]
    pub fn rule_for(&self, kind: ServiceKind) -> FeeRule {
        self.rules.get(&kind).copied().unwrap_or(FeeRule::None)
    }

    /// Price of a new E-Zwich card.
    #[must_use]
    pub const fn card_price(&self) -> Decimal {
        self.card_price
    }

    /// The fee actually charged: the explicit fee when given, else the scheduled one.
    ///
    /// # Errors
    ///
    /// Returns `NegativeFee` for a negative explicit fee and `AmountTooLarge`
    /// when the scheduled percentage overflows.
    pub fn quote(
        &self,
        kind: ServiceKind,
        amount: Decimal,
        explicit_fee: Option<Decimal>,
    ) -> Result<Decimal, LedgerError> {
        match explicit_fee {
            Some(fee) if fee < Decimal::ZERO => Err(LedgerError::NegativeFee),
            Some(fee) => Ok(fee),
            None => self.rule_for(kind).calculate(amount),
        }
    }
}
