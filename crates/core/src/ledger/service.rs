//! GL posting service.
//!
//! Turns an operational transaction into a validated, balanced posting with
//! its float movements. Pure logic: persistence happens in the db crate.

use branchbook_shared::types::within_limit;
use branchbook_shared::{FeeOverride, PostingConfig};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::builder::{build_entries, check_payout};
use super::error::LedgerError;
use super::types::{
    FeeQuote, OriginalPosting, PostingHeader, PostingTotals, PreparedPosting, PreparedReversal,
};
use super::validation::{DEFAULT_TOLERANCE, validate_balance};
use crate::fees::{FeeRule, FeeSchedule};
use crate::float::{float_movements, reversal_movements};
use crate::transaction::{
    ServiceKind, ServiceTransactionInput, ServiceTransactionStatus, validate_amounts,
};

/// Prepares postings and reversals.
#[derive(Debug, Clone)]
pub struct GlPostingService {
    schedule: FeeSchedule,
    tolerance: Decimal,
}

impl Default for GlPostingService {
    fn default() -> Self {
        Self::new(FeeSchedule::default(), DEFAULT_TOLERANCE)
    }
}

impl GlPostingService {
    /// Creates a service with an explicit schedule and balance tolerance.
    #[must_use]
    pub const fn new(schedule: FeeSchedule, tolerance: Decimal) -> Self {
        Self {
            schedule,
            tolerance,
        }
    }

    /// Creates a service from the `posting` and `fees` configuration sections.
    ///
    /// # Errors
    ///
    /// Returns an error when a fee override is malformed or the tolerance is negative.
    pub fn from_config(posting: &PostingConfig, fees: &[FeeOverride]) -> Result<Self, LedgerError> {
        if posting.balance_tolerance < Decimal::ZERO {
            return Err(LedgerError::Internal(
                "balance tolerance must not be negative".to_string(),
            ));
        }
        let schedule = FeeSchedule::with_overrides(fees)?;
        Ok(Self::new(schedule, posting.balance_tolerance))
    }

    /// The active fee schedule.
    #[must_use]
    pub const fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// The fee actually charged for `kind`; zero for kinds that carry no fee.
    ///
    /// # Errors
    ///
    /// Returns `NegativeFee` for a negative explicit fee.
    pub fn quote_fee(
        &self,
        kind: ServiceKind,
        amount: Decimal,
        explicit_fee: Option<Decimal>,
    ) -> Result<Decimal, LedgerError> {
        if !kind.charges_fee() {
            return Ok(Decimal::ZERO);
        }
        self.schedule.quote(kind, amount, explicit_fee)
    }

    /// Quotes a prospective transaction under the same amount and payout
    /// rules a posting of it would face.
    ///
    /// # Errors
    ///
    /// Returns the amount, fee or payout error the posting would return.
    pub fn quote(
        &self,
        kind: ServiceKind,
        amount: Decimal,
        explicit_fee: Option<Decimal>,
    ) -> Result<FeeQuote, LedgerError> {
        validate_amounts(amount, explicit_fee)?;
        let fee = self.quote_fee(kind, amount, explicit_fee)?;
        check_payout(kind, amount, fee)?;

        let customer_cash = if kind.is_cash_out() {
            amount - fee
        } else if kind.fee_is_commission() || !kind.charges_fee() {
            amount
        } else {
            amount
                .checked_add(fee)
                .filter(|total| within_limit(*total))
                .ok_or(LedgerError::AmountTooLarge(amount))?
        };

        Ok(FeeQuote {
            kind,
            amount,
            fee,
            rule: if kind.charges_fee() {
                self.schedule.rule_for(kind)
            } else {
                FeeRule::None
            },
            customer_cash,
        })
    }

    /// Validates `input` and builds its posting.
    ///
    /// Steps: validate input, quote fee, build lines, check balance, compute
    /// float movements.
    ///
    /// # Errors
    ///
    /// Returns the first validation, fee or balance error encountered.
    pub fn prepare(&self, input: &ServiceTransactionInput) -> Result<PreparedPosting, LedgerError> {
        input.validate()?;

        let fee = self.quote_fee(input.kind, input.amount, input.fee)?;
        let lines = build_entries(input, fee)?;
        let totals = validate_balance(&lines, self.tolerance)?;
        let movements = float_movements(input, fee)?;

        Ok(PreparedPosting {
            header: PostingHeader {
                source_module: input.kind.module(),
                kind: input.kind,
                transaction_date: input.transaction_date,
                description: Self::describe(input),
                reference: input.reference.clone(),
            },
            lines,
            totals,
            fee,
            movements,
        })
    }

    /// Builds the mirror-image posting that undoes `original`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyReversed` unless the original is still completed, or a
    /// balance error if the stored lines no longer balance.
    pub fn prepare_reversal(
        &self,
        original: &OriginalPosting,
        reason: Option<&str>,
        reversal_date: NaiveDate,
    ) -> Result<PreparedReversal, LedgerError> {
        if original.status != ServiceTransactionStatus::Completed {
            return Err(LedgerError::AlreadyReversed(original.service_transaction_id));
        }

        let lines: Vec<_> = original.lines.iter().map(|l| l.reversed()).collect();
        let totals: PostingTotals = validate_balance(&lines, self.tolerance)?;

        let mut description = format!("Reversal of {}", original.header.description);
        if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
            description.push_str(": ");
            description.push_str(reason);
        }

        Ok(PreparedReversal {
            header: PostingHeader {
                source_module: original.header.source_module,
                kind: original.header.kind,
                transaction_date: reversal_date,
                description,
                reference: original.header.reference.clone(),
            },
            lines,
            totals,
            movements: reversal_movements(&original.movements),
        })
    }

    /// Header narration, e.g. `MoMo cash-in - MTN - 0241234567`.
    #[must_use]
    pub fn describe(input: &ServiceTransactionInput) -> String {
        let mut parts = vec![input.kind.label().to_string()];

        if let Some(category) = input.expense_category {
            parts.push(category.as_str().to_string());
        }
        let provider = input.provider.trim();
        if !provider.is_empty() {
            parts.push(provider.to_string());
        }
        let counterparty = input
            .phone_number
            .as_deref()
            .or(input.customer_name.as_deref())
            .or(input.reference.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(counterparty) = counterparty {
            parts.push(counterparty.to_string());
        }

        parts.join(" - ")
    }
}
