//! Journal lines per transaction kind.

use branchbook_shared::types::within_limit;
use rust_decimal::Decimal;

use super::accounts::SystemAccount;
use super::error::LedgerError;
use super::types::EntryLine;
use crate::transaction::{ServiceKind, ServiceTransactionInput};

/// Builds the GL lines for `input` with the already quoted `fee`.
///
/// Zero-valued lines are omitted, so a fee-free cash-in yields two lines.
///
/// # Errors
///
/// Returns `FeeExceedsAmount` when a cash-out fee would swallow the payout,
/// `AmountTooLarge` when amount and fee together do not fit a money column,
/// `MissingExpenseCategory` / `MissingTransferAccounts` for incomplete input.
pub fn build_entries(
    input: &ServiceTransactionInput,
    fee: Decimal,
) -> Result<Vec<EntryLine>, LedgerError> {
    use SystemAccount as Acct;

    let amount = input.amount;
    check_payout(input.kind, amount, fee)?;

    let lines = match input.kind {
        ServiceKind::MomoCashIn => cash_in(amount, fee, Acct::MomoFloat, Acct::MomoFeeIncome)?,
        ServiceKind::MomoCashOut => cash_out(amount, fee, Acct::MomoFloat, Acct::MomoFeeIncome)?,
        ServiceKind::AgencyDeposit => cash_in(
            amount,
            fee,
            Acct::AgencyBankingFloat,
            Acct::AgencyBankingFeeIncome,
        )?,
        ServiceKind::AgencyWithdrawal => cash_out(
            amount,
            fee,
            Acct::AgencyBankingFloat,
            Acct::AgencyBankingFeeIncome,
        )?,
        ServiceKind::EzwichWithdrawal => cash_out(
            amount,
            fee,
            Acct::EzwichSettlementReceivable,
            Acct::EzwichFeeIncome,
        )?,
        ServiceKind::EzwichCardIssuance => vec![
            EntryLine::debit(Acct::CashInTill, amount, "Card sale cash received"),
            EntryLine::credit(Acct::EzwichCardSales, amount, "E-Zwich card sale"),
        ],
        ServiceKind::EzwichSettlement => vec![
            EntryLine::debit(Acct::Bank, amount, "Settlement received"),
            EntryLine::credit(
                Acct::EzwichSettlementReceivable,
                amount,
                "Settlement of withdrawals",
            ),
        ],
        ServiceKind::PowerSale => commission_sale(
            amount,
            fee,
            Acct::PowerFloat,
            Acct::PowerCommission,
        ),
        ServiceKind::JumiaCollection => commission_sale(
            amount,
            fee,
            Acct::JumiaCodPayable,
            Acct::JumiaCommission,
        ),
        ServiceKind::JumiaSettlement => vec![
            EntryLine::debit(Acct::JumiaCodPayable, amount, "COD remitted to Jumia"),
            EntryLine::credit(Acct::CashInTill, amount, "Cash paid out"),
        ],
        ServiceKind::Expense => {
            let category = input
                .expense_category
                .ok_or(LedgerError::MissingExpenseCategory)?;
            vec![
                EntryLine::debit(
                    SystemAccount::for_expense(category),
                    amount,
                    format!("{} expense", category.as_str()),
                ),
                EntryLine::credit(Acct::CashInTill, amount, "Cash paid out"),
            ]
        }
        ServiceKind::FloatTransfer => {
            let transfer = input.transfer.ok_or(LedgerError::MissingTransferAccounts)?;
            vec![
                EntryLine::debit(
                    transfer.destination_kind.gl_account(),
                    amount,
                    "Float transfer in",
                ),
                EntryLine::credit(transfer.source_kind.gl_account(), amount, "Float transfer out"),
            ]
        }
    };

    Ok(lines.into_iter().filter(|l| !l.amount().is_zero()).collect())
}

/// Rejects a cash-out fee that would leave nothing to pay out.
pub(crate) fn check_payout(kind: ServiceKind, amount: Decimal, fee: Decimal) -> Result<(), LedgerError> {
    if kind.is_cash_out() && fee >= amount {
        return Err(LedgerError::FeeExceedsAmount { fee, amount });
    }
    Ok(())
}

fn cash_in(
    amount: Decimal,
    fee: Decimal,
    float: SystemAccount,
    income: SystemAccount,
) -> Result<Vec<EntryLine>, LedgerError> {
    let received = amount
        .checked_add(fee)
        .filter(|total| within_limit(*total))
        .ok_or(LedgerError::AmountTooLarge(amount))?;
    Ok(vec![
        EntryLine::debit(SystemAccount::CashInTill, received, "Cash received"),
        EntryLine::credit(float, amount, "Float sent"),
        EntryLine::credit(income, fee, "Transaction fee"),
    ])
}

fn cash_out(
    amount: Decimal,
    fee: Decimal,
    float: SystemAccount,
    income: SystemAccount,
) -> Result<Vec<EntryLine>, LedgerError> {
    let paid = amount
        .checked_sub(fee)
        .filter(|total| within_limit(*total))
        .ok_or(LedgerError::AmountTooLarge(amount))?;
    Ok(vec![
        EntryLine::debit(float, amount, "Float received"),
        EntryLine::credit(SystemAccount::CashInTill, paid, "Cash paid out"),
        EntryLine::credit(income, fee, "Transaction fee"),
    ])
}

fn commission_sale(
    amount: Decimal,
    commission: Decimal,
    counter: SystemAccount,
    income: SystemAccount,
) -> Vec<EntryLine> {
    vec![
        EntryLine::debit(SystemAccount::CashInTill, amount, "Cash received"),
        EntryLine::credit(counter, amount, "Sale value"),
        EntryLine::debit(SystemAccount::CommissionReceivable, commission, "Commission due"),
        EntryLine::credit(income, commission, "Commission earned"),
    ]
}
