//! Chart-of-accounts repository.
//!
//! The chart is fixed in code; rows are created lazily the first time an
//! account is posted to, or all at once by `ensure_chart`.

use std::collections::HashMap;

use branchbook_core::ledger::{AccountType, SystemAccount};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{gl_accounts, gl_journal_entries, gl_transactions};

/// Filters for the trial balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialBalanceFilter {
    /// Restrict to one branch.
    pub branch_id: Option<Uuid>,
    /// First business date (inclusive).
    pub from: Option<NaiveDate>,
    /// Last business date (inclusive).
    pub to: Option<NaiveDate>,
}

/// One account row of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Net balance on the account's normal side.
    pub balance: Decimal,
}

/// Trial balance over the filtered postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalance {
    /// Per-account totals, ordered by code.
    pub lines: Vec<TrialBalanceLine>,
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Builds a trial balance from per-code debit/credit sums.
    ///
    /// Codes outside the system chart are skipped.
    #[must_use]
    pub fn from_sums(sums: &HashMap<String, (Decimal, Decimal)>) -> Self {
        let lines: Vec<TrialBalanceLine> = SystemAccount::ALL
            .into_iter()
            .filter_map(|account| {
                let (debit, credit) = sums.get(account.code()).copied()?;
                let account_type = account.account_type();
                Some(TrialBalanceLine {
                    code: account.code().to_string(),
                    name: account.name().to_string(),
                    account_type,
                    total_debit: debit,
                    total_credit: credit,
                    balance: account_type.balance_change(debit, credit),
                })
            })
            .collect();

        let total_debit = lines.iter().map(|l| l.total_debit).sum();
        let total_credit = lines.iter().map(|l| l.total_credit).sum();

        Self {
            lines,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct AccountSumRow {
    account_code: String,
    total_debit: Option<Decimal>,
    total_credit: Option<Decimal>,
}

/// Chart-of-accounts repository.
#[derive(Debug, Clone)]
pub struct GlAccountRepository {
    db: DatabaseConnection,
}

impl GlAccountRepository {
    /// Creates a new GL account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Looks up the row for `account`, inserting it from the chart when missing.
    ///
    /// Concurrent callers race on the unique code; the loser's insert is a
    /// no-op and both read the same row back.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn resolve<C: ConnectionTrait>(
        conn: &C,
        account: SystemAccount,
    ) -> Result<gl_accounts::Model, DbErr> {
        if let Some(row) = Self::find_by_code(conn, account.code()).await? {
            return Ok(row);
        }

        let now = Utc::now().into();
        let row = gl_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(account.code().to_string()),
            name: Set(account.name().to_string()),
            account_type: Set(account.account_type().as_str().to_string()),
            balance: Set(Decimal::ZERO),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        gl_accounts::Entity::insert(row)
            .on_conflict(
                OnConflict::column(gl_accounts::Column::Code)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
        debug!(code = account.code(), "GL account created");

        Self::find_by_code(conn, account.code())
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("gl account {}", account.code())))
    }

    async fn find_by_code<C: ConnectionTrait>(
        conn: &C,
        code: &str,
    ) -> Result<Option<gl_accounts::Model>, DbErr> {
        gl_accounts::Entity::find()
            .filter(gl_accounts::Column::Code.eq(code))
            .one(conn)
            .await
    }

    /// Adds `change` to the stored running balance of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn add_to_balance<C: ConnectionTrait>(
        conn: &C,
        account_id: Uuid,
        change: Decimal,
    ) -> Result<(), DbErr> {
        gl_accounts::Entity::update_many()
            .col_expr(
                gl_accounts::Column::Balance,
                Expr::col(gl_accounts::Column::Balance).add(change),
            )
            .col_expr(gl_accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(gl_accounts::Column::Id.eq(account_id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Creates every system account that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn ensure_chart(&self) -> Result<Vec<gl_accounts::Model>, DbErr> {
        let mut rows = Vec::with_capacity(SystemAccount::ALL.len());
        for account in SystemAccount::ALL {
            rows.push(Self::resolve(&self.db, account).await?);
        }
        Ok(rows)
    }

    /// Lists stored accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<gl_accounts::Model>, DbErr> {
        gl_accounts::Entity::find()
            .order_by_asc(gl_accounts::Column::Code)
            .all(&self.db)
            .await
    }

    /// Aggregates posted lines per account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trial_balance(&self, filter: TrialBalanceFilter) -> Result<TrialBalance, DbErr> {
        let mut query = gl_journal_entries::Entity::find()
            .select_only()
            .column(gl_journal_entries::Column::AccountCode)
            .column_as(
                Expr::col((gl_journal_entries::Entity, gl_journal_entries::Column::Debit)).sum(),
                "total_debit",
            )
            .column_as(
                Expr::col((gl_journal_entries::Entity, gl_journal_entries::Column::Credit)).sum(),
                "total_credit",
            )
            .join(
                JoinType::InnerJoin,
                gl_journal_entries::Relation::GlTransactions.def(),
            );

        if let Some(branch_id) = filter.branch_id {
            query = query.filter(gl_transactions::Column::BranchId.eq(branch_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(gl_transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(gl_transactions::Column::TransactionDate.lte(to));
        }

        let rows = query
            .group_by(gl_journal_entries::Column::AccountCode)
            .into_model::<AccountSumRow>()
            .all(&self.db)
            .await?;

        let sums = rows
            .into_iter()
            .map(|row| {
                (
                    row.account_code,
                    (
                        row.total_debit.unwrap_or_default(),
                        row.total_credit.unwrap_or_default(),
                    ),
                )
            })
            .collect();

        Ok(TrialBalance::from_sums(&sums))
    }
}
