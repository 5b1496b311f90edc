//! GL posting repository.
//!
//! Persists an operational transaction together with its float movements,
//! GL header and GL lines in one database transaction, and reverses it the
//! same way.

use branchbook_core::float::{AppliedMovement, FloatAlert, FloatError, FloatTarget};
use branchbook_core::ledger::{
    EntryLine, GlPostingService, LedgerError, OriginalPosting, PostingHeader, PostingTotals,
    PreparedPosting, SystemAccount,
};
use branchbook_core::transaction::{
    ServiceKind, ServiceModule, ServiceTransactionInput, ServiceTransactionStatus,
};
use branchbook_shared::types::PageRequest;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{error, info};
use uuid::Uuid;

use super::float_account::{FloatAccountError, FloatAccountRepository};
use super::gl_account::GlAccountRepository;
use super::is_unique_violation;
use crate::entities::{branches, gl_journal_entries, gl_transactions, service_transactions};

/// Error types for posting operations.
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// Ledger or float rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Branch not found.
    #[error("Branch not found: {0}")]
    BranchNotFound(Uuid),

    /// Branch is closed for posting.
    #[error("Branch {0} is inactive")]
    BranchInactive(Uuid),

    /// Stored data no longer matches the domain.
    #[error("Corrupt posting data: {0}")]
    Corrupt(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FloatError> for PostingError {
    fn from(e: FloatError) -> Self {
        Self::Ledger(LedgerError::Float(e))
    }
}

impl From<FloatAccountError> for PostingError {
    fn from(e: FloatAccountError) -> Self {
        match e {
            FloatAccountError::Float(e) => e.into(),
            FloatAccountError::BranchNotFound(id) => Self::BranchNotFound(id),
            FloatAccountError::Corrupt(msg) => Self::Corrupt(msg),
            FloatAccountError::Database(e) => Self::Database(e),
        }
    }
}

/// Result of a successful posting or reversal.
#[derive(Debug, Clone)]
pub struct PostedTransaction {
    /// The operational record.
    pub service_transaction: service_transactions::Model,
    /// The GL header written.
    pub gl_transaction: gl_transactions::Model,
    /// The GL lines written, by line number.
    pub entries: Vec<gl_journal_entries::Model>,
    /// Threshold warnings raised by the float movements.
    pub alerts: Vec<FloatAlert>,
}

/// A GL header with its lines.
#[derive(Debug, Clone)]
pub struct GlPostingRecord {
    /// GL header.
    pub header: gl_transactions::Model,
    /// GL lines by line number.
    pub entries: Vec<gl_journal_entries::Model>,
}

/// An operational transaction with every GL posting that references it.
#[derive(Debug, Clone)]
pub struct ServiceTransactionDetail {
    /// The operational record.
    pub transaction: service_transactions::Model,
    /// Original posting first, then the reversal if any.
    pub postings: Vec<GlPostingRecord>,
}

/// Filter options for listing operational transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceTransactionFilter {
    /// Filter by module.
    pub module: Option<ServiceModule>,
    /// Filter by kind.
    pub kind: Option<ServiceKind>,
    /// Filter by status.
    pub status: Option<ServiceTransactionStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Input for reversing a transaction.
#[derive(Debug, Clone)]
pub struct ReverseInput {
    /// Why the transaction is reversed.
    pub reason: Option<String>,
    /// User reversing it.
    pub performed_by: Uuid,
    /// Business date of the reversal.
    pub reversal_date: NaiveDate,
}

struct GlWrite<'a> {
    branch_id: Uuid,
    source_transaction_id: Uuid,
    header: &'a PostingHeader,
    lines: &'a [EntryLine],
    totals: PostingTotals,
    reversal_of: Option<Uuid>,
    created_by: Uuid,
}

/// GL posting repository.
#[derive(Debug, Clone)]
pub struct PostingRepository {
    db: DatabaseConnection,
}

impl PostingRepository {
    /// Creates a new posting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a prepared posting.
    ///
    /// Within one database transaction: reject a reused reference, lock and
    /// move the float accounts, insert the operational record, the GL header
    /// and its lines, and update GL account balances. Any failure rolls the
    /// whole posting back.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePosting`, a float error (`AccountNotFound`,
    /// `InsufficientFloat`, ...), `BranchNotFound`, or a database error.
    pub async fn post(
        &self,
        input: &ServiceTransactionInput,
        prepared: &PreparedPosting,
    ) -> Result<PostedTransaction, PostingError> {
        let branch_id = input.branch_id.into_inner();
        let txn = self.db.begin().await?;

        Self::check_branch(&txn, branch_id).await?;

        if let Some(reference) = &input.reference {
            let existing = service_transactions::Entity::find()
                .filter(service_transactions::Column::BranchId.eq(branch_id))
                .filter(service_transactions::Column::Reference.eq(reference.as_str()))
                .one(&txn)
                .await?;
            if existing.is_some() {
                return Err(LedgerError::DuplicatePosting(reference.clone()).into());
            }
        }

        let mut applied = Vec::with_capacity(prepared.movements.len());
        let mut alerts = Vec::new();
        for movement in &prepared.movements {
            let account = match movement.target {
                FloatTarget::Kind(kind) => {
                    FloatAccountRepository::find_for(&txn, branch_id, kind, &input.provider).await?
                }
                FloatTarget::Account(id) => {
                    FloatAccountRepository::find_by_id_for(&txn, branch_id, id).await?
                }
            };
            let (movement, alert) =
                FloatAccountRepository::apply_delta(&txn, &account, movement.delta).await?;
            applied.push(movement);
            alerts.extend(alert);
        }

        let movements_json = serde_json::to_value(&applied)
            .map_err(|e| PostingError::Corrupt(e.to_string()))?;
        let now = Utc::now().into();
        let record = service_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            branch_id: Set(branch_id),
            module: Set(input.kind.module().as_str().to_string()),
            kind: Set(input.kind.as_str().to_string()),
            provider: Set(input.provider.trim().to_string()),
            amount: Set(input.amount),
            fee: Set(prepared.fee),
            customer_name: Set(input.customer_name.clone()),
            phone_number: Set(input.phone_number.clone()),
            reference: Set(input.reference.clone()),
            expense_category: Set(input.expense_category.map(|c| c.as_str().to_string())),
            source_float_account_id: Set(input.transfer.map(|t| t.source_id.into_inner())),
            destination_float_account_id: Set(
                input.transfer.map(|t| t.destination_id.into_inner())
            ),
            float_movements: Set(movements_json),
            status: Set(ServiceTransactionStatus::Completed.as_str().to_string()),
            transaction_date: Set(input.transaction_date),
            performed_by: Set(input.performed_by.into_inner()),
            reversed_at: Set(None),
            reversed_by: Set(None),
            reversal_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let service_transaction = match record.insert(&txn).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => {
                let reference = input.reference.clone().unwrap_or_default();
                return Err(LedgerError::DuplicatePosting(reference).into());
            }
            Err(e) => return Err(e.into()),
        };

        let (gl_transaction, entries) = Self::write_gl(
            &txn,
            GlWrite {
                branch_id,
                source_transaction_id: service_transaction.id,
                header: &prepared.header,
                lines: &prepared.lines,
                totals: prepared.totals,
                reversal_of: None,
                created_by: input.performed_by.into_inner(),
            },
        )
        .await?;

        txn.commit().await.inspect_err(|e| {
            error!(error = %e, branch_id = %branch_id, "Failed to commit posting");
        })?;

        info!(
            service_transaction_id = %service_transaction.id,
            gl_transaction_id = %gl_transaction.id,
            branch_id = %branch_id,
            kind = %input.kind,
            amount = %input.amount,
            fee = %prepared.fee,
            lines = entries.len(),
            "Transaction posted"
        );

        Ok(PostedTransaction {
            service_transaction,
            gl_transaction,
            entries,
            alerts,
        })
    }

    /// Reverses a completed transaction.
    ///
    /// Posts mirror-image GL lines linked to the original header, undoes the
    /// recorded float movements and marks the operational record reversed,
    /// all in one database transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `AlreadyReversed`, a float error when
    /// undoing a movement would overdraw an account, or a database error.
    pub async fn reverse(
        &self,
        service_transaction_id: Uuid,
        input: ReverseInput,
        service: &GlPostingService,
    ) -> Result<PostedTransaction, PostingError> {
        let txn = self.db.begin().await?;

        let record = service_transactions::Entity::find_by_id(service_transaction_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionNotFound(service_transaction_id))?;

        let header = gl_transactions::Entity::find()
            .filter(gl_transactions::Column::SourceTransactionId.eq(record.id))
            .filter(gl_transactions::Column::IsReversal.eq(false))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                PostingError::Corrupt(format!("transaction {} has no GL posting", record.id))
            })?;
        let lines = Self::lines_for(&txn, header.id).await?;

        let original = original_posting(&record, &header, &lines)?;
        let prepared =
            service.prepare_reversal(&original, input.reason.as_deref(), input.reversal_date)?;

        let mut alerts = Vec::new();
        for movement in &prepared.movements {
            let account = FloatAccountRepository::find_by_id_for(
                &txn,
                record.branch_id,
                movement.float_account_id,
            )
            .await?;
            let (_, alert) =
                FloatAccountRepository::apply_delta(&txn, &account, movement.delta).await?;
            alerts.extend(alert);
        }

        let (gl_transaction, entries) = Self::write_gl(
            &txn,
            GlWrite {
                branch_id: record.branch_id,
                source_transaction_id: record.id,
                header: &prepared.header,
                lines: &prepared.lines,
                totals: prepared.totals,
                reversal_of: Some(header.id),
                created_by: input.performed_by,
            },
        )
        .await?;

        let now = Utc::now();
        let reversed_status = ServiceTransactionStatus::Reversed.as_str();
        let result = service_transactions::Entity::update_many()
            .col_expr(service_transactions::Column::Status, Expr::value(reversed_status))
            .col_expr(service_transactions::Column::ReversedAt, Expr::value(now))
            .col_expr(
                service_transactions::Column::ReversedBy,
                Expr::value(input.performed_by),
            )
            .col_expr(
                service_transactions::Column::ReversalReason,
                Expr::value(input.reason.clone()),
            )
            .col_expr(service_transactions::Column::UpdatedAt, Expr::value(now))
            .filter(service_transactions::Column::Id.eq(record.id))
            .filter(
                service_transactions::Column::Status
                    .eq(ServiceTransactionStatus::Completed.as_str()),
            )
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::AlreadyReversed(record.id).into());
        }

        txn.commit().await.inspect_err(|e| {
            error!(error = %e, service_transaction_id = %record.id, "Failed to commit reversal");
        })?;

        info!(
            service_transaction_id = %record.id,
            gl_transaction_id = %gl_transaction.id,
            reversal_of = %header.id,
            performed_by = %input.performed_by,
            "Transaction reversed"
        );

        let service_transaction = service_transactions::Model {
            status: reversed_status.to_string(),
            reversed_at: Some(now.into()),
            reversed_by: Some(input.performed_by),
            reversal_reason: input.reason,
            updated_at: now.into(),
            ..record
        };

        Ok(PostedTransaction {
            service_transaction,
            gl_transaction,
            entries,
            alerts,
        })
    }

    /// Finds an operational transaction with its GL postings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_service_transaction(
        &self,
        id: Uuid,
    ) -> Result<Option<ServiceTransactionDetail>, DbErr> {
        let Some(transaction) = service_transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let postings = self.entries_for_source(id).await?;
        Ok(Some(ServiceTransactionDetail {
            transaction,
            postings,
        }))
    }

    /// GL postings (original first, then reversal) for an operational transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn entries_for_source(
        &self,
        service_transaction_id: Uuid,
    ) -> Result<Vec<GlPostingRecord>, DbErr> {
        let headers = gl_transactions::Entity::find()
            .filter(gl_transactions::Column::SourceTransactionId.eq(service_transaction_id))
            .order_by_asc(gl_transactions::Column::IsReversal)
            .order_by_asc(gl_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut postings = Vec::with_capacity(headers.len());
        for header in headers {
            let entries = Self::lines_for(&self.db, header.id).await?;
            postings.push(GlPostingRecord { header, entries });
        }
        Ok(postings)
    }

    /// Lists a branch's operational transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_service_transactions(
        &self,
        branch_id: Uuid,
        filter: ServiceTransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<service_transactions::Model>, u64), DbErr> {
        let mut query = service_transactions::Entity::find()
            .filter(service_transactions::Column::BranchId.eq(branch_id));

        if let Some(module) = filter.module {
            query = query.filter(service_transactions::Column::Module.eq(module.as_str()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(service_transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(service_transactions::Column::Status.eq(status.as_str()));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(service_transactions::Column::TransactionDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(service_transactions::Column::TransactionDate.lte(date_to));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(service_transactions::Column::TransactionDate)
            .order_by_desc(service_transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    async fn check_branch<C: ConnectionTrait>(conn: &C, branch_id: Uuid) -> Result<(), PostingError> {
        let branch = branches::Entity::find_by_id(branch_id)
            .one(conn)
            .await?
            .ok_or(PostingError::BranchNotFound(branch_id))?;
        if !branch.is_active {
            return Err(PostingError::BranchInactive(branch_id));
        }
        Ok(())
    }

    async fn lines_for<C: ConnectionTrait>(
        conn: &C,
        gl_transaction_id: Uuid,
    ) -> Result<Vec<gl_journal_entries::Model>, DbErr> {
        gl_journal_entries::Entity::find()
            .filter(gl_journal_entries::Column::GlTransactionId.eq(gl_transaction_id))
            .order_by_asc(gl_journal_entries::Column::LineNo)
            .all(conn)
            .await
    }

    /// Inserts the GL header and lines and moves the account balances.
    async fn write_gl<C: ConnectionTrait>(
        conn: &C,
        gl: GlWrite<'_>,
    ) -> Result<(gl_transactions::Model, Vec<gl_journal_entries::Model>), DbErr> {
        let now = Utc::now().into();
        let header = gl_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            branch_id: Set(gl.branch_id),
            source_module: Set(gl.header.source_module.as_str().to_string()),
            source_transaction_id: Set(gl.source_transaction_id),
            transaction_date: Set(gl.header.transaction_date),
            description: Set(gl.header.description.clone()),
            reference: Set(gl.header.reference.clone()),
            total_debit: Set(gl.totals.total_debit),
            total_credit: Set(gl.totals.total_credit),
            is_reversal: Set(gl.reversal_of.is_some()),
            reversal_of: Set(gl.reversal_of),
            created_by: Set(gl.created_by),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;

        let mut entries = Vec::with_capacity(gl.lines.len());
        for (line_no, line) in (1..).zip(gl.lines) {
            let account = GlAccountRepository::resolve(conn, line.account).await?;
            let entry = gl_journal_entries::ActiveModel {
                id: Set(Uuid::now_v7()),
                gl_transaction_id: Set(header.id),
                line_no: Set(line_no),
                account_id: Set(account.id),
                account_code: Set(account.code.clone()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                description: Set(line.description.clone()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
            GlAccountRepository::add_to_balance(conn, account.id, line.balance_change()).await?;
            entries.push(entry);
        }

        Ok((header, entries))
    }
}

/// Rebuilds the domain view of a stored posting for reversal.
///
/// # Errors
///
/// Returns `Corrupt` or a parse error when stored values are not recognised.
pub fn original_posting(
    record: &service_transactions::Model,
    header: &gl_transactions::Model,
    lines: &[gl_journal_entries::Model],
) -> Result<OriginalPosting, PostingError> {
    let kind: ServiceKind = record.kind.parse()?;
    let source_module: ServiceModule = header.source_module.parse()?;
    let status: ServiceTransactionStatus = record.status.parse()?;

    let lines = lines
        .iter()
        .map(|entry| {
            Ok(EntryLine {
                account: SystemAccount::from_code(&entry.account_code)?,
                debit: entry.debit,
                credit: entry.credit,
                description: entry.description.clone(),
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    let movements: Vec<AppliedMovement> = serde_json::from_value(record.float_movements.clone())
        .map_err(|e| PostingError::Corrupt(format!("float movements of {}: {e}", record.id)))?;

    Ok(OriginalPosting {
        service_transaction_id: record.id,
        status,
        header: PostingHeader {
            source_module,
            kind,
            transaction_date: header.transaction_date,
            description: header.description.clone(),
            reference: header.reference.clone(),
        },
        lines,
        movements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchbook_shared::types::FloatAccountId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use crate::entities::{float_accounts, gl_accounts};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn record(status: &str, movements: serde_json::Value) -> service_transactions::Model {
        let now = Utc::now().into();
        service_transactions::Model {
            id: Uuid::now_v7(),
            branch_id: Uuid::now_v7(),
            module: "momo".to_string(),
            kind: "momo_cash_in".to_string(),
            provider: "MTN".to_string(),
            amount: dec!(200),
            fee: dec!(1),
            customer_name: None,
            phone_number: Some("0241234567".to_string()),
            reference: None,
            expense_category: None,
            source_float_account_id: None,
            destination_float_account_id: None,
            float_movements: movements,
            status: status.to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            performed_by: Uuid::now_v7(),
            reversed_at: None,
            reversed_by: None,
            reversal_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn header(record: &service_transactions::Model) -> gl_transactions::Model {
        gl_transactions::Model {
            id: Uuid::now_v7(),
            branch_id: record.branch_id,
            source_module: "momo".to_string(),
            source_transaction_id: record.id,
            transaction_date: record.transaction_date,
            description: "MoMo cash-in - MTN - 0241234567".to_string(),
            reference: None,
            total_debit: dec!(201),
            total_credit: dec!(201),
            is_reversal: false,
            reversal_of: None,
            created_by: record.performed_by,
            created_at: record.created_at,
        }
    }

    fn line(
        header: &gl_transactions::Model,
        no: i32,
        code: &str,
        debit: Decimal,
        credit: Decimal,
    ) -> gl_journal_entries::Model {
        gl_journal_entries::Model {
            id: Uuid::now_v7(),
            gl_transaction_id: header.id,
            line_no: no,
            account_id: Uuid::now_v7(),
            account_code: code.to_string(),
            debit,
            credit,
            description: "line".to_string(),
            created_at: header.created_at,
        }
    }

    fn float(id: Uuid, kind: &str, balance: Decimal) -> float_accounts::Model {
        let now = Utc::now().into();
        float_accounts::Model {
            id,
            branch_id: Uuid::now_v7(),
            kind: kind.to_string(),
            provider: String::new(),
            current_balance: balance,
            min_threshold: dec!(100),
            max_threshold: None,
            is_active: true,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn gl_account(account: SystemAccount) -> gl_accounts::Model {
        let now = Utc::now().into();
        gl_accounts::Model {
            id: Uuid::now_v7(),
            code: account.code().to_string(),
            name: account.name().to_string(),
            account_type: account.account_type().as_str().to_string(),
            balance: Decimal::ZERO,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn updated() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn cash_in_input() -> ServiceTransactionInput {
        ServiceTransactionInput {
            branch_id: branchbook_shared::types::BranchId::new(),
            kind: ServiceKind::MomoCashIn,
            provider: "MTN".to_string(),
            amount: dec!(200),
            fee: None,
            customer_name: None,
            phone_number: Some("0241234567".to_string()),
            reference: None,
            expense_category: None,
            transfer: None,
            transaction_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            performed_by: branchbook_shared::types::UserId::new(),
        }
    }

    #[test]
    fn test_original_posting_from_rows() {
        let momo = FloatAccountId::new();
        let movements = json!([
            {"float_account_id": momo, "delta": "-200", "balance_after": "800"}
        ]);
        let record = record("completed", movements);
        let header = header(&record);
        let lines = vec![
            line(&header, 1, "1001", dec!(201), Decimal::ZERO),
            line(&header, 2, "1101", Decimal::ZERO, dec!(200)),
            line(&header, 3, "4001", Decimal::ZERO, dec!(1)),
        ];

        let original = original_posting(&record, &header, &lines).unwrap();
        assert_eq!(original.status, ServiceTransactionStatus::Completed);
        assert_eq!(original.header.kind, ServiceKind::MomoCashIn);
        assert_eq!(original.lines[1].account, SystemAccount::MomoFloat);
        assert_eq!(original.movements.len(), 1);
        assert_eq!(original.movements[0].float_account_id, momo);
        assert_eq!(original.movements[0].delta, dec!(-200));
    }

    #[test]
    fn test_original_posting_rejects_unknown_account() {
        let record = record("completed", json!([]));
        let header = header(&record);
        let lines = vec![line(&header, 1, "7777", dec!(1), Decimal::ZERO)];
        assert!(matches!(
            original_posting(&record, &header, &lines),
            Err(PostingError::Ledger(LedgerError::UnknownAccountCode(_)))
        ));
    }

    #[test]
    fn test_float_account_error_conversion() {
        let err: PostingError = FloatAccountError::Float(FloatError::ConcurrentUpdate(
            FloatAccountId::new(),
        ))
        .into();
        assert!(matches!(
            err,
            PostingError::Ledger(LedgerError::Float(FloatError::ConcurrentUpdate(_)))
        ));
    }

    #[tokio::test]
    async fn test_find_missing_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<service_transactions::Model>::new()])
            .into_connection();
        let repo = PostingRepository::new(db);
        assert!(repo.find_service_transaction(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_post_to_unknown_branch_rolls_back() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<branches::Model>::new()])
            .into_connection();
        let repo = PostingRepository::new(db);

        let service = GlPostingService::default();
        let input = cash_in_input();
        let prepared = service.prepare(&input).unwrap();

        assert!(matches!(
            repo.post(&input, &prepared).await,
            Err(PostingError::BranchNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_post_cash_in_writes_float_and_gl() {
        let service = GlPostingService::default();
        let input = cash_in_input();
        let prepared = service.prepare(&input).unwrap();
        assert_eq!(prepared.fee, dec!(1.00));

        let now = Utc::now().into();
        let branch = branches::Model {
            id: input.branch_id.into_inner(),
            code: "ACC-01".to_string(),
            name: "Accra Central".to_string(),
            location: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let momo = float(Uuid::now_v7(), "momo", dec!(250));
        let till = float(Uuid::now_v7(), "cash_in_till", dec!(500));
        let stored = record("completed", json!([]));
        let gl = header(&stored);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![branch]])
            .append_query_results([vec![momo], vec![till]])
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![gl.clone()]])
            .append_query_results([vec![gl_account(SystemAccount::CashInTill)]])
            .append_query_results([vec![line(&gl, 1, "1001", dec!(201), Decimal::ZERO)]])
            .append_query_results([vec![gl_account(SystemAccount::MomoFloat)]])
            .append_query_results([vec![line(&gl, 2, "1101", Decimal::ZERO, dec!(200))]])
            .append_query_results([vec![gl_account(SystemAccount::MomoFeeIncome)]])
            .append_query_results([vec![line(&gl, 3, "4001", Decimal::ZERO, dec!(1))]])
            .append_exec_results([updated(), updated(), updated(), updated(), updated()])
            .into_connection();
        let repo = PostingRepository::new(db);

        let posted = repo.post(&input, &prepared).await.unwrap();
        assert_eq!(posted.service_transaction.id, stored.id);
        assert_eq!(posted.gl_transaction.id, gl.id);
        assert_eq!(posted.entries.len(), 3);
        assert_eq!(posted.entries[0].account_code, "1001");
        assert_eq!(posted.entries[0].debit, dec!(201));

        // MoMo float drops from 250 to 50, under its 100 minimum.
        assert_eq!(posted.alerts.len(), 1);
        assert!(matches!(posted.alerts[0], FloatAlert::Low { .. }));
    }

    #[tokio::test]
    async fn test_reversal_cannot_overdraw_till() {
        let momo = Uuid::now_v7();
        let till = Uuid::now_v7();
        let movements = json!([
            {"float_account_id": momo, "delta": "-200", "balance_after": "800"},
            {"float_account_id": till, "delta": "201", "balance_after": "701"}
        ]);
        let stored = record("completed", movements);
        let gl = header(&stored);
        let lines = vec![
            line(&gl, 1, "1001", dec!(201), Decimal::ZERO),
            line(&gl, 2, "1101", Decimal::ZERO, dec!(200)),
            line(&gl, 3, "4001", Decimal::ZERO, dec!(1)),
        ];

        // The till has paid out most of that cash since.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![gl]])
            .append_query_results([lines])
            .append_query_results([vec![float(till, "cash_in_till", dec!(150))]])
            .into_connection();
        let repo = PostingRepository::new(db);

        let result = repo
            .reverse(
                stored.id,
                ReverseInput {
                    reason: Some("wrong number".to_string()),
                    performed_by: Uuid::now_v7(),
                    reversal_date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                },
                &GlPostingService::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(PostingError::Ledger(LedgerError::Float(
                FloatError::InsufficientFloat { .. }
            )))
        ));
    }
}
