//! Service transaction routes: listing, detail and reversal.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use branchbook_core::float::FloatAlert;
use branchbook_core::ledger::LedgerError;
use branchbook_core::transaction::{ServiceKind, ServiceModule, ServiceTransactionStatus};
use branchbook_db::PostingRepository;
use branchbook_db::entities::{gl_journal_entries, gl_transactions, service_transactions};
use branchbook_db::repositories::{
    BranchRepository, GlPostingRecord, PostedTransaction, ReverseInput, ServiceTransactionFilter,
};
use branchbook_shared::types::{PageRequest, PageResponse};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/branches/{branch_id}/transactions", get(list_transactions))
        .route("/transactions/{transaction_id}", get(get_transaction))
        .route("/transactions/{transaction_id}/reverse", post(reverse_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by module (`momo`, `agency_banking`, ...).
    pub module: Option<String>,
    /// Filter by kind (`momo_cash_in`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub per_page: Option<u32>,
}

impl ListTransactionsQuery {
    fn filter(&self) -> Result<ServiceTransactionFilter, LedgerError> {
        Ok(ServiceTransactionFilter {
            module: self.module.as_deref().map(str::parse::<ServiceModule>).transpose()?,
            kind: self.kind.as_deref().map(str::parse::<ServiceKind>).transpose()?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<ServiceTransactionStatus>)
                .transpose()?,
            date_from: self.from,
            date_to: self.to,
        })
    }
}

/// Request body for reversing a transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct ReverseRequest {
    /// Why the transaction is reversed.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
    /// User reversing it.
    pub performed_by: Uuid,
    /// Business date of the reversal (default: today).
    pub reversal_date: Option<NaiveDate>,
}

/// Response for an operational transaction.
#[derive(Debug, Serialize)]
pub struct ServiceTransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Branch ID.
    pub branch_id: Uuid,
    /// Module.
    pub module: String,
    /// Kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Provider.
    pub provider: String,
    /// Principal amount.
    pub amount: Decimal,
    /// Fee or commission.
    pub fee: Decimal,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Phone or card number.
    pub phone_number: Option<String>,
    /// External reference.
    pub reference: Option<String>,
    /// Expense head.
    pub expense_category: Option<String>,
    /// Status.
    pub status: String,
    /// Business date.
    pub transaction_date: String,
    /// User who captured it.
    pub performed_by: Uuid,
    /// Reversal timestamp.
    pub reversed_at: Option<String>,
    /// Reversal reason.
    pub reversal_reason: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<service_transactions::Model> for ServiceTransactionResponse {
    fn from(t: service_transactions::Model) -> Self {
        Self {
            id: t.id,
            branch_id: t.branch_id,
            module: t.module,
            kind: t.kind,
            provider: t.provider,
            amount: t.amount,
            fee: t.fee,
            customer_name: t.customer_name,
            phone_number: t.phone_number,
            reference: t.reference,
            expense_category: t.expense_category,
            status: t.status,
            transaction_date: t.transaction_date.to_string(),
            performed_by: t.performed_by,
            reversed_at: t.reversed_at.map(|at| at.to_rfc3339()),
            reversal_reason: t.reversal_reason,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Response for a GL line.
#[derive(Debug, Serialize)]
pub struct GlEntryResponse {
    /// Line number within the posting.
    pub line_no: i32,
    /// Account code.
    pub account_code: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: String,
}

impl From<gl_journal_entries::Model> for GlEntryResponse {
    fn from(e: gl_journal_entries::Model) -> Self {
        Self {
            line_no: e.line_no,
            account_code: e.account_code,
            debit: e.debit,
            credit: e.credit,
            description: e.description,
        }
    }
}

/// Response for a GL posting.
#[derive(Debug, Serialize)]
pub struct GlPostingResponse {
    /// GL transaction ID.
    pub id: Uuid,
    /// Business date.
    pub transaction_date: String,
    /// Description.
    pub description: String,
    /// Reference.
    pub reference: Option<String>,
    /// Total debits.
    pub total_debit: Decimal,
    /// Total credits.
    pub total_credit: Decimal,
    /// Whether this posting reverses another.
    pub is_reversal: bool,
    /// The posting this one reverses.
    pub reversal_of: Option<Uuid>,
    /// GL lines.
    pub entries: Vec<GlEntryResponse>,
}

impl GlPostingResponse {
    fn new(header: gl_transactions::Model, entries: Vec<gl_journal_entries::Model>) -> Self {
        Self {
            id: header.id,
            transaction_date: header.transaction_date.to_string(),
            description: header.description,
            reference: header.reference,
            total_debit: header.total_debit,
            total_credit: header.total_credit,
            is_reversal: header.is_reversal,
            reversal_of: header.reversal_of,
            entries: entries.into_iter().map(GlEntryResponse::from).collect(),
        }
    }
}

impl From<GlPostingRecord> for GlPostingResponse {
    fn from(r: GlPostingRecord) -> Self {
        Self::new(r.header, r.entries)
    }
}

/// Response for a posting or reversal.
#[derive(Debug, Serialize)]
pub struct PostingResponse {
    /// The operational record.
    pub transaction: ServiceTransactionResponse,
    /// The GL posting written.
    pub gl_transaction: GlPostingResponse,
    /// Float threshold warnings.
    pub alerts: Vec<FloatAlert>,
}

impl From<PostedTransaction> for PostingResponse {
    fn from(p: PostedTransaction) -> Self {
        Self {
            transaction: p.service_transaction.into(),
            gl_transaction: GlPostingResponse::new(p.gl_transaction, p.entries),
            alerts: p.alerts,
        }
    }
}

/// Response for a transaction with its GL postings.
#[derive(Debug, Serialize)]
pub struct TransactionDetailResponse {
    /// The operational record.
    pub transaction: ServiceTransactionResponse,
    /// Original posting first, then the reversal if any.
    pub gl_postings: Vec<GlPostingResponse>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/branches/{branch_id}/transactions` - List a branch's transactions.
async fn list_transactions(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<PageResponse<ServiceTransactionResponse>>, ApiError> {
    let filter = query.filter()?;
    let page = PageRequest::new(query.page, query.per_page);

    BranchRepository::new((*state.db).clone()).get(branch_id).await?;

    let repo = PostingRepository::new((*state.db).clone());
    let (rows, total) = repo.list_service_transactions(branch_id, filter, &page).await?;

    let data = rows.into_iter().map(ServiceTransactionResponse::from).collect();
    Ok(Json(PageResponse::new(data, &page, total)))
}

/// GET `/transactions/{transaction_id}` - Transaction with its GL postings.
async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionDetailResponse>, ApiError> {
    let repo = PostingRepository::new((*state.db).clone());
    let detail = repo
        .find_service_transaction(transaction_id)
        .await?
        .ok_or(LedgerError::TransactionNotFound(transaction_id))?;

    Ok(Json(TransactionDetailResponse {
        transaction: detail.transaction.into(),
        gl_postings: detail.postings.into_iter().map(GlPostingResponse::from).collect(),
    }))
}

/// POST `/transactions/{transaction_id}/reverse` - Reverse a completed transaction.
async fn reverse_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<ReverseRequest>,
) -> Result<Json<PostingResponse>, ApiError> {
    payload.validate()?;

    let repo = PostingRepository::new((*state.db).clone());
    let reversed = repo
        .reverse(
            transaction_id,
            ReverseInput {
                reason: payload.reason,
                performed_by: payload.performed_by,
                reversal_date: payload
                    .reversal_date
                    .unwrap_or_else(|| Utc::now().date_naive()),
            },
            &state.posting,
        )
        .await?;

    info!(
        transaction_id = %transaction_id,
        gl_transaction_id = %reversed.gl_transaction.id,
        "Transaction reversal recorded"
    );
    Ok(Json(reversed.into()))
}
