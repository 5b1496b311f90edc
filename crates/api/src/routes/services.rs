//! Posting routes for the branch service modules.
//!
//! Each route turns a module-specific request into a
//! [`ServiceTransactionInput`], prepares the GL posting and persists it.
//! Validation and fee errors are raised before the database is touched.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use branchbook_core::float::{FloatAccountKind, FloatError};
use branchbook_core::ledger::LedgerError;
use branchbook_core::transaction::{
    ExpenseCategory, ServiceKind, ServiceTransactionInput, TransferAccounts,
};
use branchbook_db::PostingRepository;
use branchbook_db::repositories::FloatAccountRepository;
use branchbook_shared::types::{BranchId, FloatAccountId, UserId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use super::transactions::PostingResponse;
use crate::{AppState, error::ApiError};

/// Creates the service posting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/branches/{branch_id}/momo/transactions", post(post_momo))
        .route(
            "/branches/{branch_id}/agency-banking/transactions",
            post(post_agency_banking),
        )
        .route("/branches/{branch_id}/ezwich/withdrawals", post(post_ezwich_withdrawal))
        .route(
            "/branches/{branch_id}/ezwich/card-issuances",
            post(post_ezwich_card_issuance),
        )
        .route("/branches/{branch_id}/ezwich/settlements", post(post_ezwich_settlement))
        .route("/branches/{branch_id}/power/sales", post(post_power_sale))
        .route("/branches/{branch_id}/jumia/collections", post(post_jumia_collection))
        .route("/branches/{branch_id}/jumia/settlements", post(post_jumia_settlement))
        .route("/branches/{branch_id}/expenses", post(post_expense))
        .route("/branches/{branch_id}/float-transfers", post(post_float_transfer))
}

// ============================================================================
// Request Types
// ============================================================================

/// Fields shared by every service transaction request.
#[derive(Debug, Deserialize, Validate)]
pub struct ServiceRequest {
    /// Network, bank or utility name.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub provider: String,
    /// Principal amount.
    pub amount: Option<Decimal>,
    /// Fee typed in by the teller; the schedule applies when omitted.
    pub fee: Option<Decimal>,
    /// Customer name.
    #[validate(length(max = 100))]
    pub customer_name: Option<String>,
    /// Customer phone or card number.
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    /// External reference; a reference posts at most once per branch.
    #[validate(length(min = 1, max = 100))]
    pub reference: Option<String>,
    /// Business date (default: today).
    pub transaction_date: Option<NaiveDate>,
    /// User capturing the transaction.
    pub performed_by: Uuid,
}

/// MoMo direction.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomoType {
    /// Customer hands over cash.
    CashIn,
    /// Customer receives cash.
    CashOut,
}

/// Request body for a MoMo transaction.
#[derive(Debug, Deserialize)]
pub struct MomoRequest {
    /// Direction.
    #[serde(rename = "type")]
    pub direction: MomoType,
    /// Common fields.
    #[serde(flatten)]
    pub details: ServiceRequest,
}

/// Agency banking direction.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyType {
    /// Cash paid into a partner bank account.
    Deposit,
    /// Cash drawn from a partner bank account.
    Withdrawal,
}

/// Request body for an agency banking transaction.
#[derive(Debug, Deserialize)]
pub struct AgencyBankingRequest {
    /// Direction.
    #[serde(rename = "type")]
    pub direction: AgencyType,
    /// Common fields.
    #[serde(flatten)]
    pub details: ServiceRequest,
}

/// Request body for an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    /// Expense head.
    pub category: ExpenseCategory,
    /// Common fields.
    #[serde(flatten)]
    pub details: ServiceRequest,
}

/// Request body for a float transfer.
#[derive(Debug, Deserialize)]
pub struct FloatTransferRequest {
    /// Account drawn down.
    pub source_account_id: Uuid,
    /// Account topped up.
    pub destination_account_id: Uuid,
    /// Common fields.
    #[serde(flatten)]
    pub details: ServiceRequest,
}

impl ServiceRequest {
    /// Builds the posting input; `default_amount` fills a missing amount.
    fn into_input(
        self,
        branch_id: Uuid,
        kind: ServiceKind,
        default_amount: Option<Decimal>,
    ) -> Result<ServiceTransactionInput, ApiError> {
        self.validate()?;
        let amount = self.amount.or(default_amount).ok_or_else(|| {
            ApiError::bad_request("VALIDATION_ERROR", "amount: field is required")
        })?;

        Ok(ServiceTransactionInput {
            branch_id: BranchId::from_uuid(branch_id),
            kind,
            provider: self.provider,
            amount,
            fee: self.fee,
            customer_name: self.customer_name,
            phone_number: self.phone_number,
            reference: self.reference,
            expense_category: None,
            transfer: None,
            transaction_date: self
                .transaction_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            performed_by: UserId::from_uuid(self.performed_by),
        })
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

type Posted = (StatusCode, Json<PostingResponse>);

/// POST `/branches/{branch_id}/momo/transactions` - MoMo cash-in or cash-out.
async fn post_momo(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<MomoRequest>,
) -> Result<Posted, ApiError> {
    let kind = match payload.direction {
        MomoType::CashIn => ServiceKind::MomoCashIn,
        MomoType::CashOut => ServiceKind::MomoCashOut,
    };
    let input = payload.details.into_input(branch_id, kind, None)?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/agency-banking/transactions` - Deposit or withdrawal.
async fn post_agency_banking(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<AgencyBankingRequest>,
) -> Result<Posted, ApiError> {
    let kind = match payload.direction {
        AgencyType::Deposit => ServiceKind::AgencyDeposit,
        AgencyType::Withdrawal => ServiceKind::AgencyWithdrawal,
    };
    let input = payload.details.into_input(branch_id, kind, None)?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/ezwich/withdrawals` - E-Zwich card withdrawal.
async fn post_ezwich_withdrawal(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Posted, ApiError> {
    let input = payload.into_input(branch_id, ServiceKind::EzwichWithdrawal, None)?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/ezwich/card-issuances` - New card sold.
///
/// The amount defaults to the configured card price.
async fn post_ezwich_card_issuance(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Posted, ApiError> {
    let card_price = state.posting.schedule().card_price();
    let input = payload.into_input(branch_id, ServiceKind::EzwichCardIssuance, Some(card_price))?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/ezwich/settlements` - Partner bank settlement.
async fn post_ezwich_settlement(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Posted, ApiError> {
    let input = payload.into_input(branch_id, ServiceKind::EzwichSettlement, None)?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/power/sales` - Prepaid power token sale.
async fn post_power_sale(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Posted, ApiError> {
    let input = payload.into_input(branch_id, ServiceKind::PowerSale, None)?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/jumia/collections` - COD package paid.
async fn post_jumia_collection(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Posted, ApiError> {
    let input = payload.into_input(branch_id, ServiceKind::JumiaCollection, None)?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/jumia/settlements` - COD cash remitted to Jumia.
async fn post_jumia_settlement(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Posted, ApiError> {
    let input = payload.into_input(branch_id, ServiceKind::JumiaSettlement, None)?;
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/expenses` - Expense paid from the till.
async fn post_expense(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<ExpenseRequest>,
) -> Result<Posted, ApiError> {
    let mut input = payload.details.into_input(branch_id, ServiceKind::Expense, None)?;
    input.expense_category = Some(payload.category);
    post_service(&state, input).await
}

/// POST `/branches/{branch_id}/float-transfers` - Move funds between two floats.
async fn post_float_transfer(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<FloatTransferRequest>,
) -> Result<Posted, ApiError> {
    let mut input = payload.details.into_input(branch_id, ServiceKind::FloatTransfer, None)?;
    if payload.source_account_id == payload.destination_account_id {
        return Err(LedgerError::SameTransferAccount.into());
    }

    let source_kind = transfer_leg_kind(&state, branch_id, payload.source_account_id).await?;
    let destination_kind =
        transfer_leg_kind(&state, branch_id, payload.destination_account_id).await?;
    input.transfer = Some(TransferAccounts {
        source_id: FloatAccountId::from_uuid(payload.source_account_id),
        source_kind,
        destination_id: FloatAccountId::from_uuid(payload.destination_account_id),
        destination_kind,
    });

    post_service(&state, input).await
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn post_service(state: &AppState, input: ServiceTransactionInput) -> Result<Posted, ApiError> {
    let prepared = state.posting.prepare(&input)?;
    debug!(
        branch_id = %input.branch_id,
        kind = %input.kind,
        fee = %prepared.fee,
        lines = prepared.lines.len(),
        "Posting prepared"
    );

    let repo = PostingRepository::new((*state.db).clone());
    let posted = repo.post(&input, &prepared).await?;
    Ok((StatusCode::CREATED, Json(posted.into())))
}

/// Kind of a branch float account taking part in a transfer.
async fn transfer_leg_kind(
    state: &AppState,
    branch_id: Uuid,
    account_id: Uuid,
) -> Result<FloatAccountKind, ApiError> {
    let repo = FloatAccountRepository::new((*state.db).clone());
    let account = repo
        .find(account_id)
        .await?
        .filter(|a| a.branch_id == branch_id)
        .ok_or(FloatError::AccountIdNotFound(FloatAccountId::from_uuid(account_id)))?;

    account
        .kind
        .parse::<FloatAccountKind>()
        .map_err(ApiError::from)
}
