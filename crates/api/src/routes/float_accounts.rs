//! Float account routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
};
use branchbook_core::float::FloatAccountKind;
use branchbook_db::entities::float_accounts;
use branchbook_db::repositories::{BranchRepository, CreateFloatAccountInput, FloatAccountRepository};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError};

/// Creates the float account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/branches/{branch_id}/float-accounts",
            get(list_float_accounts).post(create_float_account),
        )
        .route("/float-accounts/{id}/thresholds", patch(update_thresholds))
        .route("/float-accounts/{id}", delete(deactivate_float_account))
}

/// Request body for creating a float account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFloatAccountRequest {
    /// Channel.
    pub kind: FloatAccountKind,
    /// Network, bank or utility; ignored for cash in till and Jumia.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub provider: String,
    /// Starting balance.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Low-balance threshold.
    #[serde(default)]
    pub min_threshold: Decimal,
    /// High-balance threshold.
    pub max_threshold: Option<Decimal>,
}

/// Request body for changing thresholds.
#[derive(Debug, Deserialize)]
pub struct UpdateThresholdsRequest {
    /// Low-balance threshold.
    pub min_threshold: Decimal,
    /// High-balance threshold.
    pub max_threshold: Option<Decimal>,
}

/// Query parameters for listing float accounts.
#[derive(Debug, Deserialize)]
pub struct ListFloatAccountsQuery {
    /// Include deactivated accounts.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Response for a float account.
#[derive(Debug, Serialize)]
pub struct FloatAccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Owning branch.
    pub branch_id: Uuid,
    /// Channel.
    pub kind: String,
    /// Provider key.
    pub provider: String,
    /// Current balance.
    pub current_balance: Decimal,
    /// Low-balance threshold.
    pub min_threshold: Decimal,
    /// High-balance threshold.
    pub max_threshold: Option<Decimal>,
    /// Whether the account takes movements.
    pub is_active: bool,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<float_accounts::Model> for FloatAccountResponse {
    fn from(a: float_accounts::Model) -> Self {
        Self {
            id: a.id,
            branch_id: a.branch_id,
            kind: a.kind,
            provider: a.provider,
            current_balance: a.current_balance,
            min_threshold: a.min_threshold,
            max_threshold: a.max_threshold,
            is_active: a.is_active,
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

/// GET `/branches/{branch_id}/float-accounts` - List a branch's float accounts.
async fn list_float_accounts(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Query(query): Query<ListFloatAccountsQuery>,
) -> Result<Json<Value>, ApiError> {
    BranchRepository::new((*state.db).clone()).get(branch_id).await?;

    let repo = FloatAccountRepository::new((*state.db).clone());
    let accounts: Vec<FloatAccountResponse> = repo
        .list_for_branch(branch_id, query.include_inactive)
        .await?
        .into_iter()
        .map(FloatAccountResponse::from)
        .collect();

    Ok(Json(json!({ "float_accounts": accounts })))
}

/// POST `/branches/{branch_id}/float-accounts` - Open a float account.
async fn create_float_account(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<CreateFloatAccountRequest>,
) -> Result<(StatusCode, Json<FloatAccountResponse>), ApiError> {
    payload.validate()?;
    if payload.kind.is_provider_scoped() && payload.provider.trim().is_empty() {
        return Err(ApiError::bad_request(
            "MISSING_PROVIDER",
            format!("Provider is required for {} float accounts", payload.kind),
        ));
    }

    let repo = FloatAccountRepository::new((*state.db).clone());
    let account = repo
        .create(CreateFloatAccountInput {
            branch_id,
            kind: payload.kind,
            provider: payload.provider,
            opening_balance: payload.opening_balance,
            min_threshold: payload.min_threshold,
            max_threshold: payload.max_threshold,
        })
        .await?;

    info!(
        float_account_id = %account.id,
        branch_id = %branch_id,
        kind = %account.kind,
        provider = %account.provider,
        "Float account created"
    );
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// PATCH `/float-accounts/{id}/thresholds` - Change alert thresholds.
async fn update_thresholds(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateThresholdsRequest>,
) -> Result<Json<FloatAccountResponse>, ApiError> {
    let repo = FloatAccountRepository::new((*state.db).clone());
    let account = repo
        .set_thresholds(id, payload.min_threshold, payload.max_threshold)
        .await?;
    Ok(Json(account.into()))
}

/// DELETE `/float-accounts/{id}` - Deactivate a float account.
async fn deactivate_float_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = FloatAccountRepository::new((*state.db).clone());
    repo.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
