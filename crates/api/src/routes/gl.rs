//! General ledger read routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use branchbook_db::GlAccountRepository;
use branchbook_db::repositories::{TrialBalance, TrialBalanceFilter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Creates the GL routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/gl/accounts", get(list_accounts))
        .route("/gl/trial-balance", get(trial_balance))
}

/// Response for a GL account.
#[derive(Debug, Serialize)]
pub struct GlAccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Name.
    pub name: String,
    /// Asset, liability, equity, revenue or expense.
    pub account_type: String,
    /// Running balance on the normal side.
    pub balance: Decimal,
}

/// Query parameters for the trial balance.
#[derive(Debug, Deserialize)]
pub struct TrialBalanceQuery {
    /// Restrict to one branch.
    pub branch_id: Option<Uuid>,
    /// First business date (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last business date (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// GET `/gl/accounts` - Chart of accounts with running balances.
async fn list_accounts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let repo = GlAccountRepository::new((*state.db).clone());
    let accounts: Vec<GlAccountResponse> = repo
        .list()
        .await?
        .into_iter()
        .map(|a| GlAccountResponse {
            id: a.id,
            code: a.code,
            name: a.name,
            account_type: a.account_type,
            balance: a.balance,
        })
        .collect();

    Ok(Json(json!({ "accounts": accounts })))
}

/// GET `/gl/trial-balance` - Debit and credit totals per account.
async fn trial_balance(
    State(state): State<AppState>,
    Query(query): Query<TrialBalanceQuery>,
) -> Result<Json<TrialBalance>, ApiError> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err(ApiError::bad_request(
            "INVALID_DATE_RANGE",
            format!("from {from} is after to {to}"),
        ));
    }

    let repo = GlAccountRepository::new((*state.db).clone());
    let tb = repo
        .trial_balance(TrialBalanceFilter {
            branch_id: query.branch_id,
            from: query.from,
            to: query.to,
        })
        .await?;
    Ok(Json(tb))
}
