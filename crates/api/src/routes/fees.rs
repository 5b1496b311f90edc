//! Fee quote routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use branchbook_core::ledger::FeeQuote;
use branchbook_core::transaction::ServiceKind;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Creates the fee routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/fees/quote", get(quote_fee))
}

/// Query parameters for a fee quote.
#[derive(Debug, Deserialize)]
pub struct FeeQuoteQuery {
    /// Transaction kind, e.g. `momo_cash_out`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Principal amount; defaults to the card price for card issuance.
    pub amount: Option<Decimal>,
    /// Fee the teller intends to charge instead of the schedule.
    pub fee: Option<Decimal>,
}

/// GET `/fees/quote` - Quote the fee for a prospective transaction.
///
/// A quote fails exactly where posting the same transaction would.
async fn quote_fee(
    State(state): State<AppState>,
    Query(query): Query<FeeQuoteQuery>,
) -> Result<Json<FeeQuote>, ApiError> {
    let kind: ServiceKind = query.kind.parse()?;

    let amount = match (query.amount, kind) {
        (Some(amount), _) => amount,
        (None, ServiceKind::EzwichCardIssuance) => state.posting.schedule().card_price(),
        (None, _) => {
            return Err(ApiError::bad_request(
                "VALIDATION_ERROR",
                "amount: field is required",
            ));
        }
    };

    let quote = state.posting.quote(kind, amount, query.fee)?;
    Ok(Json(quote))
}
