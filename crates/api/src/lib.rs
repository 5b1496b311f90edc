//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for branches, float accounts and service transactions
//! - Fee quotes and GL read endpoints
//! - JSON error responses

pub mod error;
pub mod routes;

use axum::Router;
use branchbook_core::ledger::GlPostingService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Fee schedule and posting rules.
    pub posting: Arc<GlPostingService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    /// Router whose database is never reachable; every route under test must
    /// answer before touching it.
    fn app() -> Router {
        create_router(AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            posting: Arc::new(GlPostingService::default()),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn decimal(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    fn branch_uri(path: &str) -> String {
        format!("/api/v1/branches/{}/{path}", Uuid::now_v7())
    }

    #[tokio::test]
    async fn test_health_reports_database_down() {
        let (status, json) = send(get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["database"], false);
    }

    #[tokio::test]
    async fn test_fee_quote_for_cash_out() {
        let (status, json) = send(get("/api/v1/fees/quote?type=momo_cash_out&amount=250")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decimal(&json["fee"]), dec!(2.50));
        assert_eq!(decimal(&json["customer_cash"]), dec!(247.50));
        assert_eq!(json["rule"]["type"], "percentage");
    }

    #[tokio::test]
    async fn test_fee_quote_defaults_card_price() {
        let (status, json) = send(get("/api/v1/fees/quote?type=ezwich_card_issuance")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decimal(&json["amount"]), dec!(15.00));
        assert_eq!(decimal(&json["fee"]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_fee_quote_unknown_type() {
        let (status, json) = send(get("/api/v1/fees/quote?type=airtime&amount=10")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "UNKNOWN_KIND");
    }

    #[tokio::test]
    async fn test_fee_quote_refuses_payout_posting_would_reject() {
        let (status, json) =
            send(get("/api/v1/fees/quote?type=momo_cash_out&amount=0.50")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "FEE_EXCEEDS_AMOUNT");

        let body = json!({
            "type": "cash_out",
            "provider": "MTN",
            "amount": "0.50",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("momo/transactions"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "FEE_EXCEEDS_AMOUNT");
    }

    #[tokio::test]
    async fn test_fee_quote_checks_amount_scale() {
        let (status, json) =
            send(get("/api/v1/fees/quote?type=momo_cash_in&amount=10.001")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "INVALID_AMOUNT_SCALE");
    }

    #[tokio::test]
    async fn test_unbookable_amount_rejected() {
        let body = json!({
            "type": "cash_in",
            "provider": "MTN",
            "amount": "79228162514264337593543950335",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("momo/transactions"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "AMOUNT_TOO_LARGE");

        let (status, json) = send(get(
            "/api/v1/fees/quote?type=agency_withdrawal&amount=79228162514264337593543950335",
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "AMOUNT_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_before_posting() {
        let body = json!({
            "type": "cash_in",
            "provider": "MTN",
            "amount": "0.00",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("momo/transactions"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "ZERO_AMOUNT");
    }

    #[tokio::test]
    async fn test_missing_provider_rejected() {
        let body = json!({
            "type": "deposit",
            "amount": "500.00",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("agency-banking/transactions"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "MISSING_PROVIDER");
    }

    #[tokio::test]
    async fn test_cash_out_fee_swallowing_amount_rejected() {
        let body = json!({
            "provider": "GCB",
            "amount": "10.00",
            "fee": "10.00",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("ezwich/withdrawals"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "FEE_EXCEEDS_AMOUNT");
    }

    #[tokio::test]
    async fn test_missing_amount_rejected() {
        let body = json!({
            "provider": "ECG",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("power/sales"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_reference_rejected() {
        let body = json!({
            "category": "rent",
            "amount": "1200.00",
            "reference": "",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("expenses"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_transfer_to_same_account_rejected() {
        let account = Uuid::now_v7();
        let body = json!({
            "source_account_id": account,
            "destination_account_id": account,
            "amount": "100.00",
            "performed_by": Uuid::now_v7(),
        });
        let (status, json) = send(post(&branch_uri("float-transfers"), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "SAME_TRANSFER_ACCOUNT");
    }

    #[tokio::test]
    async fn test_unknown_momo_type_is_unprocessable() {
        let body = json!({
            "type": "airtime",
            "provider": "MTN",
            "amount": "5.00",
            "performed_by": Uuid::now_v7(),
        });
        let (status, _) = send(post(&branch_uri("momo/transactions"), &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_trial_balance_rejects_inverted_range() {
        let (status, json) =
            send(get("/api/v1/gl/trial-balance?from=2026-03-31&to=2026-03-01")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_database_failure_is_hidden() {
        let (status, json) = send(get("/api/v1/gl/accounts")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "DATABASE_ERROR");
        assert_eq!(json["message"], "An error occurred");
    }
}
